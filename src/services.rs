use crate::config::Config;
use crate::errors::{ClientError, UpstreamService};
use crate::models::{AgeGuess, CountryGuess, GenderGuess};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

/// Builds `<base_url>?name=<encoded name>`.
///
/// The name goes through form encoding, so spaces, `&`, `=` and non-ASCII
/// characters cannot break the query.
pub fn prediction_url(
    base_url: &str,
    name: &str,
    service: UpstreamService,
) -> Result<Url, ClientError> {
    Url::parse_with_params(base_url, &[("name", name)]).map_err(|e| ClientError::Transport {
        service,
        message: format!("Failed to build URL: {}", e),
    })
}

/// Issues the GET and decodes the body into `T`.
async fn fetch_prediction<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    name: &str,
    service: UpstreamService,
) -> Result<T, ClientError> {
    let url = prediction_url(base_url, name, service)?;
    tracing::debug!("{} URL: {}", service, url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ClientError::Transport {
            service,
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        let status = response.status();
        tracing::error!("{} API returned status {}", service, status);
        return Err(ClientError::Upstream {
            service,
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| ClientError::Transport {
        service,
        message: format!("Failed to read response body: {}", e),
    })?;

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!("Failed to parse {} response: {}", service, e);
        ClientError::Decode {
            service,
            message: e.to_string(),
        }
    })
}

pub struct AgifyService {
    client: Client,
    base_url: String,
}

impl AgifyService {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config.agify_base_url.clone())
    }

    pub fn with_client(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Predict the age for a name.
    pub async fn fetch_age(&self, name: &str) -> Result<AgeGuess, ClientError> {
        tracing::info!("Agify: Fetching age prediction for name: {}", name);

        let guess: AgeGuess =
            fetch_prediction(&self.client, &self.base_url, name, UpstreamService::Age).await?;

        tracing::info!(
            "Agify: age {:?} from {} samples",
            guess.predicted_age,
            guess.sample_count
        );
        Ok(guess)
    }
}

pub struct GenderizeService {
    client: Client,
    base_url: String,
}

impl GenderizeService {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config.genderize_base_url.clone())
    }

    pub fn with_client(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Predict the gender for a name.
    pub async fn fetch_gender(&self, name: &str) -> Result<GenderGuess, ClientError> {
        tracing::info!("Genderize: Fetching gender prediction for name: {}", name);

        let guess: GenderGuess =
            fetch_prediction(&self.client, &self.base_url, name, UpstreamService::Gender).await?;

        tracing::info!(
            "Genderize: gender {:?} with probability {}",
            guess.predicted_gender,
            guess.probability
        );
        Ok(guess)
    }
}

pub struct NationalizeService {
    client: Client,
    base_url: String,
}

impl NationalizeService {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config.nationalize_base_url.clone())
    }

    pub fn with_client(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Predict likely countries for a name, most likely first.
    pub async fn fetch_country(&self, name: &str) -> Result<CountryGuess, ClientError> {
        tracing::info!("Nationalize: Fetching country prediction for name: {}", name);

        let guess: CountryGuess = fetch_prediction(
            &self.client,
            &self.base_url,
            name,
            UpstreamService::Nationality,
        )
        .await?;

        tracing::info!(
            "Nationalize: Found {} candidate(s) for name {}",
            guess.candidates.len(),
            name
        );
        Ok(guess)
    }
}
