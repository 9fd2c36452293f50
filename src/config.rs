use serde::Deserialize;

pub const DEFAULT_AGIFY_BASE_URL: &str = "https://api.agify.io";
pub const DEFAULT_GENDERIZE_BASE_URL: &str = "https://api.genderize.io";
pub const DEFAULT_NATIONALIZE_BASE_URL: &str = "https://api.nationalize.io";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub agify_base_url: String,
    pub genderize_base_url: String,
    pub nationalize_base_url: String,
    /// Seconds a guess session may stay untouched before it is evicted.
    pub session_idle_secs: u64,
    pub session_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            agify_base_url: DEFAULT_AGIFY_BASE_URL.to_string(),
            genderize_base_url: DEFAULT_GENDERIZE_BASE_URL.to_string(),
            nationalize_base_url: DEFAULT_NATIONALIZE_BASE_URL.to_string(),
            session_idle_secs: 1800,
            session_capacity: 10_000,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            agify_base_url: base_url_from_env("AGIFY_BASE_URL", &defaults.agify_base_url)?,
            genderize_base_url: base_url_from_env(
                "GENDERIZE_BASE_URL",
                &defaults.genderize_base_url,
            )?,
            nationalize_base_url: base_url_from_env(
                "NATIONALIZE_BASE_URL",
                &defaults.nationalize_base_url,
            )?,
            session_idle_secs: std::env::var("SESSION_IDLE_SECS")
                .unwrap_or_else(|_| defaults.session_idle_secs.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SESSION_IDLE_SECS must be a positive number"))
                .and_then(|secs: u64| {
                    if secs == 0 {
                        anyhow::bail!("SESSION_IDLE_SECS cannot be zero");
                    }
                    Ok(secs)
                })?,
            session_capacity: std::env::var("SESSION_CAPACITY")
                .unwrap_or_else(|_| defaults.session_capacity.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SESSION_CAPACITY must be a positive number"))?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Agify Base URL: {}", config.agify_base_url);
        tracing::debug!("Genderize Base URL: {}", config.genderize_base_url);
        tracing::debug!("Nationalize Base URL: {}", config.nationalize_base_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn base_url_from_env(key: &str, default: &str) -> anyhow::Result<String> {
    let url = std::env::var(key).unwrap_or_else(|_| default.to_string());
    validate_base_url(key, url)
}

fn validate_base_url(key: &str, url: String) -> anyhow::Result<String> {
    if url.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", key);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", key);
    }
    Ok(url.trim_end_matches('/').to_string())
}
