//! Guess workflow shared by the HTTP handlers, guess sessions and the CLI.
//!
//! One guess runs three lookups in a fixed order:
//! 1. Age via Agify
//! 2. Gender via Genderize
//! 3. Nationality via Nationalize
//!
//! The first failure aborts the workflow and no partial result escapes.
use crate::config::Config;
use crate::errors::{ClientError, GuessError};
use crate::models::{AgeGuess, CountryGuess, GenderGuess, GuessResult};
use crate::regions::country_display_name;
use crate::services::{AgifyService, GenderizeService, NationalizeService};
use uuid::Uuid;

/// Shown when an upstream service has no gender prediction.
pub const UNKNOWN_GENDER: &str = "Unknown";

/// Rejects empty and whitespace-only names, returning the trimmed name.
pub fn validate_name(name: &str) -> Result<&str, GuessError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GuessError::Validation("Name cannot be empty".to_string()));
    }
    Ok(trimmed)
}

/// Combines the three predictions, applying defaults for missing values.
pub fn build_result(age: &AgeGuess, gender: &GenderGuess, country: &CountryGuess) -> GuessResult {
    let first_code = country
        .candidates
        .first()
        .map(|candidate| candidate.country_code.as_str());

    GuessResult {
        age: age.predicted_age.unwrap_or(0),
        gender: gender
            .predicted_gender
            .clone()
            .unwrap_or_else(|| UNKNOWN_GENDER.to_string()),
        country_display_name: country_display_name(first_code),
    }
}

pub struct GuessService {
    age: AgifyService,
    gender: GenderizeService,
    country: NationalizeService,
}

impl GuessService {
    pub fn new(config: &Config) -> Self {
        Self {
            age: AgifyService::new(config),
            gender: GenderizeService::new(config),
            country: NationalizeService::new(config),
        }
    }

    /// Runs one full guess for `name`.
    pub async fn guess(&self, name: &str) -> Result<GuessResult, GuessError> {
        let name = validate_name(name)?;
        let guess_id = Uuid::new_v4();

        tracing::info!("[{}] Starting guess for name: {}", guess_id, name);

        tracing::debug!("[{}] Step 1: Fetching age", guess_id);
        let age = self
            .age
            .fetch_age(name)
            .await
            .map_err(|e| abandon(guess_id, e))?;

        tracing::debug!("[{}] Step 2: Fetching gender", guess_id);
        let gender = self
            .gender
            .fetch_gender(name)
            .await
            .map_err(|e| abandon(guess_id, e))?;

        tracing::debug!("[{}] Step 3: Fetching country", guess_id);
        let country = self
            .country
            .fetch_country(name)
            .await
            .map_err(|e| abandon(guess_id, e))?;

        let result = build_result(&age, &gender, &country);
        tracing::info!(
            "[{}] ✓ Guess complete: age={}, gender={}, country={}",
            guess_id,
            result.age,
            result.gender,
            result.country_display_name
        );

        Ok(result)
    }
}

fn abandon(guess_id: Uuid, cause: ClientError) -> GuessError {
    tracing::error!(
        "[{}] Guess abandoned, {} lookup failed: {}",
        guess_id,
        cause.service(),
        cause
    );
    GuessError::Failed(cause)
}
