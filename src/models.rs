use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ============ Upstream Responses ============

/// Age prediction decoded from Agify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGuess {
    /// Name echoed back by the service; not validated.
    #[serde(rename = "name", default)]
    pub subject_name: String,
    /// `null` when the name has no match.
    #[serde(rename = "age", default)]
    pub predicted_age: Option<u32>,
    /// Number of samples the prediction is based on.
    #[serde(rename = "count")]
    pub sample_count: u64,
}

/// Gender prediction decoded from Genderize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderGuess {
    #[serde(rename = "name", default)]
    pub subject_name: String,
    #[serde(rename = "gender", default)]
    pub predicted_gender: Option<String>,
    pub probability: f64,
}

/// Nationality prediction decoded from Nationalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryGuess {
    #[serde(rename = "name", default)]
    pub subject_name: String,
    /// Ordered by the service, most likely first. Empty when nothing matched.
    #[serde(rename = "country")]
    pub candidates: Vec<CountryCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryCandidate {
    #[serde(rename = "country_id")]
    pub country_code: String,
    pub probability: f64,
}

// ============ Guess Results ============

/// Combined outcome of one guess, as rendered by the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GuessResult {
    /// Predicted age, `0` when unknown.
    #[schema(example = 34)]
    pub age: u32,
    /// Predicted gender, `"Unknown"` when unknown.
    #[schema(example = "female")]
    pub gender: String,
    /// English name of the most likely country, `"Unknown"` when unknown.
    #[schema(example = "United States")]
    pub country_display_name: String,
}

// ============ API Request/Response Models ============

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GuessRequest {
    #[schema(example = "Alice")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuessQueryParams {
    pub name: Option<String>,
}

/// State of a guess session as seen by the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GuessState {
    Idle,
    Loading { ticket: u64 },
    Success { ticket: u64, result: GuessResult },
    Failure { ticket: u64, error: String },
}

impl GuessState {
    /// Ticket of the submission this state belongs to; `None` while idle.
    pub fn ticket(&self) -> Option<u64> {
        match self {
            GuessState::Idle => None,
            GuessState::Loading { ticket }
            | GuessState::Success { ticket, .. }
            | GuessState::Failure { ticket, .. } => Some(*ticket),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, GuessState::Loading { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub state: GuessState,
}
