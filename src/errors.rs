use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Message shown to users whenever a guess fails upstream.
pub const GENERIC_GUESS_ERROR: &str = "An error occurred at API. Please try again later.";

/// Identity of one of the three upstream prediction services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamService {
    Age,
    Gender,
    Nationality,
}

impl UpstreamService {
    pub fn name(&self) -> &'static str {
        match self {
            UpstreamService::Age => "Agify",
            UpstreamService::Gender => "Genderize",
            UpstreamService::Nationality => "Nationalize",
        }
    }
}

impl fmt::Display for UpstreamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure of a single upstream call.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The service answered with a non-success HTTP status.
    Upstream {
        service: UpstreamService,
        status: u16,
    },
    /// The body was not JSON or lacked a required field.
    Decode {
        service: UpstreamService,
        message: String,
    },
    /// The request never produced a readable response.
    Transport {
        service: UpstreamService,
        message: String,
    },
}

impl ClientError {
    pub fn service(&self) -> UpstreamService {
        match self {
            ClientError::Upstream { service, .. }
            | ClientError::Decode { service, .. }
            | ClientError::Transport { service, .. } => *service,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Upstream { service, status } => {
                write!(f, "{} API request failed with status: {}", service, status)
            }
            ClientError::Decode { service, message } => {
                write!(f, "Failed to parse {} response: {}", service, message)
            }
            ClientError::Transport { service, message } => {
                write!(f, "{} request failed: {}", service, message)
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// The only error a caller of `guess` has to branch on.
///
/// `Display` never includes upstream details; the underlying [`ClientError`]
/// is reachable through [`std::error::Error::source`] for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessError {
    /// Empty or whitespace-only name.
    Validation(String),
    /// One of the upstream calls failed; partial data was discarded.
    Failed(ClientError),
}

impl GuessError {
    /// Message safe to show in the form.
    pub fn user_message(&self) -> &str {
        match self {
            GuessError::Validation(msg) => msg,
            GuessError::Failed(_) => GENERIC_GUESS_ERROR,
        }
    }

    pub fn cause(&self) -> Option<&ClientError> {
        match self {
            GuessError::Validation(_) => None,
            GuessError::Failed(cause) => Some(cause),
        }
    }
}

impl fmt::Display for GuessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

impl std::error::Error for GuessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GuessError::Validation(_) => None,
            GuessError::Failed(cause) => Some(cause),
        }
    }
}

impl From<ClientError> for GuessError {
    fn from(err: ClientError) -> Self {
        GuessError::Failed(err)
    }
}

/// Application-specific error types for the HTTP layer.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Resource not found error.
    NotFound(String),
    /// The request body could not be read as JSON.
    BadRequest(String),
    /// The request was overtaken by a newer one.
    Conflict(String),
    /// A guess failed.
    Guess(GuessError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Guess(e) => write!(f, "Guess error: {}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each error variant to an HTTP status code and a JSON body.
    ///
    /// Upstream details are logged here and never written to the body.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Guess(GuessError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Guess(err @ GuessError::Failed(cause)) => {
                tracing::error!("Guess failed: {}", cause);
                (StatusCode::BAD_GATEWAY, err.user_message().to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<GuessError> for AppError {
    fn from(err: GuessError) -> Self {
        AppError::Guess(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    }
}
