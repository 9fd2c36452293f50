// Thin namespace wrapper for API-layer components
use crate::models::{GuessRequest, GuessResult, GuessState, SessionResponse};
use utoipa::OpenApi;

pub mod handlers {
    pub use crate::handlers::*;
}

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "Rust Name Guesser API"),
    paths(
        crate::handlers::guess,
        crate::handlers::guess_by_query,
        crate::handlers::create_session,
        crate::handlers::get_session,
        crate::handlers::submit_session_guess
    ),
    components(schemas(GuessRequest, GuessResult, GuessState, SessionResponse)),
    tags(
        (name = "guess", description = "One-shot guesses"),
        (name = "sessions", description = "Guess sessions used by the form")
    )
)]
pub struct ApiDoc;
