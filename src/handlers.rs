use crate::api::ApiDoc;
use crate::config::Config;
use crate::errors::AppError;
use crate::guesser::GuessService;
use crate::models::*;
use crate::session::SessionStore;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Runs guesses against the three prediction services.
    pub guess_service: Arc<GuessService>,
    /// Per-form guess sessions.
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let guess_service = Arc::new(GuessService::new(config));
        let sessions = SessionStore::new(Arc::clone(&guess_service), config);
        Self {
            guess_service,
            sessions,
        }
    }
}

/// Builds the application router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/v1/guess", get(guess_by_query).post(guess))
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/:id", get(get_session))
        .route("/api/v1/sessions/:id/guess", post(submit_session_guess))
        .layer(
            ServiceBuilder::new()
                // Names are short; anything larger is not a form submission.
                .layer(RequestBodyLimitLayer::new(64 * 1024)),
        );

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .merge(api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-name-guesser",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/guess
///
/// Runs one guess and returns the combined result.
#[utoipa::path(
    post,
    path = "/api/v1/guess",
    tag = "guess",
    request_body = GuessRequest,
    responses(
        (status = 200, description = "All three predictions succeeded", body = GuessResult),
        (status = 400, description = "Name is empty or the body is not a guess request"),
        (status = 502, description = "A prediction service failed")
    )
)]
pub async fn guess(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GuessRequest>, JsonRejection>,
) -> Result<Json<GuessResult>, AppError> {
    let Json(request) = payload?;
    tracing::info!("POST /guess - name: {}", request.name);

    let result = state.guess_service.guess(&request.name).await?;
    Ok(Json(result))
}

/// GET /api/v1/guess?name=
#[utoipa::path(
    get,
    path = "/api/v1/guess",
    tag = "guess",
    params(("name" = String, Query, description = "Name to guess for")),
    responses(
        (status = 200, description = "All three predictions succeeded", body = GuessResult),
        (status = 400, description = "Name is empty or missing"),
        (status = 502, description = "A prediction service failed")
    )
)]
pub async fn guess_by_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GuessQueryParams>,
) -> Result<Json<GuessResult>, AppError> {
    let name = params.name.unwrap_or_default();
    tracing::info!("GET /guess - name: {}", name);

    let result = state.guess_service.guess(&name).await?;
    Ok(Json(result))
}

/// POST /api/v1/sessions
///
/// Opens a guess session for one form.
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "sessions",
    responses((status = 201, description = "Session created", body = SessionResponse))
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionResponse>) {
    let session = state.sessions.create().await;
    tracing::info!("POST /sessions - created {}", session.id());

    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: session.id(),
            state: session.snapshot(),
        }),
    )
}

/// GET /api/v1/sessions/:id
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Current session state", body = SessionResponse),
        (status = 404, description = "Unknown or expired session")
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;

    Ok(Json(SessionResponse {
        session_id: id,
        state: session.snapshot(),
    }))
}

/// POST /api/v1/sessions/:id/guess
///
/// Submits a name and waits for this submission to settle. A later
/// submission to the same session supersedes this one (409).
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/guess",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = GuessRequest,
    responses(
        (status = 200, description = "Settled state (success or failure)", body = SessionResponse),
        (status = 400, description = "Name is empty or the body is not a guess request"),
        (status = 404, description = "Unknown or expired session"),
        (status = 409, description = "Superseded by a newer submission")
    )
)]
pub async fn submit_session_guess(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    payload: Result<Json<GuessRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let Json(request) = payload?;
    tracing::info!("POST /sessions/{}/guess - name: {}", id, request.name);

    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?;

    let ticket = session.submit(&request.name)?;

    match session.wait_settled(ticket).await {
        Some(settled) => Ok(Json(SessionResponse {
            session_id: id,
            state: settled,
        })),
        None => {
            tracing::info!("Session {}: ticket {} was superseded", id, ticket);
            Err(AppError::Conflict(
                "Guess superseded by a newer submission".to_string(),
            ))
        }
    }
}

/// Serves the guess form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Guesser</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 36rem; margin: 2rem auto; padding: 0 1rem; color: #111827; }
        h1 { text-align: center; }
        label { display: block; font-size: 0.875rem; font-weight: 500; }
        input { width: 100%; padding: 0.4rem; margin-top: 0.5rem; box-sizing: border-box; }
        .actions { display: flex; justify-content: flex-end; margin-top: 1.5rem; }
        button { background: #4f46e5; color: white; border: 0; border-radius: 0.375rem; padding: 0.5rem 0.75rem; font-weight: 600; }
        button:disabled { opacity: 0.6; }
        #error { color: #b91c1c; margin-top: 1rem; }
        #result { margin-top: 1.5rem; }
        #result[hidden], #loading[hidden] { display: none; }
        #loading { display: flex; justify-content: center; margin-top: 1.5rem; }
        .spinner { width: 2rem; height: 2rem; border: 3px solid #e5e7eb; border-top-color: #4f46e5; border-radius: 50%; animation: spin 0.8s linear infinite; }
        @keyframes spin { to { transform: rotate(360deg); } }
    </style>
</head>
<body>
    <h1>Guesser</h1>
    <form id="guess-form">
        <label for="name">Name</label>
        <input id="name" name="name" type="text" required placeholder="Enter a name">
        <div class="actions"><button id="submit" type="submit">Guess</button></div>
    </form>
    <p id="error" role="alert"></p>
    <div id="loading" role="status" aria-label="Loading" hidden><div class="spinner"></div></div>
    <dl id="result" hidden>
        <dt>Age</dt><dd id="age"></dd>
        <dt>Gender</dt><dd id="gender"></dd>
        <dt>Country</dt><dd id="country"></dd>
    </dl>
    <script>
        const genericError = "An error occurred at API. Please try again later.";
        const form = document.getElementById("guess-form");
        const input = document.getElementById("name");
        const button = document.getElementById("submit");
        const errorBox = document.getElementById("error");
        const loading = document.getElementById("loading");
        const result = document.getElementById("result");
        let sessionId = null;

        async function ensureSession() {
            if (sessionId === null) {
                const response = await fetch("/api/v1/sessions", { method: "POST" });
                if (!response.ok) throw new Error("session");
                sessionId = (await response.json()).session_id;
            }
            return sessionId;
        }

        // A session evicted by the server answers 404; open a fresh one and send again once.
        async function submitGuess(name) {
            for (let attempt = 0; attempt < 2; attempt++) {
                const id = await ensureSession();
                const response = await fetch(`/api/v1/sessions/${id}/guess`, {
                    method: "POST",
                    headers: { "Content-Type": "application/json" },
                    body: JSON.stringify({ name }),
                });
                if (response.status !== 404) return response;
                sessionId = null;
            }
            throw new Error("session expired");
        }

        function showError(message) {
            result.hidden = true;
            errorBox.textContent = message;
        }

        function setLoading(on) {
            button.disabled = on;
            button.textContent = on ? "Guessing ..." : "Guess";
            loading.hidden = !on;
            if (on) {
                result.hidden = true;
                errorBox.textContent = "";
            }
        }

        function render(state) {
            if (state.status === "success") {
                input.value = "";
                document.getElementById("age").textContent = state.result.age;
                document.getElementById("gender").textContent = state.result.gender;
                document.getElementById("country").textContent = state.result.country_display_name;
                errorBox.textContent = "";
                result.hidden = false;
            } else if (state.status === "failure") {
                showError(state.error);
            }
        }

        form.addEventListener("submit", async (event) => {
            event.preventDefault();
            const name = input.value;
            if (name.trim() === "") {
                showError("Name cannot be empty");
                return;
            }
            setLoading(true);
            try {
                const response = await submitGuess(name);
                if (response.status === 409) return;
                const body = await response.json();
                if (!response.ok) {
                    showError(body.error || genericError);
                    return;
                }
                render(body.state);
            } catch (error) {
                console.log(error);
                showError(genericError);
            } finally {
                setLoading(false);
            }
        });
    </script>
</body>
</html>
"#;
