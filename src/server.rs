use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{JustBeginError, Result};
use crate::interfaces::providers::{CompletionProvider, CompletionRequest};
use crate::prompt;
use crate::providers::openai::OpenAiProvider;
use crate::validation::{validate_inputs, validate_with_wildcard, PlanRequestBody};

pub const MISSING_KEY_MESSAGE: &str = "OpenAI API key not configured";

const TWO_PHASE_PAGE: &str = include_str!("web/index.html");
const SINGLE_SHOT_PAGE: &str = include_str!("web/simple.html");

/// Shared by every handler. The provider is built once at start-up; `None`
/// means no credential was configured.
#[derive(Clone)]
pub struct AppState {
    pub provider: Option<Arc<dyn CompletionProvider>>,
}

impl AppState {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = OpenAiProvider::from_config(config)?;
        match &provider {
            Some(provider) => tracing::info!(model = provider.model(), "Completion provider ready"),
            None => tracing::warn!("{MISSING_KEY_MESSAGE}; API routes will answer 500"),
        }
        Ok(Self::new(
            provider.map(|provider| Arc::new(provider) as Arc<dyn CompletionProvider>),
        ))
    }

    fn provider(&self) -> Result<Arc<dyn CompletionProvider>> {
        self.provider
            .clone()
            .ok_or_else(|| JustBeginError::Config(MISSING_KEY_MESSAGE.to_string()))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ResultResponse {
    result: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(two_phase_page))
        .route("/simple", get(single_shot_page))
        .route("/health", get(health))
        .route("/api/generate", post(generate))
        .route("/api/createPrompt", post(create_prompt))
        .route("/api/generatePlan", post(generate_plan))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn two_phase_page() -> Html<&'static str> {
    Html(TWO_PHASE_PAGE)
}

async fn single_shot_page() -> Html<&'static str> {
    Html(SINGLE_SHOT_PAGE)
}

async fn generate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PlanRequestBody>, JsonRejection>,
) -> Response {
    respond(
        "generate",
        complete(&state, payload, |body| {
            Ok(prompt::single_shot_request(&validate_inputs(body)?))
        })
        .await,
    )
}

async fn create_prompt(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PlanRequestBody>, JsonRejection>,
) -> Response {
    respond(
        "createPrompt",
        complete(&state, payload, |body| {
            Ok(prompt::clarifying_request(&validate_inputs(body)?))
        })
        .await,
    )
}

async fn generate_plan(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PlanRequestBody>, JsonRejection>,
) -> Response {
    respond(
        "generatePlan",
        complete(&state, payload, |body| {
            let (inputs, wildcard) = validate_with_wildcard(body)?;
            Ok(prompt::plan_request(&inputs, &wildcard))
        })
        .await,
    )
}

/// Credential check, body decode, validation, one upstream call. The
/// credential is checked first so a missing key wins over bad input.
async fn complete<F>(
    state: &AppState,
    payload: std::result::Result<Json<PlanRequestBody>, JsonRejection>,
    build: F,
) -> Result<String>
where
    F: FnOnce(&PlanRequestBody) -> Result<CompletionRequest>,
{
    let provider = state.provider()?;
    let Json(body) = payload.map_err(|rejection| JustBeginError::Validation(rejection.body_text()))?;
    let request = build(&body)?;
    provider.complete(&request).await
}

fn respond(route: &str, result: Result<String>) -> Response {
    match result {
        Ok(result) => {
            tracing::info!(route, chars = result.len(), "Completion returned");
            (StatusCode::OK, Json(ResultResponse { result })).into_response()
        }
        Err(err) => {
            match &err {
                JustBeginError::Validation(message) => {
                    tracing::warn!(route, %message, "Rejected request")
                }
                JustBeginError::EmptyCompletion => {
                    tracing::warn!(route, "Upstream returned no choice")
                }
                JustBeginError::Upstream { status, payload } => {
                    tracing::error!(route, status, %payload, "Upstream request failed")
                }
                JustBeginError::Config(_)
                | JustBeginError::Http(_)
                | JustBeginError::Serialization(_)
                | JustBeginError::Runtime(_)
                | JustBeginError::Request(_) => {
                    tracing::error!(route, error = %err, "Error with OpenAI API request")
                }
            }
            err.into_response()
        }
    }
}

impl IntoResponse for JustBeginError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match self {
            Self::Upstream { payload, .. } => (status, Json(payload)).into_response(),
            other => (
                status,
                Json(json!({"error": {"message": other.public_message()}})),
            )
                .into_response(),
        }
    }
}

pub async fn run(config: Config) -> Result<()> {
    run_with_shutdown(config, shutdown_signal()).await
}

pub async fn run_with_shutdown<F>(config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| JustBeginError::Runtime(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| JustBeginError::Runtime(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Could not listen for shutdown signal: {err}");
        futures::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
