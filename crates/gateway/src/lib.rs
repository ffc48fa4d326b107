//! HTTP API gateway for the Ruchulu Food Genie.
//!
//! Exposes the Genie chat callable plus the restaurant callables
//! (today's menu, leaderboard, feedback) over a `DocumentStore`.
//!
//! Built on Axum.

pub mod store;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use ruchulu_config::AppConfig;
use ruchulu_core::menu::{LeaderboardEntry, MenuItem};
use ruchulu_core::reply::GenieReply;
use ruchulu_core::store::{DocumentStore, NewFeedback};
use ruchulu_genie::{GeniePipeline, GenieRequest};

pub use store::{InMemoryStore, StoreSeed};

/// Maximum number of leaderboard entries returned.
pub const LEADERBOARD_LIMIT: usize = 10;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub pipeline: Arc<GeniePipeline>,
    pub store: Arc<dyn DocumentStore>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// CORS is added by [`start`]; the bare router is what tests drive.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/genie/chat", post(chat_handler))
        .route("/v1/menu/today", get(menu_handler))
        .route("/v1/leaderboard", get(leaderboard_handler))
        .route("/v1/feedback", post(feedback_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the web front end's origin.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let origin: HeaderValue = allowed_origin.parse()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600)))
}

/// Build the document store named by configuration.
pub fn build_store(config: &AppConfig) -> ruchulu_core::Result<Arc<dyn DocumentStore>> {
    match config.store.seed_file.as_deref() {
        Some(path) => {
            let store = InMemoryStore::from_seed_file(Path::new(path))?;
            info!(seed = %path, "Store seeded");
            Ok(Arc::new(store))
        }
        None => {
            warn!("No store seed file configured, menus and leaderboard start empty");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let pipeline = GeniePipeline::from_config(&config)?;
    info!(providers = ?pipeline.providers(), mode = %config.genie.mode, "Genie pipeline ready");

    let state = Arc::new(GatewayState {
        pipeline: Arc::new(pipeline),
        store: build_store(&config)?,
    });

    let app = build_router(state).layer(cors_layer(&config.gateway.allowed_origin)?);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal(status: StatusCode, message: String) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: "internal",
            message,
        }),
    )
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(request): Json<GenieRequest>,
) -> Result<Json<GenieReply>, ApiError> {
    info!(
        turns = request.history.len(),
        dishes = request.dishes.len(),
        "Genie chat request"
    );

    state.pipeline.respond(request).await.map(Json).map_err(|e| {
        error!(error = %e, "Genie request failed");
        internal(StatusCode::BAD_GATEWAY, e.to_string())
    })
}

#[derive(Serialize)]
struct MenuResponse {
    dishes: Vec<MenuItem>,
}

async fn menu_handler(State(state): State<SharedState>) -> Result<Json<MenuResponse>, ApiError> {
    let today = chrono::Utc::now().date_naive();
    let dishes = state.store.menu_for(today).await.map_err(|e| {
        error!(error = %e, date = %today, "Menu lookup failed");
        internal(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(MenuResponse { dishes }))
}

#[derive(Serialize)]
struct LeaderboardResponse {
    entries: Vec<LeaderboardEntry>,
}

async fn leaderboard_handler(
    State(state): State<SharedState>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let entries = state
        .store
        .top_leaderboard(LEADERBOARD_LIMIT)
        .await
        .map_err(|e| {
            error!(error = %e, "Leaderboard lookup failed");
            internal(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    Ok(Json(LeaderboardResponse { entries }))
}

#[derive(Serialize)]
struct FeedbackResponse {
    success: bool,
    id: String,
}

async fn feedback_handler(
    State(state): State<SharedState>,
    Json(feedback): Json<NewFeedback>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let record = state.store.add_feedback(feedback).await.map_err(|e| {
        error!(error = %e, "Feedback write failed");
        internal(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    info!(id = %record.id, sentiment = %record.sentiment, "Feedback stored");
    Ok(Json(FeedbackResponse {
        success: true,
        id: record.id,
    }))
}
