//! # Innova HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Portfolio status
//! - `GET /projects` - List projects
//! - `POST /projects` - Create a project
//! - `POST /response` - Submit a level response (validate + rescore)
//! - `POST /review` - Flag a level for review
//! - `POST /checklist` - Answer a checklist characteristic
//! - `GET /checklist/summary?project_id=` - Checklist summary
//! - `GET /scorecard?project_id=` - Maturity scorecard
//! - `POST /import` - Import response rows
//! - `POST /finalize` - Finalize the evaluation into history
//! - `GET /history?project_id=` - Finalized evaluations
//! - `POST /export` - Export canonical snapshot
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `INNOVA_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `INNOVA_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `INNOVA_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use auth::get_api_key_from_env;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `innova::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    checklist_handler, checklist_summary_handler, create_project_handler, export_handler,
    finalize_handler, health_handler, history_handler, import_handler, projects_handler,
    response_handler, review_handler, scorecard_handler, status_handler,
};
#[allow(unused_imports)]
pub use types::{
    ChecklistRequest, CreateProjectRequest, ExportResponse, FinalizeRequest, FinalizeResponse,
    HealthResponse, HistoryResponse, ImportRequest, ImportResponse, ProjectJson, ProjectQuery,
    ProjectResponse, ProjectsResponse, ResponseOutcome, ResponseRequest, ReviewRequest,
    SimpleResponse, StatusResponse,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use innova_core::{InnovaError, Portfolio};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the portfolio.
#[derive(Clone)]
pub struct AppState {
    /// The portfolio store behind a single-writer lock.
    pub portfolio: Arc<RwLock<Portfolio>>,
}

impl AppState {
    /// Create new app state with a portfolio.
    #[must_use]
    pub fn new(portfolio: Portfolio) -> Self {
        Self {
            portfolio: Arc::new(RwLock::new(portfolio)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `INNOVA_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("INNOVA_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (INNOVA_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in INNOVA_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No INNOVA_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against DoS (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    // Check if rate limiting is enabled
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Check if authentication is enabled
    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set INNOVA_API_KEY environment variable to enable authentication."
        );
    }

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route(
            "/projects",
            get(handlers::projects_handler).post(handlers::create_project_handler),
        )
        .route("/response", post(handlers::response_handler))
        .route("/review", post(handlers::review_handler))
        .route("/checklist", post(handlers::checklist_handler))
        .route(
            "/checklist/summary",
            get(handlers::checklist_summary_handler),
        )
        .route("/scorecard", get(handlers::scorecard_handler))
        .route("/import", post(handlers::import_handler))
        .route("/finalize", post(handlers::finalize_handler))
        .route("/history", get(handlers::history_handler))
        .route("/export", post(handlers::export_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, portfolio: Portfolio) -> Result<(), InnovaError> {
    let state = AppState::new(portfolio);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| InnovaError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Innova HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| InnovaError::IoError(format!("Server error: {}", e)))
}
