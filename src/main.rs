//! Crane Fleet Supervisor Dashboard Backend
//!
//! Serves the supervisor dashboard's pages as JSON, reading everything from
//! the hosted backend's stored procedures and tables on behalf of the
//! signed-in supervisor.

mod api;
mod auth;
mod config;
mod errors;
mod gateway;
mod heatmap;
mod models;
mod repository;
mod view;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use gateway::SupabaseGateway;
use repository::Repository;
use view::{Page, PageController};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub config: Arc<Config>,
}

impl AppState {
    /// A fresh controller for one page request.
    pub fn page<P: Page>(&self, page: P) -> PageController<P> {
        PageController::new(page, self.repo.clone(), self.config.login_path.clone())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting crane dashboard backend");
    tracing::info!("Backend URL: {}", config.backend_url);
    tracing::info!("Bind address: {}", config.bind_addr);
    if let Some(timeout) = config.request_timeout {
        tracing::info!("Backend request timeout: {:?}", timeout);
    }

    let gateway = SupabaseGateway::new(
        &config.backend_url,
        &config.backend_anon_key,
        config.request_timeout,
    )?;

    let state = AppState {
        repo: Repository::new(Arc::new(gateway)),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Session
        .route(
            "/session",
            post(api::sign_in)
                .get(api::current_session)
                .delete(api::sign_out),
        )
        // Pages
        .route("/dashboard", get(api::get_dashboard))
        .route("/assets", get(api::list_assets))
        .route("/assets/{id}", get(api::get_asset))
        .route("/assets/{id}/status", post(api::change_asset_status))
        .route("/reports", get(api::list_reports))
        .route("/reports/{id}", get(api::get_report))
        .route("/heatmap", get(api::get_heatmap))
        .route("/hour-meters", get(api::get_hour_meters))
        .route("/operators", get(api::get_operators))
        .route("/critical-problems", get(api::list_critical_problems))
        .route(
            "/critical-problems/{question_id}",
            get(api::get_problem_drilldown),
        )
        .layer(middleware::from_fn(auth::session_layer));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod testing;
