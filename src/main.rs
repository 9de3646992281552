//! AeroMed Dispatch Backend
//!
//! REST backend for medical-supply drone deliveries: a SQLite operator
//! directory and an in-memory dispatch workflow.

mod api;
mod auth;
mod config;
mod db;
mod dispatch;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use dispatch::{DispatchBoard, Dispatcher};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub dispatch: Dispatcher,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting AeroMed Dispatch Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (AEROMED_API_PSK). Authentication is disabled!");
    }
    match config.delivery_delay {
        Some(delay) => tracing::info!("Delivery placeholder timer: {:?}", delay),
        None => tracing::info!("Delivery placeholder timer disabled; awaiting arrival reports"),
    }

    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    let mut board = DispatchBoard::new();
    if config.seed_demo {
        dispatch::seed_demo(&mut board);
        tracing::info!("Seeded dispatch board with demo requests and inventory");
    }
    let dispatch = Dispatcher::new(board, config.delivery_delay);

    let state = AppState {
        repo,
        dispatch,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk: Option<Arc<str>> = state.config.api_psk.as_deref().map(Arc::from);

    let api_routes = Router::new()
        // Operator directory
        .route(
            "/operators",
            get(api::list_operators).post(api::create_operator),
        )
        .route("/operators/{id}", delete(api::delete_operator))
        // Supply requests
        .route("/requests", get(api::list_requests).post(api::create_request))
        .route("/requests/{id}", get(api::get_request))
        .route("/requests/{id}/approve", post(api::approve_request))
        .route("/requests/{id}/reject", post(api::reject_request))
        .route("/requests/{id}/dispatch", post(api::dispatch_request))
        .route("/requests/{id}/chat", post(api::send_chat))
        // Missions
        .route("/missions", get(api::list_missions))
        .route("/missions/{id}/complete", post(api::complete_mission))
        // Inventory
        .route("/inventory", get(api::list_inventory).post(api::add_item))
        .route("/inventory/{id}/adjust", post(api::adjust_stock))
        // Activity log
        .route("/activity", get(api::list_activity))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
