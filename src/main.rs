use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod models;
mod services;

use config::Config;
use services::gateway::ChatGateway;
use services::mirror::Mirror;
use services::prediction::PredictionClient;
use services::session_store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub mirror: Mirror,
    pub gateway: ChatGateway,
    pub predictor: PredictionClient,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Arc<Config>) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.chat_api_timeout_secs);
        let gateway = ChatGateway::new(config.chat_api_url.clone(), timeout)?;
        let predictor = PredictionClient::new(config.prediction_api_url.clone(), timeout)?;

        Ok(Self {
            sessions: SessionStore::new(db.clone()),
            mirror: Mirror::new(db.clone()),
            db,
            config,
            gateway,
            predictor,
        })
    }
}

fn app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let protected_routes = Router::new()
        // Chat
        .route("/api/chat", post(handlers::chat::send_message))
        .route("/api/chat/session", get(handlers::chat::get_session))
        .route("/api/chat/new", post(handlers::chat::new_chat))
        .route("/api/chat/history", get(handlers::chat::get_history))
        // Moods
        .route("/api/moods", post(handlers::moods::log_mood))
        // Reports
        .route("/api/reports/weekly", get(handlers::reports::get_weekly_report))
        .route("/api/summary", get(handlers::reports::get_summary))
        .route("/api/leaderboard", get(handlers::reports::get_leaderboard))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let allowed_origins: Vec<axum::http::HeaderValue> = {
        let mut origins = Vec::new();
        if let Ok(origin) = state.config.frontend_url.parse::<axum::http::HeaderValue>() {
            origins.push(origin);
        }
        if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
            for o in extra.split(',') {
                if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                    origins.push(hv);
                }
            }
        }
        origins
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feelbetter_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    // Database
    let db = db::create_pool(&config.database_url).await;

    db::run_migrations(&db)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations applied");

    let state = AppState::new(db, config.clone()).expect("Failed to build HTTP clients");

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app(state))
        .await
        .expect("Server error");
}
