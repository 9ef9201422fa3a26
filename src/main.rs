use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

mod catalog;
mod config;
mod database;
mod errors;
mod handlers;
mod models;
mod services;
mod store;

use catalog::PokeApiClient;
use config::Config;
use handlers::{characters, decks, pokemon};
use store::PgStore;

#[derive(Clone)]
pub struct AppState {
    pub store: PgStore,
    pub catalog: PokeApiClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pokedex_backend=info,sqlx=warn,info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = database::create_pool(&config.database_url).await?;
    database::run_migrations(&pool, config.skip_migrations).await;

    let catalog = PokeApiClient::new(config.poke_api_base_url.clone(), config.poke_api_timeout)?;
    info!("📚 Catalog: {}", config.poke_api_base_url);

    let state = AppState {
        store: PgStore::new(pool),
        catalog,
    };

    let app = Router::new()
        .route("/api/health", get(health_check))
        .nest("/api/character", characters::router())
        .nest("/api/deck", decks::router())
        .nest("/api/pokemon", pokemon::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config)),
        )
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🚀 Server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = if config.debug_mode {
        info!("🔓 Development mode: Using permissive CORS");
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("⚠️ Ignoring invalid origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();
        info!("🔒 CORS configured for {} origin(s)", origins.len());
        CorsLayer::new().allow_origin(origins)
    };

    cors.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([axum::http::header::CONTENT_TYPE])
}

async fn health_check() -> Result<Json<serde_json::Value>, StatusCode> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": "pokedex-backend",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "character": "/api/character",
            "deck": "/api/deck",
            "pokemon": "/api/pokemon",
            "health": "/api/health"
        }
    })))
}
