//! Traveler API server entry point.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use traveler_api::config::ServerConfig;
use traveler_api::error::AppError;
use traveler_api::scene::{InMemoryScene, SceneDocument};
use traveler_api::state::AppState;
use traveler_api::{build_router, ticker};
use traveler_core::clock::{Clock, SystemClock};
use traveler_core::rng::{DeterministicRng, StdDeterministicRng};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Traveler API server");

    // Read configuration from environment.
    let config = ServerConfig::from_env()?;

    // Load the scene.
    let document = match &config.scene_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading scene document");
            SceneDocument::load(path)?
        }
        None => {
            tracing::warn!("SCENE_FILE not set; starting with an empty scene");
            SceneDocument::default()
        }
    };
    tracing::info!(
        markers = document.markers.len(),
        entities = document.entities.len(),
        "scene loaded"
    );

    // Build application state.
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(SystemClock);
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = match config.seed {
        Some(seed) => Arc::new(Mutex::new(StdDeterministicRng::seeded(seed))),
        None => Arc::new(Mutex::new(StdDeterministicRng::from_entropy())),
    };
    let app_state = AppState::new(
        config.traveler.clone(),
        clock,
        rng,
        Arc::new(InMemoryScene::new(document)),
    );

    let camera_ticker = ticker::spawn_camera_ticker(app_state.clone(), config.camera_tick);

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let served = axum::serve(listener, app).await;
    camera_ticker.abort();
    served?;

    Ok(())
}
