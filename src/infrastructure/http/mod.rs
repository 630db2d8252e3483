pub mod request_id;

use axum::{middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    audio::AudioController, health, news::NewsController, voices::VoicesController,
};
use crate::domain::voice::VoiceCatalog;
use crate::infrastructure::config::Config;
use self::request_id::request_id_middleware;

/// Assemble the application router. Separated from `start_http_server`
/// so tests can drive the routes without binding a socket.
pub fn build_router(
    catalog: Arc<VoiceCatalog>,
    voices_controller: Arc<VoicesController>,
    news_controller: Arc<NewsController>,
    audio_controller: Arc<AudioController>,
) -> Router {
    let voice_routes = Router::new()
        .route("/api/voices", get(VoicesController::list_voices))
        .with_state(voices_controller);

    let news_routes = Router::new()
        .route("/api/news", get(NewsController::list_news))
        .route("/api/search", get(NewsController::search))
        .with_state(news_controller);

    let audio_routes = Router::new()
        .route("/api/generate-audio", post(AudioController::generate_audio))
        .route(
            "/api/download-audio/:assetId",
            get(AudioController::download_audio),
        )
        // Legacy path kept for clients that hardcode /audio/<id>.
        .route("/audio/:assetId", get(AudioController::download_audio))
        .with_state(audio_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(catalog)
        .merge(voice_routes)
        .merge(news_routes)
        .merge(audio_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    catalog: Arc<VoiceCatalog>,
    voices_controller: Arc<VoicesController>,
    news_controller: Arc<NewsController>,
    audio_controller: Arc<AudioController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(catalog, voices_controller, news_controller, audio_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
