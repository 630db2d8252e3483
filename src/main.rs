use std::path::PathBuf;
use std::sync::Arc;

use newsbreeze_backend::infrastructure::config::{Config, LogFormat, TtsProvider};
use newsbreeze_backend::infrastructure::http::start_http_server;
use newsbreeze_backend::infrastructure::repositories::{
    FsAssetRepository, HttpNewsSource, OpenAiSynthesisRepository, PollySynthesisRepository,
    SynthesisRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting NewsBreeze Backend on {}:{}",
        config.host,
        config.port
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate gateways to the external collaborators
    tracing::info!("Instantiating repositories...");
    let news_source = Arc::new(HttpNewsSource::new(
        config.news_api_url.clone(),
        config.request_timeout(),
    ));
    let assets = Arc::new(
        FsAssetRepository::create(PathBuf::from(&config.audio_dir))
            .await
            .map_err(|e| format!("audio dir setup failed: {e}"))?,
    );

    let synthesis: Arc<dyn SynthesisRepository> = match config.tts_provider {
        TtsProvider::Polly => {
            tracing::info!(region = %config.aws_region, "Initializing AWS Polly client");
            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
            Arc::new(PollySynthesisRepository::new(polly_client))
        }
        TtsProvider::OpenAi => {
            tracing::info!(model = %config.openai_tts_model, "Initializing OpenAI TTS client");
            let openai_client = Arc::new(async_openai::Client::new());
            Arc::new(OpenAiSynthesisRepository::new(
                openai_client,
                config.openai_tts_model.clone(),
            ))
        }
    };

    // 2. Instantiate domain services
    tracing::info!("Instantiating services...");
    let catalog = Arc::new(newsbreeze_backend::domain::voice::VoiceCatalog::with_default_voices());
    let article_store = Arc::new(newsbreeze_backend::domain::news::ArticleStore::new(
        news_source,
        config.news_refresh_interval(),
    ));
    let pipeline = Arc::new(newsbreeze_backend::domain::audio::AudioJobPipeline::new(
        catalog.clone(),
        article_store.clone(),
        synthesis,
        assets.clone(),
        config.pipeline_config(),
    ));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let voices_controller = Arc::new(newsbreeze_backend::controllers::VoicesController::new(
        catalog.clone(),
    ));
    let news_controller = Arc::new(newsbreeze_backend::controllers::NewsController::new(
        article_store,
    ));
    let audio_controller = Arc::new(newsbreeze_backend::controllers::AudioController::new(
        pipeline, assets,
    ));

    // Start HTTP server with all routes
    start_http_server(
        config,
        catalog,
        voices_controller,
        news_controller,
        audio_controller,
    )
    .await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "newsbreeze_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "newsbreeze_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
