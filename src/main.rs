use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use semporna::application::services::PipelineService;
use semporna::infrastructure::analysis::HttpAnalysisEngine;
use semporna::infrastructure::observability::{TracingConfig, init_tracing};
use semporna::infrastructure::storage::LocalArtifactStore;
use semporna::presentation::config::{Environment, Settings};
use semporna::presentation::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT");

    let settings = Settings::load(&environment)?;

    init_tracing(
        TracingConfig::new(environment.to_string(), settings.logging.enable_json),
        settings.server.port,
    );

    let store = Arc::new(LocalArtifactStore::new(
        PathBuf::from(&settings.storage.dir),
        settings.storage.max_upload_bytes(),
    )?);
    let engine = Arc::new(HttpAnalysisEngine::new(
        settings.analysis.endpoint.clone(),
        Duration::from_secs(settings.analysis.timeout_secs),
    ));
    let pipeline = Arc::new(PipelineService::new(Arc::clone(&store), Arc::clone(&engine)));

    let state = AppState {
        pipeline,
        store,
        settings: settings.clone(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
