mod presenter;
mod routes;
mod upload;

use anyhow::Context;
use care_companion::{GeminiService, QueryService, Settings};
use routes::{build_router, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env().context("failed to load settings")?;
    log::info!(
        "Using model {} at {}",
        settings.gemini.model,
        settings.gemini.base_url
    );

    let gemini_service =
        GeminiService::new(settings.gemini.clone()).context("failed to create model client")?;
    let query_service =
        QueryService::new(Arc::new(gemini_service)).context("failed to build pipeline")?;

    let app = build_router(AppState {
        query_service: Arc::new(query_service),
        max_upload_bytes: settings.max_upload_bytes,
    });

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    log::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
