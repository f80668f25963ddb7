use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use gamerec_api::api::{create_router, AppState};
use gamerec_api::config::Config;
use gamerec_api::data::ContentStore;
use gamerec_api::model::OnnxModel;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gamerec_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    // The listener only binds after the store and model are fully loaded;
    // any load failure aborts startup.
    let store = ContentStore::load_from_files(&config.interactions_path, &config.content_path)
        .context("failed to load datasets")?;
    let model = OnnxModel::load(&config.model_path, store.dimension())
        .context("failed to load scoring model")?;

    let state = AppState::new(Arc::new(store), Arc::new(model), config.top_n);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
