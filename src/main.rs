use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medchat::config::AppConfig;
use medchat::llm::openai::OpenAiModel;
use medchat::llm::{create_provider, Model};
use medchat::routes::{configure_routes, AppState};
use medchat::store::ChatStore;
use medchat::usage_log::UsageLog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let store = ChatStore::open(&config.db_path)?;
    let usage_log = UsageLog::new(&config.usage_log_path);
    let provider = create_provider(
        Model::OpenAi(OpenAiModel::Gpt4o),
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
    )?;

    let state = AppState {
        store,
        usage_log,
        provider: Arc::from(provider),
    };

    let routes = configure_routes(state);

    info!("Starting server on http://{}", config.addr);
    warp::serve(routes).run(config.addr).await;

    Ok(())
}
