use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use healthchat::config::AppConfig;
use healthchat::llm::{ChatModel, GeminiClient};
use healthchat::routes::configure_routes;
use healthchat::store::{Store, StoreConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration error");
            std::process::exit(1);
        }
    };

    let store_config = match StoreConfig::from_connection_string(&config.database_url) {
        Ok(store_config) => store_config,
        Err(e) => {
            error!(error = %e, "invalid DATABASE_URL");
            std::process::exit(1);
        }
    };

    let store = match Store::new(store_config).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "database connection failed");
            std::process::exit(1);
        }
    };

    if let Err(e) = store.apply_schema().await {
        error!(error = %e, "schema setup failed");
        std::process::exit(1);
    }

    let model: Arc<dyn ChatModel> = match GeminiClient::new() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "LLM client setup failed");
            std::process::exit(1);
        }
    };

    let routes = configure_routes(
        store,
        model,
        config.google_api_key.clone(),
        config.deployment_env,
    );

    info!(addr = %config.bind_addr, env = %config.deployment_env, "starting server");
    warp::serve(routes).run(config.bind_addr).await;
}
