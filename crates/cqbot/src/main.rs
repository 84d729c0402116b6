//! cqbot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p cqbot
//! ```
//!
//! Configuration is loaded from environment variables.

use cqbot::Bot;
use cqbot_common::{try_init_tracing_with_config, AppConfig, AppError, AppResult, TracingConfig};
use cqbot_gateway::WebSocketConnector;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    let tracing_config = config
        .as_ref()
        .map(|config| TracingConfig::for_environment(config.app.env))
        .unwrap_or_default();
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let result = match config {
        Ok(config) => run(config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        error!(error = %e, code = e.error_code(), "Bot failed");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> AppResult<()> {
    info!(
        name = %config.app.name,
        env = ?config.app.env,
        url = %config.gateway.url,
        prefix = %config.command.prefix,
        "Configuration loaded"
    );

    let bot = Bot::new(&config);
    bot.start(&WebSocketConnector).await.map_err(AppError::gateway)?;

    tokio::signal::ctrl_c().await.map_err(AppError::internal)?;

    info!("Shutdown signal received");
    bot.close();
    Ok(())
}
