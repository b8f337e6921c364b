use anyhow::Result;
use newsletter_viewer::{config, server};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("newsletter_viewer=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!("Starting newsletter viewer");

    // Missing credentials stop the process here, before anything is served
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return Err(e);
        }
    };

    server::run(config).await
}
