use color_eyre::eyre::Result;
use dotenv::dotenv;
use healthsync_client::config::ClientConfig;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ClientConfig::from_env()?;

    // Logs go to stderr so they don't interleave with the prompt
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting HealthSync shell");

    match healthsync_cli::run_shell(config).await {
        Ok(()) => info!("Shell exited"),
        Err(e) => {
            error!("Shell error: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
