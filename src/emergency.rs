//! One-shot lookup of hospitals near a position, for use outside the shell.
//!
//! Usage: `emergency <lat> <lng>`. Needs a session saved by the shell in
//! `HEALTHSYNC_SESSION_FILE`.

use std::env;

use color_eyre::eyre::{Result, WrapErr, eyre};
use dotenv::dotenv;
use healthsync_client::{ApiClient, config::ClientConfig, services::EmergencyService};
use healthsync_core::models::emergency::{Coordinates, nearest_first};
use healthsync_session::store::{FileSessionStore, SessionStore};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ClientConfig::from_env()?;

    // Only warnings by default, the output is the list itself
    let level = if env::var("LOG_LEVEL").is_ok() { config.log_level } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args: Vec<String> = env::args().skip(1).collect();
    let [lat, lng] = args.as_slice() else {
        return Err(eyre!("Usage: emergency <lat> <lng>"));
    };
    let lat: f64 = lat.parse().wrap_err_with(|| format!("Invalid latitude {:?}", lat))?;
    let lng: f64 = lng.parse().wrap_err_with(|| format!("Invalid longitude {:?}", lng))?;
    let origin = Coordinates::new(lat, lng)?;

    let path = config
        .session_file
        .clone()
        .ok_or_else(|| {
            eyre!("HEALTHSYNC_SESSION_FILE is not set; log in with the healthsync shell first")
        })?;
    let session = FileSessionStore::new(path)
        .get()
        .await?
        .ok_or_else(|| eyre!("No saved session; log in with the healthsync shell first"))?;

    info!("Looking up hospitals near {}, {}", origin.lat, origin.lng);
    let client = ApiClient::new(&config)?;
    let hospitals = client.nearby_hospitals(&session.token, origin).await?;

    println!("{}", healthsync_cli::render::nearby(&nearest_first(&origin, hospitals)));
    Ok(())
}
