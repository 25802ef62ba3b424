use std::sync::Arc;

use eyre::Result;
use healthsync_booking::BookingFlow;
use healthsync_client::{ApiClient, config::ClientConfig};
use healthsync_core::errors::HealthResult;
use healthsync_session::{
    SessionProvider,
    store::{FileSessionStore, MemorySessionStore, SessionStore},
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

pub mod commands;
pub mod handlers;
pub mod render;

use commands::{Command, parse};
use handlers::Shell;

const PROMPT: &str = "healthsync> ";

/// Wires the HTTP client, the session store named by the configuration and the
/// booking flow into a [`Shell`].
pub fn build_shell(config: &ClientConfig) -> HealthResult<Shell> {
    let client = Arc::new(ApiClient::new(config)?);

    let store: Arc<dyn SessionStore> = match &config.session_file {
        Some(path) => {
            info!("Persisting sessions to {}", path.display());
            Arc::new(FileSessionStore::new(path.clone()))
        }
        None => Arc::new(MemorySessionStore::new()),
    };

    let sessions = SessionProvider::new(client.clone(), store);
    let flow = BookingFlow::new(client.clone(), client.clone(), sessions.handle());
    Ok(Shell::new(sessions, flow, client.clone(), client.clone(), client))
}

/// Runs the interactive shell on stdin/stdout until `quit` or end of input.
pub async fn run_shell(config: ClientConfig) -> Result<()> {
    info!("Starting HealthSync shell against {}", config.api_url);
    let mut shell = build_shell(&config)?;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let greeting = shell.start().await;
    stdout.write_all(format!("{}\n{}", greeting, PROMPT).as_bytes()).await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let output = match parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => shell.handle(command).await,
            Ok(None) => String::new(),
            Err(e) => e.user_message("Invalid command", "Invalid command"),
        };

        if !output.is_empty() {
            stdout.write_all(output.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("Shell closed");
    Ok(())
}
