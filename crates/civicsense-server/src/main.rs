//! CivicSense: civic report clustering server and CLI.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod routes;
mod snapshot;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so subcommand JSON on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = match cli::Command::parse(&args) {
        Ok(command) => command,
        Err(usage) => {
            eprintln!("{}", usage);
            std::process::exit(1);
        }
    };

    // Help is answered before the environment is read.
    if command == cli::Command::Help {
        cli::print_help();
        return Ok(());
    }

    let config = civicsense_core::CivicConfig::from_env()?;
    let state = AppState::new(config)?;

    match command {
        cli::Command::Cluster(path) => {
            let out = cli::cluster(&state, &path)?;
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }
        cli::Command::Priority(path, tier) => {
            let out = cli::priority(&state, &path, tier.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }
        cli::Command::Serve | cli::Command::Help => {}
    }

    let thresholds = *state.builder.thresholds();
    info!(
        "Clustering thresholds: similarity>{}, distance<{}m, window<{}h",
        thresholds.similarity, thresholds.distance_meters, thresholds.max_hours
    );

    let port = state.config.port;
    let app = routes::build_router(Arc::new(state));

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("CivicSense server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
