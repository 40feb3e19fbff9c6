//! HR server binary.
//!
//! Loads configuration, opens the database, creates the default admin on
//! first start and serves the HTTP API until Ctrl-C.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hr_system::api::{AppState, create_router};
use hr_system::config::ConfigLoader;
use hr_system::store::HrStore;

/// HR management server.
#[derive(Parser, Debug)]
#[command(name = "hr-server", version, about = "HR management server")]
struct Args {
    /// Directory containing hr.yaml and an optional secrets.yaml
    #[arg(long, default_value = "./config")]
    config: PathBuf,

    /// Address to listen on, overriding the configuration
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = ConfigLoader::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?
        .into_config();
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    let store = HrStore::connect(&config.database)
        .await
        .context("opening database")?;
    store
        .ensure_default_admin(&config.auth)
        .await
        .context("creating default admin")?;

    let bind_address = config.server.bind_address.clone();
    let state = AppState::new(config, store);
    spawn_session_sweeper(state.clone());

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;
    info!(address = %bind_address, "HR server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("HR server stopped");
    Ok(())
}

/// Periodically drops expired sessions so idle tokens do not pile up.
fn spawn_session_sweeper(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            let purged = state.sessions().purge_expired_at(chrono::Utc::now());
            if purged > 0 {
                info!(purged, "Purged expired sessions");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
