/*============================================================
  Bundlescope
  Module: bundlescope::main
  ------------------------------------------------------------
  Purpose:
    Entry point. Loads configuration, opens the session log,
    and serves the bundle-size lookup endpoint and search page
    until interrupted.

  Security / Safety Notes:
    Runs with user privileges; the only outbound traffic is
    HTTPS GET requests to the configured size service.

  Dependencies:
    clap for CLI parsing, chrono for session stamps, axum and
    tokio for serving.

  Revision History:
    2026-10-16  Authored server runtime.
============================================================*/

mod bundlephobia;
mod config;
mod error;
mod format;
mod logger;
mod package_info;
mod proxy;
mod render;
mod search;
mod server;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use clap::{ArgAction, Parser};

use bundlephobia::SizeClient;
use config::BundlescopeConfig;
use error::{BundlescopeError, Result};
use logger::Logger;
use render::Links;
use server::AppState;

/// Command-line arguments for the server.
#[derive(Debug, Parser)]
#[command(
    name = "bundlescope",
    version,
    about = "Look up the bundle-size cost of npm packages"
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Address to listen on, e.g. 0.0.0.0:8080.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Echo info and debug entries to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[bundlescope] {err}");
            err.exit_code()
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = BundlescopeConfig::load_from_optional_path(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    let addr = config.bind_addr()?;

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = cli
        .log
        .unwrap_or_else(|| config.log_dir().join(format!("server_{session_stamp}.log")));
    let logger = Arc::new(Logger::new(
        Some(log_path),
        cli.verbose || config.logging.verbose,
    )?);
    logger.info("INIT", "bundlescope starting");

    let client = SizeClient::new(&config.upstream)?;
    logger.info(
        "UPSTREAM",
        format!("Size reports from {}", config.upstream.base_url),
    );
    let state = AppState::new(client, Arc::clone(&logger), Links::from_config(&config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| BundlescopeError::Network(format!("Failed to bind {addr}: {err}")))?;
    logger.info("LISTEN", format!("Serving on http://{addr}"));

    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&logger)))
        .await
        .map_err(|err| BundlescopeError::Runtime(format!("Server failed: {err}")))?;

    logger.info("SHUTDOWN", "bundlescope stopped");
    logger.finalize()?;
    Ok(ExitCode::SUCCESS)
}

async fn shutdown_signal(logger: Arc<Logger>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logger.info("SIGNAL", "Interrupt received; draining connections"),
        Err(err) => {
            logger.warn("SIGNAL", format!("Cannot listen for interrupt: {err}"));
            std::future::pending::<()>().await;
        }
    }
}
