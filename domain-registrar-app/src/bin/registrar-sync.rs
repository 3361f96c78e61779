//! Scheduled bulk DNS sync.
//!
//! Usage: `registrar-sync [REGISTRAR_CODE] [--config PATH]`
//!
//! Syncs every domain of the registrar (or the configured default) and prints
//! the `DnsBulkSyncResult` as JSON on stdout. Logs go to stderr. Exits
//! non-zero only when the run cannot start: bad config, unreachable store,
//! or a registrar that cannot be resolved. Ctrl-C stops new domains from
//! starting and lets in-flight ones finish.

use std::path::PathBuf;
use std::process::ExitCode;

use domain_registrar_app::{AppConfig, AppState};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_PATH: &str = "registrar-sync.toml";

struct Args {
    registrar: Option<String>,
    config_path: PathBuf,
}

fn parse_args() -> Result<Args, String> {
    let mut registrar = None;
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                config_path = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| "--config needs a path".to_string())?;
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
            code if registrar.is_none() => registrar = Some(code.to_string()),
            extra => return Err(format!("unexpected argument {extra}")),
        }
    }
    Ok(Args {
        registrar,
        config_path,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the JSON result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("usage: registrar-sync [REGISTRAR_CODE] [--config PATH]");
            return ExitCode::from(2);
        }
    };

    let config = match AppConfig::load(&args.config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::open(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight domains");
            on_signal.cancel();
        }
    });

    let result = match state
        .sync_all_until(args.registrar.as_deref(), Some(cancel))
        .await
    {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Bulk sync could not start: {e}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to serialize result: {e}"),
    }
    tracing::info!(
        "{} of {} domain(s) synced, {} failed, {} skipped",
        result.succeeded,
        result.total,
        result.failed,
        result.skipped
    );
    ExitCode::SUCCESS
}
