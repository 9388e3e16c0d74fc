//! `taskd` -- CRUD over a JSON file of tasks.
//!
//! An axum HTTP server exposing `/task`. Every request reads the whole
//! backing file, applies one change and writes it back.
//!
//! # Usage
//!
//! ```bash
//! # Serve ./tasks.json on 0.0.0.0:3000
//! cargo run --bin taskd
//!
//! # Custom address and data file
//! cargo run --bin taskd -- --bind 127.0.0.1:8080 --data-file /srv/tasks.json
//!
//! # Or via environment variables
//! TASKD_ADDR=127.0.0.1:8080 TASKD_DATA_FILE=/srv/tasks.json cargo run --bin taskd
//! ```

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use taskd_server::backend::JsonFileBackend;
use taskd_server::config::{CliArgs, ServerConfig};
use taskd_server::server;
use taskd_server::store::TaskStore;
use tracing_appender::non_blocking::WorkerGuard;

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Must stay alive for the whole run or buffered log lines are lost.
    let _log_guard = init_tracing(&config.log_level, config.log_file.as_deref());

    let backend = JsonFileBackend::new(&config.data_file);
    let store = Arc::new(TaskStore::new(backend));

    // The data file is never created here; report a bad one at startup.
    match store.list().await {
        Ok(tasks) => tracing::info!(
            path = %config.data_file.display(),
            count = tasks.len(),
            "task file loaded"
        ),
        Err(e) => tracing::warn!(error = %e, "task file is not usable; requests will fail"),
    }

    match server::start_server(&config.bind_addr, store).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "server is running on http://{bound_addr}");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber, writing to `log_file` when given and
/// to stderr otherwise.
///
/// Returns the appender guard for file logging. If the log file path has
/// no usable parent or file name, falls back to stderr.
fn init_tracing(level: &str, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some((dir, name)) = log_file.and_then(split_log_path) else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
        return None;
    };

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Split a log file path into its directory and file name.
fn split_log_path(path: &Path) -> Option<(&Path, &str)> {
    let name = path.file_name()?.to_str()?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Some((dir, name))
}
