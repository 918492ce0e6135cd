pub mod cart;
pub mod commands;
pub mod config;
pub mod db;
pub mod discount;
pub mod error;
pub mod inventory;
pub mod models;
pub mod notifications;
pub mod receipt;
pub mod reports;
pub mod search;
pub mod seed;

#[cfg(feature = "desktop")]
mod desktop;

#[cfg(test)]
mod tests;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::AppConfig;
use db::Database;
use error::Result;

const DEFAULT_LOG_FILTER: &str = "info,kasir_pos_lib=debug";

/// Console plus daily-rolling file logging under `<data_dir>/logs`.
///
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn init_logging(config: &AppConfig) -> Result<WorkerGuard> {
    let env_filter = match &config.log_filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "pos");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);
    let console_layer = fmt::layer().with_target(true);

    // try_init: a host may already have installed a subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    Ok(guard)
}

/// Open the store described by `config`, create its table and seed demo
/// data into an empty store when enabled.
pub fn open_store(config: &AppConfig) -> Result<Database> {
    let db = Database::open(config)?;
    db.initialize()?;
    if config.seed_demo_data {
        seed::ensure_seeded(&db)?;
    }
    Ok(db)
}

#[cfg(feature = "desktop")]
pub use desktop::run;
