//! # CineFetch
//!
//! Movie metadata and poster proxy with tiered provider fallback and caching.

mod bootstrap;
mod di;
mod server;

use clap::Parser;
use cinefetch_domain::CliOverrides;
use cinefetch_jobs::{CacheSweepJob, JobRunner};
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "cinefetch")]
#[command(version)]
#[command(about = "Movie search and poster proxy with multi-tier caching")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Web server port
    #[arg(short = 'w', long)]
    web_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// SQLite database path (":memory:" for a throwaway store)
    #[arg(long)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// Skip the persistent cache tier entirely
    #[arg(long)]
    memory_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        web_port: cli.web_port,
        bind_address: cli.bind,
        database_path: cli.database,
        log_level: cli.log_level,
        memory_only: cli.memory_only,
    };
    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "CineFetch starting");

    let pool = if config.cache.persistent {
        Some(bootstrap::init_database(&config.database).await?)
    } else {
        info!("Persistent cache disabled, running memory-only");
        None
    };

    let caches = di::CacheServices::new(&config, pool);
    let providers = di::ProviderServices::new(&config, caches.clock.clone());
    let use_cases = di::UseCases::new(&config, &caches, &providers);

    let shutdown = CancellationToken::new();

    let job_handles = JobRunner::new()
        .with_cache_sweep(
            CacheSweepJob::new(use_cases.sweep_expired.clone())
                .with_interval(config.cache.sweep_interval_secs)
                .with_cancellation(shutdown.clone()),
        )
        .start()
        .await;

    let ctrl_c_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
        ctrl_c_token.cancel();
    });

    let result = server::start_web_server(&config, use_cases.app_state(&config), shutdown.clone()).await;
    shutdown.cancel();

    for handle in job_handles {
        let _ = handle.await;
    }
    info!("CineFetch stopped");
    result
}
