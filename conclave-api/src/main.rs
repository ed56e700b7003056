//! conclave-api - Conference management backend service
//!
//! RPC-style HTTP API over a SQLite entity store, with an in-process
//! announcement cache and a background job worker.

use anyhow::Result;
use clap::Parser;
use conclave_api::{build_router, cache::Cache, jobs, AppState};
use conclave_common::config::{database_path, resolve_root_folder, DEFAULT_PORT};
use conclave_common::db::init_database;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "conclave-api", about = "Conference management backend")]
struct Args {
    /// Root data folder (overrides CONCLAVE_ROOT and the config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Port to listen on
    #[arg(long, env = "CONCLAVE_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Starting Conclave API v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), "CONCLAVE_ROOT");
    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let cache = Cache::new();
    let job_queue = jobs::spawn_worker(pool.clone(), cache.clone());
    jobs::spawn_announcement_refresher(
        pool.clone(),
        cache.clone(),
        jobs::ANNOUNCEMENT_REFRESH_PERIOD,
    );

    let state = AppState::new(pool, cache, job_queue);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("conclave-api listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
