//! Coursekit API server binary.
//!
//! Loads configuration from the environment (and `.env`), connects the
//! account store, and serves the REST API until Ctrl-C.

use std::sync::Arc;

use clap::Parser;
use coursekit_api::config::ApiConfig;
use coursekit_core::accounts::{AccountStore, MemoryAccountStore, PgAccountStore};
use coursekit_core::auth::CredentialService;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server. Unset options fall back to the
/// environment-driven `ApiConfig`.
#[derive(Parser, Debug)]
#[command(name = "coursekit_api_server", about = "Coursekit API server")]
struct Args {
    /// Address to listen on (overrides `BIND_ADDR`).
    #[arg(long)]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL (overrides `DATABASE_URL`).
    #[arg(long)]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    /// Keep accounts in process memory instead of PostgreSQL.
    #[arg(long, default_value_t = false)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,coursekit_api=debug,coursekit_core=debug",
                )
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    let store: Arc<dyn AccountStore> = if args.in_memory {
        warn!("using in-memory account store; accounts are lost on exit");
        Arc::new(MemoryAccountStore::new())
    } else {
        info!(
            max_connections = args.max_connections,
            "configuring connection pool"
        );
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&config.database_url)
            .await?;

        info!("running database migrations");
        coursekit_core::migrate::migrate(&pool).await?;
        Arc::new(PgAccountStore::new(pool))
    };

    let auth = CredentialService::new(store, &config.auth);
    let state = coursekit_api::AppState::new(auth, config.clone());
    let app = coursekit_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(
        addr = %local_addr,
        secure_cookies = config.cookie_secure,
        "REST API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
