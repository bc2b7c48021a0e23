//! Givetastic API server binary.

use clap::Parser;
use givetastic_api::config::ApiConfig;
use givetastic_core::config::{StoreBackend, StoreConfig};
use tracing::info;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "givetastic_api_server", about = "Givetastic API server")]
struct Args {
    /// Address to bind the HTTP listener. Overrides `BIND_ADDR`.
    #[arg(long)]
    bind_addr: Option<String>,

    /// Store backend: fallback, memory or postgres.
    ///
    /// Defaults to postgres when `DATABASE_URL` is set, fallback otherwise.
    #[arg(long, env = "GIVETASTIC_STORE")]
    store: Option<String>,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| {
                    tracing_subscriber::EnvFilter::try_new(
                        "info,givetastic_api=debug,givetastic_core=debug",
                    )
                })?,
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }

    let mut store = StoreConfig::from_vars(args.store, args.database_url)?;
    store.max_connections = args.max_connections;
    info!(backend = %store.backend, bind_addr = %config.bind_addr, "starting givetastic_api_server");
    if store.backend == StoreBackend::Memory {
        info!("memory store: codes and accounts are lost on exit");
    }

    let stores = store.connect().await?;

    let state = givetastic_api::AppState::new(stores, config.clone());
    let app = givetastic_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutting down");
        })
        .await?;

    Ok(())
}
