//! meteoport - An in-memory airport weather query service
//!
//! This is the main entry point for the meteoport application.

use anyhow::Context;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use meteoport::handlers::create_router;
use meteoport::loader::load_airports_into;
use meteoport::{init_tracing, log_error, AppState, Config, MeteoportError};

fn main() -> anyhow::Result<()> {
    // Load and validate configuration before anything else
    let config = Config::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_tracing(&config.log_level);
    info!("Starting meteoport v{}", env!("CARGO_PKG_VERSION"));

    let mut runtime = tokio::runtime::Builder::new_multi_thread();
    if let Some(workers) = config.server.workers {
        runtime.worker_threads(workers);
    }
    let runtime = runtime
        .enable_all()
        .build()
        .context("failed to build the async runtime")?;

    runtime.block_on(serve(config)).map_err(|e| {
        log_error(&e, "server");
        anyhow::Error::new(e)
    })
}

async fn serve(config: Config) -> meteoport::Result<()> {
    let state = AppState::new_shared(config);

    if let Some(path) = &state.config.data.airports_file {
        let summary = load_airports_into(&state.service, path)?;
        info!(
            "Loaded {} airports ({} skipped)",
            summary.loaded, summary.skipped
        );
    }

    // Create the server address
    let addr = SocketAddr::from((
        state
            .config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .map_err(|e| MeteoportError::Config {
                message: format!("Invalid host address: {}", e),
            })?,
        state.config.server.port,
    ));

    let app = create_router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| MeteoportError::Server {
            message: format!("Failed to bind to address: {}", e),
        })?;

    info!("Server is ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MeteoportError::Server {
            message: format!("Server error: {}", e),
        })?;

    info!("Server has been gracefully shut down");
    Ok(())
}

/// Wait for a shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
