//! # Countries API Server
//!
//! Serves country reference data merged from a country facts feed and an
//! exchange rates feed, and renders a PNG summary of every refresh in the
//! background.
//!
//! ## Lifecycle:
//! 1. Configuration is layered from defaults, `server_countries.conf`, the
//!    environment (including `.env`) and CLI arguments.
//! 2. Records live in PostgreSQL when `DATABASE_URL` is set, in memory otherwise.
//! 3. The render queue and its single worker are created here and live until
//!    shutdown.
//! 4. `CTRL+C` or `SIGTERM` broadcasts shutdown to the HTTP server and the
//!    render worker, and both are awaited before exit.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use lib_countries::{
    CountryStore, HttpCountrySource, MemoryStore, PgStore, PngSummaryRenderer, QueryEngine,
    RenderWorker, SyncEngine, render_queue,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

mod countries_logic;
use countries_logic::{config, logger, routes, state};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration and logging
    dotenvy::dotenv().ok();
    let (settings, origin) = config::load_config();
    let _guard = logger::setup_logging(&settings.log_dir, &settings.log_level)?;
    origin.log();

    // 2. Storage
    let store: Arc<dyn CountryStore> = match &settings.database_url {
        Some(url) => {
            let pg = PgStore::connect(url, settings.db_pool_size)?;
            pg.ensure_schema()
                .await
                .context("Failed to prepare the countries table")?;
            info!(pool_size = settings.db_pool_size, "Using PostgreSQL store");
            Arc::new(pg)
        }
        None => {
            warn!("DATABASE_URL not set; records are kept in memory and lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    // 3. Upstream source, render queue and worker
    let source = Arc::new(
        HttpCountrySource::new(settings.endpoints()).context("Failed to build HTTP client")?,
    );
    let (shutdown_tx, _) = broadcast::channel(1);
    let (render_tx, render_rx) = render_queue(settings.render_queue_capacity);
    let renderer = Arc::new(PngSummaryRenderer::new(&settings.cache_dir));
    let artifact_path = renderer.path().to_path_buf();
    let worker_handle = RenderWorker::new(render_rx, renderer, shutdown_tx.subscribe()).spawn();

    // 4. Engines and HTTP server
    let app_state = state::AppState::new(
        SyncEngine::new(source, store.clone(), render_tx),
        QueryEngine::new(store),
        artifact_path,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Starting HTTP server on http://{}", addr);
    let mut server_handle = tokio::spawn(routes::serve(
        listener,
        app_state,
        shutdown_tx.subscribe(),
    ));

    // 5. Wait for a shutdown signal, or for the server to stop on its own
    tokio::select! {
        _ = shutdown_signal() => {}
        result = &mut server_handle => {
            error!("HTTP server stopped unexpectedly: {:?}", result);
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
            anyhow::bail!("HTTP server stopped unexpectedly");
        }
    }

    // Send shutdown signal to all components
    let _ = shutdown_tx.send(());

    // Wait for components to shut down
    let (server_result, worker_result) = tokio::join!(server_handle, worker_handle);
    match server_result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("HTTP server error during shutdown: {}", e),
        Err(e) => error!("HTTP server task failed: {}", e),
    }
    if let Err(e) = worker_result {
        error!("Render worker task failed: {}", e);
    }

    info!("Shutdown complete.");
    Ok(())
}

/// # Graceful Shutdown Signal Handler
///
/// Resolves on the first of `CTRL+C` or, on UNIX, `SIGTERM`. A handler that
/// cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, initiating shutdown."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term_signal) => {
                term_signal.recv().await;
                info!("SIGTERM received, initiating shutdown.");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    // On non-UNIX systems, `terminate` is a future that never completes.
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
