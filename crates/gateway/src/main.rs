mod app;
mod config;
mod dispatch;
mod handlers;
mod registry;
mod state;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use listenfd::ListenFd;
use storefront_core::registry::ServiceDescriptor;
use tokio::{net::TcpListener, signal, sync::watch};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    app::create_app,
    config::GatewayConfig,
    dispatch::{Dispatcher, HttpUpstream},
    registry::{spawn_self_registration, spawn_sweeper, ServiceRegistry},
    state::AppState,
};

/// Storefront gateway - service registry and request router
#[derive(Parser, Debug)]
#[command(name = "storefront-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "5555", env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env();
    tracing::info!(
        window_secs = config.liveness_window_seconds,
        sweep_secs = config.sweep_interval_seconds,
        policy = %config.selection_policy,
        "Starting gateway"
    );

    let registry = Arc::new(ServiceRegistry::new(
        config.liveness_window(),
        config.selection_policy,
    ));
    let upstream = Arc::new(HttpUpstream::new(config.forward_timeout())?);
    let dispatcher = Dispatcher::new(
        registry.clone(),
        upstream,
        config.routes.clone(),
        config.retry,
    );

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };
    let local_addr = listener.local_addr()?;
    tracing::info!("listening on {}", local_addr);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = spawn_sweeper(registry.clone(), config.sweep_interval(), shutdown_rx.clone());
    let gateway_entry = ServiceDescriptor::new(
        "api-gateway",
        config.advertised_host.clone(),
        local_addr.port(),
    )
    .with_endpoints(dispatcher.routes().endpoint_patterns());
    let self_registration = spawn_self_registration(
        registry.clone(),
        gateway_entry,
        config.heartbeat_interval(),
        shutdown_rx,
    );

    let app = create_app(AppState::new(registry, dispatcher, config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    for task in [sweeper, self_registration] {
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "Background task ended abnormally");
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
