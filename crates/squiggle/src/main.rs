mod app;
mod config;
mod handlers;
mod state;
mod storage;

use std::{future::IntoFuture, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal, sync::Notify};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{app::create_app, config::Config, state::AppState};

/// Squiggle - Store and replay basketball plays
#[derive(Parser, Debug)]
#[command(name = "squiggle")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "8080", env = "PORT")]
    port: u16,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_json);

    let config = Config::from_env();

    // Refuses to start when the play store is unreachable
    let state = AppState::new(&config).await?;

    let app = create_app(state, &config)?;

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!(
        origin = %config.frontend_origin,
        "listening on {}",
        listener.local_addr()?
    );

    let shutdown_started = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_started.clone()))
        .into_future();
    tokio::pin!(server);

    let grace = config.shutdown_grace();
    tokio::select! {
        result = &mut server => {
            result?;
            tracing::info!("Server stopped");
        }
        _ = grace_period_elapsed(&shutdown_started, grace) => {
            tracing::warn!(
                grace_seconds = grace.as_secs(),
                "Shutdown grace period elapsed with requests still in flight, exiting"
            );
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "squiggle=debug,tower_http=debug".into());

    let (json_layer, text_layer) = if json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

/// Resolves once shutdown has begun and `grace` has passed since.
async fn grace_period_elapsed(shutdown_started: &Notify, grace: Duration) {
    shutdown_started.notified().await;
    tokio::time::sleep(grace).await;
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM) and start the grace timer.
async fn shutdown_signal(shutdown_started: Arc<Notify>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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

    // Stores a permit, so the grace timer starts even if it polls later
    shutdown_started.notify_one();
}
