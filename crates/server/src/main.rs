//! Wardrobe Server - clothing image classification service.
//!
//! # Architecture
//!
//! - Axum web framework, JSON API only
//! - Google Cloud Vision label detection for uploaded images
//! - `PostgreSQL` for wardrobe items (one table, create and read only)
//! - Sentry for error tracking when `SENTRY_DSN` is set
//!
//! Startup fails fast: invalid configuration, an unreachable database, or an
//! unbindable address terminates the process with a non-zero exit code.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wardrobe_server::config::{self, ServerConfig};
use wardrobe_server::db::{self, ItemRepository};
use wardrobe_server::services::VisionClient;
use wardrobe_server::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wardrobe_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let _sentry_guard = init_sentry(&config);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server terminated");
            ExitCode::FAILURE
        }
    }
}

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("database connection failed: {0}")]
    Database(#[source] sqlx::Error),
    #[error("schema bootstrap failed: {0}")]
    Schema(#[source] sqlx::Error),
    #[error("vision client setup failed: {0}")]
    Vision(#[from] wardrobe_server::services::ClassificationError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

async fn run(config: ServerConfig) -> Result<(), StartupError> {
    let pool = db::create_pool(&config.database_url)
        .await
        .map_err(StartupError::Database)?;
    tracing::info!(
        host = config::database_host(&config.database_url).as_deref().unwrap_or("unknown"),
        "Database connected"
    );

    db::ensure_schema(&pool)
        .await
        .map_err(StartupError::Schema)?;

    let items = Arc::new(ItemRepository::new(pool.clone()));
    let labels = Arc::new(VisionClient::new(&config.vision)?);
    let state = AppState::new(items, labels, config.placeholder_image_base.clone());

    let app = wardrobe_server::build_router(state, config.max_upload_bytes)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        environment = %config.environment,
        "Server running in {} mode on {}",
        config.environment,
        addr
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    pool.close().await;
    tracing::info!("Database pool closed");

    served.map_err(StartupError::from)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
