use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockroom_api::config::{LogFormat, ServerConfig};
use stockroom_api::metrics::Metrics;
use stockroom_api::router::build_app_router;
use stockroom_api::services::Services;
use stockroom_api::state::AppState;
use stockroom_cache::{Cache, MemoryCache, NoopCache, RedisCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid configuration")?;

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = stockroom_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connection pool created"
    );

    stockroom_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    stockroom_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Cache ---
    let cache = build_cache(&config).await?;

    // --- Metrics ---
    let metrics = Arc::new(Metrics::new());

    // --- Event bus ---
    let event_bus = Arc::new(stockroom_events::EventBus::default());
    let persistence_handle = tokio::spawn(stockroom_events::EventPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));
    tracing::info!("Event persistence started");

    // --- Services & state ---
    let services = Services::new(
        pool.clone(),
        cache,
        config.cache_ttl(),
        Arc::clone(&metrics),
        Arc::clone(&event_bus),
    );
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        services: Arc::new(services),
        metrics,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))?;
    tracing::info!(addr = %listener.local_addr()?, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Dropping the last sender closes the broadcast channel, which lets the
    // persistence task drain and exit.
    drop(event_bus);
    if tokio::time::timeout(config.shutdown_timeout(), persistence_handle)
        .await
        .is_err()
    {
        tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Event persistence did not drain before the shutdown timeout"
        );
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Install the global tracing subscriber.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stockroom_api=debug,tower_http=debug".into());

    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

/// Pick the cache backend: disabled, Redis, or in-process.
async fn build_cache(config: &ServerConfig) -> anyhow::Result<Arc<dyn Cache>> {
    if !config.cache_enabled {
        tracing::info!("Response cache disabled");
        return Ok(Arc::new(NoopCache));
    }

    match &config.redis_url {
        Some(url) => {
            let cache = RedisCache::connect(url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!(ttl_secs = config.cache_ttl_secs, "Using Redis response cache");
            Ok(Arc::new(cache))
        }
        None => {
            tracing::info!(
                ttl_secs = config.cache_ttl_secs,
                max_entries = config.cache_max_entries,
                "REDIS_URL not set, using in-process response cache"
            );
            Ok(Arc::new(MemoryCache::with_capacity(config.cache_max_entries)))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
