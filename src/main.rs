use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use prompt_template_service::config::Settings;
use prompt_template_service::postgres::PostgresPool;
use prompt_template_service::server::{create_app, AppState};
use prompt_template_service::store::{create_template_repository, PostgresTemplateRepository};
use prompt_template_service::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing (and OpenTelemetry export if enabled)
    let _telemetry = init_telemetry(&settings.otel)?;
    tracing::info!(
        backend = %settings.database.backend,
        max_content_len = settings.limits.max_content_len,
        "Configuration loaded"
    );

    // Connect to PostgreSQL when it backs the repository
    let postgres_pool = if settings.database.backend == "postgres" {
        let pool = PostgresPool::new(&settings.database).await?;
        PostgresTemplateRepository::new(pool.pool().clone())
            .ensure_schema()
            .await?;
        Some(pool)
    } else {
        None
    };

    let repository = create_template_repository(&settings.database, postgres_pool.as_ref());

    // Create application state
    let state = AppState::new(settings.clone(), repository);
    tracing::info!("Application state initialized");

    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_handler())
        .await?;

    if let Some(pool) = postgres_pool {
        tracing::info!("Closing PostgreSQL pool");
        pool.close().await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
