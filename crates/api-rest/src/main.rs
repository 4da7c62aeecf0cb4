//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! This binary is useful for development and debugging when you only want the
//! REST server (with OpenAPI/Swagger UI). The workspace's main `cardiodx-run`
//! binary is the production entry point.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use cardiodx_core::{resolve_model_dir, CoreConfig, DiagnosticService, ModelRegistry};

/// Main entry point for the CardioDx REST API server
///
/// Starts the REST API server on the configured address (default:
/// 0.0.0.0:3000). Provides HTTP endpoints for diagnostic requests with
/// OpenAPI/Swagger documentation.
///
/// # Environment Variables
/// - `CARDIODX_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `CARDIODX_MODEL_DIR`: Model artifact directory override
///
/// # Returns
/// * `Ok(())` - If server starts and runs successfully
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the model registry cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CARDIODX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting CardioDx REST API on {}", addr);

    let model_dir_override = std::env::var("CARDIODX_MODEL_DIR").ok().map(PathBuf::from);
    let model_dir = resolve_model_dir(model_dir_override)?;
    let cfg = CoreConfig::new(model_dir)?;

    let registry = match ModelRegistry::load(cfg.model_dir()) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("model registry failed to load: {e}");
            anyhow::bail!(
                "The diagnostic models could not be loaded; the service cannot start until they are available."
            );
        }
    };

    let state = AppState {
        diagnostic: DiagnosticService::new(Arc::new(registry)),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
