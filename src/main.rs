use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use cardiodx_core::{resolve_model_dir, CoreConfig, DiagnosticService, ModelRegistry};

/// Main entry point for the CardioDx application
///
/// Loads the model registry once at startup and then serves the REST API.
/// Loading is fail-fast: if any registered model artifact cannot be read the
/// process refuses to start rather than answering diagnostic requests with a
/// partial ensemble.
///
/// # Environment Variables
/// - `CARDIODX_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CARDIODX_MODEL_DIR`: Model artifact directory override
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If registry loading or server startup fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cardiodx=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CARDIODX_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("++ Starting CardioDx REST on {}", addr);

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

    for entry in registry.all() {
        tracing::info!(
            model = %entry.name(),
            family = entry.family(),
            reported_accuracy = entry.reported_accuracy(),
            "model registered"
        );
    }

    let state = AppState {
        diagnostic: DiagnosticService::new(Arc::new(registry)),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
