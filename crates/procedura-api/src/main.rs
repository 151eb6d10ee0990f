use std::env;

use tracing_subscriber::EnvFilter;

use procedura_api::settings::Settings;
use procedura_api::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let settings = Settings::from_env()?;
    let state = AppState::from_settings(&settings).await?;
    let app = procedura_api::app(state);

    if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        tracing::info!("starting Lambda runtime");
        return lambda_http::run(app).await.map_err(|e| eyre::eyre!(e));
    }

    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    tracing::info!(bind = %settings.bind, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
