use docqa::config::AppConfig;
use docqa::infrastructure::AppContainer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!("Starting docqa on port {}", config.port);

    let container = AppContainer::new(&config)?;
    container.http_server().run().await
}
