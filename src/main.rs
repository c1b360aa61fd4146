use tokio::net::TcpListener;

use finance_tracker::app;
use finance_tracker::config::Config;
use finance_tracker::logging::{init_logging, LoggingConfig};
use finance_tracker::state::AppState;
use finance_tracker::store::JsonFileStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = Config::from_env()?;

    let store = JsonFileStore::open(&config.db_path).await?;
    tracing::info!("Using database file {}", store.path().display());

    let state = AppState::new(store);
    let app = app::create_app_with_layers(state, &config.cors_allow);

    let listener = TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("Server running at http://{}/", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
