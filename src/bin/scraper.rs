//! One-shot fleet report scrape

use fleet_tracker::{
    config::AppConfig,
    database::Database,
    errors::FleetTrackerError,
    scrape::{scrape_and_store, FleetScraper},
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), FleetTrackerError> {
    #[cfg(feature = "dotenvy")]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let database = Database::from_url(&config.database.url).await?;
    info!("Database initialized");

    let scraper = FleetScraper::new(config.scraper)?;
    match scrape_and_store(&scraper, &database).await {
        Ok(0) => info!("Stored batch left unchanged"),
        Ok(count) => info!("Database update complete: {} ships", count),
        Err(e) => {
            error!("Scrape failed, stored batch left unchanged: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
