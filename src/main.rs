//! Fleet tracker server

use std::sync::Arc;

use fleet_tracker::{
    config::AppConfig,
    database::Database,
    errors::FleetTrackerError,
    geocoding::NominatimGeocoder,
    reference,
    server::{router, AppState},
};
use tokio::signal;
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

    let reference = Arc::new(reference::load()?);
    let geocoder = Arc::new(NominatimGeocoder::new(&config.geocoder)?);

    // The reference fleet is still served when the store is unavailable
    let database = match Database::from_url(&config.database.url).await {
        Ok(database) => Some(database),
        Err(e) => {
            error!("Could not open database: {}", e);
            None
        }
    };

    let state = AppState {
        database,
        reference,
        geocoder,
    };
    let app = router(state, &config.server.static_dir);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    info!("Serving fleet data on http://{}/", config.server.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Received shutdown signal");
        })
        .await?;

    Ok(())
}
