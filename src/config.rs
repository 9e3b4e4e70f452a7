//! Application configuration

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_with::serde_as;

use crate::errors::FleetTrackerError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub geocoder: GeocoderConfig,
    pub scraper: ScraperConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Directory holding `index.html` and `images/`
    pub static_dir: PathBuf,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Minimum spacing between two geocoding requests
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub min_delay: Duration,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub timeout: Duration,
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct ScraperConfig {
    pub category_url: String,
    pub user_agent: String,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub timeout: Duration,
    /// Where to write a post page whose content could not be located
    #[serde(default)]
    pub debug_dump_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("database.url", "sqlite://fleet.db?mode=rwc")?
            .set_default("server.bind_address", "127.0.0.1:5000")?
            .set_default("server.static_dir", ".")?
            .set_default("geocoder.base_url", "https://nominatim.openstreetmap.org")?
            .set_default("geocoder.user_agent", "fleet_tracker_app/1.0")?
            .set_default("geocoder.min_delay", 1_i64)?
            .set_default("geocoder.timeout", 10_i64)?
            .set_default(
                "scraper.category_url",
                "https://news.usni.org/category/fleet-tracker",
            )?
            .set_default("scraper.user_agent", "fleet_tracker_app/1.0")?
            .set_default("scraper.timeout", 30_i64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                Environment::with_prefix("FLEETTRACKER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), FleetTrackerError> {
        self.database.validate()?;
        self.server.validate()?;
        self.geocoder.validate()?;
        self.scraper.validate()
    }
}

fn require_non_empty(value: &str, what: &str) -> Result<(), FleetTrackerError> {
    if value.trim().is_empty() {
        return Err(FleetTrackerError::ConfigurationError {
            message: format!("{} cannot be empty", what),
        });
    }
    Ok(())
}

fn require_non_zero(value: Duration, what: &str) -> Result<(), FleetTrackerError> {
    if value.is_zero() {
        return Err(FleetTrackerError::ConfigurationError {
            message: format!("{} must be greater than zero", what),
        });
    }
    Ok(())
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), FleetTrackerError> {
        require_non_empty(&self.url, "Database URL")
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), FleetTrackerError> {
        require_non_empty(&self.bind_address, "Bind address")
    }
}

impl GeocoderConfig {
    pub fn validate(&self) -> Result<(), FleetTrackerError> {
        require_non_empty(&self.base_url, "Geocoder base URL")?;
        require_non_empty(&self.user_agent, "Geocoder user agent")?;
        require_non_zero(self.min_delay, "Geocoder minimum delay")?;
        require_non_zero(self.timeout, "Geocoder timeout")
    }
}

impl ScraperConfig {
    pub fn validate(&self) -> Result<(), FleetTrackerError> {
        require_non_empty(&self.category_url, "Category URL")?;
        require_non_zero(self.timeout, "Scraper timeout")
    }
}
