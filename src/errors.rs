//! Errors for fleet tracker
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetTrackerError {
    #[error("HTTP request failed")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Serialization error")]
    SerdeError(#[from] serde_json::Error),

    #[error("Configuration error")]
    ConfigError(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    ConfigurationError { message: String },

    #[error("IO error")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Page element not found: {0}")]
    MissingElement(String),

    #[error("Invalid coordinate in geocoding response: {0}")]
    InvalidCoordinate(String),

    #[error("Database migration error")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),
}
