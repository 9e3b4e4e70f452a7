//! Naval fleet tracker
//!
//! Scrapes ship status from the weekly fleet tracker report and serves it
//! merged with bundled reference data.

pub mod config;
pub mod database;
pub mod errors;
pub mod extract;
pub mod geocoding;
pub mod hull;
pub mod location;
pub mod merge;
pub mod models;
pub mod reference;
pub mod scrape;
pub mod server;
pub mod status;
