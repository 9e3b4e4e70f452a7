//! HTTP routes

use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Local;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, warn};

use crate::{
    database::Database, geocoding::Geocoder, merge::merge_fleet, models::FleetSnapshot,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// `None` when the store could not be opened; the reference fleet is served
    pub database: Option<Database>,
    pub reference: Arc<FleetSnapshot>,
    pub geocoder: Arc<dyn Geocoder>,
}

/// Build the router: the fleet API plus the static front end in `static_dir`
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/fleet", get(fleet_handler))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/images", ServeDir::new(static_dir.join("images")))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Current fleet: stored scrape merged onto the reference data.
///
/// Storage errors degrade to the reference fleet.
pub async fn fleet_handler(State(state): State<AppState>) -> Json<FleetSnapshot> {
    let scraped = match &state.database {
        Some(database) => match database.fetch_ships().await {
            Ok(ships) => ships,
            Err(e) => {
                error!("Error reading scraped ships, serving reference data: {}", e);
                Vec::new()
            }
        },
        None => {
            warn!("No database available, serving reference data");
            Vec::new()
        }
    };

    let today = Local::now().format("%Y-%m-%d").to_string();
    let snapshot = merge_fleet(&state.reference, &scraped, state.geocoder.as_ref(), today).await;
    Json(snapshot)
}
