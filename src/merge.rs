//! Merge scraped status onto the reference fleet

use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    geocoding::{locate, Geocoder},
    models::{FleetSnapshot, MergedShipRecord, ScrapedShipRecord, ShipRecord},
};

/// Overwrite the scraped fields of a reference entry
fn apply_scraped(ship: &mut ShipRecord, scraped: &ScrapedShipRecord) {
    ship.status.clone_from(&scraped.status);
    ship.location_reported.clone_from(&scraped.location_reported);
    ship.ship_class.clone_from(&scraped.ship_class);
}

/// Produce one merged record per reference entry, in reference order.
///
/// With no scraped records the reference snapshot is returned unchanged,
/// including its own `lastUpdated`. Otherwise `last_updated` is used and
/// every entry with a scraped counterpart (by hull) takes its status, date
/// and class, plus geocoded coordinates when the new status yields any.
/// Scraped hulls absent from the reference are dropped.
pub async fn merge_fleet(
    reference: &FleetSnapshot,
    scraped: &[ScrapedShipRecord],
    geocoder: &dyn Geocoder,
    last_updated: String,
) -> FleetSnapshot {
    if scraped.is_empty() {
        info!("No scraped records, serving reference fleet");
        return reference.clone();
    }

    let by_hull: HashMap<&str, &ScrapedShipRecord> = scraped
        .iter()
        .map(|record| (record.hull.as_str(), record))
        .collect();

    let mut ships: Vec<MergedShipRecord> = Vec::with_capacity(reference.ships.len());
    for reference_ship in &reference.ships {
        let mut ship = reference_ship.clone();
        if let Some(record) = by_hull.get(ship.hull.as_str()) {
            apply_scraped(&mut ship, record);
            debug!("Processing ship: {}", ship.name);

            match locate(geocoder, &ship.status).await {
                Some(coordinates) => ship.coordinates = coordinates,
                None => debug!(
                    "Keeping reference coordinates for {} (status: '{}')",
                    ship.hull, ship.status
                ),
            }
        }
        ships.push(ship);
    }

    info!(
        "Serving {} scraped records merged with reference details",
        by_hull.len()
    );

    FleetSnapshot {
        last_updated,
        ships,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geocoding::tests::FakeGeocoder, models::Coordinates, reference};

    fn static_fleet_of_26() -> FleetSnapshot {
        let mut fleet = reference::load().unwrap();
        fleet.ships.truncate(26);
        fleet
    }

    fn scraped(hull: &str, status: &str) -> ScrapedShipRecord {
        ScrapedShipRecord {
            name: "USS Cole".to_string(),
            hull: hull.to_string(),
            ship_class: "Destroyer (scraped)".to_string(),
            status: status.to_string(),
            location_reported: "June 30, 2025".to_string(),
        }
    }

    #[tokio::test]
    async fn single_scraped_record() {
        let fleet = static_fleet_of_26();
        let geocoder = FakeGeocoder::default();
        let records = [scraped("DDG-67", "Undergoing maintenance.")];

        let merged = merge_fleet(&fleet, &records, &geocoder, "2025-06-30".to_string()).await;

        assert_eq!(merged.ships.len(), 26);
        assert_eq!(merged.last_updated, "2025-06-30");
        for (merged_ship, reference_ship) in merged.ships.iter().zip(&fleet.ships) {
            if reference_ship.hull == "DDG-67" {
                assert_eq!(merged_ship.status, "Undergoing maintenance.");
                assert_eq!(merged_ship.ship_class, "Destroyer (scraped)");
                assert_eq!(merged_ship.location_reported, "June 30, 2025");
                assert_eq!(merged_ship.coordinates, reference_ship.coordinates);
                assert_eq!(merged_ship.description, reference_ship.description);
            } else {
                assert_eq!(merged_ship, reference_ship);
            }
        }
        // No locative keyword, so no geocoding call
        assert!(geocoder.calls().is_empty());
    }

    #[tokio::test]
    async fn geocoded_status_moves_ship() {
        let fleet = static_fleet_of_26();
        let geocoder =
            FakeGeocoder::default().with_place("Port of Jebel Ali", Coordinates::new(55.03, 25.01));
        let records = [scraped("DDG-67", "Moored at Jebel Ali.")];

        let merged = merge_fleet(&fleet, &records, &geocoder, "2025-06-30".to_string()).await;
        let cole = merged.ships.iter().find(|s| s.hull == "DDG-67").unwrap();

        assert_eq!(cole.coordinates, Coordinates::new(55.03, 25.01));
        assert_eq!(geocoder.calls(), vec!["Port of Jebel Ali"]);
    }

    #[tokio::test]
    async fn geocoding_failure_keeps_reference_coordinates() {
        let fleet = static_fleet_of_26();
        let geocoder = FakeGeocoder::default().failing_on("Red Sea");
        let records = [scraped("DDG-67", "Transiting the Red Sea.")];

        let merged = merge_fleet(&fleet, &records, &geocoder, "2025-06-30".to_string()).await;
        let cole = merged.ships.iter().find(|s| s.hull == "DDG-67").unwrap();

        assert_eq!(cole.status, "Transiting the Red Sea.");
        assert_eq!(cole.coordinates, Coordinates::new(58.0, 24.0));
    }

    #[tokio::test]
    async fn unknown_hulls_are_dropped() {
        let fleet = static_fleet_of_26();
        let geocoder = FakeGeocoder::default();
        let records = [scraped("SSN-9999", "Operating in the Arctic Ocean.")];

        let merged = merge_fleet(&fleet, &records, &geocoder, "2025-06-30".to_string()).await;

        assert_eq!(merged.ships, fleet.ships);
        assert!(merged.ships.iter().all(|s| s.hull != "SSN-9999"));
        assert!(geocoder.calls().is_empty());
    }

    #[tokio::test]
    async fn duplicate_hulls_last_wins() {
        let fleet = static_fleet_of_26();
        let geocoder = FakeGeocoder::default();
        let records = [
            scraped("DDG-67", "Undergoing maintenance."),
            scraped("DDG-67", "Pierside for repairs."),
        ];

        let merged = merge_fleet(&fleet, &records, &geocoder, "2025-06-30".to_string()).await;
        let cole = merged.ships.iter().find(|s| s.hull == "DDG-67").unwrap();

        assert_eq!(cole.status, "Pierside for repairs.");
    }

    #[tokio::test]
    async fn empty_scrape_serves_reference() {
        let fleet = static_fleet_of_26();
        let geocoder = FakeGeocoder::default();

        let merged = merge_fleet(&fleet, &[], &geocoder, "2025-06-30".to_string()).await;

        assert_eq!(merged, fleet);
        assert_eq!(merged.last_updated, "2025-06-29");
    }
}
