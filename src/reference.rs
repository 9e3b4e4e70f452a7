//! Bundled reference fleet
//!
//! Hand-curated ship details served as-is when no scrape is available, and
//! the base that scraped status is merged onto.

use crate::{errors::FleetTrackerError, models::FleetSnapshot};

const REFERENCE_FLEET_JSON: &str = include_str!("../data/reference_fleet.json");

/// Parse the bundled reference fleet. Call once at startup and share.
pub fn load() -> Result<FleetSnapshot, FleetTrackerError> {
    Ok(serde_json::from_str(REFERENCE_FLEET_JSON)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn reference_fleet_parses() {
        let fleet = load().unwrap();

        assert_eq!(fleet.last_updated, "2025-06-29");
        assert_eq!(fleet.ships.len(), 27);
        assert_eq!(fleet.ships[0].hull, "CVN-78");
        assert_eq!(fleet.ships[0].name, "USS Gerald R. Ford");
    }

    #[test]
    fn reference_hulls_are_unique() {
        let fleet = load().unwrap();
        let hulls: HashSet<_> = fleet.ships.iter().map(|s| s.hull.as_str()).collect();

        assert_eq!(hulls.len(), fleet.ships.len());
    }

    #[test]
    fn reference_classes_match_hull_table() {
        let fleet = load().unwrap();
        for ship in &fleet.ships {
            assert_eq!(crate::hull::classify(&ship.hull), ship.ship_class, "{}", ship.hull);
        }
    }
}
