//! Free-text geocoding
//!
//! Lookups are best effort. A failed or empty lookup leaves the caller with
//! whatever coordinates it already had.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::GeocoderConfig, errors::FleetTrackerError, location::build_query,
    models::Coordinates,
};

/// Query-by-text geocoding capability
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text place query, `Ok(None)` when nothing matches
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, FleetTrackerError>;
}

/// Nominatim search result, only the fields we read
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl NominatimPlace {
    fn coordinates(&self) -> Result<Coordinates, FleetTrackerError> {
        let latitude: f64 = self
            .lat
            .parse()
            .map_err(|_| FleetTrackerError::InvalidCoordinate(self.lat.clone()))?;
        let longitude: f64 = self
            .lon
            .parse()
            .map_err(|_| FleetTrackerError::InvalidCoordinate(self.lon.clone()))?;
        Ok(Coordinates::new(longitude, latitude))
    }
}

/// Serializes requests so that consecutive calls start at least
/// `min_delay` apart
#[derive(Debug)]
struct RequestPacer {
    min_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: Mutex::new(None),
        }
    }

    async fn wait_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_delay {
                tokio::time::sleep(self.min_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// OpenStreetMap Nominatim client
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    search_url: String,
    pacer: RequestPacer,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, FleetTrackerError> {
        config.validate()?;

        info!(
            "Initializing geocoder: base_url={}, min_delay={:?}, timeout={:?}",
            config.base_url, config.min_delay, config.timeout
        );

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            pacer: RequestPacer::new(config.min_delay),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, FleetTrackerError> {
        self.pacer.wait_turn().await;

        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FleetTrackerError::HttpStatus {
                status: status.as_u16(),
                url: self.search_url.clone(),
            });
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        match places.first() {
            Some(place) => {
                let coordinates = place.coordinates()?;
                debug!("Resolved '{}' to {}", query, place.display_name);
                Ok(Some(coordinates))
            }
            None => Ok(None),
        }
    }
}

/// Derive coordinates for a status sentence.
///
/// The primary query is tried first; a port query that finds nothing is
/// retried with the bare place name. Errors end the lookup.
pub async fn locate(geocoder: &dyn Geocoder, status: &str) -> Option<Coordinates> {
    let Some(query) = build_query(status) else {
        debug!("No location pattern matched in status: '{}'", status);
        return None;
    };

    let mut attempts = vec![query.primary.as_str()];
    attempts.extend(query.fallback());

    for attempt in attempts {
        debug!("Attempting to geocode '{}'", attempt);
        match geocoder.geocode(attempt).await {
            Ok(Some(coordinates)) => {
                debug!(
                    "Geocoded '{}' to ({}, {})",
                    attempt,
                    coordinates.latitude(),
                    coordinates.longitude()
                );
                return Some(coordinates);
            }
            Ok(None) => continue,
            Err(e) => {
                warn!("Geocoding '{}' failed: {}", attempt, e);
                return None;
            }
        }
    }

    warn!("No geocoding result for status '{}'", status);
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory geocoder that records every query
    #[derive(Default)]
    pub(crate) struct FakeGeocoder {
        pub places: HashMap<String, Coordinates>,
        pub failing: Vec<String>,
        pub calls: std::sync::Mutex<Vec<String>>,
    }

    impl FakeGeocoder {
        pub(crate) fn with_place(mut self, query: &str, coordinates: Coordinates) -> Self {
            self.places.insert(query.to_string(), coordinates);
            self
        }

        pub(crate) fn failing_on(mut self, query: &str) -> Self {
            self.failing.push(query.to_string());
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, FleetTrackerError> {
            self.calls.lock().unwrap().push(query.to_string());
            if self.failing.iter().any(|q| q == query) {
                return Err(FleetTrackerError::HttpStatus {
                    status: 503,
                    url: "fake".to_string(),
                });
            }
            Ok(self.places.get(query).copied())
        }
    }

    #[tokio::test]
    async fn port_query_hits_first() {
        let geocoder =
            FakeGeocoder::default().with_place("Port of Norfolk, Va", Coordinates::new(-76.3, 36.9));

        let found = locate(&geocoder, "Arrived in Norfolk, Va.").await;

        assert_eq!(found, Some(Coordinates::new(-76.3, 36.9)));
        assert_eq!(geocoder.calls(), vec!["Port of Norfolk, Va"]);
    }

    #[tokio::test]
    async fn port_query_falls_back_to_bare_location() {
        let geocoder =
            FakeGeocoder::default().with_place("Norfolk, Va", Coordinates::new(-76.2, 36.8));

        let found = locate(&geocoder, "Arrived in Norfolk, Va.").await;

        assert_eq!(found, Some(Coordinates::new(-76.2, 36.8)));
        assert_eq!(geocoder.calls(), vec!["Port of Norfolk, Va", "Norfolk, Va"]);
    }

    #[tokio::test]
    async fn ocean_query_has_no_fallback() {
        let geocoder = FakeGeocoder::default();

        let found = locate(&geocoder, "Patrolling the Black Sea.").await;

        assert_eq!(found, None);
        assert_eq!(geocoder.calls(), vec!["Black Sea"]);
    }

    #[tokio::test]
    async fn error_abandons_lookup() {
        let geocoder = FakeGeocoder::default()
            .failing_on("Port of Norfolk, Va")
            .with_place("Norfolk, Va", Coordinates::new(-76.2, 36.8));

        let found = locate(&geocoder, "Arrived in Norfolk, Va.").await;

        assert_eq!(found, None);
        assert_eq!(geocoder.calls(), vec!["Port of Norfolk, Va"]);
    }

    #[tokio::test]
    async fn no_location_no_calls() {
        let geocoder = FakeGeocoder::default();

        assert_eq!(locate(&geocoder, "Undergoing modernization.").await, None);
        assert!(geocoder.calls().is_empty());
    }

    #[test]
    fn parse_nominatim_place() {
        let body = r#"[{
            "place_id": 123,
            "lat": "36.8968052",
            "lon": "-76.2838327",
            "display_name": "Norfolk, Virginia, United States"
        }]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(body).unwrap();
        let coordinates = places[0].coordinates().unwrap();

        assert_eq!(coordinates.latitude(), 36.8968052);
        assert_eq!(coordinates.longitude(), -76.2838327);
    }

    #[test]
    fn invalid_nominatim_coordinate() {
        let place = NominatimPlace {
            lat: "north".to_string(),
            lon: "0".to_string(),
            display_name: String::new(),
        };
        assert!(matches!(
            place.coordinates(),
            Err(FleetTrackerError::InvalidCoordinate(_))
        ));
    }

    #[tokio::test]
    async fn pacer_spaces_requests() {
        let pacer = RequestPacer::new(Duration::from_millis(50));
        let start = Instant::now();

        pacer.wait_turn().await;
        pacer.wait_turn().await;
        pacer.wait_turn().await;

        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[ignore]
    #[tokio::test]
    async fn test_nominatim_live() {
        let config = GeocoderConfig {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "fleet_tracker_app/1.0".to_string(),
            min_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
        };
        let geocoder = NominatimGeocoder::new(&config).unwrap();

        let found = geocoder.geocode("Black Sea").await.unwrap().unwrap();
        assert!(found.longitude() > 27.0 && found.longitude() < 42.0);
        assert!(found.latitude() > 40.0 && found.latitude() < 47.0);
    }
}
