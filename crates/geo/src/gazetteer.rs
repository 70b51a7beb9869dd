//! Blocking GeoNames client for ocean detection and nearby population.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{LookupError, NearestSettlement, SettlementLookup, SurfaceClassifier, SurfaceKind};

pub const DEFAULT_BASE_URL: &str = "http://api.geonames.org";
/// Places aggregated into the density estimate.
const PLACES_AGGREGATED: usize = 5;
const MIN_PLACE_AREA_KM2: f64 = 10.0;

/// Single-attempt GeoNames web service client.
#[derive(Debug, Clone)]
pub struct GeoNamesClient {
    client: Client,
    base_url: String,
    username: String,
}

impl GeoNamesClient {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
        })
    }

    fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        query: &str,
    ) -> Result<T, LookupError> {
        let url = format!(
            "{}/{endpoint}?{query}&username={}",
            self.base_url, self.username
        );
        debug!(%url, "gazetteer request");
        let response = self.client.get(&url).send()?.error_for_status()?;
        Ok(response.json()?)
    }
}

#[derive(Debug, Deserialize)]
struct ServiceStatus {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OceanResponse {
    ocean: Option<OceanName>,
    status: Option<ServiceStatus>,
}

#[derive(Debug, Deserialize)]
struct OceanName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    geonames: Vec<Place>,
    status: Option<ServiceStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Place {
    #[serde(default)]
    name: String,
    #[serde(default)]
    population: u64,
    /// GeoNames reports distances as strings.
    #[serde(default)]
    distance: Option<String>,
}

/// Density of the first five populated places, each given an area of
/// max(10, population / 1000) km².
pub(crate) fn aggregate_places(places: &[Place]) -> Option<NearestSettlement> {
    let (population, area) = places
        .iter()
        .take(PLACES_AGGREGATED)
        .filter(|place| place.population > 0)
        .fold((0u64, 0.0f64), |(pop, area), place| {
            let place_area = (place.population as f64 / 1_000.0).max(MIN_PLACE_AREA_KM2);
            (pop + place.population, area + place_area)
        });
    if population == 0 || area <= 0.0 {
        return None;
    }
    let first = places.first()?;
    let distance_km = first
        .distance
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);
    Some(NearestSettlement {
        name: first.name.clone(),
        distance_km,
        density: (population as f64 / area).round(),
        population,
    })
}

impl SurfaceClassifier for GeoNamesClient {
    fn classify_surface(&self, lat: f64, lng: f64) -> Result<SurfaceKind, LookupError> {
        let response: OceanResponse = self.get("oceanJSON", &format!("lat={lat}&lng={lng}"))?;
        match (response.ocean, response.status) {
            (Some(ocean), _) => Ok(SurfaceKind::Ocean { basin: ocean.name }),
            // Code 15 ("no ocean found") is how GeoNames reports land.
            (None, Some(status)) if !status.message.to_ascii_lowercase().contains("ocean") => {
                Err(LookupError::Service(status.message))
            }
            (None, _) => Ok(SurfaceKind::Land),
        }
    }
}

impl SettlementLookup for GeoNamesClient {
    fn nearest_settlement(
        &self,
        lat: f64,
        lng: f64,
        max_km: f64,
    ) -> Result<Option<NearestSettlement>, LookupError> {
        let response: NearbyResponse = self.get(
            "findNearbyPlaceNameJSON",
            &format!("lat={lat}&lng={lng}&radius={max_km}&maxRows=10"),
        )?;
        if let Some(status) = response.status {
            return Err(LookupError::Service(status.message));
        }
        Ok(aggregate_places(&response.geonames))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_the_first_five_places() {
        let body = r#"{"geonames":[
            {"name":"Alpha","population":50000,"distance":"3.5"},
            {"name":"Beta","population":0,"distance":"7.0"},
            {"name":"Gamma","population":5000,"distance":"9.1"},
            {"name":"Delta","population":20000,"distance":"12.0"},
            {"name":"Epsilon","population":1000,"distance":"20.0"},
            {"name":"Zeta","population":9000000,"distance":"40.0"}
        ]}"#;
        let response: NearbyResponse = serde_json::from_str(body).expect("parse");
        let hit = aggregate_places(&response.geonames).expect("populated places");
        assert_eq!(hit.name, "Alpha");
        assert_eq!(hit.distance_km, 3.5);
        assert_eq!(hit.population, 76_000);
        // 50 + 10 + 20 + 10 km²
        assert_eq!(hit.density, (76_000.0f64 / 90.0).round());
    }

    #[test]
    fn empty_places_give_nothing() {
        assert!(aggregate_places(&[]).is_none());
    }

    #[test]
    fn unreachable_service_is_an_error() {
        let client = GeoNamesClient::new("http://127.0.0.1:9", "demo", Duration::from_millis(500))
            .expect("client");
        assert!(client.classify_surface(0.0, 0.0).is_err());
        assert!(client.nearest_settlement(0.0, 0.0, 50.0).is_err());
    }
}
