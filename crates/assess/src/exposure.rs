//! Population exposure lattice around the impact point.

use impact_core::geo::{KM_PER_DEGREE, km_per_degree_lng};
use impact_geo::SettlementLookup;
use serde::Serialize;
use tracing::debug;

/// Default search radius for the nearest settlement (km).
pub const DEFAULT_SETTLEMENT_SEARCH_KM: f64 = 300.0;
/// Floor applied to settlement-derived densities (people/km²).
const MIN_SETTLEMENT_DENSITY: f64 = 10.0;

/// Radius (km) out to which the grid is evaluated: E^0.33 / 5000 clamped to [50, 500].
pub fn max_effect_radius_km(energy_j: f64) -> f64 {
    (energy_j.powf(0.33) / 5_000.0).clamp(50.0, 500.0)
}

/// Population density by climate band when no settlement is close.
pub fn latitude_band_density(lat: f64) -> f64 {
    let abs_lat = lat.abs();
    if abs_lat < 10.0 {
        50.0
    } else if abs_lat < 30.0 {
        100.0
    } else if abs_lat < 50.0 {
        150.0
    } else {
        5.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityOrigin {
    Settlement,
    LatitudeBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityEstimate {
    pub density: f64,
    pub origin: DensityOrigin,
    /// Name and distance of the settlement the density came from.
    pub settlement: Option<(String, f64)>,
}

/// Density per point: nearest settlement with linear distance decay, else latitude bands.
pub struct DensitySource<'a> {
    lookup: &'a dyn SettlementLookup,
    max_search_km: f64,
}

impl<'a> DensitySource<'a> {
    pub fn new(lookup: &'a dyn SettlementLookup) -> Self {
        Self {
            lookup,
            max_search_km: DEFAULT_SETTLEMENT_SEARCH_KM,
        }
    }

    pub fn with_search_radius(mut self, max_search_km: f64) -> Self {
        self.max_search_km = max_search_km;
        self
    }

    pub fn estimate(&self, lat: f64, lng: f64) -> DensityEstimate {
        self.settlement_density(lat, lng)
            .unwrap_or_else(|| Self::banded(lat))
    }

    /// Decayed density of the nearest settlement, if one is within range.
    pub fn settlement_density(&self, lat: f64, lng: f64) -> Option<DensityEstimate> {
        match self.lookup.nearest_settlement(lat, lng, self.max_search_km) {
            Ok(Some(hit)) => {
                let decay = (1.0 - hit.distance_km / self.max_search_km).max(0.1);
                Some(DensityEstimate {
                    density: (hit.density * decay).floor().max(MIN_SETTLEMENT_DENSITY),
                    origin: DensityOrigin::Settlement,
                    settlement: Some((hit.name, hit.distance_km)),
                })
            }
            Ok(None) => None,
            Err(err) => {
                debug!(%err, lat, lng, "settlement lookup failed");
                None
            }
        }
    }

    pub fn banded(lat: f64) -> DensityEstimate {
        DensityEstimate {
            density: latitude_band_density(lat),
            origin: DensityOrigin::LatitudeBand,
            settlement: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub lat: f64,
    pub lng: f64,
    pub distance_km: f64,
    pub density: f64,
    pub population: f64,
    pub origin: DensityOrigin,
}

impl GridCell {
    pub fn distance_m(&self) -> f64 {
        self.distance_km * 1_000.0
    }
}

/// Square lattice of cells within `radius_km` of the impact point.
#[derive(Debug, Clone, Serialize)]
pub struct ExposureGrid {
    pub radius_km: f64,
    pub resolution_km: f64,
    pub cells: Vec<GridCell>,
}

impl ExposureGrid {
    pub fn build(
        center_lat: f64,
        center_lng: f64,
        radius_km: f64,
        resolution_km: f64,
        density: &DensitySource<'_>,
    ) -> Self {
        let km_per_lat = KM_PER_DEGREE;
        let km_per_lng = km_per_degree_lng(center_lat);
        let half_width = (radius_km / resolution_km).floor() as i64 * 2;
        let cell_area = resolution_km * resolution_km;

        let mut cells = Vec::new();
        for i in -half_width..=half_width {
            for j in -half_width..=half_width {
                let lat = center_lat + i as f64 * resolution_km / km_per_lat;
                let lng = center_lng + j as f64 * resolution_km / km_per_lng;
                let dy = (lat - center_lat) * km_per_lat;
                let dx = (lng - center_lng) * km_per_lng;
                let distance_km = dx.hypot(dy);
                if distance_km > radius_km {
                    continue;
                }
                let estimate = density.estimate(lat, lng);
                cells.push(GridCell {
                    lat,
                    lng,
                    distance_km,
                    density: estimate.density,
                    population: estimate.density * cell_area,
                    origin: estimate.origin,
                });
            }
        }
        debug!(cells = cells.len(), radius_km, resolution_km, "exposure grid built");
        Self {
            radius_km,
            resolution_km,
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn total_population(&self) -> f64 {
        self.cells.iter().map(|cell| cell.population).sum()
    }

    pub fn count_from(&self, origin: DensityOrigin) -> usize {
        self.cells.iter().filter(|cell| cell.origin == origin).count()
    }
}
