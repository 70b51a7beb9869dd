//! Step-function casualty rates per hazard, split by shelter.
//!
//! Every function returns the expected casualties in one cell and never more
//! than the cell population.

use impact_core::constants::G0;

/// Bulk density of the ejecta blanket (kg/m³).
const EJECTA_DENSITY_KG_M3: f64 = 1_600.0;
const WOOD_COLLAPSE_PA: f64 = 2_000.0;
const CONCRETE_COLLAPSE_PA: f64 = 10_000.0;

/// How a cell population divides between indoors and outdoors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shelter {
    pub unsheltered_fraction: f64,
}

impl Shelter {
    pub fn new(unsheltered_fraction: f64) -> Self {
        Self {
            unsheltered_fraction,
        }
    }

    fn split(self, population: f64) -> (f64, f64) {
        let unsheltered = population * self.unsheltered_fraction;
        (unsheltered, population - unsheltered)
    }
}

impl Default for Shelter {
    fn default() -> Self {
        Self::new(0.13)
    }
}

/// Pick the rate pair of the first band whose upper bound exceeds `value`.
fn banded(value: f64, bands: &[(f64, f64, f64)], beyond: (f64, f64)) -> (f64, f64) {
    bands
        .iter()
        .find(|(limit, _, _)| value < *limit)
        .map(|&(_, unsheltered, sheltered)| (unsheltered, sheltered))
        .unwrap_or(beyond)
}

fn apply(population: f64, shelter: Shelter, rates: (f64, f64)) -> f64 {
    let (unsheltered, sheltered) = shelter.split(population);
    (unsheltered * rates.0 + sheltered * rates.1).min(population)
}

/// Blast overpressure: glass breakage at 3 kPa up to collapse of concrete frames at 140 kPa.
pub fn overpressure_casualties(overpressure_pa: f64, population: f64, shelter: Shelter) -> f64 {
    const BANDS: [(f64, f64, f64); 5] = [
        (3.0, 0.0, 0.0),
        (20.0, 0.01, 0.001),
        (35.0, 0.05, 0.01),
        (70.0, 0.20, 0.05),
        (140.0, 0.50, 0.20),
    ];
    let rates = banded(overpressure_pa / 1_000.0, &BANDS, (0.95, 0.70));
    apply(population, shelter, rates)
}

/// Wind blast on the Enhanced Fujita scale (EF0 from 29 m/s to EF5 beyond 89 m/s).
pub fn wind_casualties(wind_speed_m_s: f64, population: f64, shelter: Shelter) -> f64 {
    const BANDS: [(f64, f64, f64); 6] = [
        (29.0, 0.001, 0.0),
        (38.0, 0.01, 0.001),
        (49.0, 0.05, 0.01),
        (60.0, 0.15, 0.05),
        (74.0, 0.35, 0.15),
        (89.0, 0.60, 0.35),
    ];
    let rates = banded(wind_speed_m_s, &BANDS, (0.85, 0.60));
    apply(population, shelter, rates)
}

/// Burns among people outdoors; buildings shield the rest.
pub fn thermal_casualties(thermal_flux_j_m2: f64, population: f64, shelter: Shelter) -> f64 {
    const BANDS: [(f64, f64, f64); 3] = [(200.0, 0.0, 0.0), (400.0, 0.01, 0.0), (800.0, 0.05, 0.0)];
    let rates = banded(thermal_flux_j_m2 / 1_000.0, &BANDS, (0.30, 0.0));
    apply(population, shelter, rates)
}

/// Ground shaking affects everyone alike.
pub fn seismic_casualties(magnitude: f64, population: f64) -> f64 {
    let rate = if magnitude < 5.0 {
        0.0
    } else if magnitude < 6.0 {
        0.001
    } else if magnitude < 7.0 {
        0.01
    } else if magnitude < 8.0 {
        0.05
    } else {
        0.15
    };
    population * rate
}

/// Roof collapse under the ejecta load; only people indoors are at risk.
pub fn ejecta_casualties(thickness_m: f64, population: f64, shelter: Shelter) -> f64 {
    if thickness_m <= 0.0 {
        return 0.0;
    }
    let load_pa = thickness_m * EJECTA_DENSITY_KG_M3 * G0;
    let (_, sheltered) = shelter.split(population);
    let rate = if load_pa > CONCRETE_COLLAPSE_PA {
        0.10
    } else if load_pa > WOOD_COLLAPSE_PA {
        0.05
    } else {
        0.0
    };
    sheltered * rate
}

/// Everyone inside the crater rim.
pub fn crater_casualties(crater_radius_m: f64, distance_m: f64, population: f64) -> f64 {
    if distance_m < crater_radius_m {
        population
    } else {
        0.0
    }
}
