//! Coastal population reached by an ocean-impact tsunami.

use std::f64::consts::PI;

use serde::Serialize;

/// Share of a coastal strip that is actually built up.
const SETTLED_FRACTION: f64 = 0.3;
const MAX_COAST_LENGTH_KM: f64 = 2_000.0;
const MAX_ENCLOSED_COAST_RANGE_KM: f64 = 500.0;
const MAX_INLAND_PENETRATION_KM: f64 = 3.0;
/// e-folding distance of wave height between impact point and shore (km).
const ATTENUATION_LENGTH_KM: f64 = 2_000.0;

/// Coastal settlement figures for one basin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BasinProfile {
    /// People per km² along the coast.
    pub coastal_density: f64,
    /// Fraction of the coastline that is inhabited.
    pub coverage: f64,
    /// Typical distance from an impact to the nearest shore (km).
    pub shore_distance_km: f64,
    /// Small seas where the wave reaches shore almost everywhere at once.
    pub enclosed: bool,
}

impl BasinProfile {
    const fn open(coastal_density: f64, coverage: f64, shore_distance_km: f64) -> Self {
        Self {
            coastal_density,
            coverage,
            shore_distance_km,
            enclosed: false,
        }
    }

    const fn enclosed(coastal_density: f64, coverage: f64, shore_distance_km: f64) -> Self {
        Self {
            coastal_density,
            coverage,
            shore_distance_km,
            enclosed: true,
        }
    }

    /// Match a basin by name fragment; unknown basins get a generic sea profile.
    pub fn for_basin(name: &str) -> Self {
        let has = |needle: &str| name.contains(needle);
        if has("Mediterranean") {
            Self::enclosed(250.0, 0.4, 200.0)
        } else if has("Pacific") {
            Self::open(150.0, 0.15, 2_000.0)
        } else if has("Atlantic") {
            Self::open(120.0, 0.25, 1_500.0)
        } else if has("Indian") {
            Self::open(180.0, 0.3, 1_200.0)
        } else if has("Southern") || has("Antarctic") {
            Self::open(2.0, 0.005, 3_000.0)
        } else if has("Arctic") {
            Self::open(5.0, 0.05, 1_000.0)
        } else if has("Black") {
            Self::enclosed(200.0, 0.45, 250.0)
        } else if has("Red") {
            Self::enclosed(80.0, 0.3, 150.0)
        } else if has("Persian") || has("Gulf") {
            // "Gulf of Mexico" lands here too, and is treated as enclosed.
            Self::enclosed(220.0, 0.5, 100.0)
        } else {
            Self::open(100.0, 0.2, 800.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoastalImpact {
    pub basin: String,
    pub profile: BasinProfile,
    /// Wave height after travelling to the typical shore distance (m).
    pub coastal_height_m: f64,
    pub reaches_coast: bool,
    pub flooded_area_km2: f64,
    pub affected: u64,
    pub casualty_rate: f64,
    pub casualties: u64,
}

/// Fatality rate among the affected for a given coastal wave height.
pub fn coastal_casualty_rate(height_m: f64) -> f64 {
    if height_m > 30.0 {
        0.35
    } else if height_m > 15.0 {
        0.20
    } else if height_m > 5.0 {
        0.10
    } else {
        0.03
    }
}

/// Propagate an initial wave of `height_m` and `range_km` to the basin's coasts.
pub fn coastal_impact(basin: &str, height_m: f64, range_km: f64) -> CoastalImpact {
    let profile = BasinProfile::for_basin(basin);
    let attenuation = (-profile.shore_distance_km / ATTENUATION_LENGTH_KM).exp().max(0.1);
    let coastal_height_m = height_m * attenuation;
    let casualty_rate = coastal_casualty_rate(coastal_height_m);

    let mut impact = CoastalImpact {
        basin: basin.to_string(),
        profile,
        coastal_height_m,
        reaches_coast: false,
        flooded_area_km2: 0.0,
        affected: 0,
        casualty_rate,
        casualties: 0,
    };
    if profile.shore_distance_km > range_km {
        return impact;
    }

    let coastal_range_km = if profile.enclosed {
        (range_km * 0.3).min(MAX_ENCLOSED_COAST_RANGE_KM)
    } else {
        (range_km - profile.shore_distance_km).max(0.0) * profile.coverage
    };
    let coast_length_km = (PI * coastal_range_km).min(MAX_COAST_LENGTH_KM);
    let penetration_km = (coastal_height_m / 8.0).min(MAX_INLAND_PENETRATION_KM);
    let area = coast_length_km * penetration_km;
    let affected = (area * profile.coastal_density * SETTLED_FRACTION).floor() as u64;

    impact.reaches_coast = true;
    impact.flooded_area_km2 = area;
    impact.affected = affected;
    impact.casualties = (affected as f64 * casualty_rate).floor() as u64;
    impact
}
