//! Point-source hazard fields around an impact or airburst.
//!
//! Every function is a pure function of distance and energy. Distances are in
//! metres unless the name says otherwise, energies in joules and burst
//! altitudes in kilometres (0 for a surface burst).

pub mod seismic;
pub mod tsunami;

use std::f64::consts::PI;

use impact_core::constants::{JOULES_PER_KG_TNT, SEA_LEVEL_AIR_DENSITY};
use thiserror::Error;

pub use seismic::{SeismicEffect, SeismicLevel, seismic_effect, seismic_magnitude};
pub use tsunami::{TsunamiRisk, TsunamiTier, tsunami_risk, tsunami_wave_height_m};

/// Pressure reported at (or inside) the burst point.
pub const CONTACT_OVERPRESSURE_PA: f64 = 1.0e9;
/// Near-field overpressure cap.
pub const NEAR_FIELD_OVERPRESSURE_PA: f64 = 1.0e7;
/// Wind speed cap.
pub const MAX_WIND_SPEED_M_S: f64 = 1_000.0;
/// Thermal fluence reported at the burst point.
pub const CONTACT_THERMAL_FLUX_J_M2: f64 = 1.0e10;

const THERMAL_FRACTION: f64 = 0.35;
const THERMAL_ATTENUATION_LENGTH_M: f64 = 50_000.0;

#[derive(Debug, Error)]
pub enum HazardError {
    #[error("impact energy must be positive (got {0} J)")]
    NonPositiveEnergy(f64),
}

/// Characteristic blast radius (m), widened for elevated bursts.
fn blast_scale_radius_m(energy_j: f64, altitude_km: f64) -> f64 {
    let tnt_kg = energy_j / JOULES_PER_KG_TNT;
    let mut r0 = tnt_kg.cbrt() * 10.0;
    if altitude_km > 0.0 {
        r0 *= 1.0 + altitude_km / 10.0;
    }
    r0
}

/// Peak overpressure (Pa) at `distance_m` from the burst.
///
/// Inside the scale radius the pressure follows `1e6 / s^1.5`, capped at
/// 10 MPa; beyond it `2e5 / s²`. The result never increases with distance.
pub fn overpressure_pa(distance_m: f64, energy_j: f64, altitude_km: f64) -> f64 {
    if distance_m <= 0.0 {
        return CONTACT_OVERPRESSURE_PA;
    }
    let scaled = distance_m / blast_scale_radius_m(energy_j, altitude_km);
    let pressure = if scaled < 1.0 {
        (1.0e6 / scaled.powf(1.5)).min(NEAR_FIELD_OVERPRESSURE_PA)
    } else {
        2.0e5 / (scaled * scaled)
    };
    pressure.max(0.0)
}

/// Peak blast wind (m/s) from the overpressure, capped at 1000 m/s.
pub fn wind_speed_m_s(distance_m: f64, energy_j: f64, altitude_km: f64) -> f64 {
    if distance_m <= 0.0 {
        return MAX_WIND_SPEED_M_S;
    }
    let overpressure = overpressure_pa(distance_m, energy_j, altitude_km);
    (2.0 * overpressure / SEA_LEVEL_AIR_DENSITY)
        .sqrt()
        .min(MAX_WIND_SPEED_M_S)
}

/// Thermal fluence (J/m²): 35 % of the energy spread over a sphere and
/// attenuated with a 50 km e-folding length.
pub fn thermal_flux_j_m2(distance_m: f64, energy_j: f64, altitude_km: f64) -> f64 {
    if distance_m <= 0.0 {
        return CONTACT_THERMAL_FLUX_J_M2;
    }
    let mut area = 4.0 * PI * distance_m * distance_m;
    if altitude_km > 0.0 {
        area *= 1.0 + altitude_km / 20.0;
    }
    let attenuation = (-distance_m / THERMAL_ATTENUATION_LENGTH_M).exp();
    (energy_j * THERMAL_FRACTION / area * attenuation).max(0.0)
}

/// Ejecta blanket thickness (m). Twice the rim thickness inside the crater,
/// inverse-cube falloff outside; zero for non-positive inputs.
pub fn ejecta_thickness_m(distance_m: f64, crater_diameter_m: f64) -> f64 {
    if distance_m <= 0.0 || crater_diameter_m <= 0.0 {
        return 0.0;
    }
    let crater_radius = crater_diameter_m / 2.0;
    let rim = crater_radius * 0.1;
    if distance_m < crater_radius {
        rim * 2.0
    } else {
        rim / (distance_m / crater_radius).powi(3)
    }
}
