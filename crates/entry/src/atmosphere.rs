//! Piecewise exponential atmosphere used by the entry integrator.

use impact_core::constants::SEA_LEVEL_AIR_DENSITY;

const DENSITY_FLOOR_KG_M3: f64 = 1.0e-10;

fn scale_height_m(altitude_m: f64) -> f64 {
    if altitude_m < 11_000.0 {
        8_500.0
    } else if altitude_m < 25_000.0 {
        6_000.0
    } else if altitude_m < 50_000.0 {
        7_500.0
    } else {
        9_000.0
    }
}

/// Air density (kg/m³) at the given altitude, never below 1e-10.
pub fn density(altitude_m: f64) -> f64 {
    let rho = SEA_LEVEL_AIR_DENSITY * f64::exp(-altitude_m / scale_height_m(altitude_m));
    rho.max(DENSITY_FLOOR_KG_M3)
}

/// Temperature (K) from the standard lapse rate, isothermal layer and mild warming above 25 km.
pub fn temperature(altitude_m: f64) -> f64 {
    if altitude_m < 11_000.0 {
        288.15 - 0.0065 * altitude_m
    } else if altitude_m < 25_000.0 {
        216.65
    } else {
        216.65 + 0.003 * (altitude_m - 25_000.0)
    }
}

/// Speed of sound (m/s) for an ideal diatomic gas.
pub fn speed_of_sound(altitude_m: f64) -> f64 {
    (1.4 * 287.0 * temperature(altitude_m)).sqrt()
}

/// Dynamic pressure ½ρv² (Pa).
pub fn dynamic_pressure(altitude_m: f64, speed_m_s: f64) -> f64 {
    0.5 * density(altitude_m) * speed_m_s * speed_m_s
}
