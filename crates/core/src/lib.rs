//! Core units, constants, and shared primitives for the impact risk workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Gravitational acceleration used by the entry and ejecta models (m/s²).
    pub const G0: f64 = 9.81;
    /// Joules released per kiloton of TNT.
    pub const JOULES_PER_KILOTON: f64 = 4.184e12;
    /// Joules released per megaton of TNT.
    pub const JOULES_PER_MEGATON: f64 = 4.184e15;
    /// Joules released per ton of TNT.
    pub const JOULES_PER_TON: f64 = 4.184e9;
    /// Joules released per kilogram of TNT.
    pub const JOULES_PER_KG_TNT: f64 = 4.184e6;
    /// Sea-level air density (kg/m³).
    pub const SEA_LEVEL_AIR_DENSITY: f64 = 1.225;
    /// Current world population used by the global-event report.
    pub const WORLD_POPULATION: f64 = 8_000_000_000.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{JOULES_PER_KILOTON, JOULES_PER_MEGATON, JOULES_PER_TON};

    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres to kilometres.
    #[inline]
    pub fn m_to_km(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert joules to kilotons of TNT.
    #[inline]
    pub fn joules_to_kilotons(j: f64) -> f64 {
        j / JOULES_PER_KILOTON
    }

    /// Convert joules to megatons of TNT.
    #[inline]
    pub fn joules_to_megatons(j: f64) -> f64 {
        j / JOULES_PER_MEGATON
    }

    /// Convert joules to tons of TNT.
    #[inline]
    pub fn joules_to_tons(j: f64) -> f64 {
        j / JOULES_PER_TON
    }
}

/// Sphere helpers shared by the entry model and the energy estimates.
pub mod sphere {
    use std::f64::consts::PI;

    /// Mass of a homogeneous sphere.
    #[inline]
    pub fn mass(diameter_m: f64, density_kg_m3: f64) -> f64 {
        let radius = diameter_m / 2.0;
        (4.0 / 3.0) * PI * radius.powi(3) * density_kg_m3
    }

    /// Radius of a homogeneous sphere holding `mass_kg`.
    #[inline]
    pub fn radius_from_mass(mass_kg: f64, density_kg_m3: f64) -> f64 {
        ((3.0 * mass_kg) / (4.0 * PI * density_kg_m3)).cbrt()
    }
}

/// Flat-earth local geodesy used by the exposure grid and settlement search.
pub mod geo {
    /// Kilometres per degree of latitude (and of longitude at the equator).
    pub const KM_PER_DEGREE: f64 = 111.0;

    /// Kilometres per degree of longitude at the given latitude.
    #[inline]
    pub fn km_per_degree_lng(lat_deg: f64) -> f64 {
        KM_PER_DEGREE * lat_deg.to_radians().cos()
    }

    /// Approximate surface distance between two points, scaled at `ref_lat_deg`.
    pub fn local_distance_km(
        ref_lat_deg: f64,
        lat_a: f64,
        lng_a: f64,
        lat_b: f64,
        lng_b: f64,
    ) -> f64 {
        let dy = (lat_a - lat_b) * KM_PER_DEGREE;
        let dx = (lng_a - lng_b) * km_per_degree_lng(ref_lat_deg);
        (dx * dx + dy * dy).sqrt()
    }

    /// Wrap a longitude into [-180, 180].
    pub fn normalize_lng(mut lng: f64) -> f64 {
        while lng > 180.0 {
            lng -= 360.0;
        }
        while lng < -180.0 {
            lng += 360.0;
        }
        lng
    }
}
