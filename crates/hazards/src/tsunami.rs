//! Energy-tiered tsunami risk and a simple run-up estimate for water impacts.

use std::fmt;

use impact_core::units::joules_to_megatons;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum TsunamiTier {
    Low,
    Moderate,
    High,
    Extreme,
}

impl TsunamiTier {
    pub fn advisory(self) -> &'static str {
        match self {
            TsunamiTier::High | TsunamiTier::Extreme => {
                "CRITICAL: Coastal areas within range should evacuate immediately!"
            }
            TsunamiTier::Moderate => "WARNING: Coastal areas should be alert.",
            TsunamiTier::Low => "Tsunami risk is minimal.",
        }
    }
}

impl fmt::Display for TsunamiTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TsunamiTier::Low => "Low",
            TsunamiTier::Moderate => "Moderate",
            TsunamiTier::High => "High",
            TsunamiTier::Extreme => "Extreme",
        };
        f.write_str(label)
    }
}

/// Source wave estimate for a water impact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TsunamiRisk {
    pub tier: TsunamiTier,
    pub height_m: f64,
    pub range_km: f64,
}

impl TsunamiRisk {
    pub fn advisory(&self) -> &'static str {
        self.tier.advisory()
    }
}

/// Initial wave height (m): Mt^0.25 × 3, scaled down for craters under 2 km.
fn source_height_m(energy_j: f64, crater_diameter_km: f64) -> f64 {
    let megatons = joules_to_megatons(energy_j).max(0.0);
    let crater_factor = (crater_diameter_km / 2.0).clamp(0.0, 1.0);
    megatons.powf(0.25) * 3.0 * crater_factor
}

/// Tier, capped height and reach of the tsunami from a water impact.
pub fn tsunami_risk(energy_j: f64, crater_diameter_km: f64) -> TsunamiRisk {
    let megatons = joules_to_megatons(energy_j);
    let h0 = source_height_m(energy_j, crater_diameter_km);
    let (tier, multiplier, cap_m, range_km) = if megatons > 1_000.0 {
        (TsunamiTier::Extreme, 10.0, 300.0, 10_000.0)
    } else if megatons > 100.0 {
        (TsunamiTier::Extreme, 5.0, 100.0, 5_000.0)
    } else if megatons > 10.0 {
        (TsunamiTier::High, 3.0, 50.0, 3_000.0)
    } else if megatons > 1.0 {
        (TsunamiTier::Moderate, 2.0, 25.0, 1_500.0)
    } else {
        (TsunamiTier::Low, 1.5, 10.0, 500.0)
    };
    TsunamiRisk {
        tier,
        height_m: (h0 * multiplier).min(cap_m),
        range_km,
    }
}

/// Run-up height (m) at `distance_km` from the impact, accounting for the
/// water depth at the impact point. Zero for non-positive distance.
pub fn tsunami_wave_height_m(
    distance_km: f64,
    energy_j: f64,
    water_depth_m: f64,
    crater_diameter_km: f64,
) -> f64 {
    if distance_km <= 0.0 {
        return 0.0;
    }
    let depth_factor = if water_depth_m < 50.0 {
        0.3
    } else if water_depth_m < 200.0 {
        0.6
    } else if water_depth_m < 1_000.0 {
        0.9
    } else {
        1.0
    };
    let h0 = source_height_m(energy_j, crater_diameter_km) * depth_factor;
    let runup = 3.0;
    h0 / distance_km.max(1.0).sqrt() * runup
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MEGATON: f64 = 4.184e15;

    #[test]
    fn tiers_follow_energy() {
        assert_eq!(tsunami_risk(0.5 * MEGATON, 1.0).tier, TsunamiTier::Low);
        assert_eq!(tsunami_risk(5.0 * MEGATON, 1.0).tier, TsunamiTier::Moderate);
        assert_eq!(tsunami_risk(50.0 * MEGATON, 1.0).tier, TsunamiTier::High);
        let big = tsunami_risk(500.0 * MEGATON, 4.0);
        assert_eq!(big.tier, TsunamiTier::Extreme);
        assert_eq!(big.range_km, 5_000.0);
        assert_eq!(tsunami_risk(5_000.0 * MEGATON, 4.0).range_km, 10_000.0);
    }

    #[test]
    fn height_is_capped_per_tier() {
        let risk = tsunami_risk(1.0e8 * MEGATON, 100.0);
        assert_eq!(risk.height_m, 300.0);
        let low = tsunami_risk(0.5 * MEGATON, 2.0);
        assert_relative_eq!(low.height_m, 0.5f64.powf(0.25) * 3.0 * 1.5);
    }

    #[test]
    fn small_craters_make_small_waves() {
        let full = tsunami_risk(50.0 * MEGATON, 2.0);
        let half = tsunami_risk(50.0 * MEGATON, 1.0);
        assert_relative_eq!(half.height_m * 2.0, full.height_m);
    }

    #[test]
    fn advisory_text() {
        assert!(TsunamiTier::Extreme.advisory().starts_with("CRITICAL"));
        assert!(TsunamiTier::Moderate.advisory().starts_with("WARNING"));
    }

    #[test]
    fn run_up_decays_with_distance() {
        assert_eq!(tsunami_wave_height_m(0.0, MEGATON, 4_000.0, 2.0), 0.0);
        let near = tsunami_wave_height_m(0.5, MEGATON, 4_000.0, 2.0);
        assert_relative_eq!(near, 9.0);
        let far = tsunami_wave_height_m(100.0, MEGATON, 4_000.0, 2.0);
        assert_relative_eq!(far, 0.9);
        let shallow = tsunami_wave_height_m(100.0, MEGATON, 20.0, 2.0);
        assert_relative_eq!(shallow, 0.27, max_relative = 1e-12);
    }
}
