//! Size-bucketed atmospheric loss estimate used when a full integration is not needed.

use impact_core::sphere;
use serde::Serialize;

/// Qualitative outcome of the atmospheric passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AblationType {
    CompleteBurn,
    Airburst,
    PartialFragmentation,
    MinorAblation,
}

impl AblationType {
    fn for_diameter(diameter_m: f64) -> (Self, f64) {
        if diameter_m < 25.0 {
            (AblationType::CompleteBurn, 0.0)
        } else if diameter_m < 50.0 {
            (AblationType::Airburst, 0.2)
        } else if diameter_m < 140.0 {
            (AblationType::PartialFragmentation, 0.6)
        } else {
            (AblationType::MinorAblation, 0.85)
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AblationType::CompleteBurn => "Complete atmospheric burn",
            AblationType::Airburst => "Airburst (explosion in atmosphere)",
            AblationType::PartialFragmentation => "Partial fragmentation",
            AblationType::MinorAblation => "Surface impact with minor ablation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryWarning {
    MostlyVaporized,
    PartialFragmentation,
    SubstantialImpact,
}

impl EntryWarning {
    pub fn message(self) -> &'static str {
        match self {
            EntryWarning::MostlyVaporized => "Most mass vaporized in atmosphere",
            EntryWarning::PartialFragmentation => "Partial fragmentation expected",
            EntryWarning::SubstantialImpact => "Substantial ground impact expected",
        }
    }
}

/// Coarse mass, velocity and energy budget after the atmosphere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtmosphericEstimate {
    pub initial_diameter_m: f64,
    pub final_diameter_m: f64,
    pub initial_mass_kg: f64,
    pub final_mass_kg: f64,
    pub mass_lost_kg: f64,
    pub mass_retention: f64,
    pub initial_velocity_m_s: f64,
    pub final_velocity_m_s: f64,
    pub energy_lost_j: f64,
    pub airburst_altitude_km: f64,
    pub ablation: AblationType,
    pub reaches_ground: bool,
    pub warning: EntryWarning,
}

pub fn estimate_entry(
    diameter_m: f64,
    velocity_m_s: f64,
    density_kg_m3: f64,
    angle_deg: f64,
) -> AtmosphericEstimate {
    let initial_mass = sphere::mass(diameter_m, density_kg_m3);
    let (ablation, size_factor) = AblationType::for_diameter(diameter_m);

    let velocity_factor = (velocity_m_s / 25_000.0).min(1.0);
    let angle_factor = angle_deg.to_radians().sin();
    let retention = (size_factor * (1.0 - 0.1 * velocity_factor * angle_factor)).clamp(0.0, 1.0);

    let final_mass = initial_mass * retention;
    let mass_lost = initial_mass - final_mass;
    let airburst_altitude_km = if diameter_m < 50.0 {
        50.0 - diameter_m * 0.6
    } else {
        0.0
    };

    let warning = if retention < 0.3 {
        EntryWarning::MostlyVaporized
    } else if retention < 0.7 {
        EntryWarning::PartialFragmentation
    } else {
        EntryWarning::SubstantialImpact
    };

    AtmosphericEstimate {
        initial_diameter_m: diameter_m,
        final_diameter_m: diameter_m * retention.cbrt(),
        initial_mass_kg: initial_mass,
        final_mass_kg: final_mass,
        mass_lost_kg: mass_lost,
        mass_retention: retention,
        initial_velocity_m_s: velocity_m_s,
        final_velocity_m_s: velocity_m_s * (0.5 + 0.5 * retention),
        energy_lost_j: 0.5 * mass_lost * velocity_m_s * velocity_m_s,
        airburst_altitude_km,
        ablation,
        reaches_ground: retention > 0.01,
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn small_bodies_burn_completely() {
        let est = estimate_entry(20.0, 17_000.0, 3_000.0, 45.0);
        assert_eq!(est.ablation, AblationType::CompleteBurn);
        assert_eq!(est.final_mass_kg, 0.0);
        assert!(!est.reaches_ground);
        assert_eq!(est.warning, EntryWarning::MostlyVaporized);
        assert_relative_eq!(est.airburst_altitude_km, 38.0);
    }

    #[test]
    fn large_bodies_keep_most_of_their_mass() {
        let est = estimate_entry(1_000.0, 20_000.0, 3_000.0, 90.0);
        assert_eq!(est.ablation, AblationType::MinorAblation);
        assert_relative_eq!(est.mass_retention, 0.85 * (1.0 - 0.08), epsilon = 1e-12);
        assert_eq!(est.warning, EntryWarning::SubstantialImpact);
        assert!(est.final_diameter_m < est.initial_diameter_m);
        assert!(est.final_velocity_m_s < est.initial_velocity_m_s);
        assert_eq!(est.airburst_altitude_km, 0.0);
    }

    #[test]
    fn mid_sized_bodies_fragment() {
        let est = estimate_entry(100.0, 20_000.0, 3_000.0, 45.0);
        assert_eq!(est.ablation, AblationType::PartialFragmentation);
        assert_eq!(est.warning, EntryWarning::PartialFragmentation);
        assert!(est.reaches_ground);
    }
}
