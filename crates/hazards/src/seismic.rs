use serde::Serialize;

use crate::HazardError;

/// Richter magnitude of the impact-generated quake, floored at zero.
pub fn seismic_magnitude(energy_j: f64) -> f64 {
    if energy_j <= 0.0 {
        return 0.0;
    }
    ((energy_j.log10() - 4.8) / 1.5).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeismicLevel {
    Low,
    Moderate,
    High,
    Catastrophic,
}

impl SeismicLevel {
    fn from_magnitude(magnitude: f64) -> Self {
        if magnitude < 4.0 {
            SeismicLevel::Low
        } else if magnitude < 6.0 {
            SeismicLevel::Moderate
        } else if magnitude < 7.5 {
            SeismicLevel::High
        } else {
            SeismicLevel::Catastrophic
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SeismicLevel::Low => "Light shaking, local effects",
            SeismicLevel::Moderate => "Moderate earthquake, regional damage",
            SeismicLevel::High => "Strong earthquake, widespread damage",
            SeismicLevel::Catastrophic => "Devastating earthquake, continental effects",
        }
    }
}

/// Summary of the shaking an impact of the given energy would cause.
#[derive(Debug, Clone, Serialize)]
pub struct SeismicEffect {
    pub magnitude_richter: f64,
    pub magnitude_moment: f64,
    pub level: SeismicLevel,
    pub felt_distance_km: f64,
}

pub fn seismic_effect(energy_j: f64) -> Result<SeismicEffect, HazardError> {
    if energy_j.is_nan() || energy_j <= 0.0 {
        return Err(HazardError::NonPositiveEnergy(energy_j));
    }
    let log_e = energy_j.log10();
    let richter = (log_e - 4.8) / 1.5;
    Ok(SeismicEffect {
        magnitude_richter: richter,
        magnitude_moment: (2.0 / 3.0) * log_e - 6.0,
        level: SeismicLevel::from_magnitude(richter),
        felt_distance_km: 10f64.powf(0.5 * richter),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn magnitude_floors_at_zero() {
        assert_eq!(seismic_magnitude(0.0), 0.0);
        assert_eq!(seismic_magnitude(10.0), 0.0);
        assert_relative_eq!(seismic_magnitude(1.0e15), (15.0 - 4.8) / 1.5);
    }

    #[test]
    fn effect_levels() {
        let effect = seismic_effect(1.0e18).expect("positive energy");
        assert_relative_eq!(effect.magnitude_richter, 8.8, epsilon = 1e-9);
        assert_relative_eq!(effect.magnitude_moment, 6.0, epsilon = 1e-9);
        assert_eq!(effect.level, SeismicLevel::Catastrophic);
        assert_relative_eq!(effect.felt_distance_km, 10f64.powf(4.4), max_relative = 1e-9);

        assert_eq!(seismic_effect(1.0e10).unwrap().level, SeismicLevel::Low);
    }

    #[test]
    fn effect_rejects_non_positive_energy() {
        assert!(matches!(seismic_effect(0.0), Err(HazardError::NonPositiveEnergy(_))));
        assert!(seismic_effect(f64::NAN).is_err());
    }
}
