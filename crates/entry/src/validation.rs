//! Comparison of the integrator against the 2013 Chelyabinsk superbolide.

use serde::Serialize;

use crate::{
    EntryError, EntryOutcome, EntryRequest, FragmentationModel, MaterialClass, simulate_entry,
};

const ALTITUDE_TOLERANCE_PERCENT: f64 = 15.0;
const ENERGY_TOLERANCE_PERCENT: f64 = 20.0;

/// Observed or simulated headline figures of an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservedEvent {
    pub airburst_altitude_km: f64,
    pub energy_kt: f64,
    pub initial_mass_t: f64,
    pub entry_velocity_km_s: f64,
}

impl ObservedEvent {
    /// Published estimates (Brown et al. 2013, Popova et al. 2013).
    pub fn chelyabinsk() -> Self {
        Self {
            airburst_altitude_km: 27.5,
            energy_kt: 450.0,
            initial_mass_t: 11_000.0,
            entry_velocity_km_s: 19.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChelyabinskValidation {
    pub observed: ObservedEvent,
    pub simulated: ObservedEvent,
    pub altitude_error_percent: f64,
    pub energy_error_percent: f64,
    pub altitude_match: bool,
    pub energy_match: bool,
    #[serde(skip)]
    pub outcome: EntryOutcome,
}

impl ChelyabinskValidation {
    pub fn overall_valid(&self) -> bool {
        self.altitude_match && self.energy_match
    }
}

/// Chelyabinsk entry parameters: 19 m LL chondrite at 19 km/s and 18°.
pub fn chelyabinsk_request() -> EntryRequest {
    EntryRequest::new(19.0, 19_000.0, 18.0, MaterialClass::Stony)
        .with_fragmentation(FragmentationModel::Pancake)
}

pub fn validate_chelyabinsk() -> Result<ChelyabinskValidation, EntryError> {
    let request = chelyabinsk_request();
    let outcome = simulate_entry(&request)?;
    let observed = ObservedEvent::chelyabinsk();
    let simulated = ObservedEvent {
        airburst_altitude_km: outcome.airburst_altitude_km,
        energy_kt: outcome.tnt_equivalent_kt,
        initial_mass_t: outcome.initial_mass_kg / 1_000.0,
        entry_velocity_km_s: request.velocity_m_s / 1_000.0,
    };

    let altitude_error_percent =
        percent_error(simulated.airburst_altitude_km, observed.airburst_altitude_km);
    let energy_error_percent = percent_error(simulated.energy_kt, observed.energy_kt);

    Ok(ChelyabinskValidation {
        observed,
        simulated,
        altitude_error_percent,
        energy_error_percent,
        altitude_match: altitude_error_percent < ALTITUDE_TOLERANCE_PERCENT,
        energy_match: energy_error_percent < ENERGY_TOLERANCE_PERCENT,
        outcome,
    })
}

fn percent_error(simulated: f64, observed: f64) -> f64 {
    (simulated - observed).abs() / observed * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chelyabinsk_matches_observations() {
        let report = validate_chelyabinsk().expect("validation run");
        assert!(report.altitude_match, "altitude error {}", report.altitude_error_percent);
        assert!(report.energy_match, "energy error {}", report.energy_error_percent);
        assert!(report.overall_valid());
        assert!(report.outcome.fragmented);
    }
}
