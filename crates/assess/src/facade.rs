//! Re-exported APIs for consumers of the assessment crate.

pub use crate::assessment::{
    AssessmentContext, AssessmentError, AssessmentParameters, AssessmentRequest, DataSource,
    GLOBAL_EVENT_RADIUS_KM, HazardCasualties, ImpactAssessment, MIN_GRID_RESOLUTION_KM,
    PopulationSource, Stage, SurfaceSource, TsunamiAssessment, ValidationError, assess_impact,
    light_damage_radius_km,
};
pub use crate::classify::{
    Crater, Hazard, ImpactClassification, ImpactType, KineticEnergy, classify_impact,
    crater_scaling, kinetic_energy,
};
pub use crate::coastal::{BasinProfile, CoastalImpact, coastal_impact};
pub use crate::estimate::{
    DamageZones, DensityProvenance, EffectCasualties, EstimateRequest, ImpactEstimate,
    PopulationImpact, ZoneCasualties, estimate_impact,
};
pub use crate::exposure::{DensitySource, ExposureGrid, GridCell};

/// Settings-file values applied to requests and lookups.
pub mod settings {
    use std::time::Duration;

    use impact_config::{AssessmentSettings, EntrySettings, GazetteerSettings};
    use impact_entry::{EntryError, EntryRequest, FragmentationModel, MaterialClass};
    use impact_geo::{GeoNamesClient, LookupError};

    use crate::assessment::AssessmentRequest;

    /// Overlay shelter and grid settings onto a request.
    pub fn apply_assessment(
        settings: &AssessmentSettings,
        request: AssessmentRequest,
    ) -> AssessmentRequest {
        request
            .with_unsheltered_fraction(settings.unsheltered_fraction)
            .with_grid_resolution(settings.grid_resolution_km)
    }

    /// Build the GeoNames client when the gazetteer is enabled.
    pub fn gazetteer(settings: &GazetteerSettings) -> Result<Option<GeoNamesClient>, LookupError> {
        if !settings.enabled {
            return Ok(None);
        }
        GeoNamesClient::new(
            settings.base_url.as_str(),
            settings.username.as_str(),
            Duration::from_secs(settings.timeout_secs),
        )
        .map(Some)
    }

    /// Entry request with integration settings taken from the settings file.
    pub fn entry_request(
        settings: &EntrySettings,
        diameter_m: f64,
        velocity_m_s: f64,
        angle_deg: f64,
        material: MaterialClass,
    ) -> Result<EntryRequest, EntryError> {
        let fragmentation: FragmentationModel = settings.fragmentation.parse()?;
        let mut request = EntryRequest::new(diameter_m, velocity_m_s, angle_deg, material)
            .with_fragmentation(fragmentation);
        request.initial_altitude_m = settings.initial_altitude_km * 1_000.0;
        request.time_step_s = settings.time_step_s;
        request.max_time_s = settings.max_time_s;
        Ok(request)
    }

}
