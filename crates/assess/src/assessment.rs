//! Grid-based casualty assessment chaining energy, surface, classification,
//! exposure, vulnerability and tsunami stages.

use std::fmt;

use impact_core::constants::WORLD_POPULATION;
use impact_core::units::m_to_km;
use impact_geo::{
    RegionBoxClassifier, SettlementLookup, SurfaceClassifier, SurfaceKind,
};
use impact_hazards::{
    TsunamiTier, ejecta_thickness_m, overpressure_pa, seismic_magnitude, thermal_flux_j_m2,
    tsunami_risk, tsunami_wave_height_m, wind_speed_m_s,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use crate::classify::{Hazard, ImpactType, classify_impact, kinetic_energy};
use crate::coastal::{CoastalImpact, coastal_impact};
use crate::exposure::{
    DEFAULT_SETTLEMENT_SEARCH_KM, DensityOrigin, DensitySource, ExposureGrid,
    max_effect_radius_km,
};
use crate::vulnerability::{
    Shelter, crater_casualties, ejecta_casualties, overpressure_casualties, seismic_casualties,
    thermal_casualties, wind_casualties,
};

/// Light-damage radius (km) beyond which an impact is treated as a global catastrophe.
pub const GLOBAL_EVENT_RADIUS_KM: f64 = 5_000.0;
/// Finest accepted grid spacing; bounds the lattice at the 500 km effect radius.
pub const MIN_GRID_RESOLUTION_KM: f64 = 1.0;
/// Cells with fewer people are skipped.
const MIN_CELL_POPULATION: f64 = 0.1;
/// Crater losses at or above this share of a cell end the evaluation of that cell.
const CRATER_SHORT_CIRCUIT: f64 = 0.99;

static REGION_BOXES: RegionBoxClassifier = RegionBoxClassifier;

/// Pipeline stage an internal failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Energy,
    Surface,
    Classification,
    Grid,
    Casualties,
    Tsunami,
    Aggregation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Energy => "energy",
            Stage::Surface => "surface",
            Stage::Classification => "classification",
            Stage::Grid => "grid",
            Stage::Casualties => "casualties",
            Stage::Tsunami => "tsunami",
            Stage::Aggregation => "aggregation",
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} = {value} is outside the valid range {expected}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("{stage} stage failed: {reason}")]
    Stage { stage: Stage, reason: String },
}

pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    valid: bool,
    expected: &'static str,
) -> Result<(), ValidationError> {
    if valid && value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            expected,
        })
    }
}

pub(crate) fn ensure_finite(stage: Stage, what: &str, value: f64) -> Result<f64, AssessmentError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AssessmentError::Stage {
            stage,
            reason: format!("{what} is not finite ({value})"),
        })
    }
}

/// Impactor and location to assess.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRequest {
    pub diameter_m: f64,
    pub density_kg_m3: f64,
    pub velocity_m_s: f64,
    pub angle_deg: f64,
    pub lat: f64,
    pub lng: f64,
    pub water_depth_m: f64,
    pub unsheltered_fraction: f64,
    pub grid_resolution_km: f64,
}

impl AssessmentRequest {
    pub fn new(
        diameter_m: f64,
        density_kg_m3: f64,
        velocity_m_s: f64,
        angle_deg: f64,
        lat: f64,
        lng: f64,
    ) -> Self {
        Self {
            diameter_m,
            density_kg_m3,
            velocity_m_s,
            angle_deg,
            lat,
            lng,
            water_depth_m: 0.0,
            unsheltered_fraction: 0.13,
            grid_resolution_km: 5.0,
        }
    }

    pub fn with_water_depth(mut self, water_depth_m: f64) -> Self {
        self.water_depth_m = water_depth_m;
        self
    }

    pub fn with_unsheltered_fraction(mut self, fraction: f64) -> Self {
        self.unsheltered_fraction = fraction;
        self
    }

    pub fn with_grid_resolution(mut self, resolution_km: f64) -> Self {
        self.grid_resolution_km = resolution_km;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let d = self.diameter_m;
        check_range("diameter_m", d, d > 0.0 && d <= 10_000.0, "(0, 10000]")?;
        let rho = self.density_kg_m3;
        check_range("density_kg_m3", rho, rho > 0.0, "> 0")?;
        let v = self.velocity_m_s;
        check_range("velocity_m_s", v, v > 0.0 && v <= 100_000.0, "(0, 100000]")?;
        let a = self.angle_deg;
        check_range("angle_deg", a, (0.0..=90.0).contains(&a), "[0, 90]")?;
        check_range("lat", self.lat, self.lat.abs() <= 90.0, "[-90, 90]")?;
        check_range("lng", self.lng, self.lng.abs() <= 180.0, "[-180, 180]")?;
        let u = self.unsheltered_fraction;
        check_range("unsheltered_fraction", u, (0.0..=1.0).contains(&u), "[0, 1]")?;
        let res = self.grid_resolution_km;
        check_range("grid_resolution_km", res, res >= MIN_GRID_RESOLUTION_KM, ">= 1")?;
        let depth = self.water_depth_m;
        check_range("water_depth_m", depth, depth >= 0.0, ">= 0")?;
        Ok(())
    }
}

/// Reference data and lookups injected into an assessment.
#[derive(Clone, Copy)]
pub struct AssessmentContext<'a> {
    pub settlements: &'a dyn SettlementLookup,
    /// Remote nearby-places lookup, consulted by the quick estimate when no
    /// catalog settlement is close.
    pub gazetteer: Option<&'a dyn SettlementLookup>,
    /// Preferred surface classifier; failures fall back to `fallback_surface`.
    pub surface: Option<&'a dyn SurfaceClassifier>,
    pub fallback_surface: &'a dyn SurfaceClassifier,
    pub settlement_search_km: f64,
}

impl<'a> AssessmentContext<'a> {
    /// Catalog lookups and the region-box ocean heuristic only.
    pub fn offline(settlements: &'a dyn SettlementLookup) -> Self {
        Self {
            settlements,
            gazetteer: None,
            surface: None,
            fallback_surface: &REGION_BOXES,
            settlement_search_km: DEFAULT_SETTLEMENT_SEARCH_KM,
        }
    }

    pub fn with_surface(mut self, surface: &'a dyn SurfaceClassifier) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_gazetteer(mut self, gazetteer: &'a dyn SettlementLookup) -> Self {
        self.gazetteer = Some(gazetteer);
        self
    }

    pub fn with_settlement_search_km(mut self, km: f64) -> Self {
        self.settlement_search_km = km;
        self
    }

    /// Classify a point, preferring the remote classifier.
    pub fn resolve_surface(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<(SurfaceKind, SurfaceSource), AssessmentError> {
        if let Some(remote) = self.surface {
            match remote.classify_surface(lat, lng) {
                Ok(kind) => return Ok((kind, SurfaceSource::Remote)),
                Err(err) => warn!(%err, "surface lookup failed; using region boxes"),
            }
        }
        let kind = self
            .fallback_surface
            .classify_surface(lat, lng)
            .map_err(|err| AssessmentError::Stage {
                stage: Stage::Surface,
                reason: err.to_string(),
            })?;
        Ok((kind, SurfaceSource::RegionHeuristic))
    }
}

/// Casualties per hazard channel, truncated to whole people.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HazardCasualties {
    pub overpressure: u64,
    pub wind_blast: u64,
    pub thermal_radiation: u64,
    pub seismic: u64,
    pub ejecta: u64,
    pub cratering: u64,
    pub tsunami: u64,
}

impl HazardCasualties {
    pub fn get(&self, hazard: Hazard) -> u64 {
        match hazard {
            Hazard::Overpressure => self.overpressure,
            Hazard::WindBlast => self.wind_blast,
            Hazard::ThermalRadiation => self.thermal_radiation,
            Hazard::Seismic => self.seismic,
            Hazard::Ejecta => self.ejecta,
            Hazard::Cratering => self.cratering,
            Hazard::Tsunami => self.tsunami,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Hazard, u64)> + '_ {
        Hazard::ALL.into_iter().map(move |hazard| (hazard, self.get(hazard)))
    }
}

/// Running per-hazard totals kept as floats until reporting.
#[derive(Debug, Clone, Copy, Default)]
struct HazardTally([f64; 7]);

impl HazardTally {
    fn add(&mut self, hazard: Hazard, casualties: f64) {
        self.0[hazard.index()] += casualties;
    }

    fn set(&mut self, hazard: Hazard, casualties: f64) {
        self.0[hazard.index()] = casualties;
    }

    fn max(&self) -> f64 {
        self.0.iter().copied().fold(0.0, f64::max)
    }

    fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    fn counts(&self) -> HazardCasualties {
        let count = |hazard: Hazard| self.0[hazard.index()] as u64;
        HazardCasualties {
            overpressure: count(Hazard::Overpressure),
            wind_blast: count(Hazard::WindBlast),
            thermal_radiation: count(Hazard::ThermalRadiation),
            seismic: count(Hazard::Seismic),
            ejecta: count(Hazard::Ejecta),
            cratering: count(Hazard::Cratering),
            tsunami: count(Hazard::Tsunami),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TsunamiAssessment {
    pub tier: TsunamiTier,
    pub advisory: String,
    pub source_height_m: f64,
    pub range_km: f64,
    /// Run-up at the basin's typical shore distance, using the water depth.
    pub shore_run_up_m: f64,
    pub coastal: CoastalImpact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceSource {
    Remote,
    RegionHeuristic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum PopulationSource {
    Grid {
        settlement_cells: usize,
        fallback_cells: usize,
    },
    CoastalModel,
    GlobalModel,
}

/// Where the surface classification and population figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataSource {
    pub surface: SurfaceSource,
    pub population: PopulationSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentParameters {
    pub diameter_m: f64,
    pub density_kg_m3: f64,
    pub velocity_m_s: f64,
    pub angle_deg: f64,
    pub lat: f64,
    pub lng: f64,
    pub water_depth_m: f64,
    pub crater_diameter_m: f64,
    pub airburst_altitude_km: f64,
    pub seismic_magnitude: f64,
    pub unsheltered_fraction: f64,
    pub grid_resolution_km: f64,
    pub grid_cells_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactAssessment {
    pub impact_type: ImpactType,
    pub location: SurfaceKind,
    pub kinetic_energy_j: f64,
    pub kinetic_energy_mt: f64,
    pub total_casualties: u64,
    pub casualties_by_hazard: HazardCasualties,
    pub parameters: AssessmentParameters,
    pub tsunami: Option<TsunamiAssessment>,
    pub global_event: bool,
    pub data_source: DataSource,
}

/// Light-damage radius (km) used for the global-catastrophe check.
pub fn light_damage_radius_km(energy_j: f64) -> f64 {
    2.0 * energy_j.powf(0.33) / 10_000.0
}

/// Fixed world-scale casualty split used once the damage radius spans continents.
fn global_casualties(is_ocean: bool) -> HazardCasualties {
    let share = |fraction: f64| (WORLD_POPULATION * fraction) as u64;
    HazardCasualties {
        overpressure: share(0.20),
        wind_blast: share(0.15),
        thermal_radiation: share(0.20),
        seismic: share(0.15),
        ejecta: 0,
        cratering: share(0.10),
        tsunami: if is_ocean { share(0.20) } else { 0 },
    }
}

/// Assess one impact scenario end to end.
///
/// Inputs are validated before any computation. Lookup failures never abort
/// the run; they fall back to the region boxes or latitude bands and show up
/// in [`DataSource`]. Per-hazard tallies are summed independently per cell,
/// so a person counted under blast may be counted again under wind.
pub fn assess_impact(
    request: &AssessmentRequest,
    context: &AssessmentContext<'_>,
) -> Result<ImpactAssessment, AssessmentError> {
    request.validate()?;
    let span = info_span!(
        "assessment",
        diameter_m = request.diameter_m,
        velocity_m_s = request.velocity_m_s,
        angle_deg = request.angle_deg,
        lat = request.lat,
        lng = request.lng
    );
    let _guard = span.enter();

    let energy = kinetic_energy(request.diameter_m, request.density_kg_m3, request.velocity_m_s);
    let energy_j = ensure_finite(Stage::Energy, "kinetic energy", energy.joules)?;

    let (location, surface_source) = context.resolve_surface(request.lat, request.lng)?;
    let is_ocean = location.is_ocean();
    debug!(surface = location.label(), ?surface_source, "surface resolved");

    let classification = classify_impact(
        request.diameter_m,
        request.density_kg_m3,
        request.velocity_m_s,
        request.angle_deg,
        is_ocean,
    );
    let impact_type = classification.impact_type;
    let crater = classification.crater;
    let altitude_km = ensure_finite(
        Stage::Classification,
        "airburst altitude",
        classification.airburst_altitude_km,
    )?;
    ensure_finite(Stage::Classification, "crater diameter", crater.diameter_m)?;
    let magnitude = seismic_magnitude(energy_j);

    let mut parameters = AssessmentParameters {
        diameter_m: request.diameter_m,
        density_kg_m3: request.density_kg_m3,
        velocity_m_s: request.velocity_m_s,
        angle_deg: request.angle_deg,
        lat: request.lat,
        lng: request.lng,
        water_depth_m: request.water_depth_m,
        crater_diameter_m: crater.diameter_m,
        airburst_altitude_km: altitude_km,
        seismic_magnitude: magnitude,
        unsheltered_fraction: request.unsheltered_fraction,
        grid_resolution_km: request.grid_resolution_km,
        grid_cells_analyzed: 0,
    };

    if light_damage_radius_km(energy_j) > GLOBAL_EVENT_RADIUS_KM {
        info!(megatons = energy.megatons, "damage radius exceeds global threshold");
        return Ok(ImpactAssessment {
            impact_type,
            location,
            kinetic_energy_j: energy_j,
            kinetic_energy_mt: energy.megatons,
            total_casualties: WORLD_POPULATION as u64,
            casualties_by_hazard: global_casualties(is_ocean),
            parameters,
            tsunami: None,
            global_event: true,
            data_source: DataSource {
                surface: surface_source,
                population: PopulationSource::GlobalModel,
            },
        });
    }

    let mut tally = HazardTally::default();
    // Only surface ocean strikes hand exposure to the coastal model; airbursts
    // over water still sweep the grid.
    let population_source = if impact_type == ImpactType::OceanImpact {
        PopulationSource::CoastalModel
    } else {
        let density = DensitySource::new(context.settlements)
            .with_search_radius(context.settlement_search_km);
        let grid = ExposureGrid::build(
            request.lat,
            request.lng,
            max_effect_radius_km(energy_j),
            request.grid_resolution_km,
            &density,
        );
        ensure_finite(Stage::Grid, "grid population", grid.total_population())?;
        parameters.grid_cells_analyzed = grid.len();

        let shelter = Shelter::new(request.unsheltered_fraction);
        for cell in &grid.cells {
            let population = cell.population;
            if population < MIN_CELL_POPULATION {
                continue;
            }
            let distance_m = cell.distance_m();

            if impact_type.applies(Hazard::Cratering) {
                let lost = crater_casualties(crater.radius_m, distance_m, population);
                tally.add(Hazard::Cratering, lost);
                if lost >= population * CRATER_SHORT_CIRCUIT {
                    continue;
                }
            }
            if impact_type.applies(Hazard::Overpressure) {
                let pa = overpressure_pa(distance_m, energy_j, altitude_km);
                tally.add(Hazard::Overpressure, overpressure_casualties(pa, population, shelter));
            }
            if impact_type.applies(Hazard::WindBlast) {
                let wind = wind_speed_m_s(distance_m, energy_j, altitude_km);
                tally.add(Hazard::WindBlast, wind_casualties(wind, population, shelter));
            }
            if impact_type.applies(Hazard::ThermalRadiation) {
                let flux = thermal_flux_j_m2(distance_m, energy_j, altitude_km);
                tally.add(Hazard::ThermalRadiation, thermal_casualties(flux, population, shelter));
            }
            if impact_type.applies(Hazard::Seismic) {
                tally.add(Hazard::Seismic, seismic_casualties(magnitude, population));
            }
            if impact_type.applies(Hazard::Ejecta) && crater.diameter_m > 0.0 {
                let thickness = ejecta_thickness_m(distance_m, crater.diameter_m);
                tally.add(Hazard::Ejecta, ejecta_casualties(thickness, population, shelter));
            }
        }
        ensure_finite(Stage::Casualties, "casualty tally", tally.sum())?;
        PopulationSource::Grid {
            settlement_cells: grid.count_from(DensityOrigin::Settlement),
            fallback_cells: grid.count_from(DensityOrigin::LatitudeBand),
        }
    };

    let tsunami = if is_ocean && impact_type.applies(Hazard::Tsunami) {
        let crater_km = m_to_km(crater.diameter_m);
        let risk = tsunami_risk(energy_j, crater_km);
        let coastal = coastal_impact(location.label(), risk.height_m, risk.range_km);
        let shore_run_up_m = tsunami_wave_height_m(
            coastal.profile.shore_distance_km,
            energy_j,
            request.water_depth_m,
            crater_km,
        );
        ensure_finite(Stage::Tsunami, "shore run-up", shore_run_up_m)?;
        tally.set(Hazard::Tsunami, coastal.casualties as f64);
        debug!(tier = %risk.tier, coastal_casualties = coastal.casualties, "tsunami assessed");
        Some(TsunamiAssessment {
            tier: risk.tier,
            advisory: risk.advisory().to_string(),
            source_height_m: risk.height_m,
            range_km: risk.range_km,
            shore_run_up_m,
            coastal,
        })
    } else {
        None
    };

    let total = ensure_finite(
        Stage::Aggregation,
        "total casualties",
        (tally.max() + tally.sum()) / 3.0,
    )?;
    let total_casualties = total as u64;
    info!(
        impact_type = %impact_type,
        megatons = energy.megatons,
        total_casualties,
        cells = parameters.grid_cells_analyzed,
        "assessment complete"
    );

    Ok(ImpactAssessment {
        impact_type,
        location,
        kinetic_energy_j: energy_j,
        kinetic_energy_mt: energy.megatons,
        total_casualties,
        casualties_by_hazard: tally.counts(),
        parameters,
        tsunami,
        global_event: false,
        data_source: DataSource {
            surface: surface_source,
            population: population_source,
        },
    })
}
