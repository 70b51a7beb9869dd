//! Quick zone-based impact estimate.
//!
//! Coarser than [`crate::assess_impact`]: four concentric damage rings with
//! fixed mortality and a single population density for the whole area.

use std::f64::consts::PI;

use impact_core::constants::WORLD_POPULATION;
use impact_core::sphere;
use impact_core::units::{joules_to_megatons, joules_to_tons, m_to_km};
use impact_entry::{AtmosphericEstimate, estimate_entry};
use impact_geo::SurfaceKind;
use impact_hazards::{TsunamiRisk, tsunami_risk};
use serde::Serialize;
use tracing::{debug, info_span};

use crate::assessment::{
    AssessmentContext, AssessmentError, GLOBAL_EVENT_RADIUS_KM, Stage, SurfaceSource,
    ValidationError, check_range, ensure_finite,
};
use crate::classify::{Crater, crater_scaling};
use crate::coastal::{CoastalImpact, coastal_impact};
use crate::exposure::{DensityEstimate, DensitySource};

/// Radius searched by the remote gazetteer when no catalog settlement is near (km).
const GAZETTEER_SEARCH_KM: f64 = 100.0;
/// Density reported for a global event (people/km²).
const GLOBAL_MEAN_DENSITY: f64 = 60.0;
const MIN_BURNUP_DIAMETER_M: f64 = 1.0;
const MIN_BURNUP_VELOCITY_M_S: f64 = 100.0;
/// Craters from bodies that burn up are scaled down by this factor.
const BURNUP_CRATER_FACTOR: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateRequest {
    pub diameter_m: f64,
    pub velocity_m_s: f64,
    pub angle_deg: f64,
    pub density_kg_m3: f64,
    pub lat: f64,
    pub lng: f64,
}

impl Default for EstimateRequest {
    /// A 100 m stony body striking Istanbul.
    fn default() -> Self {
        Self {
            diameter_m: 100.0,
            velocity_m_s: 20_000.0,
            angle_deg: 45.0,
            density_kg_m3: 3_000.0,
            lat: 41.0082,
            lng: 28.9784,
        }
    }
}

impl EstimateRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let d = self.diameter_m;
        check_range("diameter_m", d, d > 0.0 && d <= 10_000.0, "(0, 10000]")?;
        let v = self.velocity_m_s;
        check_range("velocity_m_s", v, v > 0.0 && v <= 100_000.0, "(0, 100000]")?;
        let a = self.angle_deg;
        check_range("angle_deg", a, (0.0..=90.0).contains(&a), "[0, 90]")?;
        let rho = self.density_kg_m3;
        check_range("density_kg_m3", rho, rho > 0.0, "> 0")?;
        check_range("lat", self.lat, self.lat.abs() <= 90.0, "[-90, 90]")?;
        check_range("lng", self.lng, self.lng.abs() <= 180.0, "[-180, 180]")?;
        Ok(())
    }
}

/// Damage ring radii (km).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageZones {
    pub total_destruction_km: f64,
    pub heavy_damage_km: f64,
    pub moderate_damage_km: f64,
    pub light_damage_km: f64,
}

impl DamageZones {
    pub fn new(crater_diameter_m: f64, energy_j: f64) -> Self {
        let crater_radius_km = m_to_km(crater_diameter_m / 2.0);
        let moderate_damage_km = energy_j.powf(0.33) / 10_000.0;
        Self {
            total_destruction_km: crater_radius_km * 2.0,
            heavy_damage_km: crater_radius_km * 5.0,
            moderate_damage_km,
            light_damage_km: moderate_damage_km * 2.0,
        }
    }

    /// Ring areas (km²) from the centre outwards; never negative.
    fn ring_areas(&self) -> [f64; 4] {
        let disc = |r: f64| PI * r * r;
        let total = disc(self.total_destruction_km);
        [
            total,
            (disc(self.heavy_damage_km) - total).max(0.0),
            (disc(self.moderate_damage_km) - disc(self.heavy_damage_km)).max(0.0),
            (disc(self.light_damage_km) - disc(self.moderate_damage_km)).max(0.0),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ZoneCasualties {
    pub total_destruction: u64,
    pub heavy_damage: u64,
    pub moderate_damage: u64,
    pub light_damage: u64,
}

impl ZoneCasualties {
    fn split(total: f64, shares: [f64; 4]) -> Self {
        let part = |share: f64| (total * share) as u64;
        Self {
            total_destruction: part(shares[0]),
            heavy_damage: part(shares[1]),
            moderate_damage: part(shares[2]),
            light_damage: part(shares[3]),
        }
    }

    pub fn sum(&self) -> u64 {
        self.total_destruction + self.heavy_damage + self.moderate_damage + self.light_damage
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EffectCasualties {
    pub crater: u64,
    pub thermal: u64,
    pub shockwave: u64,
    pub wind: u64,
    pub earthquake: u64,
    pub tsunami: u64,
}

/// Where the density behind a population estimate came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DensityProvenance {
    Settlement { name: String, distance_km: f64 },
    Gazetteer { name: String, distance_km: f64 },
    LatitudeBand,
    CoastalModel { basin: String },
    GlobalModel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationImpact {
    pub total_affected: u64,
    pub estimated_casualties: u64,
    pub by_zone: ZoneCasualties,
    pub by_effect: EffectCasualties,
    pub density: f64,
    pub provenance: DensityProvenance,
    pub coastal: Option<CoastalImpact>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactEstimate {
    pub entry: AtmosphericEstimate,
    pub mass_kg: f64,
    pub kinetic_energy_j: f64,
    pub tnt_tons: f64,
    pub tnt_megatons: f64,
    pub crater: Crater,
    pub damage_zones: DamageZones,
    pub location: SurfaceKind,
    pub surface_source: SurfaceSource,
    pub tsunami: Option<TsunamiRisk>,
    pub population: PopulationImpact,
}

impl ImpactEstimate {
    pub fn global_event(&self) -> bool {
        self.population.provenance == DensityProvenance::GlobalModel
    }
}

fn global_population_impact(is_ocean: bool) -> PopulationImpact {
    let share = |fraction: f64| (WORLD_POPULATION * fraction) as u64;
    PopulationImpact {
        total_affected: WORLD_POPULATION as u64,
        estimated_casualties: WORLD_POPULATION as u64,
        by_zone: ZoneCasualties::split(WORLD_POPULATION, [0.4, 0.3, 0.2, 0.1]),
        by_effect: EffectCasualties {
            crater: share(0.10),
            thermal: share(0.20),
            shockwave: share(0.20),
            wind: share(0.15),
            earthquake: share(0.15),
            tsunami: if is_ocean { share(0.20) } else { 0 },
        },
        density: GLOBAL_MEAN_DENSITY,
        provenance: DensityProvenance::GlobalModel,
        coastal: None,
    }
}

fn ocean_population_impact(basin: &str, risk: &TsunamiRisk) -> PopulationImpact {
    let coastal = coastal_impact(basin, risk.height_m, risk.range_km);
    let casualties = coastal.casualties as f64;
    PopulationImpact {
        total_affected: coastal.affected,
        estimated_casualties: coastal.casualties,
        by_zone: ZoneCasualties::split(casualties, [0.7, 0.2, 0.08, 0.02]),
        by_effect: EffectCasualties {
            earthquake: (casualties * 0.1) as u64,
            tsunami: (casualties * 0.9) as u64,
            ..EffectCasualties::default()
        },
        density: 0.0,
        provenance: DensityProvenance::CoastalModel {
            basin: basin.to_string(),
        },
        coastal: Some(coastal),
    }
}

/// Single density for the impact point: catalog, then gazetteer, then latitude bands.
fn point_density(lat: f64, lng: f64, context: &AssessmentContext<'_>) -> (f64, DensityProvenance) {
    let catalog =
        DensitySource::new(context.settlements).with_search_radius(context.settlement_search_km);
    if let Some(DensityEstimate {
        density,
        settlement: Some((name, distance_km)),
        ..
    }) = catalog.settlement_density(lat, lng)
    {
        return (density, DensityProvenance::Settlement { name, distance_km });
    }
    if let Some(gazetteer) = context.gazetteer {
        match gazetteer.nearest_settlement(lat, lng, GAZETTEER_SEARCH_KM) {
            Ok(Some(hit)) if hit.density > 0.0 => {
                return (
                    hit.density,
                    DensityProvenance::Gazetteer {
                        name: hit.name,
                        distance_km: hit.distance_km,
                    },
                );
            }
            Ok(_) => {}
            Err(err) => debug!(%err, "gazetteer density unavailable"),
        }
    }
    (
        DensitySource::banded(lat).density,
        DensityProvenance::LatitudeBand,
    )
}

fn land_population_impact(
    zones: &DamageZones,
    density: f64,
    provenance: DensityProvenance,
) -> PopulationImpact {
    let [total, heavy, moderate, light] = zones.ring_areas();
    let by_zone = ZoneCasualties {
        total_destruction: (total * density * 0.95) as u64,
        heavy_damage: (heavy * density * 0.60) as u64,
        moderate_damage: (moderate * density * 0.25) as u64,
        light_damage: (light * density * 0.05) as u64,
    };

    let disc = |r: f64| PI * r * r;
    let crater_area = disc(zones.total_destruction_km / 2.0);
    let fireball = (disc(zones.heavy_damage_km) - crater_area).max(0.0);
    let shockwave = (disc(zones.moderate_damage_km) - disc(zones.heavy_damage_km)).max(0.0);
    let wind = (disc(zones.light_damage_km) - disc(zones.moderate_damage_km)).max(0.0);
    let quake_radius = zones.light_damage_km * 1.5;
    let quake = disc(quake_radius) - disc(zones.light_damage_km);

    PopulationImpact {
        total_affected: ((total + heavy + moderate + light) * density) as u64,
        estimated_casualties: by_zone.sum(),
        by_zone,
        by_effect: EffectCasualties {
            crater: (crater_area * density) as u64,
            thermal: (fireball * density * 0.4) as u64,
            shockwave: (shockwave * density * 0.25) as u64,
            wind: (wind * density * 0.1) as u64,
            earthquake: (quake * density * 0.03) as u64,
            tsunami: 0,
        },
        density,
        provenance,
        coastal: None,
    }
}

/// Energy, crater, damage rings, tsunami risk and ring-based casualties.
///
/// Energy comes from the body left after the coarse atmospheric estimate. A
/// body that burns up is still assigned at least 1 m and 100 m/s, and its
/// crater is scaled down tenfold.
pub fn estimate_impact(
    request: &EstimateRequest,
    context: &AssessmentContext<'_>,
) -> Result<ImpactEstimate, AssessmentError> {
    request.validate()?;
    let span = info_span!(
        "estimate",
        diameter_m = request.diameter_m,
        velocity_m_s = request.velocity_m_s,
        lat = request.lat,
        lng = request.lng
    );
    let _guard = span.enter();

    let entry = estimate_entry(
        request.diameter_m,
        request.velocity_m_s,
        request.density_kg_m3,
        request.angle_deg,
    );
    let (final_diameter_m, final_velocity_m_s) = if entry.reaches_ground {
        (entry.final_diameter_m, entry.final_velocity_m_s)
    } else {
        (
            entry.final_diameter_m.max(MIN_BURNUP_DIAMETER_M),
            entry.final_velocity_m_s.max(MIN_BURNUP_VELOCITY_M_S),
        )
    };

    let mass_kg = sphere::mass(final_diameter_m, request.density_kg_m3);
    let energy_j = ensure_finite(
        Stage::Energy,
        "kinetic energy",
        0.5 * mass_kg * final_velocity_m_s * final_velocity_m_s,
    )?;

    let mut crater = crater_scaling(final_diameter_m, final_velocity_m_s, request.angle_deg);
    if !entry.reaches_ground {
        crater = Crater::from_diameter(crater.diameter_m * BURNUP_CRATER_FACTOR);
    }
    let damage_zones = DamageZones::new(crater.diameter_m, energy_j);

    let (location, surface_source) = context.resolve_surface(request.lat, request.lng)?;
    let tsunami = location
        .is_ocean()
        .then(|| tsunami_risk(energy_j, m_to_km(crater.diameter_m)));

    let population = if damage_zones.light_damage_km > GLOBAL_EVENT_RADIUS_KM {
        global_population_impact(location.is_ocean())
    } else if let (SurfaceKind::Ocean { basin }, Some(risk)) = (&location, &tsunami) {
        ocean_population_impact(basin, risk)
    } else {
        let (density, provenance) = point_density(request.lat, request.lng, context);
        land_population_impact(&damage_zones, density, provenance)
    };
    debug!(
        megatons = joules_to_megatons(energy_j),
        casualties = population.estimated_casualties,
        "estimate complete"
    );

    Ok(ImpactEstimate {
        entry,
        mass_kg,
        kinetic_energy_j: energy_j,
        tnt_tons: joules_to_tons(energy_j),
        tnt_megatons: joules_to_megatons(energy_j),
        crater,
        damage_zones,
        location,
        surface_source,
        tsunami,
        population,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use impact_config::SettlementRecord;
    use impact_geo::{LookupError, NearestSettlement, SettlementCatalog, SettlementLookup};

    struct Village;

    impl SettlementLookup for Village {
        fn nearest_settlement(
            &self,
            _lat: f64,
            _lng: f64,
            _max_km: f64,
        ) -> Result<Option<NearestSettlement>, LookupError> {
            Ok(Some(NearestSettlement {
                name: "Village".into(),
                distance_km: 12.0,
                density: 420.0,
                population: 4_200,
            }))
        }
    }

    fn istanbul() -> SettlementCatalog {
        SettlementCatalog::new(vec![SettlementRecord {
            name: "Istanbul".into(),
            lat: 41.0082,
            lng: 28.9784,
            population: 15_460_000,
            density: 2_976.0,
        }])
    }

    #[test]
    fn zones_scale_with_crater_and_energy() {
        let zones = DamageZones::new(2_000.0, 1.0e18);
        assert_relative_eq!(zones.total_destruction_km, 2.0);
        assert_relative_eq!(zones.heavy_damage_km, 5.0);
        assert_relative_eq!(zones.light_damage_km, 2.0 * zones.moderate_damage_km);
        let areas = zones.ring_areas();
        assert!(areas.iter().all(|a| *a >= 0.0));
        assert_relative_eq!(
            areas.iter().sum::<f64>(),
            PI * zones.light_damage_km.powi(2),
            max_relative = 1e-12
        );
    }

    #[test]
    fn city_density_drives_land_estimate() {
        let catalog = istanbul();
        let context = AssessmentContext::offline(&catalog);
        let estimate = estimate_impact(&EstimateRequest::default(), &context).expect("estimate");
        assert_eq!(estimate.location, SurfaceKind::Land);
        assert_eq!(estimate.population.density, 2_976.0);
        assert!(matches!(
            estimate.population.provenance,
            DensityProvenance::Settlement { ref name, .. } if name == "Istanbul"
        ));
        assert_eq!(estimate.population.estimated_casualties, estimate.population.by_zone.sum());
        assert!(estimate.population.estimated_casualties > 0);
        assert!(estimate.tsunami.is_none());
    }

    #[test]
    fn gazetteer_fills_in_before_bands() {
        let empty = SettlementCatalog::default();
        let village = Village;
        let context = AssessmentContext::offline(&empty).with_gazetteer(&village);
        let (density, provenance) = point_density(60.0, 100.0, &context);
        assert_eq!(density, 420.0);
        assert!(matches!(provenance, DensityProvenance::Gazetteer { .. }));

        let context = AssessmentContext::offline(&empty);
        let (density, provenance) = point_density(60.0, 100.0, &context);
        assert_eq!(density, 5.0);
        assert_eq!(provenance, DensityProvenance::LatitudeBand);
    }

    #[test]
    fn burnup_keeps_a_token_crater() {
        let catalog = SettlementCatalog::default();
        let context = AssessmentContext::offline(&catalog);
        let request = EstimateRequest {
            diameter_m: 5.0,
            density_kg_m3: 1_000.0,
            ..EstimateRequest::default()
        };
        let estimate = estimate_impact(&request, &context).expect("estimate");
        assert!(!estimate.entry.reaches_ground);
        assert!(estimate.mass_kg >= sphere::mass(1.0, 1_000.0));
        assert!(estimate.crater.diameter_m > 0.0);
    }

    #[test]
    fn dinosaur_killer_is_global() {
        let catalog = SettlementCatalog::default();
        let context = AssessmentContext::offline(&catalog);
        let request = EstimateRequest {
            diameter_m: 10_000.0,
            lat: 21.4,
            lng: -89.5,
            ..EstimateRequest::default()
        };
        let estimate = estimate_impact(&request, &context).expect("estimate");
        assert!(estimate.global_event());
        assert_eq!(estimate.population.estimated_casualties, 8_000_000_000);
        assert_eq!(estimate.population.by_zone.total_destruction, 3_200_000_000);
    }

    #[test]
    fn ocean_estimate_uses_coastal_split() {
        let catalog = SettlementCatalog::default();
        let context = AssessmentContext::offline(&catalog);
        let request = EstimateRequest {
            diameter_m: 300.0,
            lat: 35.0,
            lng: 18.0,
            ..EstimateRequest::default()
        };
        let estimate = estimate_impact(&request, &context).expect("estimate");
        assert!(estimate.location.is_ocean());
        assert!(estimate.tsunami.is_some());
        let population = &estimate.population;
        assert!(population.coastal.is_some());
        assert_eq!(population.by_effect.crater, 0);
        assert_eq!(
            population.by_effect.tsunami,
            (population.estimated_casualties as f64 * 0.9) as u64
        );
    }

    #[test]
    fn invalid_request_is_rejected() {
        let catalog = SettlementCatalog::default();
        let context = AssessmentContext::offline(&catalog);
        let request = EstimateRequest {
            angle_deg: -1.0,
            ..EstimateRequest::default()
        };
        assert!(matches!(
            estimate_impact(&request, &context),
            Err(AssessmentError::Validation(_))
        ));
    }
}
