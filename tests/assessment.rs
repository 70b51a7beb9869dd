use impact_risk::assess::{
    AssessmentContext, AssessmentRequest, ImpactType, PopulationSource, SurfaceSource,
    assess_impact,
};
use impact_risk::geo::SettlementCatalog;
use impact_risk::hazards::TsunamiTier;

const SETTLEMENTS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/settlements.yaml");

fn catalog() -> SettlementCatalog {
    SettlementCatalog::load(SETTLEMENTS).expect("bundled settlement catalog")
}

fn istanbul(diameter_m: f64) -> AssessmentRequest {
    AssessmentRequest::new(diameter_m, 3_000.0, 18_000.0, 45.0, 41.0082, 28.9784)
}

#[test]
fn istanbul_surface_impact() {
    let catalog = catalog();
    let context = AssessmentContext::offline(&catalog);
    let result = assess_impact(&istanbul(150.0), &context).expect("assessment");

    assert_eq!(result.impact_type, ImpactType::SurfaceImpact);
    assert!(!result.location.is_ocean());
    assert!(!result.global_event);
    assert!(result.tsunami.is_none());
    assert_eq!(result.data_source.surface, SurfaceSource::RegionHeuristic);
    assert!((200.0..210.0).contains(&result.kinetic_energy_mt), "{}", result.kinetic_energy_mt);
    assert!((3_300.0..3_360.0).contains(&result.parameters.crater_diameter_m));
    assert!((8.7..8.8).contains(&result.parameters.seismic_magnitude));
    assert_eq!(result.parameters.grid_cells_analyzed, 3_449);

    let by = result.casualties_by_hazard;
    assert_eq!(by.tsunami, 0);
    assert_eq!(by.cratering, 74_325);
    assert!(by.ejecta > 0);
    // Blast channels lead, wind ahead of overpressure; thermal trails seismic.
    assert!(by.wind_blast > by.overpressure);
    assert!(by.overpressure > by.seismic);
    assert!(by.seismic > by.thermal_radiation);
    assert!(by.thermal_radiation > by.ejecta);

    let sum: u64 = by.iter().map(|(_, n)| n).sum();
    let max = by.iter().map(|(_, n)| n).max().unwrap_or(0);
    assert!(result.total_casualties >= max / 3);
    assert!(result.total_casualties <= sum);

    match result.data_source.population {
        PopulationSource::Grid { settlement_cells, .. } => assert!(settlement_cells > 0),
        other => panic!("expected grid population, got {other:?}"),
    }
}

#[test]
fn critical_diameter_boundary() {
    let catalog = catalog();
    let context = AssessmentContext::offline(&catalog);
    let at = assess_impact(&istanbul(55.0), &context).expect("55 m");
    assert_eq!(at.impact_type, ImpactType::SurfaceImpact);
    let below = assess_impact(&istanbul(54.9), &context).expect("54.9 m");
    assert_eq!(below.impact_type, ImpactType::Airburst);
    assert_eq!(below.casualties_by_hazard.cratering, 0);
    assert_eq!(below.parameters.crater_diameter_m, 0.0);
}

#[test]
fn ten_kilometre_body_is_a_global_event() {
    let catalog = catalog();
    let context = AssessmentContext::offline(&catalog);
    let request = AssessmentRequest::new(10_000.0, 3_000.0, 20_000.0, 45.0, 48.8566, 2.3522);
    let result = assess_impact(&request, &context).expect("assessment");
    assert!(result.global_event);
    assert_eq!(result.total_casualties, 8_000_000_000);
    assert_eq!(result.data_source.population, PopulationSource::GlobalModel);
    assert_eq!(result.parameters.grid_cells_analyzed, 0);
    assert_eq!(result.casualties_by_hazard.tsunami, 0);
}

#[test]
fn mid_pacific_wave_stays_offshore() {
    let catalog = catalog();
    let context = AssessmentContext::offline(&catalog);
    let request = AssessmentRequest::new(60.0, 3_000.0, 12_000.0, 45.0, -10.0, -150.0)
        .with_water_depth(4_000.0);
    let result = assess_impact(&request, &context).expect("assessment");

    assert_eq!(result.impact_type, ImpactType::OceanImpact);
    assert_eq!(result.location.label(), "Pacific Ocean");
    assert_eq!(result.data_source.population, PopulationSource::CoastalModel);
    let tsunami = result.tsunami.as_ref().expect("tsunami section");
    assert_eq!(tsunami.tier, TsunamiTier::Moderate);
    assert!(!tsunami.coastal.reaches_coast);
    assert_eq!(tsunami.coastal.casualties, 0);
    assert_eq!(result.casualties_by_hazard.tsunami, 0);
}

#[test]
fn pacific_literal_inputs_reach_the_coast() {
    let catalog = catalog();
    let context = AssessmentContext::offline(&catalog);
    let request = AssessmentRequest::new(100.0, 3_000.0, 20_000.0, 45.0, -10.0, -150.0)
        .with_water_depth(4_000.0);
    let result = assess_impact(&request, &context).expect("assessment");

    assert_eq!(result.impact_type, ImpactType::OceanImpact);
    let tsunami = result.tsunami.as_ref().expect("tsunami section");
    assert_eq!(tsunami.tier, TsunamiTier::High);
    assert!(tsunami.coastal.reaches_coast);
    assert!(result.total_casualties > 0);
}

#[test]
fn tokyo_bay_airburst_counts_people_on_shore() {
    let catalog = catalog();
    let context = AssessmentContext::offline(&catalog);
    let request = AssessmentRequest::new(40.0, 3_000.0, 19_000.0, 45.0, 35.68, 139.69);
    let result = assess_impact(&request, &context).expect("assessment");

    assert_eq!(result.impact_type, ImpactType::Airburst);
    assert!(result.location.is_ocean());
    assert!(result.tsunami.is_none());
    assert!(result.parameters.grid_cells_analyzed > 0);
    assert!(result.total_casualties > 0);
    match result.data_source.population {
        PopulationSource::Grid { settlement_cells, .. } => assert!(settlement_cells > 0),
        other => panic!("expected grid population, got {other:?}"),
    }
}

#[test]
fn repeated_runs_agree() {
    let catalog = catalog();
    let context = AssessmentContext::offline(&catalog);
    let request = istanbul(90.0).with_grid_resolution(10.0);
    let first = assess_impact(&request, &context).expect("first");
    let second = assess_impact(&request, &context).expect("second");
    assert_eq!(first, second);
}

#[test]
fn everyone_indoors_spares_thermal() {
    let catalog = catalog();
    let context = AssessmentContext::offline(&catalog);
    let request = istanbul(80.0)
        .with_unsheltered_fraction(0.0)
        .with_grid_resolution(10.0);
    let result = assess_impact(&request, &context).expect("assessment");
    assert_eq!(result.casualties_by_hazard.thermal_radiation, 0);
    assert!(result.casualties_by_hazard.overpressure > 0);
}

#[test]
fn library_version_is_set() {
    assert_eq!(impact_risk::version(), env!("CARGO_PKG_VERSION"));
}
