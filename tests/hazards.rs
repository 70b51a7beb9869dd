use impact_risk::assess::kinetic_energy;
use impact_risk::hazards::{
    HazardError, SeismicLevel, ejecta_thickness_m, overpressure_pa, seismic_effect,
    seismic_magnitude, thermal_flux_j_m2, tsunami_risk, wind_speed_m_s,
};

#[test]
fn fields_around_a_two_hundred_megaton_strike() {
    let energy = kinetic_energy(150.0, 3_000.0, 18_000.0).joules;
    let distances = [1_000.0, 5_000.0, 20_000.0, 80_000.0, 300_000.0];
    for pair in distances.windows(2) {
        let (near, far) = (pair[0], pair[1]);
        assert!(overpressure_pa(near, energy, 0.0) >= overpressure_pa(far, energy, 0.0));
        assert!(wind_speed_m_s(near, energy, 0.0) >= wind_speed_m_s(far, energy, 0.0));
        assert!(thermal_flux_j_m2(near, energy, 0.0) > thermal_flux_j_m2(far, energy, 0.0));
        assert!(ejecta_thickness_m(near, 3_300.0) >= ejecta_thickness_m(far, 3_300.0));
    }
    // Light structural damage (> 3 kPa) still reaches 80 km out.
    assert!(overpressure_pa(80_000.0, energy, 0.0) > 3_000.0);
}

#[test]
fn seismic_summary() {
    let energy = kinetic_energy(150.0, 3_000.0, 18_000.0).joules;
    let effect = seismic_effect(energy).expect("positive energy");
    assert_eq!(effect.level, SeismicLevel::Catastrophic);
    assert!((effect.magnitude_richter - seismic_magnitude(energy)).abs() < 1e-12);
    assert!(effect.felt_distance_km > 1_000.0);

    assert!(matches!(seismic_effect(0.0), Err(HazardError::NonPositiveEnergy(_))));
    assert_eq!(seismic_magnitude(-1.0), 0.0);
}

#[test]
fn tsunami_reach_grows_with_energy() {
    let mut previous = 0.0;
    for diameter in [50.0, 100.0, 300.0, 1_000.0] {
        let energy = kinetic_energy(diameter, 3_000.0, 20_000.0).joules;
        let risk = tsunami_risk(energy, 2.0);
        assert!(risk.range_km >= previous);
        assert!(risk.height_m <= 300.0);
        previous = risk.range_km;
    }
}
