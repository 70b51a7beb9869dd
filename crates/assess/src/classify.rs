//! Energy, airburst altitude, impact type and crater size.

use std::fmt;

use impact_core::sphere;
use impact_core::units::{joules_to_kilotons, joules_to_megatons};
use impact_entry::{AtmosphericEstimate, estimate_entry};
use serde::Serialize;

/// Multiplier applied on top of the 1.8 × d × (v/12 km/s)^0.44 × sin(θ)^0.33 scaling.
/// Uncalibrated fit constant; crater sizes inherit its uncertainty.
pub const CRATER_FIT_FACTOR: f64 = 13.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KineticEnergy {
    pub mass_kg: f64,
    pub joules: f64,
    pub kilotons: f64,
    pub megatons: f64,
}

/// Kinetic energy of a homogeneous sphere.
pub fn kinetic_energy(diameter_m: f64, density_kg_m3: f64, velocity_m_s: f64) -> KineticEnergy {
    let mass_kg = sphere::mass(diameter_m, density_kg_m3);
    let joules = 0.5 * mass_kg * velocity_m_s * velocity_m_s;
    KineticEnergy {
        mass_kg,
        joules,
        kilotons: joules_to_kilotons(joules),
        megatons: joules_to_megatons(joules),
    }
}

/// Height of peak energy release (km) from an empirical density-class fit, clamped to [0, 50].
pub fn airburst_altitude_estimate(
    diameter_m: f64,
    density_kg_m3: f64,
    velocity_m_s: f64,
    angle_deg: f64,
) -> f64 {
    let (h0, alpha) = if density_kg_m3 > 2_500.0 {
        (8.0, 0.6)
    } else if density_kg_m3 > 1_500.0 {
        (15.0, 0.7)
    } else {
        (25.0, 0.8)
    };
    let size = (diameter_m / 100.0).clamp(0.2, 1.0);
    let velocity = velocity_m_s / 20_000.0;
    let altitude =
        h0 * (1.0 - alpha * size) * (1.0 + 0.3 * velocity) * angle_deg.to_radians().sin();
    altitude.clamp(0.0, 50.0)
}

/// Diameter below which a body of this density is expected to airburst.
pub fn critical_diameter_m(density_kg_m3: f64) -> f64 {
    if density_kg_m3 > 2_500.0 {
        55.0
    } else if density_kg_m3 > 1_500.0 {
        40.0
    } else {
        30.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hazard {
    Overpressure,
    WindBlast,
    ThermalRadiation,
    Seismic,
    Ejecta,
    Cratering,
    Tsunami,
}

impl Hazard {
    pub const ALL: [Hazard; 7] = [
        Hazard::Overpressure,
        Hazard::WindBlast,
        Hazard::ThermalRadiation,
        Hazard::Seismic,
        Hazard::Ejecta,
        Hazard::Cratering,
        Hazard::Tsunami,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Hazard::Overpressure => "Overpressure",
            Hazard::WindBlast => "Wind blast",
            Hazard::ThermalRadiation => "Thermal radiation",
            Hazard::Seismic => "Seismic shaking",
            Hazard::Ejecta => "Ejecta",
            Hazard::Cratering => "Cratering",
            Hazard::Tsunami => "Tsunami",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImpactType {
    Airburst,
    #[serde(rename = "Surface Impact")]
    SurfaceImpact,
    #[serde(rename = "Ocean Impact")]
    OceanImpact,
}

impl ImpactType {
    /// Hazards modelled for this kind of event.
    pub fn hazards(self) -> &'static [Hazard] {
        match self {
            ImpactType::Airburst => &[
                Hazard::Overpressure,
                Hazard::WindBlast,
                Hazard::ThermalRadiation,
            ],
            ImpactType::OceanImpact => &[
                Hazard::Overpressure,
                Hazard::WindBlast,
                Hazard::ThermalRadiation,
                Hazard::Tsunami,
            ],
            ImpactType::SurfaceImpact => &[
                Hazard::Overpressure,
                Hazard::WindBlast,
                Hazard::ThermalRadiation,
                Hazard::Seismic,
                Hazard::Ejecta,
                Hazard::Cratering,
            ],
        }
    }

    pub fn applies(self, hazard: Hazard) -> bool {
        self.hazards().contains(&hazard)
    }
}

impl fmt::Display for ImpactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImpactType::Airburst => "Airburst",
            ImpactType::SurfaceImpact => "Surface Impact",
            ImpactType::OceanImpact => "Ocean Impact",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Crater {
    pub diameter_m: f64,
    pub radius_m: f64,
    pub depth_m: f64,
}

impl Crater {
    pub fn from_diameter(diameter_m: f64) -> Self {
        Self {
            diameter_m,
            radius_m: diameter_m / 2.0,
            depth_m: diameter_m / 5.0,
        }
    }
}

/// Transient crater from the post-atmosphere body.
pub fn crater_scaling(final_diameter_m: f64, final_velocity_m_s: f64, angle_deg: f64) -> Crater {
    let velocity_factor = (final_velocity_m_s / 12_000.0).powf(0.44);
    let angle_factor = angle_deg.to_radians().sin().max(0.0).powf(0.33);
    Crater::from_diameter(
        1.8 * final_diameter_m * velocity_factor * angle_factor * CRATER_FIT_FACTOR,
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct ImpactClassification {
    pub impact_type: ImpactType,
    pub hazards: Vec<Hazard>,
    pub crater: Crater,
    pub airburst_altitude_km: f64,
    pub entry: AtmosphericEstimate,
}

/// Decide between airburst, surface and ocean impact and size the crater.
///
/// A body strictly smaller than the critical diameter, or one that the coarse
/// entry estimate says burns up, is an airburst and leaves no crater.
pub fn classify_impact(
    diameter_m: f64,
    density_kg_m3: f64,
    velocity_m_s: f64,
    angle_deg: f64,
    is_ocean: bool,
) -> ImpactClassification {
    let entry = estimate_entry(diameter_m, velocity_m_s, density_kg_m3, angle_deg);
    let airburst_altitude_km =
        airburst_altitude_estimate(diameter_m, density_kg_m3, velocity_m_s, angle_deg);

    let impact_type = if diameter_m < critical_diameter_m(density_kg_m3) || !entry.reaches_ground {
        ImpactType::Airburst
    } else if is_ocean {
        ImpactType::OceanImpact
    } else {
        ImpactType::SurfaceImpact
    };

    let crater = match impact_type {
        ImpactType::Airburst => Crater::default(),
        _ => crater_scaling(entry.final_diameter_m, entry.final_velocity_m_s, angle_deg),
    };

    ImpactClassification {
        impact_type,
        hazards: impact_type.hazards().to_vec(),
        crater,
        airburst_altitude_km,
        entry,
    }
}
