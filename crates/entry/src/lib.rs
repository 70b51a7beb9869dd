//! Atmospheric entry of a single impactor: ablation, drag, breakup and energy deposition.

pub mod atmosphere;
pub mod estimate;
pub mod material;
pub mod validation;

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use impact_core::constants::{G0, JOULES_PER_KILOTON};
use impact_core::sphere;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, info_span};

pub use estimate::{AblationType, AtmosphericEstimate, EntryWarning, estimate_entry};
pub use material::{MaterialClass, MaterialProperties};
pub use validation::{
    ChelyabinskValidation, ObservedEvent, chelyabinsk_request, validate_chelyabinsk,
};

/// Luminous efficiency applied to the ablated kinetic energy.
const LUMINOUS_EFFICIENCY: f64 = 0.1;
/// Heat transfer coefficient of the ablation equation.
const HEAT_TRANSFER_COEFFICIENT: f64 = 0.5;
/// Reference density used by the pancake spreading rate.
const PANCAKE_REFERENCE_DENSITY: f64 = 3_000.0;
/// Number of equal pieces in the discrete breakup.
const DISCRETE_FRAGMENTS: f64 = 10.0;
/// Entry stops once the body has slowed below this speed (m/s).
const TERMINAL_SPEED_M_S: f64 = 100.0;

/// How the body behaves once aerodynamic loading exceeds its strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentationModel {
    /// Fragments stay together as a spreading debris cloud.
    #[default]
    Pancake,
    /// The body splits into ten pieces and the leading one is followed.
    Discrete,
}

impl FromStr for FragmentationModel {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pancake" => Ok(FragmentationModel::Pancake),
            "discrete" => Ok(FragmentationModel::Discrete),
            _ => Err(EntryError::UnknownFragmentation(s.to_string())),
        }
    }
}

impl fmt::Display for FragmentationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentationModel::Pancake => f.write_str("pancake"),
            FragmentationModel::Discrete => f.write_str("discrete"),
        }
    }
}

/// Request to integrate one entry trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRequest {
    pub diameter_m: f64,
    pub velocity_m_s: f64,
    pub angle_deg: f64,
    pub material: MaterialClass,
    pub initial_altitude_m: f64,
    pub fragmentation: FragmentationModel,
    pub time_step_s: f64,
    pub max_time_s: f64,
}

impl EntryRequest {
    /// Request with the default start altitude (100 km), pancake breakup, 10 ms step and 300 s cap.
    pub fn new(
        diameter_m: f64,
        velocity_m_s: f64,
        angle_deg: f64,
        material: MaterialClass,
    ) -> Self {
        Self {
            diameter_m,
            velocity_m_s,
            angle_deg,
            material,
            initial_altitude_m: 100_000.0,
            fragmentation: FragmentationModel::Pancake,
            time_step_s: 0.01,
            max_time_s: 300.0,
        }
    }

    pub fn with_fragmentation(mut self, fragmentation: FragmentationModel) -> Self {
        self.fragmentation = fragmentation;
        self
    }

    fn validate(&self) -> Result<(), EntryError> {
        check_range("diameter_m", self.diameter_m, |v| v > 0.0 && v <= 10_000.0, "(0, 10000] m")?;
        check_range(
            "velocity_m_s",
            self.velocity_m_s,
            |v| (5_000.0..=75_000.0).contains(&v),
            "[5000, 75000] m/s",
        )?;
        check_range("angle_deg", self.angle_deg, |v| (5.0..=90.0).contains(&v), "[5, 90] deg")?;
        check_range("initial_altitude_m", self.initial_altitude_m, |v| v > 0.0, "> 0 m")?;
        check_range("time_step_s", self.time_step_s, |v| v > 0.0, "> 0 s")?;
        check_range("max_time_s", self.max_time_s, |v| v > 0.0, "> 0 s")?;
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    ok: impl Fn(f64) -> bool,
    expected: &'static str,
) -> Result<(), EntryError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(EntryError::OutOfRange {
            field,
            value,
            expected,
        })
    }
}

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("{field} = {value} is outside the valid range {expected}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("unknown material '{0}' (expected chondrite, stony, iron or cometary)")]
    UnknownMaterial(String),
    #[error("unknown fragmentation model '{0}' (expected pancake or discrete)")]
    UnknownFragmentation(String),
}

/// One integrator snapshot, recorded after each step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryState {
    pub time_s: f64,
    pub altitude_m: f64,
    pub speed_m_s: f64,
    pub mass_kg: f64,
    pub radius_m: f64,
    pub luminosity_w: f64,
    pub dynamic_pressure_pa: f64,
    pub energy_deposited_j: f64,
    /// Set from the step breakup began onward.
    pub fragmented: bool,
}

/// Summary of an integrated entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryOutcome {
    pub material: MaterialClass,
    pub initial_mass_kg: f64,
    pub final_mass_kg: f64,
    pub final_diameter_m: f64,
    pub final_velocity_m_s: f64,
    pub final_altitude_m: f64,
    pub airburst_altitude_km: f64,
    pub peak_luminosity_w: f64,
    pub total_energy_deposited_j: f64,
    pub tnt_equivalent_kt: f64,
    pub max_dynamic_pressure_pa: f64,
    pub fragmented: bool,
    pub fragmentation: Option<FragmentationModel>,
    pub reaches_ground: bool,
    pub integration_steps: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub time_series: Vec<TrajectoryState>,
}

/// Integrate the entry with an explicit Euler scheme until the body lands,
/// burns out, slows below 100 m/s or the time budget is spent.
pub fn simulate_entry(request: &EntryRequest) -> Result<EntryOutcome, EntryError> {
    request.validate()?;

    let span = info_span!(
        "entry",
        diameter_m = request.diameter_m,
        velocity_m_s = request.velocity_m_s,
        angle_deg = request.angle_deg,
        material = %request.material,
        fragmentation = %request.fragmentation
    );
    let _guard = span.enter();

    let props = request.material.properties();
    let dt = request.time_step_s;
    let max_steps = (request.max_time_s / dt) as usize;

    let initial_mass = sphere::mass(request.diameter_m, props.density_kg_m3);
    let mut mass = initial_mass;
    let mut radius = request.diameter_m / 2.0;

    let angle = request.angle_deg.to_radians();
    let mut vx = request.velocity_m_s * angle.cos();
    let mut vy = -request.velocity_m_s * angle.sin();
    let mut x = 0.0_f64;
    let mut y = request.initial_altitude_m;

    let mut fragmented = false;
    let mut total_energy = 0.0_f64;
    let mut peak_luminosity = 0.0_f64;
    let mut peak_altitude_m: Option<f64> = None;
    let mut max_q = 0.0_f64;
    let mut time = 0.0_f64;
    let mut steps = 0usize;
    let mut series = Vec::new();

    while steps < max_steps && y > 0.0 {
        let speed = vx.hypot(vy);
        let rho = atmosphere::density(y);
        if mass <= 0.0 || speed < TERMINAL_SPEED_M_S {
            break;
        }

        let q = 0.5 * rho * speed * speed;
        if !fragmented && q > props.tensile_strength_pa {
            fragmented = true;
            debug!(altitude_m = y, dynamic_pressure_pa = q, "breakup");
            if request.fragmentation == FragmentationModel::Discrete {
                mass /= DISCRETE_FRAGMENTS;
                radius = sphere::radius_from_mass(mass, props.density_kg_m3);
            }
        }
        let spreading = fragmented && request.fragmentation == FragmentationModel::Pancake;
        if spreading {
            radius += speed * (rho / PANCAKE_REFERENCE_DENSITY).sqrt() * dt;
        }

        let area = PI * radius * radius;
        let drag = props.drag_coefficient * area * rho * speed * speed;
        let dm_dt = -(HEAT_TRANSFER_COEFFICIENT * area * rho * speed.powi(3))
            / (2.0 * props.ablation_heat_j_kg);
        let luminosity = -0.5 * LUMINOUS_EFFICIENCY * dm_dt * speed * speed;

        if luminosity > peak_luminosity {
            peak_luminosity = luminosity;
            peak_altitude_m = Some(y);
        }
        total_energy += 0.5 * dm_dt.abs() * dt * speed * speed;
        max_q = max_q.max(q);

        let new_mass = (mass + dm_dt * dt).max(0.0);
        if new_mass > 0.0 {
            if spreading {
                radius *= (new_mass / mass).cbrt();
            } else {
                radius = sphere::radius_from_mass(new_mass, props.density_kg_m3);
            }
        }

        let ax = -drag * vx / (mass * speed);
        let ay = -drag * vy / (mass * speed) - G0;
        x += vx * dt;
        y += vy * dt;
        vx += ax * dt;
        vy += ay * dt;
        mass = new_mass;

        series.push(TrajectoryState {
            time_s: time,
            altitude_m: y,
            speed_m_s: vx.hypot(vy),
            mass_kg: mass,
            radius_m: radius,
            luminosity_w: luminosity,
            dynamic_pressure_pa: q,
            energy_deposited_j: total_energy,
            fragmented,
        });

        time += dt;
        steps += 1;
    }

    let retention = if initial_mass > 0.0 { mass / initial_mass } else { 0.0 };
    let outcome = EntryOutcome {
        material: request.material,
        initial_mass_kg: initial_mass,
        final_mass_kg: mass,
        final_diameter_m: request.diameter_m * retention.cbrt(),
        final_velocity_m_s: vx.hypot(vy),
        final_altitude_m: y,
        airburst_altitude_km: peak_altitude_m.unwrap_or(y) / 1_000.0,
        peak_luminosity_w: peak_luminosity,
        total_energy_deposited_j: total_energy,
        tnt_equivalent_kt: total_energy / JOULES_PER_KILOTON,
        max_dynamic_pressure_pa: max_q,
        fragmented,
        fragmentation: fragmented.then_some(request.fragmentation),
        reaches_ground: y <= 0.0 && mass > 0.0,
        integration_steps: steps,
        time_series: series,
    };

    info!(
        downrange_km = x / 1_000.0,
        airburst_altitude_km = outcome.airburst_altitude_km,
        tnt_equivalent_kt = outcome.tnt_equivalent_kt,
        reaches_ground = outcome.reaches_ground,
        "entry integrated"
    );
    Ok(outcome)
}
