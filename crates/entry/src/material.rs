//! Fixed material table for impactor bodies.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::EntryError;

/// Physical constants for one material class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialProperties {
    pub name: &'static str,
    pub density_kg_m3: f64,
    pub tensile_strength_pa: f64,
    pub ablation_heat_j_kg: f64,
    pub emissivity: f64,
    pub drag_coefficient: f64,
}

const STONY: MaterialProperties = MaterialProperties {
    name: "Chondrite (Stony)",
    density_kg_m3: 3_000.0,
    tensile_strength_pa: 3.0e6,
    ablation_heat_j_kg: 8.0e6,
    emissivity: 0.9,
    drag_coefficient: 0.75,
};

const IRON: MaterialProperties = MaterialProperties {
    name: "Iron",
    density_kg_m3: 7_500.0,
    tensile_strength_pa: 300.0e6,
    ablation_heat_j_kg: 10.0e6,
    emissivity: 0.7,
    drag_coefficient: 0.75,
};

const COMETARY: MaterialProperties = MaterialProperties {
    name: "Cometary",
    density_kg_m3: 1_000.0,
    tensile_strength_pa: 2.0e3,
    ablation_heat_j_kg: 2.0e6,
    emissivity: 0.95,
    drag_coefficient: 0.75,
};

/// Material class of an impactor. "chondrite" and "stony" both name [`MaterialClass::Stony`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialClass {
    #[default]
    Stony,
    Iron,
    Cometary,
}

impl MaterialClass {
    /// Constant properties for this class.
    pub fn properties(self) -> &'static MaterialProperties {
        match self {
            MaterialClass::Stony => &STONY,
            MaterialClass::Iron => &IRON,
            MaterialClass::Cometary => &COMETARY,
        }
    }

    /// Case-insensitive lookup that falls back to stony for unknown names.
    pub fn lookup(name: &str) -> MaterialClass {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for MaterialClass {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chondrite" | "stony" => Ok(MaterialClass::Stony),
            "iron" => Ok(MaterialClass::Iron),
            "cometary" => Ok(MaterialClass::Cometary),
            _ => Err(EntryError::UnknownMaterial(s.to_string())),
        }
    }
}

impl fmt::Display for MaterialClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.properties().name)
    }
}
