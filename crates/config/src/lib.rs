//! Settlement catalogs and run settings for the impact risk workspace.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A populated place used to estimate local density.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SettlementRecord {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub population: u64,
    /// Residents per km².
    pub density: f64,
}

/// Settings file layout (`configs/impact.toml`).
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub assessment: AssessmentSettings,
    pub entry: EntrySettings,
    pub gazetteer: GazetteerSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AssessmentSettings {
    pub unsheltered_fraction: f64,
    pub grid_resolution_km: f64,
    pub settlement_search_km: f64,
    /// Settlement catalog, relative to the working directory.
    pub settlements: Option<PathBuf>,
}

impl Default for AssessmentSettings {
    fn default() -> Self {
        Self {
            unsheltered_fraction: 0.13,
            grid_resolution_km: 5.0,
            settlement_search_km: 300.0,
            settlements: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EntrySettings {
    pub initial_altitude_km: f64,
    pub time_step_s: f64,
    pub max_time_s: f64,
    pub fragmentation: String,
}

impl Default for EntrySettings {
    fn default() -> Self {
        Self {
            initial_altitude_km: 100.0,
            time_step_s: 0.01,
            max_time_s: 300.0,
            fragmentation: "pancake".to_string(),
        }
    }
}

/// Remote gazetteer access. Disabled unless a settings file turns it on.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GazetteerSettings {
    pub enabled: bool,
    pub base_url: String,
    pub username: String,
    pub timeout_secs: u64,
}

impl Default for GazetteerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://api.geonames.org".to_string(),
            username: "demo".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("settlement '{name}': {reason}")]
    InvalidSettlement { name: String, reason: String },
}

/// Load settlements from a YAML list, a single TOML record or a directory of TOML records.
pub fn load_settlements<P: AsRef<Path>>(path: P) -> Result<Vec<SettlementRecord>, ConfigError> {
    let records: Vec<SettlementRecord> = load_records(path)?;
    for record in &records {
        validate_settlement(record)?;
    }
    Ok(records)
}

/// Load settings from TOML; missing sections and keys take their defaults.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    read_toml(path.as_ref())
}

fn validate_settlement(record: &SettlementRecord) -> Result<(), ConfigError> {
    let reason = if !(-90.0..=90.0).contains(&record.lat) {
        Some(format!("latitude {} outside [-90, 90]", record.lat))
    } else if !(-180.0..=180.0).contains(&record.lng) {
        Some(format!("longitude {} outside [-180, 180]", record.lng))
    } else if !record.density.is_finite() || record.density < 0.0 {
        Some(format!("density {} must be non-negative", record.density))
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ConfigError::InvalidSettlement {
            name: record.name.clone(),
            reason,
        }),
        None => Ok(()),
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
}

/// A directory yields one record per `*.toml` file in name order; any other
/// file is read as a YAML list.
fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|file| is_toml(file))
            .collect();
        files.sort();
        files.iter().map(|file| read_toml(file)).collect()
    } else if is_toml(path) {
        Ok(vec![read_toml(path)?])
    } else {
        Ok(serde_yaml::from_reader(File::open(path)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn settings_defaults_fill_missing_keys() {
        let settings: Settings = toml::from_str("[assessment]\ngrid_resolution_km = 2.5\n")
            .expect("partial settings parse");
        assert_eq!(settings.assessment.grid_resolution_km, 2.5);
        assert_eq!(settings.assessment.unsheltered_fraction, 0.13);
        assert_eq!(settings.entry.fragmentation, "pancake");
        assert!(!settings.gazetteer.enabled);
        assert_eq!(settings.gazetteer.timeout_secs, 5);
    }

    #[test]
    fn loads_yaml_settlements() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().expect("tempfile");
        writeln!(
            file,
            "- {{ name: Testville, lat: 10.0, lng: 20.0, population: 1000, density: 50 }}"
        )
        .expect("write");
        let records = load_settlements(file.path()).expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Testville");
        assert_eq!(records[0].density, 50.0);
    }

    #[test]
    fn loads_toml_directory_in_name_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("b.toml"),
            "name = \"B\"\nlat = 1.0\nlng = 1.0\npopulation = 2\ndensity = 2.0\n",
        )
        .expect("write b");
        std::fs::write(
            dir.path().join("a.toml"),
            "name = \"A\"\nlat = 0.0\nlng = 0.0\npopulation = 1\ndensity = 1.0\n",
        )
        .expect("write a");
        std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write txt");
        let records = load_settlements(dir.path()).expect("load dir");
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn rejects_out_of_range_settlements() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().expect("tempfile");
        writeln!(
            file,
            "- {{ name: Nowhere, lat: 95.0, lng: 0.0, population: 1, density: 1 }}"
        )
        .expect("write");
        let err = load_settlements(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSettlement { ref name, .. } if name == "Nowhere"
        ));
    }
}
