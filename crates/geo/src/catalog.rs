use std::path::Path;

use impact_config::{ConfigError, SettlementRecord, load_settlements};
use impact_core::geo::local_distance_km;

use crate::{LookupError, NearestSettlement, SettlementLookup};

/// In-memory settlement table searched by flat-earth distance.
#[derive(Debug, Clone, Default)]
pub struct SettlementCatalog {
    records: Vec<SettlementRecord>,
}

impl SettlementCatalog {
    pub fn new(records: Vec<SettlementRecord>) -> Self {
        Self { records }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Ok(Self::new(load_settlements(path)?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SettlementRecord] {
        &self.records
    }

    /// Closest record regardless of distance.
    pub fn closest(&self, lat: f64, lng: f64) -> Option<(&SettlementRecord, f64)> {
        self.records
            .iter()
            .map(|record| {
                let distance = local_distance_km(lat, lat, lng, record.lat, record.lng);
                (record, distance)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl SettlementLookup for SettlementCatalog {
    fn nearest_settlement(
        &self,
        lat: f64,
        lng: f64,
        max_km: f64,
    ) -> Result<Option<NearestSettlement>, LookupError> {
        Ok(self
            .closest(lat, lng)
            .filter(|(_, distance)| *distance <= max_km)
            .map(|(record, distance_km)| NearestSettlement {
                name: record.name.clone(),
                distance_km,
                density: record.density,
                population: record.population,
            }))
    }
}
