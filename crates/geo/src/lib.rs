//! Geographic collaborators of the assessment: where people live and whether a point is water.
//!
//! The assessment only talks to the [`SettlementLookup`] and [`SurfaceClassifier`]
//! traits. Three implementations ship here: an in-process settlement catalog,
//! a coordinate-box ocean heuristic, and a blocking GeoNames client.

pub mod catalog;
pub mod gazetteer;
pub mod regions;

use serde::Serialize;
use thiserror::Error;

pub use catalog::SettlementCatalog;
pub use gazetteer::GeoNamesClient;
pub use regions::RegionBoxClassifier;

/// Closest known settlement to a query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestSettlement {
    pub name: String,
    pub distance_km: f64,
    /// Residents per km² at the settlement itself.
    pub density: f64,
    pub population: u64,
}

/// Land/ocean classification of a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceKind {
    Ocean { basin: String },
    Land,
}

impl SurfaceKind {
    pub fn is_ocean(&self) -> bool {
        matches!(self, SurfaceKind::Ocean { .. })
    }

    /// Basin name for water, "Land" otherwise.
    pub fn label(&self) -> &str {
        match self {
            SurfaceKind::Ocean { basin } => basin,
            SurfaceKind::Land => "Land",
        }
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("lookup service reported an error: {0}")]
    Service(String),
    #[error("lookup unavailable: {0}")]
    Unavailable(String),
}

/// Nearest populated place within `max_km` of a point.
pub trait SettlementLookup {
    fn nearest_settlement(
        &self,
        lat: f64,
        lng: f64,
        max_km: f64,
    ) -> Result<Option<NearestSettlement>, LookupError>;
}

/// Land or water at a point.
pub trait SurfaceClassifier {
    fn classify_surface(&self, lat: f64, lng: f64) -> Result<SurfaceKind, LookupError>;
}
