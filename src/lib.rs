//! Asteroid impact physics and risk assessment.
//!
//! The workspace crates are re-exported here so front-ends (the CLI
//! binaries, the trajectory plotter, integration tests) share one entry point.

pub use impact_assess as assess;
pub use impact_config as config;
pub use impact_core as physics;
pub use impact_entry as entry;
pub use impact_export as export;
pub use impact_geo as geo;
pub use impact_hazards as hazards;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
