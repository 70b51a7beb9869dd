//! Impact classification, population exposure and casualty assessment.

pub mod assessment;
pub mod classify;
pub mod coastal;
pub mod estimate;
pub mod exposure;
pub mod vulnerability;

pub use facade::*;
pub use impact_entry as entry;
pub use impact_geo as geo;
pub use impact_hazards as hazards;

mod facade;
