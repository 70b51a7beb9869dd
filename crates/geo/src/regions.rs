//! Coarse land/ocean heuristic from latitude/longitude boxes.
//!
//! Boxes are checked in order and the first match wins, so overlapping
//! regions resolve to the earlier entry (the Pacific box, for instance,
//! swallows the Gulf of Mexico). Good enough as an offline fallback.

use impact_core::geo::normalize_lng;

use crate::{LookupError, SurfaceClassifier, SurfaceKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct RegionBoxClassifier;

impl RegionBoxClassifier {
    pub fn classify(&self, lat: f64, lng: f64) -> SurfaceKind {
        let lng = normalize_lng(lng);
        let basin = if lat < -65.0 {
            // Below 75°S is the Antarctic landmass.
            (lat >= -75.0).then_some("Southern Ocean")
        } else if lat > 70.0 {
            Some("Arctic Ocean")
        } else if (-65.0 < lat && lat < 65.0)
            && ((100.0 < lng && lng <= 180.0) || (-180.0 < lng && lng < -60.0))
        {
            Some("Pacific Ocean")
        } else if (-65.0 < lat && lat < 70.0) && (-60.0 < lng && lng < -10.0) {
            Some("Atlantic Ocean")
        } else if (-65.0 < lat && lat < 25.0) && (20.0 < lng && lng < 120.0) {
            Some("Indian Ocean")
        } else if (30.0 < lat && lat < 44.0) && (-6.0 < lng && lng < 36.0) {
            (!mediterranean_land(lat, lng)).then_some("Mediterranean Sea")
        } else if (41.0 < lat && lat < 47.0) && (27.0 < lng && lng < 42.0) {
            Some("Black Sea")
        } else if (12.0 < lat && lat < 30.0) && (32.0 < lng && lng < 44.0) {
            Some("Red Sea")
        } else if (24.0 < lat && lat < 30.0) && (48.0 < lng && lng < 57.0) {
            Some("Persian Gulf")
        } else {
            None
        };
        match basin {
            Some(name) => SurfaceKind::Ocean {
                basin: name.to_string(),
            },
            None => SurfaceKind::Land,
        }
    }
}

/// Anatolia, Greece and Italy inside the Mediterranean box.
fn mediterranean_land(lat: f64, lng: f64) -> bool {
    (lat > 36.5 && lng > 26.0 && lng < 36.0)
        || (lat > 38.5 && lng > 19.0 && lng < 28.0)
        || (lat > 41.5 && lng > 8.0 && lng < 18.0)
}

impl SurfaceClassifier for RegionBoxClassifier {
    fn classify_surface(&self, lat: f64, lng: f64) -> Result<SurfaceKind, LookupError> {
        Ok(self.classify(lat, lng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basin(lat: f64, lng: f64) -> String {
        RegionBoxClassifier.classify(lat, lng).label().to_string()
    }

    #[test]
    fn open_oceans() {
        assert_eq!(basin(0.0, -150.0), "Pacific Ocean");
        assert_eq!(basin(30.0, -40.0), "Atlantic Ocean");
        assert_eq!(basin(-20.0, 80.0), "Indian Ocean");
        assert_eq!(basin(80.0, 0.0), "Arctic Ocean");
        assert_eq!(basin(-70.0, 0.0), "Southern Ocean");
    }

    #[test]
    fn land_masses() {
        assert_eq!(basin(41.01, 28.98), "Land");
        assert_eq!(basin(48.86, 2.35), "Land");
        assert_eq!(basin(-80.0, 0.0), "Land");
        assert_eq!(basin(42.0, 12.5), "Land");
    }

    #[test]
    fn enclosed_seas() {
        assert_eq!(basin(35.0, 18.0), "Mediterranean Sea");
        assert_eq!(basin(43.0, 38.0), "Black Sea");
        assert_eq!(basin(27.0, 35.0), "Red Sea");
        assert_eq!(basin(27.0, 51.0), "Persian Gulf");
    }

    #[test]
    fn longitude_is_wrapped() {
        assert_eq!(basin(0.0, 210.0), "Pacific Ocean");
        assert!(RegionBoxClassifier.classify(0.0, 210.0).is_ocean());
    }
}
