//! Geographic positions and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean earth radius used for distance calculations.
pub const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// A (latitude, longitude) pair in decimal degrees.
///
/// # Examples
///
/// ```
/// use smart_routes::domain::Location;
///
/// let a = Location::new(39.1031, -84.5120);
/// let b = Location::new(39.1031, -84.5120);
/// assert_eq!(a.distance_to(&b), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Create a location from decimal degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle (haversine) distance to `other`, in metres.
    pub fn distance_to(&self, other: &Location) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_METRES * c
    }

    /// Returns true if both coordinates are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let home = Location::new(39.122309, -84.507639);
        let work = Location::new(39.133292, -84.515099);
        let there = home.distance_to(&work);
        let back = work.distance_to(&home);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn distance_of_known_pair() {
        // One degree of latitude is about 111.2 km.
        let a = Location::new(0.0, 0.0);
        let b = Location::new(1.0, 0.0);
        let d = a.distance_to(&b);
        assert!((d - 111_195.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn validity() {
        assert!(Location::new(39.1, -84.5).is_valid());
        assert!(!Location::new(91.0, 0.0).is_valid());
        assert!(!Location::new(0.0, -181.0).is_valid());
        assert!(!Location::new(f64::NAN, 0.0).is_valid());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Triangle inequality holds for great-circle distance
        #[test]
        fn triangle_inequality(
            lat1 in -80.0f64..80.0, lon1 in -179.0f64..179.0,
            lat2 in -80.0f64..80.0, lon2 in -179.0f64..179.0,
            lat3 in -80.0f64..80.0, lon3 in -179.0f64..179.0,
        ) {
            let a = Location::new(lat1, lon1);
            let b = Location::new(lat2, lon2);
            let c = Location::new(lat3, lon3);
            prop_assert!(a.distance_to(&c) <= a.distance_to(&b) + b.distance_to(&c) + 1e-3);
        }
    }
}
