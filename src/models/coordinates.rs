use geo::Point;
use serde::{Deserialize, Serialize};

/// WGS84 latitude/longitude in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        let coords = Coordinates { lat, lng };
        coords.validate()?;
        Ok(coords)
    }

    /// Check the range invariants. Fields are public, so values that arrived
    /// through deserialization are re-checked before any distance math.
    pub fn validate(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                self.lat
            ));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                self.lng
            ));
        }
        Ok(())
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(c: Coordinates) -> Self {
        // geo points are (x = longitude, y = latitude)
        Point::new(c.lng, c.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(36.0, -89.0).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err()); // Invalid lat
        assert!(Coordinates::new(0.0, 181.0).is_err()); // Invalid lng
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_deserialized_values_are_rechecked() {
        let coords: Coordinates = serde_json::from_str(r#"{"lat": 120.0, "lng": 10.0}"#).unwrap();
        assert!(coords.validate().is_err());
    }

    #[test]
    fn test_point_conversion_swaps_axes() {
        let point: Point<f64> = Coordinates::new(36.0, -89.0).unwrap().into();
        assert_eq!(point.x(), -89.0);
        assert_eq!(point.y(), 36.0);
    }
}
