use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geographic point (lon/lat), in the order the map engine and search API use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid coordinate ({longitude}, {latitude})")]
pub struct InvalidCoordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, InvalidCoordinate> {
        let valid = longitude.is_finite()
            && latitude.is_finite()
            && (-180.0..=180.0).contains(&longitude)
            && (-90.0..=90.0).contains(&latitude);

        if valid {
            Ok(Self {
                longitude,
                latitude,
            })
        } else {
            Err(InvalidCoordinate {
                longitude,
                latitude,
            })
        }
    }

    /// Value for the search API's `proximity` parameter: "lng,lat"
    pub fn proximity(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.longitude, self.latitude)
    }
}

impl From<Coordinate> for geo_types::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo_types::Point::new(c.longitude, c.latitude)
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from([lng, lat]: [f64; 2]) -> Result<Self, Self::Error> {
        Coordinate::new(lng, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinate() {
        let c = Coordinate::new(77.21, 28.61).unwrap();
        assert_eq!(c.proximity(), "77.21,28.61");

        let point: geo_types::Point<f64> = c.into();
        assert_eq!(point.x(), 77.21);
        assert_eq!(point.y(), 28.61);
    }

    #[test]
    fn test_out_of_range() {
        assert!(Coordinate::new(181.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -90.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_from_lng_lat_pair() {
        let c = Coordinate::try_from([-0.1276, 51.5072]).unwrap();
        assert_eq!(c.longitude, -0.1276);
        assert_eq!(c.latitude, 51.5072);
    }
}
