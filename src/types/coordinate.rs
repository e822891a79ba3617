use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// WGS84 position. Serialized in GeoJSON order, `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateParseError {
    #[error("expected \"lon,lat\", got \"{0}\"")]
    Malformed(String),
    #[error("coordinate out of range: {0}")]
    OutOfRange(String),
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Coordinate { lon, lat }
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// Parses a `lon,lat;lon,lat;...` list as used by the route and weather endpoints.
    pub fn parse_list(raw: &str) -> Result<Vec<Coordinate>, CoordinateParseError> {
        raw.split(';')
            .filter(|p| !p.trim().is_empty())
            .map(str::parse)
            .collect()
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Coordinate { lon, lat }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lon, c.lat]
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoordinateParseError::Malformed(s.to_string());

        let (lon, lat) = s.trim().split_once(',').ok_or_else(malformed)?;
        let lon = lon.trim().parse::<f64>().map_err(|_| malformed())?;
        let lat = lat.trim().parse::<f64>().map_err(|_| malformed())?;

        let coordinate = Coordinate::new(lon, lat);
        if !coordinate.is_valid() {
            return Err(CoordinateParseError::OutOfRange(s.to_string()));
        }

        Ok(coordinate)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}
