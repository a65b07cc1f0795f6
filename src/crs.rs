use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::MapPoint;

/// A coordinate reference system, identified by its authority id (e.g. `EPSG:4326`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crs {
    authid: String,
}

impl Crs {
    pub fn new(authid: impl Into<String>) -> Self {
        Self {
            authid: authid.into().to_uppercase(),
        }
    }

    pub fn wgs84() -> Self {
        Self::new(WGS84)
    }

    pub fn web_mercator() -> Self {
        Self::new(WEB_MERCATOR)
    }

    pub fn authid(&self) -> &str {
        &self.authid
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.authid)
    }
}

const WGS84: &str = "EPSG:4326";
const WEB_MERCATOR: &str = "EPSG:3857";
const EARTH_RADIUS: f64 = 6_378_137.0;
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    #[error("No transformation available from {from} to {to}")]
    Unsupported { from: Crs, to: Crs },

    #[error("Point {point} cannot be transformed from {from} to {to}")]
    InvalidPoint { point: MapPoint, from: Crs, to: Crs },
}

/// Reprojects points between reference systems
pub trait CoordinateTransformer {
    fn transform(&self, point: MapPoint, from: &Crs, to: &Crs) -> Result<MapPoint, TransformError>;
}

/// Transformer that knows identity plus WGS 84 and Web Mercator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTransformer;

impl CoordinateTransformer for BuiltinTransformer {
    fn transform(&self, point: MapPoint, from: &Crs, to: &Crs) -> Result<MapPoint, TransformError> {
        if from == to {
            return Ok(point);
        }

        let invalid = || TransformError::InvalidPoint {
            point,
            from: from.clone(),
            to: to.clone(),
        };

        match (from.authid(), to.authid()) {
            (WGS84, WEB_MERCATOR) => {
                if !(-180.0..=180.0).contains(&point.x) || point.y.abs() > MAX_MERCATOR_LAT {
                    return Err(invalid());
                }
                let x = EARTH_RADIUS * point.x.to_radians();
                let y = EARTH_RADIUS * (PI / 4.0 + point.y.to_radians() / 2.0).tan().ln();
                Ok(MapPoint::new(x, y))
            }
            (WEB_MERCATOR, WGS84) => {
                if !point.x.is_finite() || !point.y.is_finite() {
                    return Err(invalid());
                }
                let lon = (point.x / EARTH_RADIUS).to_degrees();
                let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
                Ok(MapPoint::new(lon, lat))
            }
            _ => Err(TransformError::Unsupported {
                from: from.clone(),
                to: to.clone(),
            }),
        }
    }
}
