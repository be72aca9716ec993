use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use serde::{Deserialize, Serialize};
use shared::GeoPoint;

use crate::geo::haversine_m;

/// Circular area flagged as high risk regardless of how a route scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskZone {
    pub center: GeoPoint,
    pub radius_m: f64,
}

impl RiskZone {
    /// Strictly inside the circle; a point exactly on the boundary is out.
    pub fn contains(&self, point: GeoPoint) -> bool {
        haversine_m(point, self.center) < self.radius_m
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RiskZoneError {
    #[error("failed to read risk zone file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid risk zone definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("risk zone radius must be strictly positive, got {0}")]
    InvalidRadius(f64),
}

/// Static set of high-risk zones, loaded once at startup.
///
/// Intersection is a vertex scan: a route is flagged when any of its path
/// vertices falls inside a zone. Segments that cut through a zone between
/// two outside vertices are not detected, which is acceptable at the point
/// densities the routing engine returns (a few meters apart in dense areas).
#[derive(Debug, Clone)]
pub struct RiskZoneIndex {
    zones: Vec<RiskZone>,
}

impl RiskZoneIndex {
    pub fn new(zones: Vec<RiskZone>) -> Result<Self, RiskZoneError> {
        if let Some(zone) = zones
            .iter()
            .find(|z| !z.radius_m.is_finite() || z.radius_m <= 0.0)
        {
            return Err(RiskZoneError::InvalidRadius(zone.radius_m));
        }
        Ok(Self { zones })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RiskZoneError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, RiskZoneError> {
        let zones: Vec<RiskZone> = serde_json::from_reader(reader)?;
        Self::new(zones)
    }

    pub fn zones(&self) -> &[RiskZone] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// True when any path vertex lies inside any zone.
    pub fn intersects(&self, path: &[GeoPoint]) -> bool {
        path.iter()
            .any(|point| self.zones.iter().any(|zone| zone.contains(*point)))
    }
}

impl Default for RiskZoneIndex {
    /// The built-in Mumbai zones used when no zone file is configured.
    fn default() -> Self {
        Self {
            zones: vec![
                RiskZone {
                    center: GeoPoint {
                        lat: 19.0176,
                        lng: 72.8561,
                    },
                    radius_m: 1000.0,
                },
                RiskZone {
                    center: GeoPoint {
                        lat: 18.9500,
                        lng: 72.8200,
                    },
                    radius_m: 800.0,
                },
            ],
        }
    }
}
