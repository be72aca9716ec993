use shared::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Two points closer than this (in planar degree space) have no usable
/// direction between them.
pub const COINCIDENT_EPS_DEG: f64 = 1e-9;

/// Displacement between two points in planar degree space. Over the few
/// kilometers a city route spans, treating degrees as a flat plane is
/// accurate enough for corridor geometry.
#[derive(Debug, Clone, Copy)]
pub struct DegreeVec {
    pub lat: f64,
    pub lng: f64,
}

impl DegreeVec {
    pub fn between(start: GeoPoint, end: GeoPoint) -> Self {
        Self {
            lat: end.lat - start.lat,
            lng: end.lng - start.lng,
        }
    }

    pub fn norm(self) -> f64 {
        (self.lat * self.lat + self.lng * self.lng).sqrt()
    }

    /// Unit vector in the same direction, or `None` when the vector is too
    /// short to define one.
    pub fn normalized(self) -> Option<Self> {
        let len = self.norm();
        if len < COINCIDENT_EPS_DEG {
            return None;
        }
        Some(Self {
            lat: self.lat / len,
            lng: self.lng / len,
        })
    }

    /// Rotation by 90 degrees: `(lat, lng)` becomes `(lng, -lat)`.
    pub fn perpendicular(self) -> Self {
        Self {
            lat: self.lng,
            lng: -self.lat,
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            lat: self.lat * factor,
            lng: self.lng * factor,
        }
    }
}

pub fn translate(point: GeoPoint, offset: DegreeVec) -> GeoPoint {
    GeoPoint {
        lat: point.lat + offset.lat,
        lng: point.lng + offset.lng,
    }
}

pub fn midpoint(a: GeoPoint, b: GeoPoint) -> GeoPoint {
    GeoPoint {
        lat: (a.lat + b.lat) / 2.0,
        lng: (a.lng + b.lng) / 2.0,
    }
}

pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlng = (dlng / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine_km(a, b) * 1000.0
}

pub fn path_distance_km(path: &[GeoPoint]) -> f64 {
    path.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}
