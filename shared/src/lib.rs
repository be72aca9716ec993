use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Scooter,
    Driving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub id: u32,
    pub name: String,
    pub color: ColorTag,
    pub safety_score: i32,
    pub distance_km: f64,
    pub eta_minutes: u32,
    pub eta: String,
    pub path: Vec<GeoPoint>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    pub text: String,
    pub is_night_context: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poi {
    pub position: GeoPoint,
    pub name: String,
    pub category: String,
    pub open_around_clock: bool,
}

/// Either an explicit coordinate pair or free text for the geocoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaceRef {
    Point(GeoPoint),
    Query(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesRequest {
    pub start: PlaceRef,
    pub end: PlaceRef,
    #[serde(default)]
    pub mode: TravelMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub route: RouteCandidate,
    pub advisory: Advisory,
    pub risk_alert: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesResponse {
    pub start_label: String,
    pub end_label: String,
    pub candidates: Vec<ScoredCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviseRequest {
    pub candidate: RouteCandidate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviseResponse {
    pub advisory: Advisory,
    pub risk_alert: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScanRequest {
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    pub police: Vec<Poi>,
    pub safe_stops: Vec<Poi>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}
