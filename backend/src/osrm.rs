use async_trait::async_trait;
use serde::Deserialize;
use shared::GeoPoint;

use crate::diversify::{RouteLeg, RoutingApi, RoutingError, RoutingProfile};

/// Client for an OSRM-compatible `route` service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// `/route/v1/{profile}/{lng,lat;lng,lat;...}` with coordinates in the
    /// OSRM longitude-first order.
    fn route_path(&self, profile: RoutingProfile, waypoints: &[GeoPoint]) -> String {
        let coords = waypoints
            .iter()
            .map(|p| format!("{},{}", p.lng, p.lat))
            .collect::<Vec<_>>()
            .join(";");
        format!("{}/route/v1/{}/{}", self.base_url, profile.as_str(), coords)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

fn leg_from_response(body: OsrmResponse) -> Result<RouteLeg, RoutingError> {
    if body.code != "Ok" {
        tracing::debug!("Router answered code {}", body.code);
        return Err(RoutingError::NotFound);
    }
    let route = body.routes.into_iter().next().ok_or(RoutingError::NotFound)?;
    let path = route
        .geometry
        .coordinates
        .iter()
        .map(|c| GeoPoint { lat: c[1], lng: c[0] })
        .collect();

    Ok(RouteLeg {
        path,
        distance_m: route.distance,
        duration_s: Some(route.duration),
    })
}

#[async_trait]
impl RoutingApi for OsrmClient {
    async fn route(
        &self,
        profile: RoutingProfile,
        waypoints: &[GeoPoint],
    ) -> Result<RouteLeg, RoutingError> {
        let url = self.route_path(profile, waypoints);
        tracing::debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;
        let body: OsrmResponse = response.json().await?;

        leg_from_response(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OsrmClient {
        OsrmClient::new(reqwest::Client::new(), "https://osrm.test/")
    }

    #[test]
    fn test_route_path_is_longitude_first() {
        let path = client().route_path(
            RoutingProfile::Driving,
            &[
                GeoPoint {
                    lat: 18.932,
                    lng: 72.83,
                },
                GeoPoint {
                    lat: 18.95,
                    lng: 72.845,
                },
            ],
        );
        assert_eq!(path, "https://osrm.test/route/v1/driving/72.83,18.932;72.845,18.95");
    }

    #[test]
    fn test_route_path_threads_via_waypoint() {
        let path = client().route_path(
            RoutingProfile::Walking,
            &[
                GeoPoint { lat: 1.0, lng: 2.0 },
                GeoPoint { lat: 3.0, lng: 4.0 },
                GeoPoint { lat: 5.0, lng: 6.0 },
            ],
        );
        assert_eq!(path, "https://osrm.test/route/v1/walking/2,1;4,3;6,5");
    }

    #[test]
    fn test_leg_from_response_swaps_to_lat_lng() {
        let raw = r#"{
            "code": "Ok",
            "routes": [{
                "geometry": {
                    "coordinates": [[72.83, 18.932], [72.8375, 18.941], [72.845, 18.95]],
                    "type": "LineString"
                },
                "distance": 3100.0,
                "duration": 558.0
            }]
        }"#;
        let body: OsrmResponse = serde_json::from_str(raw).expect("osrm payload");
        let leg = leg_from_response(body).expect("leg");

        assert_eq!(leg.path.len(), 3);
        assert_eq!(leg.path[0].lat, 18.932);
        assert_eq!(leg.path[0].lng, 72.83);
        assert_eq!(leg.distance_m, 3100.0);
        assert_eq!(leg.duration_s, Some(558.0));
    }

    #[test]
    fn test_no_route_code_maps_to_not_found() {
        let raw = r#"{"code": "NoRoute", "message": "Impossible route between points"}"#;
        let body: OsrmResponse = serde_json::from_str(raw).expect("osrm payload");
        assert!(matches!(
            leg_from_response(body),
            Err(RoutingError::NotFound)
        ));
    }

    #[test]
    fn test_ok_code_with_empty_routes_maps_to_not_found() {
        let raw = r#"{"code": "Ok", "routes": []}"#;
        let body: OsrmResponse = serde_json::from_str(raw).expect("osrm payload");
        assert!(matches!(
            leg_from_response(body),
            Err(RoutingError::NotFound)
        ));
    }
}
