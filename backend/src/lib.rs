pub mod advisory;
pub mod diversify;
pub mod error;
pub mod geo;
pub mod nominatim;
pub mod osrm;
pub mod overpass;
pub mod risk;
pub mod scan;
pub mod scoring;
pub mod waypoints;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Timelike;
use tower_http::cors::{Any, CorsLayer};

use shared::{
    AdviseRequest, AdviseResponse, ApiError, PlaceRef, RoutesRequest, RoutesResponse, ScanRequest,
    ScanResponse, ScoredCandidate,
};

use crate::advisory::advise;
use crate::diversify::RouteDiversifier;
use crate::error::ServiceError;
use crate::nominatim::{GeocodeError, Geocoder, Place};
use crate::overpass::PlaceSearch;
use crate::risk::RiskZoneIndex;
use crate::scan::scan_area;
use crate::scoring::is_high_risk;

#[derive(Clone)]
pub struct AppState {
    pub diversifier: Arc<RouteDiversifier>,
    pub geocoder: Arc<dyn Geocoder>,
    pub places: Arc<dyn PlaceSearch>,
    pub risk_zones: Arc<RiskZoneIndex>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/routes", post(routes_handler))
        .route("/api/advise", post(advise_handler))
        .route("/api/scan", post(scan_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn routes_handler(
    State(state): State<AppState>,
    Json(req): Json<RoutesRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    let start = resolve_place(state.geocoder.as_ref(), &req.start)
        .await
        .map_err(service_error)?;
    let end = resolve_place(state.geocoder.as_ref(), &req.end)
        .await
        .map_err(service_error)?;

    tracing::info!(
        "Route request {:?} -> {:?} ({:?})",
        start.label,
        end.label,
        req.mode
    );

    let candidates = state
        .diversifier
        .diversify(start.position, end.position, req.mode)
        .await;
    if candidates.is_empty() {
        return Err(service_error(ServiceError::NoRoutesFound));
    }

    let hour = chrono::Local::now().hour();
    let candidates = candidates
        .into_iter()
        .map(|route| ScoredCandidate {
            advisory: advise(&route, hour),
            risk_alert: is_high_risk(&route, &state.risk_zones),
            route,
        })
        .collect();

    Ok(Json(RoutesResponse {
        start_label: start.label,
        end_label: end.label,
        candidates,
    }))
}

/// Explicit coordinates pass through with a reverse-geocoded label;
/// free-text queries go through the forward geocoder.
async fn resolve_place(geocoder: &dyn Geocoder, place: &PlaceRef) -> Result<Place, ServiceError> {
    match place {
        PlaceRef::Point(point) => Ok(Place {
            position: *point,
            label: geocoder.reverse(*point).await,
        }),
        PlaceRef::Query(query) => Ok(geocoder.forward(query).await?),
    }
}

async fn advise_handler(
    State(state): State<AppState>,
    Json(req): Json<AdviseRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    if let Some(hour) = req.hour {
        if hour > 23 {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    message: format!("hour must be between 0 and 23, got {hour}"),
                }),
            ));
        }
    }
    let hour = req.hour.unwrap_or_else(|| chrono::Local::now().hour());

    Ok(Json(AdviseResponse {
        advisory: advise(&req.candidate, hour),
        risk_alert: is_high_risk(&req.candidate, &state.risk_zones),
    }))
}

async fn scan_handler(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Json<ScanResponse> {
    tracing::debug!("Scanning amenities over {:?}", req.bbox);
    Json(scan_area(state.places.as_ref(), req.bbox).await)
}

fn service_error(err: ServiceError) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        ServiceError::Geocode(GeocodeError::NotFound(_)) => StatusCode::NOT_FOUND,
        ServiceError::Geocode(_) => StatusCode::BAD_GATEWAY,
        ServiceError::NoRoutesFound => StatusCode::NOT_FOUND,
    };
    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
