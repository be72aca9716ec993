use std::sync::Arc;

use async_trait::async_trait;
use shared::{ColorTag, GeoPoint, RouteCandidate, TravelMode};

use crate::{
    scoring::{ReferenceScores, RouteSlot, ScoreBands, ScoreContext, ScoreModel},
    waypoints::{offset_waypoints, DEFAULT_OFFSET_SCALE_DEG},
};

const WALKING_SPEED_KMH: f64 = 4.5;
const SCOOTER_SPEED_KMH: f64 = 30.0;
const DRIVING_SPEED_KMH: f64 = 20.0;

/// Profile names understood by the external router. Scooters ride the
/// driving profile; only the assumed speed differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingProfile {
    Walking,
    Driving,
}

impl RoutingProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingProfile::Walking => "walking",
            RoutingProfile::Driving => "driving",
        }
    }
}

/// One resolved leg from the external router.
#[derive(Debug, Clone)]
pub struct RouteLeg {
    pub path: Vec<GeoPoint>,
    pub distance_m: f64,
    /// Router-reported travel time. Derived from the mode's average speed
    /// when the router does not supply one.
    pub duration_s: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("routing engine found no path through the requested waypoints")]
    NotFound,
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// External routing engine contract.
///
/// Abstracts the router to allow:
/// - **Testing**: Scripted responses per corridor without network access
/// - **Backends**: Any OSRM-compatible service, self-hosted or public
///
/// # Contract
/// `waypoints` is the ordered visit list (start, optional vias, end) and
/// always holds at least two points. Implementations return the single
/// best path through all of them.
#[async_trait]
pub trait RoutingApi: Send + Sync {
    async fn route(
        &self,
        profile: RoutingProfile,
        waypoints: &[GeoPoint],
    ) -> Result<RouteLeg, RoutingError>;
}

/// Tuning for corridor generation and score banding.
#[derive(Debug, Clone, Copy)]
pub struct DiversifyConfig {
    pub offset_scale_deg: f64,
    pub bands: ScoreBands,
}

impl Default for DiversifyConfig {
    fn default() -> Self {
        Self {
            offset_scale_deg: DEFAULT_OFFSET_SCALE_DEG,
            bands: ScoreBands::default(),
        }
    }
}

/// Produces up to three scored route candidates between two points.
pub struct RouteDiversifier {
    routing: Arc<dyn RoutingApi>,
    scores: Arc<dyn ScoreModel>,
    config: DiversifyConfig,
}

impl RouteDiversifier {
    pub fn new(routing: Arc<dyn RoutingApi>) -> Self {
        Self {
            routing,
            scores: Arc::new(ReferenceScores::default()),
            config: DiversifyConfig::default(),
        }
    }

    pub fn with_score_model(mut self, scores: Arc<dyn ScoreModel>) -> Self {
        self.scores = scores;
        self
    }

    pub fn with_config(mut self, config: DiversifyConfig) -> Self {
        self.config = config;
        self
    }

    /// Fan out up to three routing requests and score what comes back.
    ///
    /// # Algorithm
    ///
    /// ## 1. Corridor construction
    /// - Direct: start to end with no vias
    /// - Offset A and B: one via each, placed perpendicular to the
    ///   start-end axis on opposite sides of its midpoint
    ///
    /// ## 2. Concurrent resolution
    /// All corridors are requested concurrently and awaited together; one
    /// slow or failing corridor never blocks the others beyond the shared
    /// await point.
    ///
    /// ## 3. Assembly
    /// Failed corridors are logged and dropped, never substituted. The
    /// survivors keep slot order (direct, A, B) so candidate ids stay
    /// stable however many come back. Coincident endpoints skip the offset
    /// corridors entirely and request the direct route alone.
    pub async fn diversify(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        mode: TravelMode,
    ) -> Vec<RouteCandidate> {
        let (profile, avg_speed_kmh) = mode_params(mode);

        tracing::info!(
            "Diversifying {} corridors {:.4},{:.4} -> {:.4},{:.4}",
            profile.as_str(),
            start.lat,
            start.lng,
            end.lat,
            end.lng
        );

        let outcomes = match offset_waypoints(start, end, self.config.offset_scale_deg) {
            Some(pair) => {
                let direct = [start, end];
                let via_a = [start, pair.a, end];
                let via_b = [start, pair.b, end];
                let (leg_direct, leg_a, leg_b) = tokio::join!(
                    self.routing.route(profile, &direct),
                    self.routing.route(profile, &via_a),
                    self.routing.route(profile, &via_b),
                );
                vec![
                    (RouteSlot::Direct, leg_direct),
                    (RouteSlot::OffsetA, leg_a),
                    (RouteSlot::OffsetB, leg_b),
                ]
            }
            None => {
                tracing::debug!("Coincident endpoints, requesting direct corridor only");
                let direct = self.routing.route(profile, &[start, end]).await;
                vec![(RouteSlot::Direct, direct)]
            }
        };

        let mut candidates = Vec::with_capacity(outcomes.len());
        for (slot, outcome) in outcomes {
            match outcome {
                Ok(leg) if leg.path.len() >= 2 => {
                    candidates.push(self.build_candidate(slot, leg, avg_speed_kmh));
                }
                Ok(leg) => {
                    tracing::warn!(
                        "Corridor {:?} dropped: router returned {} path points",
                        slot,
                        leg.path.len()
                    );
                }
                Err(err) => {
                    tracing::warn!("Corridor {:?} dropped: {err}", slot);
                }
            }
        }

        if candidates.is_empty() {
            tracing::warn!("No corridor produced a route");
        } else {
            tracing::debug!("{} of 3 corridors resolved", candidates.len());
        }

        candidates
    }

    fn build_candidate(
        &self,
        slot: RouteSlot,
        leg: RouteLeg,
        avg_speed_kmh: f64,
    ) -> RouteCandidate {
        let distance_km = leg.distance_m / 1000.0;
        let eta_minutes = match leg.duration_s {
            Some(secs) => (secs / 60.0).ceil() as u32,
            None => derive_eta_minutes(distance_km, avg_speed_kmh),
        };
        let score = self.scores.score(&ScoreContext {
            slot,
            path: &leg.path,
            distance_km,
        });
        let color = self.config.bands.classify(score);

        RouteCandidate {
            id: slot.id(),
            name: slot.display_name().to_string(),
            color,
            safety_score: score,
            distance_km,
            eta_minutes,
            eta: format_eta(eta_minutes),
            path: leg.path,
            features: features_for(color),
        }
    }
}

fn mode_params(mode: TravelMode) -> (RoutingProfile, f64) {
    match mode {
        TravelMode::Walking => (RoutingProfile::Walking, WALKING_SPEED_KMH),
        TravelMode::Scooter => (RoutingProfile::Driving, SCOOTER_SPEED_KMH),
        TravelMode::Driving => (RoutingProfile::Driving, DRIVING_SPEED_KMH),
    }
}

fn derive_eta_minutes(distance_km: f64, avg_speed_kmh: f64) -> u32 {
    (distance_km / avg_speed_kmh * 60.0).ceil() as u32
}

/// "41 mins" under an hour, "1 hr 5 min" from there up.
pub fn format_eta(total_minutes: u32) -> String {
    if total_minutes >= 60 {
        format!("{} hr {} min", total_minutes / 60, total_minutes % 60)
    } else {
        format!("{total_minutes} mins")
    }
}

fn features_for(color: ColorTag) -> Vec<String> {
    let features: &[&str] = match color {
        ColorTag::Green => &["Police Patrols", "Well Lit", "Main Road"],
        ColorTag::Yellow => &["Moderate Traffic", "Residential"],
        ColorTag::Red => &["Poor Lighting", "Less Crowded"],
    };
    features.iter().map(|f| f.to_string()).collect()
}
