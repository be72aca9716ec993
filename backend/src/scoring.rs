use serde::{Deserialize, Serialize};
use shared::{ColorTag, GeoPoint, RouteCandidate};

use crate::risk::RiskZoneIndex;

/// Thresholds mapping a numeric safety score onto a color tag.
///
/// Earlier deployments disagreed on the exact scale, so the bands are
/// configuration rather than constants. The defaults reproduce the
/// canonical bands: above 80 is green, below 50 is red, yellow between.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreBands {
    pub green_above: i32,
    pub red_below: i32,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            green_above: 80,
            red_below: 50,
        }
    }
}

impl ScoreBands {
    /// Total over all scores: green wins first, then red, else yellow.
    pub fn classify(&self, score: i32) -> ColorTag {
        if score > self.green_above {
            ColorTag::Green
        } else if score < self.red_below {
            ColorTag::Red
        } else {
            ColorTag::Yellow
        }
    }
}

/// Classification with the canonical bands.
pub fn classify(score: i32) -> ColorTag {
    ScoreBands::default().classify(score)
}

/// Position a candidate occupies in the diversified batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSlot {
    Direct,
    OffsetA,
    OffsetB,
}

impl RouteSlot {
    /// Stable candidate id, also the presentation order.
    pub fn id(self) -> u32 {
        match self {
            RouteSlot::Direct => 1,
            RouteSlot::OffsetA => 2,
            RouteSlot::OffsetB => 3,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RouteSlot::Direct => "Safest Path",
            RouteSlot::OffsetA => "Alt. Route A",
            RouteSlot::OffsetB => "Alt. Route B",
        }
    }
}

/// Everything a scoring model may consult for one candidate.
#[derive(Debug)]
pub struct ScoreContext<'a> {
    pub slot: RouteSlot,
    pub path: &'a [GeoPoint],
    pub distance_km: f64,
}

/// Pluggable safety scoring strategy.
///
/// Abstracts score assignment to allow:
/// - **Testing**: Fixed scores for deterministic assertions
/// - **Models**: Swap the reference scores for a data-driven model
///   (POI density, lighting coverage, incident history) without touching
///   diversification or advisory logic
///
/// # Contract
/// Implementations must return a score for every candidate handed to them;
/// there is no "unknown" outcome, and the band classifier is total over
/// whatever range the model produces.
pub trait ScoreModel: Send + Sync {
    fn score(&self, ctx: &ScoreContext<'_>) -> i32;
}

/// The reference model: fixed scores per slot, calibrated so the direct
/// corridor presents as green, the first offset as yellow and the second
/// as red.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceScores {
    pub direct: i32,
    pub offset_a: i32,
    pub offset_b: i32,
}

impl Default for ReferenceScores {
    fn default() -> Self {
        Self {
            direct: 94,
            offset_a: 72,
            offset_b: 48,
        }
    }
}

impl ScoreModel for ReferenceScores {
    fn score(&self, ctx: &ScoreContext<'_>) -> i32 {
        match ctx.slot {
            RouteSlot::Direct => self.direct,
            RouteSlot::OffsetA => self.offset_a,
            RouteSlot::OffsetB => self.offset_b,
        }
    }
}

/// A candidate warrants a risk warning when its path enters a risk zone or
/// it is red-tagged. Zone hits only ever escalate; nothing clears the flag
/// on a red route.
pub fn is_high_risk(candidate: &RouteCandidate, zones: &RiskZoneIndex) -> bool {
    candidate.color == ColorTag::Red || zones.intersects(&candidate.path)
}
