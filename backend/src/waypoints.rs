use shared::GeoPoint;

use crate::geo::{midpoint, translate, DegreeVec};

/// Perpendicular displacement applied to the corridor midpoint, in degrees.
/// Around Mumbai latitudes this lands the via points roughly 450 m either
/// side of the direct path, far enough that the router picks genuinely
/// different streets without producing absurd detours.
pub const DEFAULT_OFFSET_SCALE_DEG: f64 = 0.004;

/// The pair of via points that steer the router into corridors left and
/// right of the direct path.
#[derive(Debug, Clone, Copy)]
pub struct OffsetPair {
    pub a: GeoPoint,
    pub b: GeoPoint,
}

/// Place two via waypoints perpendicular to the start-end axis.
///
/// # Algorithm
///
/// ## 1. Corridor axis
/// - Midpoint `M` of start and end
/// - Unit direction `u` from start to end in planar degree space
///
/// ## 2. Perpendicular displacement
/// - Rotate `u` by 90°, scale by `scale_deg`
/// - Via points are `M + offset` and `M - offset`, symmetric about `M`
///
/// Returns `None` when start and end coincide within rounding tolerance:
/// there is no axis to be perpendicular to, and the caller falls back to
/// requesting the direct route alone.
pub fn offset_waypoints(start: GeoPoint, end: GeoPoint, scale_deg: f64) -> Option<OffsetPair> {
    let unit = DegreeVec::between(start, end).normalized()?;
    let offset = unit.perpendicular().scaled(scale_deg);
    let mid = midpoint(start, end);

    Some(OffsetPair {
        a: translate(mid, offset),
        b: translate(mid, offset.scaled(-1.0)),
    })
}
