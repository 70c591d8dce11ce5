//! Intercepting a vehicle travelling along a straight segment on foot.

use crate::error::{check_speed, PlanResult};
use crate::math::{LineSegment2d, Point2d, QuadraticFn};
use crate::util::Interval;
use arrayvec::ArrayVec;
use cgmath::prelude::*;

/// The portion of a segment that a walker can reach no later than the vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReachableRegion {
    /// The reachable distances along the parent segment, within `[0, length]`.
    pub dists: Interval<f64>,
    /// The world space coordinates of the two ends of the region.
    pub coords: [Point2d; 2],
}

impl ReachableRegion {
    /// The earliest point along the segment at which the vehicle can be boarded.
    pub fn start(&self) -> Point2d {
        self.coords[0]
    }

    /// The last point along the segment at which the vehicle can be boarded.
    pub fn end(&self) -> Point2d {
        self.coords[1]
    }
}

/// Finds the sub-segment that a walker can reach before or as the vehicle passes.
///
/// The vehicle starts along `segment` at time `departure` (relative to now) and
/// travels at `vehicle_speed`. The walker leaves `walker` now at `walk_speed`.
///
/// Returns `None` if there is no point on the segment the walker can reach in time.
pub fn reachable_region(
    walker: Point2d,
    segment: &LineSegment2d,
    departure: f64,
    walk_speed: f64,
    vehicle_speed: f64,
) -> PlanResult<Option<ReachableRegion>> {
    check_speed("walk_speed", walk_speed)?;
    check_speed("vehicle_speed", vehicle_speed)?;
    segment.check()?;

    let (vp2, vb2) = (walk_speed.powi(2), vehicle_speed.powi(2));
    let beta = segment.direction();
    let alpha = segment.start - walker;

    // Squared walking time minus squared vehicle time, as a function of distance.
    // Non-positive wherever the walker gets there first.
    let lead = QuadraticFn::new(
        1.0 / vp2 - 1.0 / vb2,
        2.0 * (alpha.dot(beta) / vp2 - departure / vehicle_speed),
        alpha.magnitude2() / vp2 - departure.powi(2),
    );
    let pieces = non_positive_pieces(&lead, f64::max(1.0 / vp2, 1.0 / vb2));

    // Squaring admits points the vehicle passed before now; exclude them
    let feasible = match Interval::new(-departure * vehicle_speed, f64::INFINITY)
        .intersect(&segment.bounds())
    {
        Some(feasible) => feasible,
        None => return Ok(None),
    };

    // The true region is a sublevel set of a convex function, so at most one
    // piece survives unless both meet at a repeated root.
    let dists = pieces
        .iter()
        .filter_map(|piece| piece.intersect(&feasible))
        .reduce(|a, b| a.hull(&b));

    Ok(dists.map(|dists| {
        let region = segment.subsegment(dists);
        ReachableRegion {
            dists,
            coords: [region.start, region.end],
        }
    }))
}

/// The intervals over which the quadratic is non-positive.
fn non_positive_pieces(f: &QuadraticFn, scale: f64) -> ArrayVec<Interval<f64>, 2> {
    const INF: f64 = f64::INFINITY;
    const NEG_INF: f64 = f64::NEG_INFINITY;

    let [a, b, c] = f.coeffs();
    let roots = f.roots(scale);
    let mut pieces = ArrayVec::new();

    if !f.is_quadratic(scale) {
        match roots.first() {
            Some(&root) if b > 0.0 => pieces.push(Interval::new(NEG_INF, root)),
            Some(&root) => pieces.push(Interval::new(root, INF)),
            None if c <= 0.0 => pieces.push(Interval::new(NEG_INF, INF)),
            None => {}
        }
    } else if let [r1, r2] = roots.as_slice() {
        if a > 0.0 {
            pieces.push(Interval::new(*r1, *r2));
        } else {
            pieces.push(Interval::new(NEG_INF, *r1));
            pieces.push(Interval::new(*r2, INF));
        }
    } else if a < 0.0 {
        pieces.push(Interval::new(NEG_INF, INF));
    }

    pieces
}
