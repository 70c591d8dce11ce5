//! Choosing where to get off a vehicle to reach a destination soonest.

use super::timetable::{AccessibleTimetable, TimedSegment};
use crate::debug::debug_line;
use crate::error::{check_speed, PlanError, PlanResult};
use crate::math::{LineSegment2d, Point2d, QuadraticFn};
use arrayvec::ArrayVec;
use cgmath::prelude::*;
use log::debug;

/// A point to alight at, and the resulting trip times.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropoffCandidate {
    /// The coordinates at which to get off.
    pub point: Point2d,
    /// How far along the segment the point is.
    pub distance: f64,
    /// The time at which to get off.
    pub ride_time: f64,
    /// The time at which the destination is reached on foot.
    pub arrival_time: f64,
}

/// The best place to alight along a whole [AccessibleTimetable].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimetableDropoff {
    /// The index of the segment to alight on, within the accessible timetable.
    pub segment_idx: usize,
    /// The segment to alight on.
    pub segment: TimedSegment,
    /// The alighting point, with times relative to the timetable's "now".
    pub candidate: DropoffCandidate,
}

/// Finds the point along a segment at which to get off so as to reach
/// `destination` as soon as possible.
///
/// Times in the result are relative to the moment the vehicle is at `segment.start`.
pub fn best_dropoff_on_segment(
    destination: Point2d,
    segment: &LineSegment2d,
    walk_speed: f64,
    vehicle_speed: f64,
) -> PlanResult<DropoffCandidate> {
    check_speed("walk_speed", walk_speed)?;
    check_speed("vehicle_speed", vehicle_speed)?;
    segment.check()?;

    let (vp, vb) = (walk_speed, vehicle_speed);
    let alpha = destination - segment.start;
    let ab = alpha.dot(segment.direction());
    let length = segment.length();

    // Ride times at which the vehicle's approach towards the destination
    // slows to walking pace. One root is the optimum; the other lies on the
    // wrong side of the destination's projection.
    let stationary = QuadraticFn::new(
        vp.powi(2) - vb.powi(2),
        2.0 * ab * (vb - vp.powi(2) / vb),
        (vp / vb).powi(2) * alpha.magnitude2() - ab.powi(2),
    );
    let scale = f64::max(vp.powi(2), vb.powi(2));

    let mut dists = ArrayVec::<f64, 3>::new();
    if stationary.is_quadratic(scale) {
        let interior = stationary
            .roots(scale)
            .into_iter()
            .map(|t| t * vb)
            .filter(|d| *d > 0.0 && *d < length);
        dists.extend(interior);
    }
    dists.push(length);

    let arrival_time = |d: f64| d / vb + destination.distance(segment.sample(d)) / vp;
    let (distance, arrival_time) = dists.into_iter().fold((0.0, arrival_time(0.0)), |best, d| {
        let time = arrival_time(d);
        if time.total_cmp(&best.1).is_lt() {
            (d, time)
        } else {
            best
        }
    });

    Ok(DropoffCandidate {
        point: segment.sample(distance),
        distance,
        ride_time: distance / vb,
        arrival_time,
    })
}

/// Finds the best place to get off along the whole of an accessible timetable.
///
/// Ties go to the earliest segment.
pub fn best_dropoff(
    destination: Point2d,
    timetable: &AccessibleTimetable,
    walk_speed: f64,
    vehicle_speed: f64,
) -> PlanResult<TimetableDropoff> {
    let mut best: Option<TimetableDropoff> = None;

    for (idx, entry) in timetable.segments().iter().enumerate() {
        let mut candidate =
            best_dropoff_on_segment(destination, &entry.segment, walk_speed, vehicle_speed)?;
        candidate.ride_time += entry.start_time;
        candidate.arrival_time += entry.start_time;

        if best.map_or(true, |best| candidate.arrival_time < best.candidate.arrival_time) {
            debug!(
                "New optimal dropoff: segment {} from {:?} to {:?} starting at t={:.1}, arriving at {:.1}",
                idx,
                entry.segment.start,
                entry.segment.end,
                entry.start_time,
                candidate.arrival_time
            );
            best = Some(TimetableDropoff {
                segment_idx: idx,
                segment: *entry,
                candidate,
            });
        }
    }

    let best = best.ok_or(PlanError::EmptyHorizon)?;
    debug_line("dropoff", best.candidate.point, destination);
    Ok(best)
}
