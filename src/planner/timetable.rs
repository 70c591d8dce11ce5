//! Projecting a vehicle's route forward in time, and the part of that
//! projection a walking passenger can make use of.

use super::reachable::reachable_region;
use crate::error::{check_speed, PlanError, PlanResult};
use crate::math::{LineSegment2d, Point2d};
use crate::util::cyclic_index;
use log::debug;

/// A segment of a vehicle's path, along with the time the vehicle starts along it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedSegment {
    /// The path of the vehicle.
    pub segment: LineSegment2d,
    /// The time at which the vehicle is at `segment.start`, relative to now.
    pub start_time: f64,
}

impl TimedSegment {
    /// The time at which the vehicle reaches the end of the segment.
    pub fn end_time(&self, vehicle_speed: f64) -> f64 {
        self.start_time + self.segment.length() / vehicle_speed
    }
}

/// The projected path of a vehicle over a bounded number of upcoming segments.
///
/// Start times are non-decreasing and each segment ends where the next begins.
#[derive(Clone, Debug, PartialEq)]
pub struct Timetable {
    segments: Vec<TimedSegment>,
}

impl Timetable {
    /// Projects a vehicle's cyclic route forward from its current position.
    ///
    /// # Parameters
    /// * `route` - The vertices of the route, visited in order and then repeated
    /// * `target_idx` - The index of the vertex the vehicle is heading towards
    /// * `position` - The vehicle's current position
    /// * `horizon` - The number of segments to project
    /// * `vehicle_speed` - The vehicle's constant speed
    pub fn build(
        route: &[Point2d],
        target_idx: usize,
        position: Point2d,
        horizon: usize,
        vehicle_speed: f64,
    ) -> PlanResult<Self> {
        let count = route.len();
        if count < 2 {
            return Err(PlanError::RouteTooShort(count));
        }
        if target_idx >= count {
            return Err(PlanError::InvalidParameter(format!(
                "target index {} is out of bounds for a route of {} vertices",
                target_idx, count
            )));
        }
        check_speed("vehicle_speed", vehicle_speed)?;
        if horizon == 0 {
            return Err(PlanError::EmptyHorizon);
        }

        // A vehicle standing on its target is about to head for the next vertex
        let target_idx = if position == route[target_idx] {
            cyclic_index(target_idx, 1, count)
        } else {
            target_idx
        };

        let mut segments = Vec::with_capacity(horizon);
        let mut start = position;
        let mut start_time = 0.0;
        for i in 0..horizon {
            let end = route[cyclic_index(target_idx, i, count)];
            let segment = LineSegment2d::try_from_ends(start, end)?;
            segments.push(TimedSegment {
                segment,
                start_time,
            });
            start_time += segment.length() / vehicle_speed;
            start = end;
        }

        Ok(Self { segments })
    }

    /// The segments, in the order the vehicle travels them.
    pub fn segments(&self) -> &[TimedSegment] {
        &self.segments
    }

    /// Finds the first segment the walker can intercept, and everything the
    /// vehicle travels after that point.
    ///
    /// Returns `None` if the walker cannot reach the vehicle within the horizon.
    pub fn accessible(
        &self,
        walker: Point2d,
        walk_speed: f64,
        vehicle_speed: f64,
    ) -> PlanResult<Option<AccessibleTimetable>> {
        for (idx, entry) in self.segments.iter().enumerate() {
            let region = reachable_region(
                walker,
                &entry.segment,
                entry.start_time,
                walk_speed,
                vehicle_speed,
            )?;
            let region = match region {
                Some(region) => region,
                None => {
                    debug!("  Unreachable: {:?}", entry);
                    continue;
                }
            };

            let point = region.start();
            let time = entry.start_time + region.dists.min / vehicle_speed;
            debug!("  Can reach:   {:?}", entry);
            debug!("  Reachable:   {:?} at t={:.1}", region.dists, time);

            // Once aboard, the rest of the horizon comes along for free
            let length = entry.segment.length();
            let mut segments = Vec::with_capacity(self.segments.len() - idx);
            if length - region.dists.min > 1e-12 * length {
                segments.push(TimedSegment {
                    segment: LineSegment2d::from_ends(point, entry.segment.end),
                    start_time: time,
                });
            }
            segments.extend_from_slice(&self.segments[idx + 1..]);

            if segments.is_empty() {
                debug!("  Boarding only possible at the end of the horizon");
                return Ok(None);
            }

            return Ok(Some(AccessibleTimetable {
                boarding_idx: idx,
                boarding_point: segments[0].segment.start,
                boarding_time: segments[0].start_time,
                segments,
            }));
        }

        Ok(None)
    }
}

/// The part of a [Timetable] a walker can ride, starting from the earliest
/// point at which they can board the vehicle.
///
/// Always contains at least one segment.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessibleTimetable {
    boarding_idx: usize,
    boarding_point: Point2d,
    boarding_time: f64,
    segments: Vec<TimedSegment>,
}

impl AccessibleTimetable {
    /// The segments that can be ridden, the first beginning at the boarding point.
    pub fn segments(&self) -> &[TimedSegment] {
        &self.segments
    }

    /// The index of the segment in the full timetable on which boarding happens.
    pub fn boarding_idx(&self) -> usize {
        self.boarding_idx
    }

    /// The earliest point at which the walker can board.
    pub fn boarding_point(&self) -> Point2d {
        self.boarding_point
    }

    /// The time, relative to now, at which the vehicle reaches the boarding point.
    pub fn boarding_time(&self) -> f64 {
        self.boarding_time
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use cgmath::InnerSpace;

    fn square() -> Vec<Point2d> {
        vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(0.0, 1.0),
        ]
    }

    #[test]
    fn timetable_wraps_around_route() {
        let table = Timetable::build(&square(), 1, Point2d::new(0.5, 0.0), 6, 0.5).unwrap();
        let segs = table.segments();
        assert_eq!(segs.len(), 6);
        assert_eq!(segs[0].segment.start, Point2d::new(0.5, 0.0));
        assert_eq!(segs[0].segment.end, Point2d::new(1.0, 0.0));
        assert_eq!(segs[1].segment.end, Point2d::new(1.0, 1.0));
        assert_eq!(segs[3].segment.end, Point2d::new(0.0, 0.0));
        assert_eq!(segs[4].segment.end, Point2d::new(1.0, 0.0));
        assert_approx_eq!(segs[0].start_time, 0.0);
        assert_approx_eq!(segs[1].start_time, 1.0);
        assert_approx_eq!(segs[2].start_time, 3.0);
        assert_approx_eq!(segs[5].start_time, 9.0);

        for pair in segs.windows(2) {
            assert_eq!(pair[0].segment.end, pair[1].segment.start);
            assert_approx_eq!(pair[0].end_time(0.5), pair[1].start_time);
        }
    }

    #[test]
    fn vehicle_on_target_heads_for_next_vertex() {
        let table = Timetable::build(&square(), 1, Point2d::new(1.0, 0.0), 2, 1.0).unwrap();
        assert_eq!(table.segments()[0].segment.end, Point2d::new(1.0, 1.0));
    }

    #[test]
    fn invalid_timetables_are_rejected() {
        let origin = Point2d::new(0.0, 0.0);
        assert!(matches!(
            Timetable::build(&square()[..1], 0, origin, 3, 1.0),
            Err(PlanError::RouteTooShort(1))
        ));
        assert!(Timetable::build(&square(), 0, Point2d::new(0.5, 0.5), 3, 0.0).is_err());
        assert!(matches!(
            Timetable::build(&square(), 0, Point2d::new(0.5, 0.5), 0, 1.0),
            Err(PlanError::EmptyHorizon)
        ));
        assert!(Timetable::build(&square(), 4, Point2d::new(0.5, 0.5), 3, 1.0).is_err());
        let repeated = [origin, origin, Point2d::new(1.0, 0.0)];
        assert!(matches!(
            Timetable::build(&repeated, 2, Point2d::new(0.5, 0.0), 3, 1.0),
            Err(PlanError::DegenerateSegment { .. })
        ));
    }

    #[test]
    fn walker_at_vehicle_boards_immediately() {
        let route = square();
        let start = Point2d::new(0.25, 0.0);
        let table = Timetable::build(&route, 1, start, 4, 1.0).unwrap();
        for walk_speed in [1.0, 2.0] {
            let accessible = table.accessible(start, walk_speed, 1.0).unwrap().unwrap();
            assert_eq!(accessible.boarding_idx(), 0);
            assert_approx_eq!(accessible.boarding_time(), 0.0);
            assert_approx_eq!(accessible.boarding_point().x, start.x);
            assert_approx_eq!(accessible.boarding_point().y, start.y);
            assert_eq!(accessible.segments(), table.segments());
        }
    }

    #[test]
    fn later_segments_are_copied_unchanged() {
        // The walker stands beside the second segment, too far from the first
        let table = Timetable::build(&square(), 1, Point2d::new(0.0, 0.0), 5, 0.1).unwrap();
        let walker = Point2d::new(1.2, 0.5);
        let accessible = table.accessible(walker, 0.05, 0.1).unwrap().unwrap();
        assert_eq!(accessible.boarding_idx(), 1);
        assert_eq!(accessible.segments().len(), 4);
        assert_eq!(&accessible.segments()[1..], &table.segments()[2..]);

        let first = accessible.segments()[0];
        assert_eq!(first.segment.end, Point2d::new(1.0, 1.0));
        assert_approx_eq!(first.segment.start.x, 1.0);
        assert!(first.start_time >= table.segments()[1].start_time);
        assert_approx_eq!(
            first.start_time,
            table.segments()[1].start_time + (first.segment.start.y - 0.0) / 0.1
        );
        // The walker really does arrive first
        let walk_time = (first.segment.start - walker).magnitude() / 0.05;
        assert!(walk_time <= first.start_time + 1e-9);
    }

    #[test]
    fn unreachable_vehicle() {
        let table = Timetable::build(&square(), 1, Point2d::new(0.0, 0.0), 3, 1.0).unwrap();
        let accessible = table.accessible(Point2d::new(50.0, 50.0), 0.01, 1.0).unwrap();
        assert!(accessible.is_none());
    }
}
