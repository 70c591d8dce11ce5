//! A passenger's itinerary, as a sequence of timed legs.

use crate::math::Point2d;
use crate::planner::{AccessibleTimetable, TimetableDropoff};
use crate::VehicleId;
use cgmath::prelude::*;
use smallvec::SmallVec;

/// What the passenger does during a leg of their plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegKind {
    /// Walk in a straight line from the start to the end of the leg.
    Walk,
    /// Stand still at the start of the leg.
    Wait,
    /// Ride the given vehicle from the start to the end of the leg.
    Ride(VehicleId),
}

/// A single leg of a [Plan].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanLeg {
    pub kind: LegKind,
    /// The simulation time at which the leg begins.
    pub start_time: f64,
    /// The simulation time at which the leg is expected to end.
    pub end_time: f64,
    /// The location at which the leg begins.
    pub start: Point2d,
    /// The location at which the leg ends.
    pub end: Point2d,
}

/// A passenger's plan for reaching their destination.
///
/// Each leg begins when and where the previous one ends; the last leg
/// ends at the destination. A cursor tracks the leg currently in progress.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    legs: SmallVec<[PlanLeg; 4]>,
    cursor: usize,
}

impl Plan {
    /// A plan to walk straight to the destination.
    pub fn walk(now: f64, from: Point2d, to: Point2d, walk_speed: f64) -> Self {
        let mut legs = SmallVec::new();
        legs.push(PlanLeg {
            kind: LegKind::Walk,
            start_time: now,
            end_time: now + from.distance(to) / walk_speed,
            start: from,
            end: to,
        });
        Self { legs, cursor: 0 }
    }

    /// A plan to walk to a vehicle, wait for it, ride it, and walk the rest of the way.
    ///
    /// # Parameters
    /// * `now` - The current simulation time, which the timetable is relative to
    /// * `from` - The passenger's current location
    /// * `to` - The passenger's destination
    /// * `vehicle` - The vehicle to ride
    /// * `timetable` - The vehicle's timetable, as accessible from `from`
    /// * `dropoff` - Where to get off the vehicle
    /// * `walk_speed` - The passenger's walking speed
    pub fn ride(
        now: f64,
        from: Point2d,
        to: Point2d,
        vehicle: VehicleId,
        timetable: &AccessibleTimetable,
        dropoff: &TimetableDropoff,
        walk_speed: f64,
    ) -> Self {
        let board = timetable.boarding_point();
        let alight = dropoff.candidate.point;
        let walk_end = now + from.distance(board) / walk_speed;
        let board_time = f64::max(now + timetable.boarding_time(), walk_end);
        let alight_time = f64::max(now + dropoff.candidate.ride_time, board_time);
        let arrival_time = f64::max(now + dropoff.candidate.arrival_time, alight_time);

        let leg = |kind, start_time, end_time, start, end| PlanLeg {
            kind,
            start_time,
            end_time,
            start,
            end,
        };
        let legs = [
            leg(LegKind::Walk, now, walk_end, from, board),
            leg(LegKind::Wait, walk_end, board_time, board, board),
            leg(LegKind::Ride(vehicle), board_time, alight_time, board, alight),
            leg(LegKind::Walk, alight_time, arrival_time, alight, to),
        ];
        Self {
            legs: SmallVec::from_buf(legs),
            cursor: 0,
        }
    }

    /// All legs of the plan, including completed ones.
    pub fn legs(&self) -> &[PlanLeg] {
        &self.legs
    }

    /// The leg in progress, or `None` if the plan is complete.
    pub fn current_leg(&self) -> Option<&PlanLeg> {
        self.legs.get(self.cursor)
    }

    /// Moves on to the next leg and returns it.
    pub fn advance(&mut self) -> Option<&PlanLeg> {
        self.cursor = usize::min(self.cursor + 1, self.legs.len());
        self.current_leg()
    }

    /// Whether every leg has been completed.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.legs.len()
    }

    /// The expected time of arrival at the destination.
    pub fn arrival_time(&self) -> f64 {
        self.legs.last().map_or(f64::INFINITY, |leg| leg.end_time)
    }

    /// The vehicle this plan rides, if any.
    pub fn vehicle(&self) -> Option<VehicleId> {
        self.legs.iter().find_map(|leg| match leg.kind {
            LegKind::Ride(vehicle) => Some(vehicle),
            _ => None,
        })
    }

    /// Whether the plan still expects to catch a vehicle which, by `now`,
    /// should already have delivered the passenger.
    pub fn has_missed_vehicle(&self, now: f64) -> bool {
        let ride = self
            .legs
            .iter()
            .enumerate()
            .find(|(_, leg)| matches!(leg.kind, LegKind::Ride(_)));
        match ride {
            Some((idx, leg)) => self.cursor < idx && now > leg.end_time,
            None => false,
        }
    }
}
