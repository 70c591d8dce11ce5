use crate::math::Point2d;
use crate::plan::{LegKind, Plan};
use crate::{PassengerId, VehicleId};
use cgmath::prelude::*;

/// What a passenger is currently doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassengerState {
    /// The passenger has yet to decide how to reach their destination.
    Unplanned,
    /// The passenger is walking.
    Walking,
    /// The passenger is waiting for a vehicle.
    Waiting(VehicleId),
    /// The passenger is on board a vehicle.
    Riding(VehicleId),
    /// The passenger has completed their plan.
    Arrived,
}

/// A simulated passenger, travelling from a source to a destination.
#[derive(Clone, Debug)]
pub struct Passenger {
    /// The passenger's ID
    pub(crate) id: PassengerId,
    /// Where the passenger appeared.
    source: Point2d,
    /// Where the passenger is heading.
    destination: Point2d,
    /// The passenger's current position.
    pos: Point2d,
    /// The passenger's walking speed.
    walk_speed: f64,
    /// The time at which the passenger appeared.
    start_time: f64,
    /// The time at which the passenger reached their destination.
    end_time: Option<f64>,
    /// How the passenger intends to reach their destination.
    plan: Option<Plan>,
}

impl Passenger {
    /// Creates a new passenger, standing at `source`.
    pub(crate) fn new(
        id: PassengerId,
        source: Point2d,
        destination: Point2d,
        walk_speed: f64,
        start_time: f64,
    ) -> Self {
        Self {
            id,
            source,
            destination,
            pos: source,
            walk_speed,
            start_time,
            end_time: None,
            plan: None,
        }
    }

    /// Gets the passenger's ID.
    pub fn id(&self) -> PassengerId {
        self.id
    }

    /// Where the passenger appeared.
    pub fn source(&self) -> Point2d {
        self.source
    }

    /// Where the passenger is heading.
    pub fn destination(&self) -> Point2d {
        self.destination
    }

    /// The passenger's current position.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The passenger's walking speed.
    pub fn walk_speed(&self) -> f64 {
        self.walk_speed
    }

    /// The time at which the passenger appeared.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// The time at which the passenger arrived, if they have.
    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    /// The total time taken to reach the destination, if it has been reached.
    pub fn trip_duration(&self) -> Option<f64> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// The passenger's current plan.
    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// What the passenger is currently doing.
    pub fn state(&self) -> PassengerState {
        let plan = match &self.plan {
            Some(plan) => plan,
            None => return PassengerState::Unplanned,
        };
        match plan.current_leg().map(|leg| leg.kind) {
            Some(LegKind::Walk) => PassengerState::Walking,
            Some(LegKind::Wait) => match plan.vehicle() {
                Some(vehicle) => PassengerState::Waiting(vehicle),
                None => PassengerState::Walking,
            },
            Some(LegKind::Ride(vehicle)) => PassengerState::Riding(vehicle),
            None => PassengerState::Arrived,
        }
    }

    /// Whether the passenger needs a new plan at time `now`.
    pub(crate) fn needs_plan(&self, now: f64) -> bool {
        match &self.plan {
            Some(plan) => plan.has_missed_vehicle(now),
            None => true,
        }
    }

    /// Adopts a new plan.
    pub(crate) fn set_plan(&mut self, plan: Plan) {
        self.plan = Some(plan);
    }

    /// Walks along the current leg of the plan, if it is a walking leg,
    /// moving on to the next leg upon reaching its end.
    pub(crate) fn walk(&mut self, dt: f64) {
        let plan = match self.plan.as_mut() {
            Some(plan) => plan,
            None => return,
        };
        let target = match plan.current_leg() {
            Some(leg) if leg.kind == LegKind::Walk => leg.end,
            _ => return,
        };

        let dir = target - self.pos;
        let dist = dir.magnitude();
        let step = self.walk_speed * dt;
        if dist <= step {
            self.pos = target;
            plan.advance();
        } else {
            self.pos += dir * (step / dist);
        }
    }

    /// Gets on board the planned vehicle.
    pub(crate) fn board(&mut self, pos: Point2d) {
        self.pos = pos;
        if let Some(plan) = self.plan.as_mut() {
            plan.advance();
        }
    }

    /// Moves along with the vehicle being ridden.
    pub(crate) fn ride_to(&mut self, pos: Point2d) {
        self.pos = pos;
    }

    /// Gets off the vehicle at the planned point.
    pub(crate) fn alight(&mut self) {
        if let Some(plan) = self.plan.as_mut() {
            if let Some(leg) = plan.current_leg() {
                self.pos = leg.end;
            }
            plan.advance();
        }
    }

    /// Marks the passenger as having reached their destination.
    pub(crate) fn arrive(&mut self, time: f64) {
        self.pos = self.destination;
        self.end_time = Some(time);
    }
}
