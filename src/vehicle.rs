use crate::error::{PlanError, PlanResult};
use crate::math::{LineSegment2d, Point2d, Vector2d};
use crate::planner::Timetable;
use crate::route::Route;
use crate::{PassengerId, RouteId, VehicleId};
use cgmath::prelude::*;
use log::debug;

/// A simulated vehicle, endlessly following a fixed route at constant speed.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's ID
    pub(crate) id: VehicleId,
    /// The route the vehicle follows.
    route: RouteId,
    /// The index of the route vertex the vehicle is heading towards.
    target_idx: usize,
    /// The world space coordinates of the vehicle.
    pos: Point2d,
    /// The position of the vehicle at the start of the last step.
    prev_pos: Point2d,
    /// The velocity of the vehicle.
    vel: Vector2d,
    /// The vehicle's speed.
    speed: f64,
    /// Whether the vehicle reaches its target vertex during the current step.
    landing: Option<Point2d>,
    /// The passengers on board, in the order they boarded.
    passengers: Vec<PassengerId>,
}

impl Vehicle {
    /// Creates a new vehicle.
    pub(crate) fn new(
        id: VehicleId,
        route: RouteId,
        target_idx: usize,
        pos: Point2d,
        speed: f64,
    ) -> Self {
        Self {
            id,
            route,
            target_idx,
            pos,
            prev_pos: pos,
            vel: Vector2d::zero(),
            speed,
            landing: None,
            passengers: vec![],
        }
    }

    /// Gets the vehicle's ID.
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// The ID of the route the vehicle follows.
    pub fn route_id(&self) -> RouteId {
        self.route
    }

    /// The index of the route vertex the vehicle is heading towards.
    pub fn target_idx(&self) -> usize {
        self.target_idx
    }

    /// The coordinates in world space of the vehicle.
    pub fn position(&self) -> Point2d {
        self.pos
    }

    /// The vehicle's velocity.
    pub fn velocity(&self) -> Vector2d {
        self.vel
    }

    /// The vehicle's speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The passengers on board.
    pub fn passengers(&self) -> &[PassengerId] {
        &self.passengers
    }

    /// The path the vehicle covered during the last step.
    /// Has no length if the vehicle did not move.
    pub fn travelled(&self) -> LineSegment2d {
        LineSegment2d::from_ends(self.prev_pos, self.pos)
    }

    /// Projects the vehicle's path over the next `horizon` route segments.
    pub fn timetable(&self, route: &Route, horizon: usize) -> PlanResult<Timetable> {
        Timetable::build(
            route.vertices(),
            self.target_idx,
            self.pos,
            horizon,
            self.speed,
        )
    }

    /// Points the vehicle towards its target vertex, moving on to the
    /// next vertex if it has already arrived.
    ///
    /// # Parameters
    /// * `route` - The vehicle's route
    /// * `dt` - The time step
    pub(crate) fn steer(&mut self, route: &Route, dt: f64) {
        if self.pos == route.vertex(self.target_idx) {
            self.target_idx = route.next_idx(self.target_idx);
        }

        let target = route.vertex(self.target_idx);
        let dir = target - self.pos;
        let dist = dir.magnitude();

        // Don't overshoot on the last step to a vertex
        if dist <= self.speed * dt {
            self.vel = dir / dt;
            self.landing = Some(target);
        } else {
            self.vel = dir * (self.speed / dist);
            self.landing = None;
        }
    }

    /// Integrates the vehicle's position.
    ///
    /// # Parameters
    /// * `dt` - The time step
    pub(crate) fn integrate(&mut self, dt: f64) {
        self.prev_pos = self.pos;
        self.pos = match self.landing.take() {
            Some(target) => target,
            None => self.pos + self.vel * dt,
        };
    }

    /// Takes a passenger on board.
    pub(crate) fn pickup(&mut self, passenger: PassengerId) -> PlanResult<()> {
        if self.passengers.contains(&passenger) {
            return Err(PlanError::AlreadyOnBoard(passenger));
        }
        self.passengers.push(passenger);
        debug!("Passenger {:?}, Vehicle {:?}, pickup at {:?}", passenger, self.id, self.pos);
        Ok(())
    }

    /// Lets a passenger off. Returns `false` if they were not on board.
    pub(crate) fn dropoff(&mut self, passenger: PassengerId) -> bool {
        match self.passengers.iter().position(|id| *id == passenger) {
            Some(idx) => {
                self.passengers.remove(idx);
                debug!("Passenger {:?}, Vehicle {:?}, dropoff at {:?}", passenger, self.id, self.pos);
                true
            }
            None => false,
        }
    }
}
