#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::config::SimulationParams;
use crate::error::{PlanError, PlanResult};
use crate::math::Point2d;
use crate::oracle::StaticRouteOracle;
use crate::passenger::{Passenger, PassengerState};
use crate::plan::{LegKind, Plan};
use crate::route::Route;
use crate::vehicle::Vehicle;
use crate::{PassengerId, PassengerSet, RouteId, VehicleId, VehicleSet};
use cgmath::prelude::*;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Allowance for rounding when comparing the simulation clock against planned times.
const TIME_EPS: f64 = 1e-6;

/// A simulation of passengers walking and riding vehicles around fixed routes.
pub struct Simulation {
    /// The simulation parameters.
    params: SimulationParams,
    /// The routes, and the planner which uses them.
    oracle: StaticRouteOracle,
    /// The vehicles being simulated.
    vehicles: VehicleSet,
    /// The passengers yet to reach their destination.
    passengers: PassengerSet,
    /// The passengers who have reached their destination, in order of arrival.
    completed: Vec<Passenger>,
    /// The random number generator used to spawn passengers.
    rng: StdRng,
    /// The current simulation time.
    time: f64,
    /// The current frame of simulation.
    frame: usize,
    /// Debugging information from the previously simulated frame.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl Simulation {
    /// Creates a new simulation with no routes, vehicles or passengers.
    pub fn new(params: SimulationParams) -> PlanResult<Self> {
        params.validate()?;
        Ok(Self {
            rng: StdRng::seed_from_u64(params.seed),
            params,
            oracle: StaticRouteOracle::new(),
            vehicles: VehicleSet::with_key(),
            passengers: PassengerSet::with_key(),
            completed: vec![],
            time: 0.0,
            frame: 0,
            #[cfg(feature = "debug")]
            debug: serde_json::Value::Null,
        })
    }

    /// Adds a route to the network.
    pub fn add_route(&mut self, route: Route) -> RouteId {
        self.oracle.add_route(route)
    }

    /// Adds a grid of `nx` horizontal and `ny` vertical routes. See [Route::grid].
    pub fn add_grid_routes(&mut self, nx: usize, ny: usize) -> Vec<RouteId> {
        Route::grid(nx, ny)
            .into_iter()
            .map(|route| self.add_route(route))
            .collect()
    }

    /// Adds a single square route. See [Route::square].
    pub fn add_square_route(&mut self, inset: f64) -> PlanResult<RouteId> {
        Ok(self.add_route(Route::square(inset)?))
    }

    /// Adds a vehicle to the given route, part way around it.
    ///
    /// # Parameters
    /// * `route_id` - The route the vehicle will follow forever
    /// * `phase` - How far around the route to start, in `[0, 1)`
    pub fn add_vehicle(&mut self, route_id: RouteId, phase: f64) -> PlanResult<VehicleId> {
        let (target_idx, pos) = self.oracle.route(route_id)?.place(phase);
        let speed = self.params.vehicle_speed;
        Ok(self
            .vehicles
            .insert_with_key(|id| Vehicle::new(id, route_id, target_idx, pos, speed)))
    }

    /// Adds `vehicle_count` vehicles, spread evenly over the routes.
    pub fn add_vehicles(&mut self) -> PlanResult<Vec<VehicleId>> {
        self.oracle
            .distribute(self.params.vehicle_count)?
            .into_iter()
            .map(|(route_id, phase)| self.add_vehicle(route_id, phase))
            .collect()
    }

    /// Adds a passenger at `source`, heading to `destination`.
    ///
    /// If `walk_speed_stddev` is non-zero, the passenger's walking speed is
    /// the mean walking speed multiplied by a factor sampled from a normal
    /// distribution with a mean of 1, clamped to `[0.75, 1.25]`.
    pub fn add_passenger(&mut self, source: Point2d, destination: Point2d) -> PlanResult<PassengerId> {
        let walk_speed = self.params.walk_speed * self.sample_walk_factor()?;
        let time = self.time;
        let id = self
            .passengers
            .insert_with_key(|id| Passenger::new(id, source, destination, walk_speed, time));
        debug!(
            "Passenger {:?}, spawned at {:?}, heading to {:?}",
            id, source, destination
        );
        Ok(id)
    }

    /// Advances the simulation by `dt` time units.
    pub fn step(&mut self, dt: f64) -> PlanResult<()> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(PlanError::InvalidParameter(format!(
                "time step must be positive, got {}",
                dt
            )));
        }

        self.spawn_passengers()?;
        self.plan_passengers()?;
        self.oracle.steer_vehicles(&mut self.vehicles, dt)?;
        self.walk_passengers(dt);
        self.integrate(dt);
        self.board_passengers()?;
        self.alight_passengers(dt);
        self.complete_passengers(dt);
        self.time += dt;
        self.frame += 1;

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }

        Ok(())
    }

    /// Gets the current simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Gets the simulation parameters.
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Gets the route planner.
    pub fn oracle(&self) -> &StaticRouteOracle {
        &self.oracle
    }

    /// Returns an iterator over all the vehicles in the simulation.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Returns an iterator over the passengers still travelling.
    pub fn iter_passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers.values()
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(vehicle_id)
    }

    /// Gets a reference to the passenger with the given ID, if they are still travelling.
    pub fn get_passenger(&self, passenger_id: PassengerId) -> Option<&Passenger> {
        self.passengers.get(passenger_id)
    }

    /// The passengers who have reached their destination, in order of arrival.
    pub fn completed(&self) -> &[Passenger] {
        &self.completed
    }

    /// The start time and total duration of every completed trip.
    pub fn trip_durations(&self) -> Vec<(f64, f64)> {
        self.completed
            .iter()
            .filter_map(|p| Some((p.start_time(), p.trip_duration()?)))
            .collect()
    }

    /// Gets the debugging information for the previously simulated frame as JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&mut self) -> serde_json::Value {
        self.debug.clone()
    }

    /// Samples a walking speed adjustment factor for a new passenger.
    fn sample_walk_factor(&mut self) -> PlanResult<f64> {
        let stddev = self.params.walk_speed_stddev;
        if stddev == 0.0 {
            return Ok(1.0);
        }
        let distr = Normal::new(1.0, stddev)
            .map_err(|err| PlanError::InvalidParameter(err.to_string()))?;
        Ok(distr.sample(&mut self.rng).clamp(0.75, 1.25))
    }

    /// Randomly spawns a new passenger somewhere in the unit square.
    fn spawn_passengers(&mut self) -> PlanResult<()> {
        if self.rng.gen_bool(self.params.passenger_rate) {
            let source = Point2d::new(self.rng.gen(), self.rng.gen());
            let destination = Point2d::new(self.rng.gen(), self.rng.gen());
            self.add_passenger(source, destination)?;
        }
        Ok(())
    }

    /// Derives plans for new passengers, and for passengers whose vehicle has gone.
    fn plan_passengers(&mut self) -> PlanResult<()> {
        let now = self.time;
        let params = self.params.planning();
        let pending = self
            .passengers
            .values()
            .filter(|p| p.needs_plan(now))
            .map(|p| (p.id(), p.position(), p.destination(), p.walk_speed()))
            .collect::<Vec<_>>();

        let oracle = &self.oracle;
        let vehicles = &self.vehicles;
        let plan = |(id, from, to, walk_speed): (PassengerId, Point2d, Point2d, f64)| {
            let params = params.with_walk_speed(walk_speed);
            oracle
                .plan_trip(now, from, to, &params, vehicles)
                .map(|plan| (id, plan))
        };

        #[cfg(feature = "parallel")]
        let plans = pending.into_par_iter().map(plan).collect::<PlanResult<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let plans = pending.into_iter().map(plan).collect::<PlanResult<Vec<_>>>()?;

        for (id, plan) in plans {
            self.passengers[id].set_plan(plan);
        }
        Ok(())
    }

    /// Moves walking passengers along their plans.
    fn walk_passengers(&mut self, dt: f64) {
        for passenger in self.passengers.values_mut() {
            passenger.walk(dt);
        }
    }

    /// Moves the vehicles, and the passengers riding them.
    fn integrate(&mut self, dt: f64) {
        for vehicle in self.vehicles.values_mut() {
            vehicle.integrate(dt);
            for passenger_id in vehicle.passengers() {
                if let Some(passenger) = self.passengers.get_mut(*passenger_id) {
                    passenger.ride_to(vehicle.position());
                }
            }
        }
    }

    /// Puts waiting passengers on board their vehicle if it passed them during this step.
    fn board_passengers(&mut self) -> PlanResult<()> {
        let eps = self.params.pickup_eps;
        let mut boardings = vec![];
        for passenger in self.passengers.values() {
            if let PassengerState::Waiting(vehicle_id) = passenger.state() {
                let vehicle = self
                    .vehicles
                    .get(vehicle_id)
                    .ok_or(PlanError::UnknownVehicle(vehicle_id))?;
                if vehicle.travelled().distance_to(passenger.position()) <= eps {
                    boardings.push((passenger.id(), vehicle_id));
                }
            }
        }

        for (passenger_id, vehicle_id) in boardings {
            let vehicle = &mut self.vehicles[vehicle_id];
            vehicle.pickup(passenger_id)?;
            self.passengers[passenger_id].board(vehicle.position());
        }
        Ok(())
    }

    /// Lets riding passengers off once their vehicle reaches their planned dropoff point.
    fn alight_passengers(&mut self, dt: f64) {
        let eps = self.params.pickup_eps;
        let step_end = self.time + dt;
        let mut alightings = vec![];
        for vehicle in self.vehicles.values() {
            let travelled = vehicle.travelled();
            for passenger_id in vehicle.passengers() {
                let leg = self
                    .passengers
                    .get(*passenger_id)
                    .and_then(|p| p.plan())
                    .and_then(Plan::current_leg);
                let leg = match leg {
                    Some(leg) if leg.kind == LegKind::Ride(vehicle.id()) => leg,
                    _ => continue,
                };
                // Vehicles never run ahead of their timetable, so an earlier
                // pass over the same point is not the planned one
                if step_end + TIME_EPS >= leg.end_time && travelled.distance_to(leg.end) <= eps {
                    alightings.push((*passenger_id, vehicle.id()));
                }
            }
        }

        for (passenger_id, vehicle_id) in alightings {
            self.vehicles[vehicle_id].dropoff(passenger_id);
            self.passengers[passenger_id].alight();
        }
    }

    /// Retires passengers who have reached their destination.
    fn complete_passengers(&mut self, dt: f64) {
        let eps = self.params.pickup_eps;
        let arrived = self
            .passengers
            .values()
            .filter(|p| !matches!(p.state(), PassengerState::Riding(_) | PassengerState::Unplanned))
            .filter(|p| p.position().distance(p.destination()) <= eps)
            .map(|p| p.id())
            .collect::<Vec<_>>();

        for passenger_id in arrived {
            if let Some(mut passenger) = self.passengers.remove(passenger_id) {
                passenger.arrive(self.time + dt);
                debug!(
                    "Passenger {:?}, arrived after {:.3}",
                    passenger_id,
                    passenger.trip_duration().unwrap_or_default()
                );
                self.completed.push(passenger);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> SimulationParams {
        SimulationParams {
            vehicle_count: 1,
            passenger_rate: 0.0,
            vehicle_speed: 0.1,
            walk_speed: 0.01,
            ..Default::default()
        }
    }

    #[test]
    fn walks_short_trip() {
        let mut sim = Simulation::new(params()).unwrap();
        sim.add_square_route(0.0).unwrap();
        sim.add_vehicles().unwrap();
        let id = sim
            .add_passenger(Point2d::new(0.5, 0.5), Point2d::new(0.55, 0.5))
            .unwrap();
        for _ in 0..4 {
            sim.step(1.0).unwrap();
            assert_eq!(sim.get_passenger(id).unwrap().state(), PassengerState::Walking);
        }
        sim.step(1.0).unwrap();
        assert!(sim.get_passenger(id).is_none());
        assert_eq!(sim.completed().len(), 1);
        assert_eq!(sim.trip_durations(), vec![(0.0, 5.0)]);
    }

    #[test]
    fn rides_along_route() {
        let mut sim = Simulation::new(params()).unwrap();
        let route = sim.add_square_route(0.0).unwrap();
        let vehicle = sim.add_vehicle(route, 0.0).unwrap();
        let id = sim
            .add_passenger(Point2d::new(0.9, 0.0), Point2d::new(1.0, 0.9))
            .unwrap();

        let mut rode = false;
        for _ in 0..100 {
            sim.step(0.5).unwrap();
            match sim.get_passenger(id) {
                Some(p) if p.state() == PassengerState::Riding(vehicle) => {
                    rode = true;
                    assert_eq!(p.position(), sim.get_vehicle(vehicle).unwrap().position());
                    assert_eq!(sim.get_vehicle(vehicle).unwrap().passengers(), &[id]);
                }
                Some(_) => {}
                None => break,
            }
        }
        assert!(rode);
        assert_eq!(sim.completed().len(), 1);
        assert!(sim.iter_vehicles().all(|v| v.passengers().is_empty()));
    }

    #[test]
    fn walk_speeds_vary() {
        let mut sim = Simulation::new(SimulationParams {
            walk_speed_stddev: 0.2,
            ..params()
        })
        .unwrap();
        let p = Point2d::new(0.5, 0.5);
        for _ in 0..50 {
            sim.add_passenger(p, p).unwrap();
        }
        let speeds = sim.iter_passengers().map(|p| p.walk_speed()).collect::<Vec<_>>();
        assert!(speeds.iter().all(|v| (0.0074..=0.0126).contains(v)));
        assert!(speeds.iter().any(|v| *v != speeds[0]));
    }

    #[test]
    fn rejects_bad_time_step() {
        let mut sim = Simulation::new(params()).unwrap();
        assert!(sim.step(0.0).is_err());
        assert!(sim.step(f64::NAN).is_err());
    }

    #[test]
    fn needs_routes_for_vehicles() {
        let mut sim = Simulation::new(params()).unwrap();
        assert!(sim.add_vehicles().is_err());
    }
}
