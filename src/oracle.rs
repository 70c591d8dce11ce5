use crate::config::PlanningParams;
use crate::debug::debug_point;
use crate::error::{PlanError, PlanResult};
use crate::math::Point2d;
use crate::plan::Plan;
use crate::planner::best_dropoff;
use crate::route::Route;
use crate::{RouteId, VehicleSet};
use cgmath::prelude::*;
use log::{debug, trace};
use slotmap::SlotMap;

/// Plans trips over a fixed set of routes, each served by vehicles which
/// never deviate from their route.
#[derive(Clone, Debug, Default)]
pub struct StaticRouteOracle {
    /// The routes vehicles may follow.
    routes: SlotMap<RouteId, Route>,
}

impl StaticRouteOracle {
    /// Creates an oracle with no routes.
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a route.
    pub fn add_route(&mut self, route: Route) -> RouteId {
        self.routes.insert(route)
    }

    /// Gets a reference to the route with the given ID.
    pub fn route(&self, id: RouteId) -> PlanResult<&Route> {
        self.routes.get(id).ok_or(PlanError::UnknownRoute(id))
    }

    /// Returns an iterator over all the routes.
    pub fn iter_routes(&self) -> impl Iterator<Item = (RouteId, &Route)> {
        self.routes.iter()
    }

    /// Spreads `count` vehicles evenly over the routes.
    ///
    /// Returns, for each vehicle, its route and its phase within that route,
    /// suitable for [Route::place].
    pub fn distribute(&self, count: usize) -> PlanResult<Vec<(RouteId, f64)>> {
        let route_ids = self.routes.keys().collect::<Vec<_>>();
        if count > 0 && route_ids.is_empty() {
            return Err(PlanError::InvalidParameter(
                "cannot place vehicles without any routes".into(),
            ));
        }
        let placements = (0..count)
            .map(|i| {
                let frac = (i * route_ids.len()) as f64 / count as f64;
                let idx = usize::min(frac.floor() as usize, route_ids.len() - 1);
                (route_ids[idx], frac - frac.floor())
            })
            .collect();
        Ok(placements)
    }

    /// Points every vehicle along its route for the coming time step.
    pub fn steer_vehicles(&self, vehicles: &mut VehicleSet, dt: f64) -> PlanResult<()> {
        for vehicle in vehicles.values_mut() {
            let route = self.route(vehicle.route_id())?;
            vehicle.steer(route, dt);
        }
        Ok(())
    }

    /// Derives the plan which gets a passenger from `from` to `destination`
    /// the soonest, either by walking there directly or by riding one of the vehicles.
    ///
    /// When two plans arrive at the same time, walking is preferred over
    /// riding, and vehicles earlier in `vehicles` are preferred over later ones.
    ///
    /// # Parameters
    /// * `now` - The current simulation time
    /// * `from` - The passenger's current location
    /// * `destination` - Where the passenger is heading
    /// * `params` - The planning parameters, including the passenger's walking speed
    /// * `vehicles` - The vehicles which may be ridden
    pub fn plan_trip(
        &self,
        now: f64,
        from: Point2d,
        destination: Point2d,
        params: &PlanningParams,
        vehicles: &VehicleSet,
    ) -> PlanResult<Plan> {
        params.validate()?;

        let mut best = Plan::walk(now, from, destination, params.walk_speed);
        if from.distance(destination) <= params.pickup_eps {
            return Ok(best);
        }

        for vehicle in vehicles.values() {
            let route = self.route(vehicle.route_id())?;
            let timetable = vehicle.timetable(route, params.horizon)?;
            trace!(
                "Vehicle {:?}, timetable {:?}",
                vehicle.id(),
                timetable.segments()
            );

            let accessible = match timetable.accessible(from, params.walk_speed, vehicle.speed())? {
                Some(accessible) => accessible,
                None => continue,
            };
            let dropoff = best_dropoff(destination, &accessible, params.walk_speed, vehicle.speed())?;
            let plan = Plan::ride(
                now,
                from,
                destination,
                vehicle.id(),
                &accessible,
                &dropoff,
                params.walk_speed,
            );

            if plan.arrival_time() < best.arrival_time() {
                debug!(
                    "Vehicle {:?}, board at {:?}, alight at {:?}, arrive at {:.3}",
                    vehicle.id(),
                    accessible.boarding_point(),
                    dropoff.candidate.point,
                    plan.arrival_time()
                );
                debug_point("board", accessible.boarding_point());
                best = plan;
            }
        }

        Ok(best)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::plan::LegKind;
    use crate::vehicle::Vehicle;
    use crate::SimulationParams;
    use assert_approx_eq::assert_approx_eq;

    fn params(walk_speed: f64) -> PlanningParams {
        PlanningParams {
            walk_speed,
            pickup_eps: 1e-4,
            horizon: 6,
        }
    }

    fn square_network(speed: f64) -> (StaticRouteOracle, VehicleSet) {
        let mut oracle = StaticRouteOracle::new();
        let route_id = oracle.add_route(Route::square(0.0).unwrap());
        let mut vehicles = VehicleSet::with_key();
        vehicles.insert_with_key(|id| Vehicle::new(id, route_id, 1, Point2d::new(0.0, 0.0), speed));
        (oracle, vehicles)
    }

    #[test]
    fn even_distribution() {
        let mut oracle = StaticRouteOracle::new();
        let a = oracle.add_route(Route::square(0.0).unwrap());
        let b = oracle.add_route(Route::square(0.1).unwrap());

        let placements = oracle.distribute(4).unwrap();
        assert_eq!(placements.len(), 4);
        assert_eq!(placements[0], (a, 0.0));
        assert_eq!(placements[1], (a, 0.5));
        assert_eq!(placements[2], (b, 0.0));
        assert_eq!(placements[3], (b, 0.5));

        assert!(oracle.distribute(0).unwrap().is_empty());
        assert!(StaticRouteOracle::new().distribute(1).is_err());
    }

    #[test]
    fn walks_when_faster() {
        let (oracle, vehicles) = square_network(1.0);
        let from = Point2d::new(0.5, 0.5);
        let to = Point2d::new(0.6, 0.5);
        let plan = oracle.plan_trip(0.0, from, to, &params(0.1), &vehicles).unwrap();
        assert_eq!(plan.legs().len(), 1);
        assert_eq!(plan.vehicle(), None);
        assert_approx_eq!(plan.arrival_time(), 1.0);
    }

    #[test]
    fn rides_when_faster() {
        let (oracle, vehicles) = square_network(1.0);
        let from = Point2d::new(0.5, -0.1);
        let to = Point2d::new(1.0, 0.9);
        let plan = oracle.plan_trip(2.0, from, to, &params(0.1), &vehicles).unwrap();
        let vehicle_id = vehicles.keys().next().unwrap();
        assert_eq!(plan.vehicle(), Some(vehicle_id));
        assert_eq!(plan.legs()[2].kind, LegKind::Ride(vehicle_id));
        assert!(plan.arrival_time() < 2.0 + from.distance(to) / 0.1);
        assert_eq!(plan.legs().last().unwrap().end, to);
    }

    #[test]
    fn already_there() {
        let (oracle, vehicles) = square_network(1.0);
        let from = Point2d::new(0.5, 0.5);
        let plan = oracle.plan_trip(3.0, from, from, &params(0.1), &vehicles).unwrap();
        assert_eq!(plan.vehicle(), None);
        assert_approx_eq!(plan.arrival_time(), 3.0);
    }

    #[test]
    fn unknown_route() {
        let (_, vehicles) = square_network(1.0);
        let oracle = StaticRouteOracle::new();
        let from = Point2d::new(0.5, 0.5);
        let to = Point2d::new(0.9, 0.5);
        assert!(matches!(
            oracle.plan_trip(0.0, from, to, &params(0.1), &vehicles),
            Err(PlanError::UnknownRoute(_))
        ));
    }

    #[test]
    fn invalid_params() {
        let (oracle, vehicles) = square_network(1.0);
        let from = Point2d::new(0.5, 0.5);
        let params = SimulationParams {
            horizon: 0,
            ..Default::default()
        };
        assert!(oracle
            .plan_trip(0.0, from, from, &params.planning(), &vehicles)
            .is_err());
    }
}
