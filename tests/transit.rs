//! Tests that drive whole simulations through the public API.

use transit_sim::{
    cgmath::MetricSpace, math::Point2d, PassengerState, Simulation, SimulationParams,
};

fn grid_sim(params: SimulationParams) -> Simulation {
    let mut sim = Simulation::new(params).unwrap();
    sim.add_grid_routes(3, 3);
    sim.add_vehicles().unwrap();
    sim
}

fn busy() -> SimulationParams {
    SimulationParams {
        vehicle_count: 12,
        passenger_rate: 0.3,
        seed: 7,
        ..Default::default()
    }
}

/// Test that vehicles stay on their routes and within the unit square.
#[test]
fn vehicles_follow_routes() {
    let mut sim = grid_sim(busy());
    for _ in 0..200 {
        sim.step(1.0).unwrap();
        for vehicle in sim.iter_vehicles() {
            let route = sim.oracle().route(vehicle.route_id()).unwrap();
            let a = route.vertex(vehicle.target_idx() + route.len() - 1);
            let b = route.vertex(vehicle.target_idx());
            let on_edge = (a.distance(vehicle.position()) + vehicle.position().distance(b)
                - a.distance(b))
            .abs()
                < 1e-9;
            assert!(on_edge || vehicle.position() == a);
            assert!(vehicle.travelled().length() <= vehicle.speed() + 1e-12);
        }
    }
}

/// Test that passengers reach their destinations, and no faster than the
/// vehicles could possibly carry them.
#[test]
fn passengers_complete_trips() {
    let mut sim = grid_sim(busy());
    for _ in 0..2000 {
        sim.step(1.0).unwrap();
    }

    let completed = sim.completed();
    assert!(!completed.is_empty());
    let vehicle_speed = sim.params().vehicle_speed;
    for passenger in completed {
        let duration = passenger.trip_duration().unwrap();
        assert!(duration >= 0.0);
        let crow_flies = passenger.source().distance(passenger.destination());
        assert!(duration + 1.0 >= crow_flies / vehicle_speed);
        assert_eq!(passenger.position(), passenger.destination());
    }
    assert_eq!(sim.trip_durations().len(), completed.len());
}

/// Test that some passengers ride rather than walk.
#[test]
fn passengers_ride() {
    let mut sim = grid_sim(busy());
    let mut riders = 0;
    for _ in 0..500 {
        sim.step(1.0).unwrap();
        for passenger in sim.iter_passengers() {
            if let PassengerState::Riding(vehicle_id) = passenger.state() {
                let vehicle = sim.get_vehicle(vehicle_id).unwrap();
                assert!(vehicle.passengers().contains(&passenger.id()));
                assert_eq!(passenger.position(), vehicle.position());
                riders += 1;
            }
        }
    }
    assert!(riders > 0);
}

/// Test that the same seed produces the same simulation.
#[test]
fn deterministic() {
    let mut a = grid_sim(busy());
    let mut b = grid_sim(busy());
    for _ in 0..300 {
        a.step(1.0).unwrap();
        b.step(1.0).unwrap();
    }
    assert_eq!(a.trip_durations(), b.trip_durations());
    let positions = |sim: &Simulation| {
        sim.iter_passengers()
            .map(|p| p.position())
            .collect::<Vec<Point2d>>()
    };
    assert_eq!(positions(&a), positions(&b));
}

/// Test that a passenger on the far side of a square route is carried around it.
#[test]
fn square_route_pickup() {
    let mut sim = Simulation::new(SimulationParams {
        passenger_rate: 0.0,
        vehicle_count: 2,
        ..Default::default()
    })
    .unwrap();
    sim.add_square_route(0.1).unwrap();
    sim.add_vehicles().unwrap();
    let id = sim
        .add_passenger(Point2d::new(0.1, 0.12), Point2d::new(0.88, 0.9))
        .unwrap();

    let walk_time = Point2d::new(0.1, 0.12).distance(Point2d::new(0.88, 0.9)) / 0.003;
    let mut boarded = false;
    while sim.get_passenger(id).is_some() {
        sim.step(1.0).unwrap();
        boarded |= matches!(
            sim.get_passenger(id).map(|p| p.state()),
            Some(PassengerState::Riding(_))
        );
        assert!(sim.time() < walk_time);
    }
    assert!(boarded);
}
