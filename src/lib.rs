//! A fixed-route transit simulation, in which walking passengers plan
//! exactly when and where to board and alight vehicles that follow
//! their routes at constant speed.

pub use cgmath;
pub use config::{PlanningParams, SimulationParams};
pub use error::{PlanError, PlanResult};
pub use oracle::StaticRouteOracle;
pub use passenger::{Passenger, PassengerState};
pub use plan::{LegKind, Plan, PlanLeg};
pub use route::Route;
pub use simulation::Simulation;
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use util::Interval;
pub use vehicle::Vehicle;

mod config;
mod debug;
mod error;
pub mod math;
mod oracle;
mod passenger;
mod plan;
pub mod planner;
mod route;
mod simulation;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of a [Route].
    pub struct RouteId;
    /// Unique ID of a [Vehicle].
    pub struct VehicleId;
    /// Unique ID of a [Passenger].
    pub struct PassengerId;
}

/// The vehicles in a simulation, by ID.
pub type VehicleSet = SlotMap<VehicleId, Vehicle>;
type PassengerSet = SlotMap<PassengerId, Passenger>;
