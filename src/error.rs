//! Error type shared by the planner and the simulation.

use crate::{PassengerId, RouteId, VehicleId};
use thiserror::Error;

/// Errors raised when a planning or simulation call is given invalid input.
///
/// Failing to find a vehicle the passenger can reach is *not* an error; the
/// planner reports that case as `None`.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("{name} must be positive, got {value}")]
    NonPositiveSpeed { name: &'static str, value: f64 },

    #[error("segment from {start:?} to {end:?} has no length")]
    DegenerateSegment { start: [f64; 2], end: [f64; 2] },

    #[error("route needs at least two vertices, got {0}")]
    RouteTooShort(usize),

    #[error("planning horizon must contain at least one segment")]
    EmptyHorizon,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("route {0:?} not found")]
    UnknownRoute(RouteId),

    #[error("vehicle {0:?} not found")]
    UnknownVehicle(VehicleId),

    #[error("passenger {0:?} is already on board")]
    AlreadyOnBoard(PassengerId),

    #[cfg(feature = "serde")]
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Shorthand result type for fallible operations in this crate.
pub type PlanResult<T> = Result<T, PlanError>;

/// Returns an error unless `value` is a positive, finite speed.
pub(crate) fn check_speed(name: &'static str, value: f64) -> PlanResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PlanError::NonPositiveSpeed { name, value })
    }
}
