//! Simulation and planning parameters.

use crate::error::{check_speed, PlanError, PlanResult};

/// The parameters of a [Simulation](crate::Simulation).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationParams {
    /// The number of vehicles distributed over the routes.
    pub vehicle_count: usize,
    /// The probability of a new passenger appearing each step.
    pub passenger_rate: f64,
    /// The speed of every vehicle, in distance units per time unit.
    pub vehicle_speed: f64,
    /// The mean walking speed of passengers, in distance units per time unit.
    pub walk_speed: f64,
    /// The standard deviation of passenger walking speeds, relative to `walk_speed`.
    pub walk_speed_stddev: f64,
    /// The radius within which a passenger is considered to be at a point.
    pub pickup_eps: f64,
    /// The number of upcoming route segments considered when planning.
    pub horizon: usize,
    /// Seed for the simulation's random number generator.
    pub seed: u64,
}

/// The parameters passed into each planning call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanningParams {
    /// The walking speed of the passenger being planned for.
    pub walk_speed: f64,
    /// The radius within which a passenger is considered to be at a point.
    pub pickup_eps: f64,
    /// The number of upcoming route segments considered.
    pub horizon: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            vehicle_count: 20,
            passenger_rate: 0.1,
            vehicle_speed: 0.03,
            walk_speed: 0.003,
            walk_speed_stddev: 0.0,
            pickup_eps: 1e-4,
            horizon: 10,
            seed: 0,
        }
    }
}

impl SimulationParams {
    /// Parses parameters from JSON. Missing fields take their default values.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> PlanResult<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Checks that every parameter is within its valid range.
    pub fn validate(&self) -> PlanResult<()> {
        self.planning().validate()?;
        check_speed("vehicle_speed", self.vehicle_speed)?;
        if !(0.0..=1.0).contains(&self.passenger_rate) {
            return Err(PlanError::InvalidParameter(format!(
                "passenger_rate must be within [0, 1], got {}",
                self.passenger_rate
            )));
        }
        if !(0.0..0.25).contains(&self.walk_speed_stddev) {
            return Err(PlanError::InvalidParameter(format!(
                "walk_speed_stddev must be within [0, 0.25), got {}",
                self.walk_speed_stddev
            )));
        }
        Ok(())
    }

    /// The parameters for planning a trip for a passenger walking at the mean speed.
    pub fn planning(&self) -> PlanningParams {
        PlanningParams {
            walk_speed: self.walk_speed,
            pickup_eps: self.pickup_eps,
            horizon: self.horizon,
        }
    }
}

impl PlanningParams {
    /// Checks that every parameter is within its valid range.
    pub fn validate(&self) -> PlanResult<()> {
        check_speed("walk_speed", self.walk_speed)?;
        if !(self.pickup_eps > 0.0) {
            return Err(PlanError::InvalidParameter(format!(
                "pickup_eps must be positive, got {}",
                self.pickup_eps
            )));
        }
        if self.horizon == 0 {
            return Err(PlanError::EmptyHorizon);
        }
        Ok(())
    }

    /// The same parameters for a passenger walking at `walk_speed`.
    pub fn with_walk_speed(self, walk_speed: f64) -> Self {
        Self { walk_speed, ..self }
    }
}
