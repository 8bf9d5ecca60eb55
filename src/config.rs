//! Simulation configuration.
//!
//! Ticks are an engine-defined unit. `tick_interval_ms` only tells a host
//! how often to call [`Engine::tick`](crate::engine::Engine::tick); the
//! engine itself never reads wall time.

use serde::{Deserialize, Serialize};

use crate::dispatching::AssignOrder;
use crate::error::{EngineError, Result};

/// Slowest permitted speed multiplier.
pub const MIN_SPEED: f64 = 0.25;
/// Fastest permitted speed multiplier.
pub const MAX_SPEED: f64 = 3.0;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Progress added per tick at speed 1.0.
    pub tick_increment: f64,
    /// Speed multiplier applied to `tick_increment`.
    pub speed: f64,
    /// Ticks an arrived train keeps its platform before it is released.
    pub arrival_grace_ticks: u64,
    /// Suggested wall-clock period between ticks (ms).
    pub tick_interval_ms: u64,
    /// Station preferred as origin by the automatic assignment.
    pub hub_station: String,
    /// Delay applied by `mark_late` when no minutes are given.
    pub default_late_minutes: u32,
    /// Note applied by `cancel` when no reason is given.
    pub default_cancel_reason: String,
    /// Candidate order for `auto_assign_all`.
    pub assign_order: AssignOrder,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_increment: 0.005,
            speed: 1.0,
            arrival_grace_ticks: 3,
            tick_interval_ms: 1000,
            hub_station: "central".to_string(),
            default_late_minutes: 10,
            default_cancel_reason: "Cancelled".to_string(),
            assign_order: AssignOrder::Departure,
        }
    }
}

impl SimulationConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-tick progress increment.
    pub fn with_tick_increment(mut self, increment: f64) -> Self {
        self.tick_increment = increment;
        self
    }

    /// Sets the speed multiplier.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the arrival grace period in ticks.
    pub fn with_arrival_grace_ticks(mut self, ticks: u64) -> Self {
        self.arrival_grace_ticks = ticks;
        self
    }

    /// Sets the hub station.
    pub fn with_hub_station(mut self, station_id: impl Into<String>) -> Self {
        self.hub_station = station_id.into();
        self
    }

    /// Sets the automatic assignment order.
    pub fn with_assign_order(mut self, order: AssignOrder) -> Self {
        self.assign_order = order;
        self
    }

    /// Sets the suggested tick period.
    pub fn with_tick_interval_ms(mut self, interval_ms: u64) -> Self {
        self.tick_interval_ms = interval_ms;
        self
    }

    /// Progress a free-running train gains in one tick.
    #[inline]
    pub fn step(&self) -> f64 {
        self.tick_increment * self.speed
    }

    /// Checks numeric ranges.
    pub fn validate(&self) -> Result<()> {
        validate_speed(self.speed)?;
        if !self.tick_increment.is_finite() || self.tick_increment <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "tick increment must be positive, got {}",
                self.tick_increment
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_speed(speed: f64) -> Result<()> {
    if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(EngineError::InvalidInput(format!(
            "speed multiplier {speed} outside [{MIN_SPEED}, {MAX_SPEED}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SimulationConfig::default();
        assert!((c.step() - 0.005).abs() < 1e-12);
        assert_eq!(c.arrival_grace_ticks, 3);
        assert_eq!(c.hub_station, "central");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_speed_scales_step() {
        let c = SimulationConfig::new().with_speed(2.0);
        assert!((c.step() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_speed_out_of_range() {
        assert!(SimulationConfig::new().with_speed(0.1).validate().is_err());
        assert!(SimulationConfig::new().with_speed(3.5).validate().is_err());
        assert!(SimulationConfig::new().with_speed(3.0).validate().is_ok());
    }

    #[test]
    fn test_non_positive_increment_rejected() {
        let c = SimulationConfig::new().with_tick_increment(0.0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: SimulationConfig = serde_json::from_str(r#"{"speed": 1.5}"#).unwrap();
        assert!((c.speed - 1.5).abs() < 1e-12);
        assert_eq!(c.hub_station, "central");
        assert_eq!(c.default_late_minutes, 10);
        assert_eq!(c.assign_order, AssignOrder::Departure);

        let c: SimulationConfig = serde_json::from_str(r#"{"assign_order": "registry"}"#).unwrap();
        assert_eq!(c.assign_order, AssignOrder::Registry);
    }
}
