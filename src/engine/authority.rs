//! Assignment and conflict authority.
//!
//! Every command resolves and checks all of its inputs before touching
//! the registry, so a rejected command leaves the engine unchanged.
//!
//! # Occupancy
//!
//! A platform is held by at most one active train (assigned, moving,
//! late). Every transition that makes a train active re-checks its
//! platform against the live fleet.

use tracing::{info, warn};

use super::Engine;
use crate::config::validate_speed;
use crate::error::{EngineError, Result};
use crate::models::{PlatformKey, SignalAspect, SignalTable, TrainStatus};
use crate::scheduler::{AutoAssignReport, AutoAssigner};
use crate::seed;

impl Engine {
    /// Assigns a train to a route and optional platform.
    ///
    /// Legal from `scheduled` or `cancelled` only. Resets progress to 0
    /// and sets status `assigned`.
    pub fn assign(&mut self, train_id: &str, route_id: &str, platform: Option<&str>) -> Result<()> {
        let pos = self.registry.position(train_id)?;
        let status = self.registry.trains()[pos].status;
        if !status.can_assign() {
            return Err(EngineError::InvalidState(format!(
                "train '{train_id}' is {status}; clear it before re-assigning"
            )));
        }
        let route_id = self.topology.resolve_route(route_id)?.id.clone();
        let platform = platform.map(|p| self.resolve_platform(p)).transpose()?;
        if let Some(key) = &platform {
            self.check_free(key, train_id)?;
        }

        let train = self.registry.at_mut(pos);
        train.route_id = Some(route_id);
        train.platform = platform;
        train.status = TrainStatus::Assigned;
        train.progress = 0.0;
        train.arrived_at_tick = None;
        info!(
            train = %train_id,
            route = ?train.route_id,
            platform = ?train.platform.as_ref().map(ToString::to_string),
            "assigned"
        );
        Ok(())
    }

    /// Cancels a non-terminal train.
    ///
    /// The reason defaults to the configured cancel reason. Route,
    /// platform and progress are kept for inspection.
    pub fn cancel(&mut self, train_id: &str, reason: Option<&str>) -> Result<()> {
        let pos = self.registry.position(train_id)?;
        self.require_live(pos, "cancel")?;

        let note = reason.unwrap_or(&self.config.default_cancel_reason).to_string();
        let train = self.registry.at_mut(pos);
        train.status = TrainStatus::Cancelled;
        train.note = Some(note);
        info!(train = %train_id, reason = ?train.note, "cancelled");
        Ok(())
    }

    /// Marks a non-terminal train late by `minutes` (default from config).
    pub fn mark_late(&mut self, train_id: &str, minutes: Option<i64>) -> Result<()> {
        let pos = self.registry.position(train_id)?;
        let minutes = match minutes {
            None => self.config.default_late_minutes,
            Some(m) => u32::try_from(m).map_err(|_| {
                EngineError::InvalidInput(format!(
                    "late minutes must be within 0..={}, got {m}",
                    u32::MAX
                ))
            })?,
        };
        self.require_live(pos, "mark late")?;
        self.check_held_platform(pos)?;

        let train = self.registry.at_mut(pos);
        train.status = TrainStatus::Late;
        train.late_by = Some(minutes);
        info!(train = %train_id, minutes, "marked late");
        Ok(())
    }

    /// Returns a late train to `assigned`.
    pub fn mark_assigned(&mut self, train_id: &str) -> Result<()> {
        let pos = self.registry.position(train_id)?;
        let train = &self.registry.trains()[pos];
        if train.status != TrainStatus::Late {
            return Err(EngineError::InvalidState(format!(
                "train '{train_id}' is {}, not late",
                train.status
            )));
        }
        if train.route_id.is_none() {
            return Err(EngineError::InvalidState(format!(
                "train '{train_id}' has no route"
            )));
        }
        self.check_held_platform(pos)?;

        self.registry.at_mut(pos).status = TrainStatus::Assigned;
        info!(train = %train_id, "marked assigned");
        Ok(())
    }

    /// Returns a cancelled train to `scheduled` with a full reset.
    pub fn reinstate(&mut self, train_id: &str) -> Result<()> {
        let pos = self.registry.position(train_id)?;
        let status = self.registry.trains()[pos].status;
        if status != TrainStatus::Cancelled {
            return Err(EngineError::InvalidState(format!(
                "train '{train_id}' is {status}, not cancelled"
            )));
        }
        self.registry.at_mut(pos).reset();
        info!(train = %train_id, "reinstated");
        Ok(())
    }

    /// Full reset of one train to `scheduled`. Legal from any state.
    pub fn clear_status(&mut self, train_id: &str) -> Result<()> {
        let pos = self.registry.position(train_id)?;
        self.registry.at_mut(pos).reset();
        info!(train = %train_id, "status cleared");
        Ok(())
    }

    /// Full reset of every train.
    pub fn clear_all_assignments(&mut self) {
        self.registry.trains_mut().iter_mut().for_each(|t| t.reset());
        info!(trains = self.registry.len(), "all assignments cleared");
    }

    /// Replaces the fleet with the default seeded fleet.
    pub fn reset_trains(&mut self) {
        self.registry.replace(seed::default_trains());
        info!("fleet reset to defaults");
    }

    /// Flips the signal of a segment given as `from_to`.
    pub fn toggle_signal(&mut self, key: &str) -> Result<SignalAspect> {
        let segment = self.resolve_segment(key)?;
        let aspect = self.signals.toggle(segment);
        info!(segment = %key, aspect = ?aspect, "signal toggled");
        Ok(aspect)
    }

    /// Replaces the signal table with every route segment green.
    ///
    /// Segments toggled outside any route are dropped.
    pub fn reset_signals(&mut self) {
        self.signals = SignalTable::all_green(self.topology.segments());
        info!(segments = self.signals.len(), "signals reset");
    }

    /// Changes the speed multiplier.
    pub fn set_speed(&mut self, multiplier: f64) -> Result<()> {
        validate_speed(multiplier)?;
        self.config.speed = multiplier;
        info!(speed = multiplier, "speed changed");
        Ok(())
    }

    /// Runs the automatic assignment heuristic over the fleet.
    pub fn auto_assign_all(&mut self) -> AutoAssignReport {
        AutoAssigner::new(self.config.hub_station.clone())
            .with_rule_engine(self.config.assign_order.rule_engine())
            .assign_all(&mut self.registry, &self.topology)
    }

    fn require_live(&self, pos: usize, action: &str) -> Result<()> {
        let train = &self.registry.trains()[pos];
        if train.status.is_terminal() {
            return Err(EngineError::InvalidState(format!(
                "cannot {action} train '{}': it is {}",
                train.id, train.status
            )));
        }
        Ok(())
    }

    fn check_held_platform(&self, pos: usize) -> Result<()> {
        let train = &self.registry.trains()[pos];
        match &train.platform {
            Some(key) => self.check_free(key, &train.id),
            None => Ok(()),
        }
    }

    fn check_free(&self, platform: &PlatformKey, train_id: &str) -> Result<()> {
        match self.registry.holder_of(platform, Some(train_id)) {
            Some(holder) => {
                warn!(train = %train_id, platform = %platform, holder = %holder.id, "platform conflict");
                Err(EngineError::Conflict {
                    platform: platform.to_string(),
                    holder: holder.id.clone(),
                })
            }
            None => Ok(()),
        }
    }
}
