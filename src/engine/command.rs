//! Command messages for UI and CLI adapters.
//!
//! Each line an adapter receives parses as one [`Command`]; the `command`
//! field is the discriminator:
//!
//! ```json
//! {"command": "assign", "train_id": "T1", "route_id": "r1", "platform": "central:1"}
//! {"command": "toggle_signal", "segment": "central_westj"}
//! {"command": "tick"}
//! ```

use serde::{Deserialize, Serialize};

use super::{Engine, TickReport};
use crate::error::Result;
use crate::models::SignalAspect;
use crate::scheduler::AutoAssignReport;

/// A state-changing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Assign {
        train_id: String,
        route_id: String,
        #[serde(default)]
        platform: Option<String>,
    },
    Cancel {
        train_id: String,
        #[serde(default)]
        reason: Option<String>,
    },
    MarkLate {
        train_id: String,
        #[serde(default)]
        minutes: Option<i64>,
    },
    MarkAssigned {
        train_id: String,
    },
    Reinstate {
        train_id: String,
    },
    ClearStatus {
        train_id: String,
    },
    ClearAllAssignments,
    ToggleSignal {
        segment: String,
    },
    ResetSignals,
    ResetTrains,
    SetSpeed {
        speed: f64,
    },
    AutoAssignAll,
    /// Advance one tick, or `ticks` ticks.
    Tick {
        #[serde(default)]
        ticks: Option<u64>,
    },
}

/// What an applied command produced beyond the state change itself.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Done,
    Signal(SignalAspect),
    AutoAssigned(AutoAssignReport),
    Ticked(Vec<TickReport>),
}

impl Engine {
    /// Applies a command message.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        let outcome = match command {
            Command::Assign {
                train_id,
                route_id,
                platform,
            } => {
                self.assign(&train_id, &route_id, platform.as_deref())?;
                CommandOutcome::Done
            }
            Command::Cancel { train_id, reason } => {
                self.cancel(&train_id, reason.as_deref())?;
                CommandOutcome::Done
            }
            Command::MarkLate { train_id, minutes } => {
                self.mark_late(&train_id, minutes)?;
                CommandOutcome::Done
            }
            Command::MarkAssigned { train_id } => {
                self.mark_assigned(&train_id)?;
                CommandOutcome::Done
            }
            Command::Reinstate { train_id } => {
                self.reinstate(&train_id)?;
                CommandOutcome::Done
            }
            Command::ClearStatus { train_id } => {
                self.clear_status(&train_id)?;
                CommandOutcome::Done
            }
            Command::ClearAllAssignments => {
                self.clear_all_assignments();
                CommandOutcome::Done
            }
            Command::ToggleSignal { segment } => {
                CommandOutcome::Signal(self.toggle_signal(&segment)?)
            }
            Command::ResetSignals => {
                self.reset_signals();
                CommandOutcome::Done
            }
            Command::ResetTrains => {
                self.reset_trains();
                CommandOutcome::Done
            }
            Command::SetSpeed { speed } => {
                self.set_speed(speed)?;
                CommandOutcome::Done
            }
            Command::AutoAssignAll => CommandOutcome::AutoAssigned(self.auto_assign_all()),
            Command::Tick { ticks } => CommandOutcome::Ticked(self.run_ticks(ticks.unwrap_or(1))),
        };
        Ok(outcome)
    }
}
