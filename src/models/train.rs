//! Train model and status state machine.
//!
//! # Status transitions
//!
//! ```text
//! scheduled ──assign──▶ assigned ──tick──▶ moving ──tick──▶ arrived
//!                         │  ▲                │
//!                   mark_late│ mark_assigned  mark_late
//!                         ▼  │                ▼
//!                         late ◀──────────────┘
//! any non-terminal ──cancel──▶ cancelled ──reinstate──▶ scheduled
//! any ──clear_status──▶ scheduled
//! ```
//!
//! `late` is informational: a late train with a route keeps advancing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::PlatformKey;
use crate::error::EngineError;

/// Scheduling/movement status of a train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainStatus {
    /// Initial state, no route or platform.
    #[default]
    Scheduled,
    /// Route and platform assigned, not yet moving.
    Assigned,
    /// Advancing along its route.
    Moving,
    /// Reported late. Still advances if it has a route.
    Late,
    /// Withdrawn. Reversible only by reinstating.
    Cancelled,
    /// Reached the end of its route.
    Arrived,
}

impl TrainStatus {
    /// Active trains hold their platform exclusively.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Assigned | Self::Moving | Self::Late)
    }

    /// No further command except reset/reinstate applies.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Arrived)
    }

    /// Whether `assign` is legal from this status.
    #[inline]
    pub fn can_assign(self) -> bool {
        matches!(self, Self::Scheduled | Self::Cancelled)
    }

    /// Whether the clock advances trains in this status.
    #[inline]
    pub fn advances(self) -> bool {
        self.is_active()
    }

    /// Lower-case label, as persisted.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Assigned => "assigned",
            Self::Moving => "moving",
            Self::Late => "late",
            Self::Cancelled => "cancelled",
            Self::Arrived => "arrived",
        }
    }
}

impl fmt::Display for TrainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "assigned" => Ok(Self::Assigned),
            "moving" => Ok(Self::Moving),
            "late" => Ok(Self::Late),
            "cancelled" => Ok(Self::Cancelled),
            "arrived" => Ok(Self::Arrived),
            other => Err(EngineError::InvalidInput(format!(
                "unknown train status '{other}'"
            ))),
        }
    }
}

/// Scheduled departure as minutes after midnight, written `HH:MM`.
///
/// Ordering matches lexicographic ordering of the `HH:MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DepartureTime(u16);

impl DepartureTime {
    /// Creates a departure time.
    pub fn new(hours: u16, minutes: u16) -> Result<Self, EngineError> {
        if hours > 23 || minutes > 59 {
            return Err(EngineError::InvalidInput(format!(
                "departure {hours:02}:{minutes:02} out of range"
            )));
        }
        Ok(Self(hours * 60 + minutes))
    }

    /// Minutes after midnight.
    #[inline]
    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for DepartureTime {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidInput(format!("malformed departure time '{s}'"));
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(invalid());
        }
        let h: u16 = h.parse().map_err(|_| invalid())?;
        let m: u16 = m.parse().map_err(|_| invalid())?;
        Self::new(h, m)
    }
}

impl TryFrom<String> for DepartureTime {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DepartureTime> for String {
    fn from(dep: DepartureTime) -> Self {
        dep.to_string()
    }
}

/// A train and its mutable scheduling/movement state.
///
/// Owned exclusively by the [`TrainRegistry`](crate::engine::TrainRegistry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    /// Unique train identifier. Never changes.
    pub id: String,
    /// Display label (service number).
    pub name: String,
    /// Scheduled departure.
    pub dep: DepartureTime,
    /// Current status.
    #[serde(default)]
    pub status: TrainStatus,
    /// Assigned route.
    #[serde(default)]
    pub route_id: Option<String>,
    /// Assigned platform.
    #[serde(default)]
    pub platform: Option<PlatformKey>,
    /// Fraction of the route traversed, in [0, 1].
    #[serde(default)]
    pub progress: f64,
    /// Reported delay (minutes).
    #[serde(default)]
    pub late_by: Option<u32>,
    /// Free-text note, e.g. cancellation reason.
    #[serde(default)]
    pub note: Option<String>,
    /// Tick at which the train arrived; drives platform release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrived_at_tick: Option<u64>,
}

impl Train {
    /// Creates a scheduled train.
    pub fn new(id: impl Into<String>, dep: DepartureTime) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            dep,
            status: TrainStatus::Scheduled,
            route_id: None,
            platform: None,
            progress: 0.0,
            late_by: None,
            note: None,
            arrived_at_tick: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether this train currently holds `platform` exclusively.
    pub fn holds(&self, platform: &PlatformKey) -> bool {
        self.status.is_active() && self.platform.as_ref() == Some(platform)
    }

    /// Full reset to `scheduled`.
    pub(crate) fn reset(&mut self) {
        self.status = TrainStatus::Scheduled;
        self.route_id = None;
        self.platform = None;
        self.progress = 0.0;
        self.late_by = None;
        self.note = None;
        self.arrived_at_tick = None;
    }
}
