//! The simulation engine.
//!
//! [`Engine`] is the single owner of all mutable state: the
//! [`TrainRegistry`], the [`SignalTable`], and the [`SimulationClock`].
//! Every command takes `&mut self` and runs to completion, so commands
//! are serialized by construction. Hosts that share an engine across
//! threads wrap it in a [`SharedEngine`].
//!
//! # Components
//!
//! - **`registry`**: train records in registry order
//! - **`authority`**: assignment and status commands, occupancy checks
//! - **`clock`**: the per-tick movement pass
//! - **`command`**: serializable command messages for adapters
//! - **`shared`**: mutex-guarded handle
//!
//! # Re-assignment policy
//! `assign` is legal only from `scheduled` or `cancelled`. An active or
//! arrived train must be cleared first; otherwise `InvalidState`.

mod authority;
mod clock;
mod command;
mod registry;
mod shared;

pub use clock::{SimulationClock, TickReport, PROGRESS_EPSILON};
pub use command::{Command, CommandOutcome};
pub use registry::TrainRegistry;
pub use shared::SharedEngine;

use std::collections::BTreeMap;

use tracing::info;

use crate::config::SimulationConfig;
use crate::error::{EngineError, Result};
use crate::models::{
    PlatformKey, Point, SignalAspect, SignalTable, Segment, Station, Topology, Train, TrainStatus,
};
use crate::scheduler::FleetKpi;
use crate::seed;
use crate::snapshot::{trains_from_records, Snapshot, TrainRecord};
use crate::validation;

/// Rail simulation engine.
#[derive(Debug, Clone)]
pub struct Engine {
    topology: Topology,
    registry: TrainRegistry,
    signals: SignalTable,
    clock: SimulationClock,
    config: SimulationConfig,
}

impl Engine {
    /// Creates an engine over a validated fleet.
    ///
    /// Every route segment not present in `signals` starts green.
    pub fn new(
        topology: Topology,
        trains: Vec<Train>,
        signals: SignalTable,
        config: SimulationConfig,
    ) -> Result<Self> {
        config.validate()?;
        validation::validate_fleet(&trains, &topology)?;

        let mut table = SignalTable::all_green(topology.segments());
        for (segment, aspect) in signals.entries() {
            table.set(segment, aspect);
        }

        Ok(Self {
            topology,
            registry: TrainRegistry::new(trains),
            signals: table,
            clock: SimulationClock::new(),
            config,
        })
    }

    /// Default network and fleet.
    pub fn seeded(config: SimulationConfig) -> Result<Self> {
        Self::new(
            seed::default_topology()?,
            seed::default_trains(),
            SignalTable::new(),
            config,
        )
    }

    /// Restores a snapshot onto `topology`.
    pub fn from_snapshot(
        topology: Topology,
        snapshot: Snapshot,
        config: SimulationConfig,
    ) -> Result<Self> {
        let signals = signals_from_keyed(&topology, &snapshot.signals)?;
        let mut engine = Self::new(topology, snapshot.trains, signals, config)?;
        engine.clock = SimulationClock::at(snapshot.tick);
        Ok(engine)
    }

    /// Loads a persisted snapshot onto the default network, or seeds the
    /// default fleet when there is none.
    pub fn load_or_seed(snapshot: Option<Snapshot>, config: SimulationConfig) -> Result<Self> {
        match snapshot {
            Some(snapshot) => {
                info!(trains = snapshot.trains.len(), "loading snapshot");
                Self::from_snapshot(seed::default_topology()?, snapshot, config)
            }
            None => {
                info!("no snapshot, seeding default fleet");
                Self::seeded(config)
            }
        }
    }

    // ======================== State access ========================

    /// Network topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Train registry.
    pub fn registry(&self) -> &TrainRegistry {
        &self.registry
    }

    /// All trains in registry order.
    pub fn trains(&self) -> &[Train] {
        self.registry.trains()
    }

    /// Looks up a train.
    pub fn train(&self, id: &str) -> Option<&Train> {
        self.registry.get(id)
    }

    /// Signal table.
    pub fn signals(&self) -> &SignalTable {
        &self.signals
    }

    /// Configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Ticks elapsed.
    pub fn current_tick(&self) -> u64 {
        self.clock.current()
    }

    /// Full state for rendering or persistence.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.clock.current(),
            trains: self.registry.trains().to_vec(),
            signals: self.signals.to_keyed(),
        }
    }

    /// Flat records for tabular export.
    pub fn records(&self) -> Vec<TrainRecord> {
        self.registry.trains().iter().map(TrainRecord::from).collect()
    }

    /// Replaces the fleet with imported records.
    ///
    /// The whole import is rejected if any record is malformed or the
    /// resulting fleet fails validation.
    pub fn import_records(&mut self, records: Vec<TrainRecord>) -> Result<()> {
        let trains = trains_from_records(records, &mut rand::rng())?;
        validation::validate_fleet(&trains, &self.topology)?;
        info!(trains = trains.len(), "fleet imported");
        self.registry.replace(trains);
        Ok(())
    }

    // ======================== Queries ========================

    /// Parses and resolves a platform key against the topology.
    pub fn resolve_platform(&self, key: &str) -> Result<PlatformKey> {
        let platform: PlatformKey = key.parse()?;
        let station = self.topology.resolve_station(&platform.station_id)?;
        check_platform(station, &platform)?;
        Ok(platform)
    }

    /// Whether an active train holds `key`.
    pub fn platform_occupied(&self, key: &str) -> Result<bool> {
        let platform = self.resolve_platform(key)?;
        Ok(self.registry.platform_occupied(&platform))
    }

    /// The active train holding `key`, if any.
    pub fn platform_holder(&self, key: &str) -> Result<Option<&Train>> {
        let platform = self.resolve_platform(key)?;
        Ok(self.registry.holder_of(&platform, None))
    }

    /// Display position at `progress` along a route.
    pub fn point_at_progress(&self, route_id: &str, progress: f64) -> Result<Point> {
        self.topology.point_at_progress(route_id, progress)
    }

    /// Display position of a train, `None` if it has no route.
    pub fn train_position(&self, train_id: &str) -> Result<Option<Point>> {
        let train = self.registry.resolve(train_id)?;
        train
            .route_id
            .as_deref()
            .map(|r| self.topology.point_at_progress(r, train.progress))
            .transpose()
    }

    /// Segment a train is about to enter.
    pub fn next_segment_of(&self, train_id: &str) -> Result<Option<Segment>> {
        let train = self.registry.resolve(train_id)?;
        match train.route_id.as_deref() {
            Some(route_id) => self.topology.next_segment(route_id, train.progress),
            None => Ok(None),
        }
    }

    /// Aspect of a segment given as `from_to`.
    pub fn signal_state(&self, key: &str) -> Result<SignalAspect> {
        let segment = self.resolve_segment(key)?;
        Ok(self.signals.state_of(&segment))
    }

    /// All signals sorted by segment.
    pub fn signal_states(&self) -> Vec<(Segment, SignalAspect)> {
        self.signals.entries()
    }

    /// Trains whose name contains `filter`, case-insensitively.
    pub fn trains_matching(&self, filter: &str) -> Vec<&Train> {
        let needle = filter.to_lowercase();
        self.trains()
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Trains currently marked late.
    pub fn late_trains(&self) -> Vec<&Train> {
        self.with_status(TrainStatus::Late)
    }

    /// Cancelled trains.
    pub fn cancelled_trains(&self) -> Vec<&Train> {
        self.with_status(TrainStatus::Cancelled)
    }

    fn with_status(&self, status: TrainStatus) -> Vec<&Train> {
        self.trains().iter().filter(|t| t.status == status).collect()
    }

    /// Fleet summary.
    pub fn fleet_kpi(&self) -> FleetKpi {
        FleetKpi::calculate(self.trains(), &self.topology)
    }

    // ======================== Clock ========================

    /// Advances the simulation by one tick.
    pub fn tick(&mut self) -> TickReport {
        self.clock.step(
            self.registry.trains_mut(),
            &self.topology,
            &self.signals,
            &self.config,
        )
    }

    /// Advances the simulation by `ticks` ticks.
    pub fn run_ticks(&mut self, ticks: u64) -> Vec<TickReport> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    fn resolve_segment(&self, key: &str) -> Result<Segment> {
        segment_from_key(&self.topology, key)
    }
}

fn segment_from_key(topology: &Topology, key: &str) -> Result<Segment> {
    let segment = topology
        .segment_for_key(key)
        .ok_or_else(|| EngineError::InvalidInput(format!("malformed segment key '{key}'")))?;
    topology.resolve_station(&segment.from)?;
    topology.resolve_station(&segment.to)?;
    Ok(segment)
}

fn check_platform(station: &Station, platform: &PlatformKey) -> Result<()> {
    if station.has_platform(platform.number) {
        Ok(())
    } else {
        Err(EngineError::not_found("platform", &platform.to_string()))
    }
}

fn signals_from_keyed(
    topology: &Topology,
    keyed: &BTreeMap<String, SignalAspect>,
) -> Result<SignalTable> {
    let mut table = SignalTable::new();
    for (key, aspect) in keyed {
        table.set(segment_from_key(topology, key)?, *aspect);
    }
    Ok(table)
}
