//! Simulation clock.
//!
//! # Algorithm
//!
//! On each tick, for every active train (assigned, moving, late) with a
//! route:
//! 1. Find the segment it is about to enter.
//! 2. If that segment's signal is red, hold the train (no partial advance).
//! 3. Otherwise advance progress by `tick_increment * speed`, capped at 1.
//! 4. `assigned` becomes `moving` once progress increases.
//! 5. Progress 1 means `arrived`; the arrival tick is recorded.
//!
//! After movement, arrived trains whose grace period has elapsed release
//! their platform. The whole pass reads one borrowed [`SignalTable`], so a
//! signal change can only take effect on the next tick.
//!
//! A train whose route cannot be resolved is skipped; one inconsistent
//! record never stops the rest of the fleet.

use tracing::{debug, trace};

use crate::config::SimulationConfig;
use crate::models::{SignalTable, Topology, Train, TrainStatus};

/// Progress this close to 1.0 counts as arrived.
pub const PROGRESS_EPSILON: f64 = 1e-9;

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Tick number after this step.
    pub tick: u64,
    /// Trains whose progress increased.
    pub advanced: Vec<String>,
    /// Trains held at a red signal.
    pub held: Vec<String>,
    /// Trains that arrived this tick.
    pub arrived: Vec<String>,
    /// Trains whose platform was released this tick.
    pub released: Vec<String>,
    /// Trains skipped because their route could not be resolved.
    pub skipped: Vec<String>,
}

/// Discrete simulation clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationClock {
    tick: u64,
}

impl SimulationClock {
    /// Creates a clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock resuming at `tick`.
    pub fn at(tick: u64) -> Self {
        Self { tick }
    }

    /// Ticks elapsed.
    pub fn current(&self) -> u64 {
        self.tick
    }

    /// Advances every eligible train by one tick.
    pub fn step(
        &mut self,
        trains: &mut [Train],
        topology: &Topology,
        signals: &SignalTable,
        config: &SimulationConfig,
    ) -> TickReport {
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            ..Default::default()
        };
        let step = config.step();

        for train in trains.iter_mut() {
            if !train.status.advances() {
                continue;
            }
            let Some(route_id) = train.route_id.as_deref() else {
                continue;
            };
            let segment = match topology.next_segment(route_id, train.progress) {
                Ok(segment) => segment,
                Err(e) => {
                    trace!(train = %train.id, error = %e, "cannot advance");
                    report.skipped.push(train.id.clone());
                    continue;
                }
            };
            if segment.as_ref().is_some_and(|s| signals.is_red(s)) {
                report.held.push(train.id.clone());
                continue;
            }

            let before = train.progress;
            let mut progress = (before + step).min(1.0);
            if progress >= 1.0 - PROGRESS_EPSILON {
                progress = 1.0;
            }
            train.progress = progress;

            if progress > before {
                report.advanced.push(train.id.clone());
                if train.status == TrainStatus::Assigned {
                    train.status = TrainStatus::Moving;
                }
            }
            if progress >= 1.0 {
                train.status = TrainStatus::Arrived;
                train.arrived_at_tick = Some(self.tick);
                report.arrived.push(train.id.clone());
            }
        }

        self.release_platforms(trains, config.arrival_grace_ticks, &mut report);

        debug!(
            tick = self.tick,
            advanced = report.advanced.len(),
            held = report.held.len(),
            arrived = report.arrived.len(),
            released = report.released.len(),
            "tick"
        );
        report
    }

    fn release_platforms(&self, trains: &mut [Train], grace: u64, report: &mut TickReport) {
        for train in trains.iter_mut() {
            if train.status != TrainStatus::Arrived || train.platform.is_none() {
                continue;
            }
            match train.arrived_at_tick {
                // Loaded as arrived: the grace period starts now.
                None => train.arrived_at_tick = Some(self.tick),
                Some(at) if self.tick.saturating_sub(at) >= grace => {
                    train.platform = None;
                    report.released.push(train.id.clone());
                }
                Some(_) => {}
            }
        }
    }
}
