//! Rail network simulation engine.
//!
//! Models a small rail network (stations with numbered platforms, routes
//! as station paths), a fleet of trains moving through a status
//! lifecycle, per-segment signals, and a discrete clock that advances
//! trains along their routes. The engine enforces exclusive platform
//! occupancy and offers a greedy automatic platform assignment.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Station`, `Route`, `Topology`, `Train`,
//!   `SignalTable`, `PlatformKey`, `DepartureTime`
//! - **`validation`**: Integrity checks for networks and fleets
//! - **`dispatching`**: Rule-based train ordering (`EarliestDeparture`, ...)
//! - **`scheduler`**: Automatic assignment heuristic and fleet KPIs
//! - **`engine`**: The serialized state machine: registry, commands, clock
//! - **`snapshot`**: Persisted state and flat import/export records
//! - **`seed`**: Default network and fleet
//!
//! # Example
//!
//! ```
//! use rail_sim::{Engine, SimulationConfig, TrainStatus};
//!
//! let mut engine = Engine::seeded(SimulationConfig::default()).unwrap();
//! engine.assign("T1", "r1", Some("central:1")).unwrap();
//! assert!(engine.assign("T2", "r2", Some("central:1")).is_err());
//!
//! engine.run_ticks(200);
//! assert_eq!(engine.train("T1").unwrap().status, TrainStatus::Arrived);
//! ```
//!
//! The library emits `tracing` events and never installs a subscriber.

pub mod config;
pub mod dispatching;
pub mod engine;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod seed;
pub mod snapshot;
pub mod validation;

pub use config::SimulationConfig;
pub use engine::{Command, CommandOutcome, Engine, SharedEngine, TickReport};
pub use error::{EngineError, ErrorKind, Result};
pub use models::{PlatformKey, SignalAspect, Train, TrainStatus};
pub use snapshot::{Snapshot, TrainRecord};
