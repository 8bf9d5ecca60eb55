//! Rail network domain models.
//!
//! Provides the static network (stations, routes, derived geometry), the
//! signal table, and the train entities whose state the engine mutates.
//!
//! # Domain Mappings
//!
//! | rail-sim | Scheduling term |
//! |----------|-----------------|
//! | Train | Job |
//! | Platform | Unit-capacity resource |
//! | Route | Fixed sequence of operations |
//! | Signal | Admission gate on a segment |

mod route;
mod signal;
mod station;
mod topology;
mod train;

pub use route::Route;
pub use signal::{Segment, SignalAspect, SignalTable};
pub use station::{PlatformKey, Point, Station};
pub use topology::{RouteGeometry, Topology};
pub use train::{DepartureTime, Train, TrainStatus};
