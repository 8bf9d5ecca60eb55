//! Automatic assignment and fleet KPIs.
//!
//! # Algorithm
//!
//! `AutoAssigner` is a greedy, departure-ordered, first-free-platform
//! heuristic. Candidates are processed in stable departure order and
//! platforms are scanned in ascending number order, so a given fleet
//! always yields the same assignments.
//!
//! # KPI
//!
//! `FleetKpi` summarizes the fleet: status counts, delays, on-time rate,
//! and platform occupancy.

mod auto_assign;
mod kpi;

pub use auto_assign::{AutoAssigner, AutoAssignReport, AutoAssignment};
pub use kpi::FleetKpi;
