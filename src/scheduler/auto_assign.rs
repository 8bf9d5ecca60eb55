//! Greedy automatic platform assignment.
//!
//! # Algorithm
//!
//! 1. Candidates: trains with no route that are not cancelled.
//! 2. Order candidates by the rule engine (default: earliest departure,
//!    stable on registry order).
//! 3. Pick the default route: the first route starting at the hub
//!    station, otherwise the first route.
//! 4. Scan the origin station's platforms 1..=n and take the first one no
//!    other active train holds. Occupancy is read from the live fleet, so
//!    a platform claimed earlier in the same pass is already taken.
//! 5. No free platform: leave the train `scheduled` for a later pass.
//!
//! # Complexity
//! O(c * p * n) where c=candidates, p=platforms at the origin, n=fleet size.

use tracing::{debug, info};

use crate::dispatching::{AssignOrder, DispatchContext, RuleEngine};
use crate::engine::TrainRegistry;
use crate::models::{PlatformKey, Topology, TrainStatus};

/// One assignment made by [`AutoAssigner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoAssignment {
    pub train_id: String,
    pub route_id: String,
    pub platform: PlatformKey,
}

/// Outcome of an automatic assignment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoAssignReport {
    /// Trains assigned, in processing order.
    pub assigned: Vec<AutoAssignment>,
    /// Candidates left unassigned for lack of a free platform or route.
    pub skipped: Vec<String>,
}

impl AutoAssignReport {
    /// Number of trains assigned.
    pub fn assigned_count(&self) -> usize {
        self.assigned.len()
    }
}

/// Hub-first, first-free-platform assignment heuristic.
///
/// # Example
///
/// ```
/// use rail_sim::engine::TrainRegistry;
/// use rail_sim::scheduler::AutoAssigner;
/// use rail_sim::seed;
///
/// let topology = seed::default_topology().unwrap();
/// let mut registry = TrainRegistry::new(seed::default_trains());
/// let report = AutoAssigner::new("central").assign_all(&mut registry, &topology);
/// assert_eq!(report.assigned_count(), 5);
/// assert_eq!(report.assigned[0].platform.to_string(), "central:1");
/// ```
#[derive(Debug, Clone)]
pub struct AutoAssigner {
    hub_station: String,
    rule_engine: RuleEngine,
}

impl AutoAssigner {
    /// Creates an assigner preferring routes that start at `hub_station`.
    pub fn new(hub_station: impl Into<String>) -> Self {
        Self {
            hub_station: hub_station.into(),
            rule_engine: AssignOrder::Departure.rule_engine(),
        }
    }

    /// Replaces the candidate ordering.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = engine;
        self
    }

    /// Assigns every candidate train it can.
    pub fn assign_all(
        &self,
        registry: &mut TrainRegistry,
        topology: &Topology,
    ) -> AutoAssignReport {
        let mut report = AutoAssignReport::default();
        let context = DispatchContext::from_fleet(registry.trains());

        let order = self.rule_engine.sort_indices(registry.trains(), &context);
        let candidates: Vec<usize> = order
            .into_iter()
            .filter(|&i| {
                let t = &registry.trains()[i];
                t.route_id.is_none() && t.status != TrainStatus::Cancelled
            })
            .collect();

        let route = topology.default_route(&self.hub_station);
        let origin = route
            .and_then(|r| r.origin())
            .and_then(|id| topology.station(id));

        for idx in candidates {
            let train_id = registry.trains()[idx].id.clone();
            let (Some(route), Some(station)) = (route, origin) else {
                report.skipped.push(train_id);
                continue;
            };

            let free = station
                .platform_keys()
                .find(|key| registry.holder_of(key, Some(&train_id)).is_none());

            match free {
                Some(platform) => {
                    let train = registry.at_mut(idx);
                    train.route_id = Some(route.id.clone());
                    train.platform = Some(platform.clone());
                    train.status = TrainStatus::Assigned;
                    train.progress = 0.0;
                    train.arrived_at_tick = None;
                    debug!(train = %train_id, platform = %platform, "auto-assigned");
                    report.assigned.push(AutoAssignment {
                        train_id,
                        route_id: route.id.clone(),
                        platform,
                    });
                }
                None => {
                    debug!(train = %train_id, station = %station.id, "no free platform");
                    report.skipped.push(train_id);
                }
            }
        }

        info!(
            assigned = report.assigned.len(),
            skipped = report.skipped.len(),
            "auto-assign pass complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Route, Station, Train};
    use crate::seed;

    fn small_hub() -> Topology {
        Topology::new(
            vec![
                Station::new("hub").with_platforms(1).at(0.0, 0.0),
                Station::new("far").with_platforms(2).at(100.0, 0.0),
            ],
            vec![
                Route::new("back", ["far", "hub"]),
                Route::new("out", ["hub", "far"]),
            ],
        )
        .unwrap()
    }

    fn train(id: &str, dep: &str) -> Train {
        Train::new(id, dep.parse().unwrap())
    }

    #[test]
    fn test_assigns_in_departure_order() {
        let topo = seed::default_topology().unwrap();
        let mut registry = TrainRegistry::new(vec![
            train("T2", "09:10"),
            train("T1", "09:00"),
        ]);

        let report = AutoAssigner::new("central").assign_all(&mut registry, &topo);
        assert_eq!(report.assigned[0].train_id, "T1");
        assert_eq!(report.assigned[0].platform.to_string(), "central:1");
        assert_eq!(report.assigned[1].train_id, "T2");
        assert_eq!(report.assigned[1].platform.to_string(), "central:2");
        assert_eq!(registry.get("T1").unwrap().route_id.as_deref(), Some("r1"));
    }

    #[test]
    fn test_single_platform_hub() {
        let topo = small_hub();
        let mut registry = TrainRegistry::new(vec![train("T1", "09:00"), train("T2", "09:10")]);

        let report = AutoAssigner::new("hub").assign_all(&mut registry, &topo);
        assert_eq!(report.assigned_count(), 1);
        assert_eq!(report.assigned[0].route_id, "out");
        assert_eq!(report.skipped, vec!["T2"]);
        assert_eq!(registry.get("T2").unwrap().status, TrainStatus::Scheduled);
        assert!(registry.get("T2").unwrap().platform.is_none());
    }

    #[test]
    fn test_skips_assigned_and_cancelled() {
        let topo = seed::default_topology().unwrap();
        let mut cancelled = train("C", "08:00");
        cancelled.status = TrainStatus::Cancelled;
        let mut routed = train("R", "08:30");
        routed.status = TrainStatus::Assigned;
        routed.route_id = Some("r1".into());
        routed.platform = Some(PlatformKey::new("central", 1));
        let mut registry = TrainRegistry::new(vec![cancelled, routed, train("T1", "09:00")]);

        let report = AutoAssigner::new("central").assign_all(&mut registry, &topo);
        assert_eq!(report.assigned_count(), 1);
        assert_eq!(report.assigned[0].train_id, "T1");
        // central:1 is held by R.
        assert_eq!(report.assigned[0].platform.to_string(), "central:2");
        assert_eq!(registry.get("C").unwrap().status, TrainStatus::Cancelled);
    }

    #[test]
    fn test_cancelled_holder_frees_platform() {
        let topo = small_hub();
        let mut gone = train("G", "08:00");
        gone.status = TrainStatus::Cancelled;
        gone.route_id = Some("out".into());
        gone.platform = Some(PlatformKey::new("hub", 1));
        let mut registry = TrainRegistry::new(vec![gone, train("T1", "09:00")]);

        let report = AutoAssigner::new("hub").assign_all(&mut registry, &topo);
        assert_eq!(report.assigned[0].platform.to_string(), "hub:1");
    }

    #[test]
    fn test_falls_back_to_first_route() {
        let topo = small_hub();
        let mut registry = TrainRegistry::new(vec![train("T1", "09:00")]);

        let report = AutoAssigner::new("nowhere").assign_all(&mut registry, &topo);
        assert_eq!(report.assigned[0].route_id, "back");
        assert_eq!(report.assigned[0].platform.to_string(), "far:1");
    }

    #[test]
    fn test_equal_departures_keep_registry_order() {
        let topo = small_hub();
        let mut registry = TrainRegistry::new(vec![train("B", "09:00"), train("A", "09:00")]);

        let report = AutoAssigner::new("hub").assign_all(&mut registry, &topo);
        assert_eq!(report.assigned[0].train_id, "B");
        assert_eq!(report.skipped, vec!["A"]);
    }

    #[test]
    fn test_most_delayed_order_claims_first() {
        let topo = small_hub();
        let mut delayed = train("D", "09:30");
        delayed.late_by = Some(20);
        let mut registry = TrainRegistry::new(vec![train("T1", "09:00"), delayed]);

        let report = AutoAssigner::new("hub")
            .with_rule_engine(AssignOrder::MostDelayed.rule_engine())
            .assign_all(&mut registry, &topo);
        assert_eq!(report.assigned[0].train_id, "D");
        assert_eq!(report.skipped, vec!["T1"]);
    }

    #[test]
    fn test_empty_fleet() {
        let topo = small_hub();
        let mut registry = TrainRegistry::new(Vec::new());
        let report = AutoAssigner::new("hub").assign_all(&mut registry, &topo);
        assert_eq!(report, AutoAssignReport::default());
    }
}
