//! Built-in dispatching rules.
//!
//! All rules return lower scores for higher priority trains.

use super::{DispatchContext, DispatchingRule, RuleScore};
use crate::models::Train;

/// Earliest Departure Time.
///
/// Prioritizes trains scheduled to leave first.
#[derive(Debug, Clone, Copy)]
pub struct EarliestDeparture;

impl DispatchingRule for EarliestDeparture {
    fn name(&self) -> &'static str {
        "EDT"
    }

    fn evaluate(&self, train: &Train, _context: &DispatchContext) -> RuleScore {
        train.dep.minutes() as f64
    }
}

/// Registry order (first-come, first-served).
///
/// Uses `context.registry_positions`; unknown trains go last.
#[derive(Debug, Clone, Copy)]
pub struct RegistryOrder;

impl DispatchingRule for RegistryOrder {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn evaluate(&self, train: &Train, context: &DispatchContext) -> RuleScore {
        context
            .registry_positions
            .get(&train.id)
            .map(|&p| p as f64)
            .unwrap_or(f64::MAX)
    }
}

/// Most Delayed.
///
/// Prioritizes trains with the largest reported delay.
#[derive(Debug, Clone, Copy)]
pub struct MostDelayed;

impl DispatchingRule for MostDelayed {
    fn name(&self) -> &'static str {
        "MDL"
    }

    fn evaluate(&self, train: &Train, _context: &DispatchContext) -> RuleScore {
        -(train.late_by.unwrap_or(0) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train(id: &str, dep: &str) -> Train {
        Train::new(id, dep.parse().unwrap())
    }

    #[test]
    fn test_earliest_departure() {
        let ctx = DispatchContext::default();
        let early = train("A", "08:59");
        let late = train("B", "09:00");
        assert!(EarliestDeparture.evaluate(&early, &ctx) < EarliestDeparture.evaluate(&late, &ctx));
    }

    #[test]
    fn test_registry_order() {
        let fleet = vec![train("B", "09:30"), train("A", "09:00")];
        let ctx = DispatchContext::from_fleet(&fleet);
        assert!(RegistryOrder.evaluate(&fleet[0], &ctx) < RegistryOrder.evaluate(&fleet[1], &ctx));
        assert_eq!(RegistryOrder.evaluate(&train("Z", "09:00"), &ctx), f64::MAX);
    }

    #[test]
    fn test_most_delayed() {
        let ctx = DispatchContext::default();
        let mut delayed = train("A", "09:00");
        delayed.late_by = Some(20);
        let on_time = train("B", "09:00");
        assert!(MostDelayed.evaluate(&delayed, &ctx) < MostDelayed.evaluate(&on_time, &ctx));
    }

    #[test]
    fn test_names() {
        assert_eq!(EarliestDeparture.name(), "EDT");
        assert_eq!(RegistryOrder.name(), "FIFO");
        assert_eq!(MostDelayed.name(), "MDL");
    }
}
