//! Dispatching rules and rule engine for train ordering.
//!
//! The automatic assignment processes candidate trains one at a time;
//! the order decides who gets the scarce platforms. Rules score trains
//! and the engine sorts by those scores.
//!
//! # Usage
//!
//! ```
//! use rail_sim::dispatching::{rules, DispatchContext, RuleEngine};
//! use rail_sim::seed;
//!
//! let engine = RuleEngine::new().with_rule(rules::EarliestDeparture);
//! let trains = seed::default_trains();
//! let order = engine.sort_indices(&trains, &DispatchContext::from_fleet(&trains));
//! assert_eq!(trains[order[0]].id, "T1");
//! ```

mod context;
mod engine;
pub mod rules;

pub use context::DispatchContext;
pub use engine::RuleEngine;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::models::Train;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (dispatched first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates train priority.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "EDT").
    fn name(&self) -> &'static str;

    /// Scores a train given the current dispatch context.
    fn evaluate(&self, train: &Train, context: &DispatchContext) -> RuleScore;
}

/// Candidate order used by the automatic assignment.
///
/// Every order falls back to registry order on ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOrder {
    /// Earliest scheduled departure first.
    #[default]
    Departure,
    /// Registry (load) order.
    Registry,
    /// Largest reported delay first, then earliest departure.
    MostDelayed,
}

impl AssignOrder {
    /// Rule engine implementing this order.
    pub fn rule_engine(self) -> RuleEngine {
        match self {
            Self::Departure => RuleEngine::new().with_rule(rules::EarliestDeparture),
            Self::Registry => RuleEngine::new().with_rule(rules::RegistryOrder),
            Self::MostDelayed => RuleEngine::new()
                .with_rule(rules::MostDelayed)
                .with_rule(rules::EarliestDeparture),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_order_rules() {
        assert_eq!(AssignOrder::default().rule_engine().rule_names(), vec!["EDT"]);
        assert_eq!(AssignOrder::Registry.rule_engine().rule_names(), vec!["FIFO"]);
        assert_eq!(AssignOrder::MostDelayed.rule_engine().rule_names(), vec!["MDL", "EDT"]);
    }

    #[test]
    fn test_assign_order_serde() {
        let order: AssignOrder = serde_json::from_str("\"most_delayed\"").unwrap();
        assert_eq!(order, AssignOrder::MostDelayed);
    }
}
