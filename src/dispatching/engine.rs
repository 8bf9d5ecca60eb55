//! Rule engine for multi-criteria dispatching.
//!
//! Applies rules in sequence: the next rule is consulted only when the
//! previous ones tie. Sorting is stable, so trains that tie on every rule
//! keep their registry order.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchContext, DispatchingRule, RuleScore};
use crate::models::Train;

/// A composable rule engine for train prioritization.
///
/// # Example
/// ```
/// use rail_sim::dispatching::{rules, RuleEngine};
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::EarliestDeparture)
///     .with_rule(rules::MostDelayed);
/// assert_eq!(engine.rule_names(), vec!["EDT", "MDL"]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            epsilon: 1e-9,
        }
    }

    /// Appends a rule; earlier rules take precedence.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Names of the configured rules, in precedence order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Sorts trains by priority (highest priority first).
    ///
    /// Returns indices into the original slice.
    pub fn sort_indices(&self, trains: &[Train], context: &DispatchContext) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..trains.len()).collect();
        indices.sort_by(|&a, &b| self.compare(&trains[a], &trains[b], context));
        indices
    }

    fn compare(&self, a: &Train, b: &Train, context: &DispatchContext) -> Ordering {
        for rule in &self.rules {
            let score_a = rule.evaluate(a, context);
            let score_b = rule.evaluate(b, context);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }

        Ordering::Equal
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}
