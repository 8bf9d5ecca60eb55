//! Dispatch context for rule evaluation.

use std::collections::HashMap;

use crate::models::Train;

/// Fleet state passed to dispatching rules.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    /// Position of each train in the registry (train_id → index).
    pub registry_positions: HashMap<String, usize>,
}

impl DispatchContext {
    /// Creates a context recording registry order of `trains`.
    pub fn from_fleet(trains: &[Train]) -> Self {
        Self {
            registry_positions: trains
                .iter()
                .enumerate()
                .map(|(i, t)| (t.id.clone(), i))
                .collect(),
        }
    }
}
