//! Train registry.
//!
//! Owns every [`Train`] record in registry (load) order. Lookups by id go
//! through an index rebuilt whenever the fleet is replaced; trains are
//! never removed individually.

use std::collections::HashMap;

use crate::error::{EngineError, Result};
use crate::models::{PlatformKey, Train};

/// The set of trains and their mutable state.
#[derive(Debug, Clone, Default)]
pub struct TrainRegistry {
    trains: Vec<Train>,
    index: HashMap<String, usize>,
}

impl TrainRegistry {
    /// Creates a registry over `trains`, preserving order.
    ///
    /// Callers validate the fleet first; with duplicate ids the later
    /// train shadows the earlier one in lookups.
    pub fn new(trains: Vec<Train>) -> Self {
        let index = trains
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        Self { trains, index }
    }

    /// All trains in registry order.
    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub(crate) fn trains_mut(&mut self) -> &mut [Train] {
        &mut self.trains
    }

    /// Number of trains.
    pub fn len(&self) -> usize {
        self.trains.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    /// Looks up a train.
    pub fn get(&self, id: &str) -> Option<&Train> {
        self.index.get(id).map(|&i| &self.trains[i])
    }

    /// Registry position of a train or `NotFound`.
    pub fn position(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::not_found("train", id))
    }

    /// Looks up a train or fails with `NotFound`.
    pub fn resolve(&self, id: &str) -> Result<&Train> {
        self.position(id).map(|i| &self.trains[i])
    }

    pub(crate) fn at_mut(&mut self, position: usize) -> &mut Train {
        &mut self.trains[position]
    }

    /// The active train holding `platform`, ignoring `except`.
    pub fn holder_of(&self, platform: &PlatformKey, except: Option<&str>) -> Option<&Train> {
        self.trains
            .iter()
            .filter(|t| Some(t.id.as_str()) != except)
            .find(|t| t.holds(platform))
    }

    /// Whether any active train holds `platform`.
    pub fn platform_occupied(&self, platform: &PlatformKey) -> bool {
        self.holder_of(platform, None).is_some()
    }

    /// Replaces the whole fleet.
    pub(crate) fn replace(&mut self, trains: Vec<Train>) {
        *self = Self::new(trains);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::TrainStatus;
    use crate::seed;

    fn registry() -> TrainRegistry {
        TrainRegistry::new(seed::default_trains())
    }

    #[test]
    fn test_lookup() {
        let r = registry();
        assert_eq!(r.len(), 5);
        assert_eq!(r.get("T3").unwrap().name, "1003");
        assert_eq!(r.position("T5").unwrap(), 4);
        assert_eq!(r.resolve("T9").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_platform_holder() {
        let mut r = registry();
        let key = PlatformKey::new("central", 1);
        assert!(!r.platform_occupied(&key));

        let t = r.at_mut(0);
        t.platform = Some(key.clone());
        t.status = TrainStatus::Assigned;
        assert!(r.platform_occupied(&key));
        assert_eq!(r.holder_of(&key, None).unwrap().id, "T1");
        assert!(r.holder_of(&key, Some("T1")).is_none());

        r.at_mut(0).status = TrainStatus::Cancelled;
        assert!(!r.platform_occupied(&key));
    }

    #[test]
    fn test_replace_rebuilds_index() {
        let mut r = registry();
        r.replace(vec![Train::new("X1", Default::default())]);
        assert_eq!(r.len(), 1);
        assert!(r.get("T1").is_none());
        assert!(r.get("X1").is_some());
    }
}
