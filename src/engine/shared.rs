//! Mutex-serialized engine handle.
//!
//! Timer-driven ticks and manual commands from any thread go through the
//! same lock, so each runs against a consistent state and none observes
//! another half-applied.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Command, Engine};
use crate::error::Result;
use crate::snapshot::Snapshot;

/// Cloneable handle to one [`Engine`].
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    /// Wraps an engine.
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Applies a command and returns the resulting state.
    pub fn execute(&self, command: Command) -> Result<Snapshot> {
        let mut engine = self.lock();
        engine.apply(command)?;
        Ok(engine.snapshot())
    }

    /// Current state.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    /// Runs a read-only query under the lock.
    pub fn with<T>(&self, f: impl FnOnce(&Engine) -> T) -> T {
        f(&self.lock())
    }

    /// Runs a mutation under the lock.
    pub fn with_mut<T>(&self, f: impl FnOnce(&mut Engine) -> T) -> T {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Engine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::error::ErrorKind;
    use std::thread;

    fn shared() -> SharedEngine {
        SharedEngine::new(Engine::seeded(SimulationConfig::default()).unwrap())
    }

    fn assign(train: &str, platform: &str) -> Command {
        Command::Assign {
            train_id: train.into(),
            route_id: "r1".into(),
            platform: Some(platform.into()),
        }
    }

    #[test]
    fn test_execute_returns_snapshot() {
        let engine = shared();
        let snap = engine.execute(assign("T1", "central:1")).unwrap();
        assert_eq!(snap.train("T1").unwrap().platform.as_ref().unwrap().to_string(), "central:1");
    }

    #[test]
    fn test_execute_error_leaves_state() {
        let engine = shared();
        engine.execute(assign("T1", "central:1")).unwrap();
        let before = engine.snapshot();
        let err = engine.execute(assign("T2", "central:1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_concurrent_assigns_one_winner() {
        let engine = shared();
        let handles: Vec<_> = ["T1", "T2", "T3", "T4", "T5"]
            .into_iter()
            .map(|id| {
                let engine = engine.clone();
                thread::spawn(move || engine.execute(assign(id, "central:3")).is_ok())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&ok| ok)
            .count();
        assert_eq!(winners, 1);
        assert!(engine.with(|e| e.platform_occupied("central:3")).unwrap());
    }

    #[test]
    fn test_ticks_and_commands_interleave() {
        let engine = shared();
        engine.execute(assign("T1", "central:1")).unwrap();
        let ticker = {
            let engine = engine.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    engine.with_mut(|e| e.tick());
                }
            })
        };
        for _ in 0..10 {
            engine
                .execute(Command::ToggleSignal {
                    segment: "mid_northend".into(),
                })
                .unwrap();
        }
        ticker.join().unwrap();
        assert_eq!(engine.with(|e| e.current_tick()), 50);
    }
}
