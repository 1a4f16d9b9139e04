use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

/// Process-wide registry of records with a migration call in flight.
///
/// A permit is taken the moment migration is invoked and released when it is
/// dropped, so a failed call re-enables the action and a concurrent second
/// invocation for the same record is refused.
#[derive(Debug, Default, Clone)]
pub struct InFlightGate {
    inner: Arc<Mutex<HashSet<Uuid>>>,
}

impl InFlightGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when a call for `id` is already in flight.
    pub fn try_acquire(&self, id: Uuid) -> Option<InFlightPermit> {
        if self.lock().insert(id) {
            Some(InFlightPermit {
                gate: self.clone(),
                id,
            })
        } else {
            None
        }
    }

    pub fn is_in_flight(&self, id: Uuid) -> bool {
        self.lock().contains(&id)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Uuid>> {
        // The set holds plain ids; a poisoned lock leaves it consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug)]
pub struct InFlightPermit {
    gate: InFlightGate,
    id: Uuid,
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.gate.lock().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_refused_while_held() {
        let gate = InFlightGate::new();
        let id = Uuid::new_v4();
        let permit = gate.try_acquire(id);
        assert!(permit.is_some());
        assert!(gate.try_acquire(id).is_none());
        assert!(gate.is_in_flight(id));
    }

    #[test]
    fn test_drop_releases_permit() {
        let gate = InFlightGate::new();
        let id = Uuid::new_v4();
        drop(gate.try_acquire(id));
        assert!(!gate.is_in_flight(id));
        assert!(gate.try_acquire(id).is_some());
    }

    #[test]
    fn test_permits_are_per_record() {
        let gate = InFlightGate::new();
        let _a = gate.try_acquire(Uuid::new_v4()).unwrap();
        assert!(gate.try_acquire(Uuid::new_v4()).is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let gate = InFlightGate::new();
        let other = gate.clone();
        let id = Uuid::new_v4();
        let _permit = gate.try_acquire(id).unwrap();
        assert!(other.try_acquire(id).is_none());
    }
}
