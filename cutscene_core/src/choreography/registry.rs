//! Record of which choreography routines have already started.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::events::EventKind;

/// Set of routine kinds started during this sequence.
///
/// A kind is inserted the moment its routine launches and stays until the
/// sequence is torn down, which gives at-most-once starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRoutineRegistry {
    started: HashSet<EventKind>,
}

impl EventRoutineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `kind`. Returns `true` only the first time.
    pub fn try_claim(&mut self, kind: EventKind) -> bool {
        self.started.insert(kind)
    }

    pub fn has_started(&self, kind: EventKind) -> bool {
        self.started.contains(&kind)
    }

    pub fn started_count(&self) -> usize {
        self.started.len()
    }

    /// Started kinds in declaration order.
    pub fn started_kinds(&self) -> Vec<EventKind> {
        EventKind::ALL
            .into_iter()
            .filter(|kind| self.started.contains(kind))
            .collect()
    }

    /// Forget every claim. Only used at teardown.
    pub(crate) fn reset(&mut self) {
        self.started.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_once() {
        let mut registry = EventRoutineRegistry::new();

        assert!(registry.try_claim(EventKind::Capture));
        assert!(!registry.try_claim(EventKind::Capture));
        assert!(!registry.try_claim(EventKind::Capture));
        assert!(registry.has_started(EventKind::Capture));
        assert_eq!(registry.started_count(), 1);
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut registry = EventRoutineRegistry::new();

        for kind in EventKind::ALL {
            assert!(registry.try_claim(kind));
        }
        assert_eq!(registry.started_kinds(), EventKind::ALL.to_vec());
    }

    #[test]
    fn test_reset() {
        let mut registry = EventRoutineRegistry::new();
        registry.try_claim(EventKind::Rumble);
        registry.reset();
        assert!(!registry.has_started(EventKind::Rumble));
        assert!(registry.try_claim(EventKind::Rumble));
    }
}
