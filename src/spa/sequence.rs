use crate::history::SessionStore;
use crate::page::PageDirection;

/// Per-tab sequence counter plus the number of the entry shown last.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SequenceTracker {
    allocated: Option<u64>,
    current: Option<u64>,
}

impl SequenceTracker {
    /// Reads the persisted counter the first time it is needed.
    pub(crate) fn ensure_loaded(&mut self, store: &dyn SessionStore, key: &str) {
        if self.allocated.is_some() {
            return;
        }

        let stored = store.get(key);
        let value = match stored.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|err| {
                tracing::warn!(key, raw, %err, "unparsable sequence counter, starting from 0");
                0
            }),
        };
        self.allocated = Some(value);
    }

    pub(crate) fn allocated(&self) -> u64 {
        self.allocated.unwrap_or(0)
    }

    pub(crate) fn current(&self) -> Option<u64> {
        self.current
    }

    pub(crate) fn allocate(&mut self) -> u64 {
        let next = self.allocated().saturating_add(1);
        self.allocated = Some(next);
        next
    }

    /// Records `number` as the entry now shown and derives the direction.
    ///
    /// The counter never falls behind a number it has seen, so entries stamped
    /// before the session store was cleared are not handed out twice.
    pub(crate) fn observe(&mut self, number: u64) -> PageDirection {
        self.allocated = Some(self.allocated().max(number));

        match self.current.replace(number) {
            Some(previous) if number > previous => PageDirection::Forward,
            Some(previous) if number < previous => PageDirection::Backward,
            _ => PageDirection::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SequenceTracker;
    use crate::history::{MemorySessionStore, SessionStore};
    use crate::page::PageDirection;

    #[test]
    fn first_observation_has_no_direction() {
        let mut tracker = SequenceTracker::default();
        assert_eq!(tracker.observe(5), PageDirection::None);
        assert_eq!(tracker.current(), Some(5));
    }

    #[test]
    fn direction_follows_sequence_order() {
        let mut tracker = SequenceTracker::default();
        tracker.observe(2);
        assert_eq!(tracker.observe(3), PageDirection::Forward);
        assert_eq!(tracker.observe(1), PageDirection::Backward);
        assert_eq!(tracker.observe(1), PageDirection::None);
    }

    #[test]
    fn loads_persisted_counter_once() {
        let store = MemorySessionStore::new();
        store.set("__pageNumbers", "41".to_string());

        let mut tracker = SequenceTracker::default();
        tracker.ensure_loaded(&store, "__pageNumbers");
        assert_eq!(tracker.allocate(), 42);

        store.set("__pageNumbers", "7".to_string());
        tracker.ensure_loaded(&store, "__pageNumbers");
        assert_eq!(tracker.allocate(), 43);
    }

    #[test]
    fn missing_or_garbage_counter_starts_at_zero() {
        let store = MemorySessionStore::new();
        let mut tracker = SequenceTracker::default();
        tracker.ensure_loaded(&store, "__pageNumbers");
        assert_eq!(tracker.allocated(), 0);

        store.set("__pageNumbers", "NaN".to_string());
        let mut tracker = SequenceTracker::default();
        tracker.ensure_loaded(&store, "__pageNumbers");
        assert_eq!(tracker.allocate(), 1);
    }

    #[test]
    fn observing_a_larger_number_raises_the_counter() {
        let mut tracker = SequenceTracker::default();
        tracker.observe(9);
        assert_eq!(tracker.allocate(), 10);
    }
}
