use crate::mapping::CANDIDATE_COUNT;
use crate::prefs::{PrefsStore, KEY_MAPPING_INDEX};
use tracing::warn;

/// Tracks which catalog candidate is active.
#[derive(Debug)]
pub struct MappingSelector {
    current: usize,
}

impl MappingSelector {
    /// Restore the selector from the store, falling back to `default_index`
    /// when no valid committed index exists.
    pub fn load(store: &dyn PrefsStore, default_index: usize) -> Self {
        let current = match store.get_int(KEY_MAPPING_INDEX) {
            Some(index) if (0..CANDIDATE_COUNT as i64).contains(&index) => index as usize,
            Some(index) => {
                warn!(index, "Stored mapping index out of range, using default");
                default_index
            }
            None => default_index,
        };
        Self { current }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Cycle to the next candidate, wrapping after the last one. Does not
    /// persist and does not touch calibration.
    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % CANDIDATE_COUNT;
        self.current
    }

    /// Persist the active index so it survives restart. Idempotent; a write
    /// failure leaves the in-memory selection authoritative.
    pub fn commit(&self, store: &mut dyn PrefsStore) {
        if let Err(e) = store.set_int(KEY_MAPPING_INDEX, self.current as i64) {
            warn!(?e, "Failed to save mapping index");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefs;

    #[test]
    fn starts_at_default_when_store_is_empty() {
        let store = MemoryPrefs::new();
        assert_eq!(MappingSelector::load(&store, 37).current_index(), 37);
    }

    #[test]
    fn restores_committed_index() {
        let mut store = MemoryPrefs::new();
        store.set_int(KEY_MAPPING_INDEX, 5).unwrap();
        assert_eq!(MappingSelector::load(&store, 37).current_index(), 5);
    }

    #[test]
    fn rejects_out_of_range_index() {
        let mut store = MemoryPrefs::new();
        store.set_int(KEY_MAPPING_INDEX, CANDIDATE_COUNT as i64).unwrap();
        assert_eq!(MappingSelector::load(&store, 37).current_index(), 37);

        store.set_int(KEY_MAPPING_INDEX, -1).unwrap();
        assert_eq!(MappingSelector::load(&store, 0).current_index(), 0);
    }

    #[test]
    fn advance_wraps_after_full_cycle() {
        let store = MemoryPrefs::new();
        let mut selector = MappingSelector::load(&store, 13);
        for _ in 0..CANDIDATE_COUNT {
            selector.advance();
        }
        assert_eq!(selector.current_index(), 13);
    }

    #[test]
    fn commit_writes_current_index() {
        let mut store = MemoryPrefs::new();
        let mut selector = MappingSelector::load(&store, 0);
        selector.advance();
        selector.advance();
        selector.commit(&mut store);
        assert_eq!(store.get_int(KEY_MAPPING_INDEX), Some(2));
    }
}
