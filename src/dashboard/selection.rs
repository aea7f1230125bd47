use std::collections::HashSet;

use crate::dashboard::view::FilteredView;
use crate::domain::subscriber_key::SubscriberKey;

/// Rows marked for a bulk action, keyed by stable identity rather than table
/// position. Keys pointing at rows no longer in the view simply stop
/// rendering as checked; they are dropped when targets are resolved.
#[derive(Debug, Default)]
pub struct Selection {
    keys: HashSet<SubscriberKey>,
}

impl Selection {
    /// Returns whether the key is selected after the toggle.
    pub fn toggle(&mut self, key: SubscriberKey) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    pub fn select_all(&mut self, view: &FilteredView) {
        self.keys.clear();
        self.keys
            .extend(view.rows().iter().map(|subscriber| subscriber.key()));
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn contains(&self, key: &SubscriberKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
