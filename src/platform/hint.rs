//! Install hint visibility
//!
//! The dismissal flag lives in its own key, separate from the habit list.

use crate::consts::HINT_DISMISSED_KEY;
use crate::persistence::KeyValueStore;

use super::Platform;

pub struct HintState<K> {
    storage: K,
}

impl<K: KeyValueStore> HintState<K> {
    pub fn new(storage: K) -> Self {
        Self { storage }
    }

    /// Whether the user closed the hint. Unreadable storage counts as "not dismissed".
    pub fn is_dismissed(&self) -> bool {
        match self.storage.get_item(HINT_DISMISSED_KEY) {
            Ok(value) => value.is_some(),
            Err(e) => {
                log::warn!("Could not read hint state: {e}");
                false
            }
        }
    }

    /// Message to show on page load, if any
    pub fn visible_message(&self, platform: Platform) -> Option<&'static str> {
        if self.is_dismissed() {
            return None;
        }
        platform.install_hint()
    }

    pub fn dismiss(&self) {
        if let Err(e) = self.storage.set_item(HINT_DISMISSED_KEY, "1") {
            log::warn!("Could not save hint dismissal: {e}");
        }
    }

    /// The footer "How to install" button: forget the dismissal and show the hint again
    pub fn reopen(&self, platform: Platform) -> Option<&'static str> {
        if let Err(e) = self.storage.remove_item(HINT_DISMISSED_KEY) {
            log::warn!("Could not reset hint dismissal: {e}");
        }
        platform.install_hint()
    }
}
