use super::store::KeyValueStore;
use tracing::{debug, warn};

/// High-score adapter over a game's key-value store.
///
/// Storage problems never reach the caller: a missing, malformed or
/// unreadable value loads as zero, and a failed save is logged.
pub struct HighScoreStore {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl HighScoreStore {
    pub fn new(store: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn load(&self) -> u32 {
        match self.store.get(&self.key) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(key = %self.key, value = %raw, "ignoring malformed high score");
                0
            }),
            Ok(None) => 0,
            Err(err) => {
                warn!(key = %self.key, error = %err, "high score unavailable, using 0");
                0
            }
        }
    }

    /// Overwrite the stored high score. Returns whether the write succeeded.
    pub fn save(&self, score: u32) -> bool {
        match self.store.set(&self.key, &score.to_string()) {
            Ok(()) => {
                debug!(key = %self.key, score, "high score saved");
                true
            }
            Err(err) => {
                warn!(key = %self.key, score, error = %err, "failed to save high score");
                false
            }
        }
    }
}
