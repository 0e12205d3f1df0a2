//! High-score persistence

pub mod high_score;
pub mod store;

pub use high_score::HighScoreStore;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
