//! Process-wide announcement / featured-speaker cache
//!
//! Shared key-value state refreshed by background jobs. Readers must
//! tolerate absence and never block on population.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Cache key for the recent-announcements summary
pub const ANNOUNCEMENTS_KEY: &str = "RECENT_ANNOUNCEMENTS";
/// Cache key for the featured-speaker summary
pub const FEATURED_SPEAKER_KEY: &str = "FEATURED_SPEAKER";

/// In-process string cache shared across handlers and background jobs
#[derive(Debug, Clone, Default)]
pub struct Cache {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while a lock is held poisons it; the cache carries no
    // consistency guarantee, so readers and writers recover the map
    // rather than propagating the panic into request handlers.
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    pub fn set(&self, key: &str, value: String) {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
    }

    pub fn delete(&self, key: &str) {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }
}
