//! Shared server state.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// State shared between request handlers and the rebuild loop.
///
/// The rebuild timestamp is an atomic so the hot check endpoint reads
/// it without locking.
pub(crate) struct AppState {
    /// Build output directory being served.
    pub output_dir: PathBuf,
    last_rebuild_ms: AtomicU64,
}

impl AppState {
    pub(crate) fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            last_rebuild_ms: AtomicU64::new(now_ms()),
        }
    }

    /// Timestamp (unix millis) of the most recent completed rebuild.
    pub(crate) fn last_rebuild_ms(&self) -> u64 {
        self.last_rebuild_ms.load(Ordering::Relaxed)
    }

    /// Records that a rebuild just completed.
    pub(crate) fn mark_rebuilt(&self) {
        self.last_rebuild_ms.store(now_ms(), Ordering::Relaxed);
    }
}

/// Current time as unix milliseconds.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
