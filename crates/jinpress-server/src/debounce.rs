//! Rebuild debouncing.
//!
//! Editors emit bursts of filesystem events per save; a full rebuild
//! per event would thrash. The debouncer keeps a single deadline that
//! every recorded change pushes forward, so one rebuild fires once the
//! burst has been quiet for the whole window.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Thread-safe single-deadline debouncer.
///
/// [`record`](Self::record) can be called from the notify callback
/// thread; [`take_ready`](Self::take_ready) is polled from the async
/// rebuild loop.
pub(crate) struct RebuildDebouncer {
    deadline: Mutex<Option<Instant>>,
    window: Duration,
}

impl RebuildDebouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            deadline: Mutex::new(None),
            window,
        }
    }

    /// Records a change, restarting the quiet window.
    pub(crate) fn record(&self) {
        let mut deadline = self.deadline.lock().unwrap();
        *deadline = Some(Instant::now() + self.window);
    }

    /// Returns true once when the quiet window has elapsed, clearing
    /// the pending state so each burst triggers exactly one rebuild.
    pub(crate) fn take_ready(&self) -> bool {
        let mut deadline = self.deadline.lock().unwrap();
        match *deadline {
            Some(when) if when <= Instant::now() => {
                *deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_not_ready_before_window() {
        let debouncer = RebuildDebouncer::new(Duration::from_millis(50));
        debouncer.record();
        assert!(!debouncer.take_ready());
    }

    #[test]
    fn test_ready_after_window_exactly_once() {
        let debouncer = RebuildDebouncer::new(Duration::from_millis(10));
        debouncer.record();
        thread::sleep(Duration::from_millis(15));
        assert!(debouncer.take_ready());
        assert!(!debouncer.take_ready());
    }

    #[test]
    fn test_burst_coalesces_to_single_rebuild() {
        let debouncer = RebuildDebouncer::new(Duration::from_millis(10));
        debouncer.record();
        debouncer.record();
        debouncer.record();
        thread::sleep(Duration::from_millis(15));
        assert!(debouncer.take_ready());
        assert!(!debouncer.take_ready());
    }

    #[test]
    fn test_new_record_restarts_window() {
        let debouncer = RebuildDebouncer::new(Duration::from_millis(20));
        debouncer.record();
        thread::sleep(Duration::from_millis(10));
        // Still inside the window; this pushes the deadline out.
        debouncer.record();
        thread::sleep(Duration::from_millis(12));
        assert!(!debouncer.take_ready());
        thread::sleep(Duration::from_millis(12));
        assert!(debouncer.take_ready());
    }

    #[test]
    fn test_idle_debouncer_never_ready() {
        let debouncer = RebuildDebouncer::new(Duration::from_millis(1));
        assert!(!debouncer.take_ready());
    }
}
