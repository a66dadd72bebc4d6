//! Progress-callback trait for per-file batch conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! real-time events as the batch processes each input file.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a GUI, or a terminal progress bar without the
//! library knowing anything about how the host application communicates. The
//! trait is `Send + Sync` so it works correctly when inputs are converted
//! concurrently.

use std::sync::Arc;

/// Called by the batch conversion pipeline as it processes each input.
///
/// Implementations must be `Send + Sync` (inputs can be converted
/// concurrently). All methods have default no-op implementations so callers
/// only override what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any input is converted.
    fn on_batch_start(&self, total_inputs: usize) {
        let _ = total_inputs;
    }

    /// Called just before an input's pipeline starts.
    fn on_file_start(&self, input: &str, total_inputs: usize) {
        let _ = (input, total_inputs);
    }

    /// Called when an input is successfully converted.
    ///
    /// `pdf_len` is the byte length of the produced PDF.
    fn on_file_complete(&self, input: &str, total_inputs: usize, pdf_len: usize) {
        let _ = (input, total_inputs, pdf_len);
    }

    /// Called when an input fails.
    ///
    /// Takes an owned `String` so the callback can be moved across task
    /// boundaries without borrowing from the pipeline.
    fn on_file_error(&self, input: &str, total_inputs: usize, error: String) {
        let _ = (input, total_inputs, error);
    }

    /// Called once after all inputs have been attempted.
    fn on_batch_complete(&self, total_inputs: usize, success_count: usize) {
        let _ = (total_inputs, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_file_start(&self, _input: &str, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_file_complete(&self, _input: &str, _total: usize, _pdf_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_file_error(&self, _input: &str, _total: usize, _error: String) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_file_start("a.md", 2);
        cb.on_file_complete("a.md", 2, 1024);
        cb.on_file_error("b.md", 2, "some error".to_string());
        cb.on_batch_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
        };

        tracker.on_file_start("a.md", 2);
        tracker.on_file_complete("a.md", 2, 100);
        tracker.on_file_start("b.md", 2);
        tracker.on_file_error("b.md", 2, "render failed".to_string());

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_batch_start(1);
        cb.on_file_complete("doc.md", 1, 512);
    }
}
