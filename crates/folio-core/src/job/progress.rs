/*
 * job/progress.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Progress reporting capability for render jobs.
 */

//! Progress reporting.
//!
//! [`ProgressSink`] is the explicit capability stage boundaries report
//! through - the supervisor takes one per job instead of accepting ad
//! hoc callbacks. Percentages delivered to a sink for one job are
//! strictly increasing; the terminal 100 arrives only for completed
//! jobs.

/// Receiver for per-stage progress updates.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: multiple jobs report
/// concurrently, each through its own sink reference.
pub trait ProgressSink: Send + Sync {
    /// Called at a stage boundary with the stage's name and the job's
    /// overall percent in [0, 100].
    fn update(&self, stage: &str, percent: u8);
}

/// Sink that discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NoopSink {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressSink for NoopSink {
    fn update(&self, _stage: &str, _percent: u8) {}
}

/// Sink that emits `tracing` events, one per boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressSink for TracingSink {
    fn update(&self, stage: &str, percent: u8) {
        tracing::info!(stage = stage, percent = percent, "Job progress");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Test sink that records every update.
    struct RecordingSink {
        updates: Mutex<Vec<(String, u8)>>,
    }

    impl ProgressSink for RecordingSink {
        fn update(&self, stage: &str, percent: u8) {
            self.updates
                .lock()
                .unwrap()
                .push((stage.to_string(), percent));
        }
    }

    #[test]
    fn test_noop_sink() {
        NoopSink::new().update("load", 10);
    }

    #[test]
    fn test_recording_sink_sees_updates() {
        let sink = RecordingSink {
            updates: Mutex::new(Vec::new()),
        };
        sink.update("load", 10);
        sink.update("decide", 50);

        let updates = sink.updates.lock().unwrap();
        assert_eq!(
            *updates,
            vec![("load".to_string(), 10), ("decide".to_string(), 50)]
        );
    }
}
