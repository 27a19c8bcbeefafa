//! Progress reporting sinks.
//!
//! The runner's callbacks are the only channel through which a caller may
//! update its own externally visible state; the runner holds no reference to
//! that state and never invokes sinks concurrently.

use crate::core::{StageProgress, StageStatus};
use tracing::{debug, info, Level};

/// Receives every stage status transition of a run.
///
/// Implementations must not panic and must not block; the runner invokes
/// them inline between stages.
pub trait ProgressSink: Send + Sync {
    /// Delivers one progress transition.
    fn emit(&self, progress: &StageProgress);
}

/// Discards all progress. The default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgressSink;

impl ProgressSink for NoOpProgressSink {
    fn emit(&self, _progress: &StageProgress) {}
}

/// Logs progress through the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingProgressSink {
    level: Level,
}

impl Default for LoggingProgressSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingProgressSink {
    /// Creates a sink logging at the given level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl ProgressSink for LoggingProgressSink {
    fn emit(&self, progress: &StageProgress) {
        match self.level {
            Level::DEBUG => debug!(
                stage = %progress.stage,
                status = %progress.status,
                message = progress.message.as_deref(),
                "stage progress"
            ),
            _ => info!(
                stage = %progress.stage,
                status = %progress.status,
                message = progress.message.as_deref(),
                "stage progress"
            ),
        }
    }
}

/// Collects progress transitions for inspection in tests.
#[derive(Debug, Default)]
pub struct CollectingProgressSink {
    events: parking_lot::RwLock<Vec<StageProgress>>,
}

impl CollectingProgressSink {
    /// Creates an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected transitions in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<StageProgress> {
        self.events.read().clone()
    }

    /// Number of collected transitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Transitions belonging to one stage.
    #[must_use]
    pub fn of_stage(&self, stage: crate::core::StageId) -> Vec<StageProgress> {
        self.events
            .read()
            .iter()
            .filter(|p| p.stage == stage)
            .cloned()
            .collect()
    }

    /// Transitions with a given status.
    #[must_use]
    pub fn with_status(&self, status: StageStatus) -> Vec<StageProgress> {
        self.events
            .read()
            .iter()
            .filter(|p| p.status == status)
            .cloned()
            .collect()
    }

    /// Clears all collected transitions.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl ProgressSink for CollectingProgressSink {
    fn emit(&self, progress: &StageProgress) {
        self.events.write().push(progress.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageId;

    #[test]
    fn test_noop_sink() {
        let sink = NoOpProgressSink;
        sink.emit(&StageProgress::running(StageId::Briefing));
    }

    #[test]
    fn test_logging_sink_does_not_panic() {
        let sink = LoggingProgressSink::default();
        sink.emit(&StageProgress::error(StageId::Podcast, "boom"));

        let debug_sink = LoggingProgressSink::debug();
        debug_sink.emit(&StageProgress::done(StageId::Briefing));
    }

    #[test]
    fn test_collecting_sink() {
        let sink = CollectingProgressSink::new();
        assert!(sink.is_empty());

        sink.emit(&StageProgress::running(StageId::Briefing));
        sink.emit(&StageProgress::done(StageId::Briefing));
        sink.emit(&StageProgress::running(StageId::Evidence));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.of_stage(StageId::Briefing).len(), 2);
        assert_eq!(sink.with_status(StageStatus::Running).len(), 2);

        sink.clear();
        assert!(sink.is_empty());
    }
}
