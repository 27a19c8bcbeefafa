//! Sequential stage runner.
//!
//! Drives a declared order of stage identifiers against a stage table:
//! strictly one stage at a time, prior outputs threaded forward, progress
//! reported on every transition, cancellation honored between and across
//! stages, and failures recorded instead of propagated.

use crate::cancellation::CancellationToken;
use crate::context::{PipelineContext, StageContext, StageOutputs};
use crate::core::{RunStatus, StageId, StageProgress};
use crate::errors::StageError;
use crate::events::{NoOpProgressSink, ProgressSink};
use crate::stages::Stage;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Callback receiving each successful stage's result as it lands.
pub type ResultCallback = Box<dyn Fn(StageId, &serde_json::Value) + Send + Sync>;

/// Terminal record of one pipeline execution.
#[derive(Debug)]
pub struct RunResult {
    /// Results of every stage that succeeded.
    pub outputs: StageOutputs,
    /// Errors of every stage that failed.
    pub errors: HashMap<StageId, StageError>,
    /// Overall outcome.
    pub status: RunStatus,
}

impl RunResult {
    /// Returns true if every executed stage succeeded.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == RunStatus::Done
    }

    /// Returns true if cancellation ended the run.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.status == RunStatus::Aborted
    }

    /// The recorded error for a stage, if it failed.
    #[must_use]
    pub fn error_for(&self, stage: StageId) -> Option<&StageError> {
        self.errors.get(&stage)
    }
}

/// Executes a declared sequence of stages with progress reporting,
/// cooperative cancellation, and configurable failure tolerance.
///
/// The runner holds no caller state; its callbacks are the only channel
/// through which results and progress leave a run, and they are never
/// invoked concurrently.
pub struct PipelineRunner {
    stages: HashMap<StageId, Arc<dyn Stage>>,
    sink: Arc<dyn ProgressSink>,
    on_result: Option<ResultCallback>,
    continue_on_error: bool,
    signal: Option<Arc<CancellationToken>>,
}

impl PipelineRunner {
    /// Creates a runner with an empty stage table and no-op progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stages: HashMap::new(),
            sink: Arc::new(NoOpProgressSink),
            on_result: None,
            continue_on_error: false,
            signal: None,
        }
    }

    /// Registers a stage under its own identifier. The last registration
    /// for an identifier wins.
    #[must_use]
    pub fn stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.insert(stage.id(), stage);
        self
    }

    /// Sets the progress sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets the per-stage result callback, invoked only on success.
    #[must_use]
    pub fn on_result<F>(mut self, callback: F) -> Self
    where
        F: Fn(StageId, &serde_json::Value) + Send + Sync + 'static,
    {
        self.on_result = Some(Box::new(callback));
        self
    }

    /// Keeps executing later stages after a failure instead of stopping.
    #[must_use]
    pub fn continue_on_error(mut self, enabled: bool) -> Self {
        self.continue_on_error = enabled;
        self
    }

    /// Overrides the cancellation token; defaults to the context's.
    #[must_use]
    pub fn with_signal(mut self, signal: Arc<CancellationToken>) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Runs the stages named by `order`, in that order.
    ///
    /// An identifier without a registered stage is skipped with a terminal
    /// progress notification. Identifiers must not repeat; the runner
    /// processes the sequence exactly as given.
    ///
    /// Stage failures never escape this method: each one is recorded in the
    /// result's error map and reported through the sink. A cancellation
    /// observed before or after any stage settles aborts the run
    /// unconditionally, discarding that stage's value.
    pub async fn run(&self, ctx: Arc<PipelineContext>, order: &[StageId]) -> RunResult {
        let signal = self
            .signal
            .clone()
            .unwrap_or_else(|| ctx.signal().clone());

        let run_id = ctx.identity().run_id;
        debug!(%run_id, stages = order.len(), "pipeline run starting");

        let mut outputs = StageOutputs::new();
        let mut errors: HashMap<StageId, StageError> = HashMap::new();
        let mut status = RunStatus::Done;

        for &stage in order {
            if signal.is_cancelled() {
                status = RunStatus::Aborted;
                break;
            }

            let Some(runner) = self.stages.get(&stage) else {
                self.sink.emit(&StageProgress::skipped(stage));
                continue;
            };

            self.sink.emit(&StageProgress::running(stage));

            let cx = StageContext::new(
                ctx.clone(),
                stage,
                outputs.clone(),
                self.sink.clone(),
                signal.clone(),
            );

            let started = Instant::now();
            let settled = runner.execute(&cx).await;

            // A run that was cancelled mid-stage is aborted even if the
            // stage happened to settle with a value.
            if signal.is_cancelled() {
                status = RunStatus::Aborted;
                break;
            }

            match settled {
                Ok(value) => {
                    debug!(
                        %run_id,
                        stage = %stage,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "stage completed"
                    );

                    if let Some(callback) = &self.on_result {
                        callback(stage, &value);
                    }
                    outputs.insert(stage, value);
                    self.sink.emit(&StageProgress::done(stage));
                }
                Err(err) if err.is_cancelled() => {
                    status = RunStatus::Aborted;
                    break;
                }
                Err(err) => {
                    warn!(%run_id, stage = %stage, error = %err, "stage failed");

                    self.sink.emit(&StageProgress::error(stage, err.to_string()));
                    errors.insert(stage, err);
                    status = RunStatus::Partial;

                    if !self.continue_on_error {
                        break;
                    }
                }
            }
        }

        debug!(%run_id, status = %status, completed = outputs.len(), "pipeline run finished");

        RunResult {
            outputs,
            errors,
            status,
        }
    }
}

impl Default for PipelineRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PipelineRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRunner")
            .field("stages", &self.stages.keys().collect::<Vec<_>>())
            .field("continue_on_error", &self.continue_on_error)
            .finish()
    }
}
