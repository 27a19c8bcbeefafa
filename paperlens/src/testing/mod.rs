//! Test support: a scripted generator and stage doubles.
//!
//! Public so downstream crates can exercise their own wiring against the
//! pipeline without a live generation service.

use crate::cancellation::CancellationToken;
use crate::context::{DocumentPayload, Language, PipelineContext, StageContext, StageOutputs};
use crate::core::StageId;
use crate::errors::{GenerateError, StageError};
use crate::events::NoOpProgressSink;
use crate::generate::{ContentGenerator, GenerateRequest};
use crate::stages::Stage;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// A generator that replays a queue of scripted responses and records the
/// prompts it was asked for.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GenerateError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Creates a generator with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful text response.
    #[must_use]
    pub fn respond(self, text: impl Into<String>) -> Self {
        self.responses.lock().push_back(Ok(text.into()));
        self
    }

    /// Queues a successful JSON response.
    #[must_use]
    pub fn respond_json(self, value: &serde_json::Value) -> Self {
        self.responses.lock().push_back(Ok(value.to_string()));
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn fail(self, error: GenerateError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Prompts seen so far, in request order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Number of requests served.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        request: &GenerateRequest,
        signal: &CancellationToken,
    ) -> Result<String, GenerateError> {
        if signal.is_cancelled() {
            return Err(GenerateError::Cancelled);
        }

        self.prompts.lock().push(request.prompt.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or(Err(GenerateError::EmptyResponse))
    }
}

/// A stage that records its invocations and returns a configured outcome.
pub struct RecordingStage {
    id: StageId,
    outcome: Mutex<Option<Result<serde_json::Value, StageError>>>,
    invocations: Arc<Mutex<Vec<StageId>>>,
}

impl RecordingStage {
    /// Creates a stage that succeeds with `value` and appends its id to the
    /// shared invocation log when executed.
    #[must_use]
    pub fn succeeding(
        id: StageId,
        value: serde_json::Value,
        invocations: Arc<Mutex<Vec<StageId>>>,
    ) -> Self {
        Self {
            id,
            outcome: Mutex::new(Some(Ok(value))),
            invocations,
        }
    }

    /// Creates a stage that fails with an opaque error.
    #[must_use]
    pub fn failing(
        id: StageId,
        message: impl Into<String>,
        invocations: Arc<Mutex<Vec<StageId>>>,
    ) -> Self {
        let message = message.into();
        Self {
            id,
            outcome: Mutex::new(Some(Err(StageError::Other(anyhow::anyhow!(message))))),
            invocations,
        }
    }
}

#[async_trait]
impl Stage for RecordingStage {
    fn id(&self) -> StageId {
        self.id
    }

    async fn execute(&self, _cx: &StageContext) -> Result<serde_json::Value, StageError> {
        self.invocations.lock().push(self.id);
        self.outcome
            .lock()
            .take()
            .unwrap_or_else(|| Ok(serde_json::Value::Null))
    }
}

/// A minimal pipeline context over a placeholder document.
#[must_use]
pub fn test_pipeline_context(language: Language) -> Arc<PipelineContext> {
    Arc::new(PipelineContext::new(
        DocumentPayload::from_bytes(b"%PDF-1.7 test fixture"),
        language,
    ))
}

/// A stage context with no prior outputs and a no-op sink.
#[must_use]
pub fn test_stage_context(stage: StageId) -> StageContext {
    stage_context_with_prior(stage, StageOutputs::new())
}

/// A stage context carrying the given prior outputs.
#[must_use]
pub fn stage_context_with_prior(stage: StageId, prior: StageOutputs) -> StageContext {
    let ctx = test_pipeline_context(Language::En);
    let signal = ctx.signal().clone();
    StageContext::new(ctx, stage, prior, Arc::new(NoOpProgressSink), signal)
}

/// Builds prior outputs from `(stage, value)` pairs.
#[must_use]
pub fn prior_outputs(entries: &[(StageId, serde_json::Value)]) -> StageOutputs {
    let mut outputs = StageOutputs::new();
    for (stage, value) in entries {
        outputs.insert(*stage, value.clone());
    }
    outputs
}
