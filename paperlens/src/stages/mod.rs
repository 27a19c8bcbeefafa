//! Stage trait, the function adapter, and the research-paper stages.
//!
//! Stages are the units of work the runner sequences. Each one is an opaque
//! asynchronous operation: it reads the shared context and prior outputs,
//! does its work (including any internal fan-out), and settles exactly once
//! with a structured value or a [`StageError`].

mod briefing;
mod consistency;
mod evidence;
mod insights;
mod podcast;

pub use briefing::BriefingStage;
pub use consistency::ConsistencyStage;
pub use evidence::EvidenceStage;
pub use insights::InsightsStage;
pub use podcast::PodcastStage;

use crate::context::StageContext;
use crate::core::StageId;
use crate::errors::StageError;
use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use std::marker::PhantomData;

/// One phase of the pipeline.
#[async_trait]
pub trait Stage: Send + Sync {
    /// The identifier this stage implements.
    fn id(&self) -> StageId;

    /// Executes the stage to settlement.
    async fn execute(&self, cx: &StageContext) -> Result<serde_json::Value, StageError>;
}

/// Serializes a stage's typed result into the accumulator's value form.
pub(crate) fn encode<T: Serialize>(result: &T) -> Result<serde_json::Value, StageError> {
    serde_json::to_value(result)
        .map_err(|err| StageError::Other(anyhow::anyhow!("stage result not serializable: {err}")))
}

/// Issues one generation request with the shared backoff policy.
pub(crate) async fn call_service(
    generator: &dyn crate::generate::ContentGenerator,
    retry: &crate::pipeline::RetryConfig,
    cx: &StageContext,
    request: &crate::generate::GenerateRequest,
) -> Result<String, crate::errors::GenerateError> {
    crate::pipeline::with_backoff(retry, cx.signal(), || {
        generator.generate(request, cx.signal())
    })
    .await
}

/// An async-closure-backed stage, mostly for tests and ad hoc callers.
pub struct FnStage<F, Fut>
where
    F: Fn(StageContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value, StageError>> + Send,
{
    id: StageId,
    func: F,
    _phantom: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnStage<F, Fut>
where
    F: Fn(StageContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value, StageError>> + Send,
{
    /// Creates a stage from an async closure.
    #[must_use]
    pub fn new(id: StageId, func: F) -> Self {
        Self {
            id,
            func,
            _phantom: PhantomData,
        }
    }
}

impl<F, Fut> std::fmt::Debug for FnStage<F, Fut>
where
    F: Fn(StageContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value, StageError>> + Send,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStage").field("id", &self.id).finish()
    }
}

#[async_trait]
impl<F, Fut> Stage for FnStage<F, Fut>
where
    F: Fn(StageContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value, StageError>> + Send,
{
    fn id(&self) -> StageId {
        self.id
    }

    async fn execute(&self, cx: &StageContext) -> Result<serde_json::Value, StageError> {
        (self.func)(cx.clone()).await
    }
}
