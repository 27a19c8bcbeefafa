//! Briefing stage: ingest the paper, then compose the slide deck.

use super::{call_service, encode, Stage};
use crate::context::StageContext;
use crate::core::StageId;
use crate::errors::StageError;
use crate::generate::{
    inject_language, with_context_json, ContentGenerator, GenerateRequest, ModelTier,
};
use crate::model::{BriefingResult, ComposeData, IngestData};
use crate::pipeline::RetryConfig;
use crate::{prompts, repair};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Produces paper metadata and a three-slide briefing in two chained calls:
/// a fast-tier ingest pass, then a pro-tier composition pass fed with the
/// ingest result.
pub struct BriefingStage {
    generator: Arc<dyn ContentGenerator>,
    retry: RetryConfig,
}

impl BriefingStage {
    /// Creates the stage over a generator with the default backoff policy.
    #[must_use]
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            generator,
            retry: RetryConfig::default(),
        }
    }

    /// Overrides the backoff policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl Stage for BriefingStage {
    fn id(&self) -> StageId {
        StageId::Briefing
    }

    async fn execute(&self, cx: &StageContext) -> Result<serde_json::Value, StageError> {
        cx.emit_substep("ingest");
        let ingest_prompt = inject_language(prompts::INGEST_PROMPT, cx.language());
        let request = GenerateRequest::new(ingest_prompt, cx.document().clone())
            .with_tier(ModelTier::Flash);
        let text = call_service(self.generator.as_ref(), &self.retry, cx, &request).await?;
        let ingest: IngestData = repair::parse(&text)?;

        cx.emit_substep("compose");
        let compose_prompt = with_context_json(
            &inject_language(prompts::COMPOSER_PROMPT, cx.language()),
            &json!({ "ingest": ingest }),
        );
        let request = GenerateRequest::new(compose_prompt, cx.document().clone());
        let text = call_service(self.generator.as_ref(), &self.retry, cx, &request).await?;
        let compose: ComposeData = repair::parse(&text)?;

        encode(&BriefingResult { ingest, compose })
    }
}
