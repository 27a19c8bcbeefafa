//! Insights stage: researcher-grade observations grounded in the paper.

use super::{call_service, encode, Stage};
use crate::context::StageContext;
use crate::core::StageId;
use crate::errors::StageError;
use crate::generate::{inject_language, with_context_json, ContentGenerator, GenerateRequest};
use crate::model::{BriefingResult, ConsistencyResult, EvidenceResult, InsightsData};
use crate::pipeline::RetryConfig;
use crate::{prompts, repair};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Generates insights from the accumulated outline, claims, and evidence.
/// Requires the briefing, consistency, and evidence stages.
pub struct InsightsStage {
    generator: Arc<dyn ContentGenerator>,
    retry: RetryConfig,
}

impl InsightsStage {
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
impl Stage for InsightsStage {
    fn id(&self) -> StageId {
        StageId::Insights
    }

    async fn execute(&self, cx: &StageContext) -> Result<serde_json::Value, StageError> {
        let briefing: BriefingResult = cx.require(StageId::Briefing)?;
        let consistency: ConsistencyResult = cx.require(StageId::Consistency)?;
        let evidence: EvidenceResult = cx.require(StageId::Evidence)?;

        cx.emit_substep("insights");
        let prompt = with_context_json(
            &inject_language(prompts::INSIGHTS_PROMPT, cx.language()),
            &json!({
                "outline": briefing.ingest.outline,
                "topClaims": consistency.claims.claims,
                "evidence": evidence.figures.items,
            }),
        );
        let request = GenerateRequest::new(prompt, cx.document().clone());
        let text = call_service(self.generator.as_ref(), &self.retry, cx, &request).await?;
        let insights: InsightsData = repair::parse(&text)?;

        encode(&insights)
    }
}
