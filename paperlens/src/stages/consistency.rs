//! Consistency stage: extract claims, then check them against the paper.

use super::{call_service, encode, Stage};
use crate::context::StageContext;
use crate::core::StageId;
use crate::errors::StageError;
use crate::generate::{
    inject_claims, inject_language, with_context_json, ContentGenerator, GenerateRequest,
};
use crate::model::{BriefingResult, CheckData, ClaimsData, ConsistencyResult};
use crate::pipeline::RetryConfig;
use crate::{prompts, repair};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Extracts the paper's critical claims and verifies each one against the
/// full text. Requires the briefing stage's ingest output.
pub struct ConsistencyStage {
    generator: Arc<dyn ContentGenerator>,
    retry: RetryConfig,
}

impl ConsistencyStage {
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
impl Stage for ConsistencyStage {
    fn id(&self) -> StageId {
        StageId::Consistency
    }

    async fn execute(&self, cx: &StageContext) -> Result<serde_json::Value, StageError> {
        let briefing: BriefingResult = cx.require(StageId::Briefing)?;

        cx.emit_substep("claims");
        let claims_prompt = with_context_json(
            &inject_language(prompts::CLAIM_PROMPT, cx.language()),
            &json!({ "ingest": briefing.ingest }),
        );
        let request = GenerateRequest::new(claims_prompt, cx.document().clone());
        let text = call_service(self.generator.as_ref(), &self.retry, cx, &request).await?;
        let claims: ClaimsData = repair::parse(&text)?;

        cx.emit_substep("check");
        let claims_json = encode(&claims.claims)?;
        let check_prompt = with_context_json(
            &inject_claims(
                &inject_language(prompts::EVIDENCE_CHECKER_PROMPT, cx.language()),
                &claims_json,
            ),
            &json!({ "ingest": briefing.ingest }),
        );
        let request = GenerateRequest::new(check_prompt, cx.document().clone());
        let text = call_service(self.generator.as_ref(), &self.retry, cx, &request).await?;
        let check: CheckData = repair::parse(&text)?;

        encode(&ConsistencyResult { claims, check })
    }
}
