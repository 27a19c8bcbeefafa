//! Evidence stage: extract figures and tables as evidence cards.

use super::{call_service, encode, Stage};
use crate::context::StageContext;
use crate::core::StageId;
use crate::errors::StageError;
use crate::generate::{inject_language, with_context_json, ContentGenerator, GenerateRequest};
use crate::model::{BriefingResult, EvidenceResult, FiguresData};
use crate::pipeline::RetryConfig;
use crate::{prompts, repair};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Scans the paper for its most important figures and tables. Requires the
/// briefing stage's ingest output.
pub struct EvidenceStage {
    generator: Arc<dyn ContentGenerator>,
    retry: RetryConfig,
}

impl EvidenceStage {
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
impl Stage for EvidenceStage {
    fn id(&self) -> StageId {
        StageId::Evidence
    }

    async fn execute(&self, cx: &StageContext) -> Result<serde_json::Value, StageError> {
        let briefing: BriefingResult = cx.require(StageId::Briefing)?;

        cx.emit_substep("figures");
        let figures_prompt = with_context_json(
            &inject_language(prompts::FIGURE_TABLE_PROMPT, cx.language()),
            &json!({ "ingest": briefing.ingest }),
        );
        let request = GenerateRequest::new(figures_prompt, cx.document().clone());
        let text = call_service(self.generator.as_ref(), &self.retry, cx, &request).await?;
        let figures: FiguresData = repair::parse(&text)?;

        encode(&EvidenceResult { figures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EvidenceKind;
    use crate::testing::{prior_outputs, stage_context_with_prior, ScriptedGenerator};
    use serde_json::json;

    #[tokio::test]
    async fn test_evidence_extracts_cards() {
        let generator = Arc::new(ScriptedGenerator::new().respond_json(&json!({
            "items": [{
                "id": "Fig 2",
                "type": "figure",
                "caption": "Throughput vs. sequence length",
                "description": "Throughput stays flat as length grows.",
                "page": 5,
                "relevance": "Backs the scalability claim."
            }]
        })));
        let stage = EvidenceStage::new(generator);
        let cx = stage_context_with_prior(
            StageId::Evidence,
            prior_outputs(&[(
                StageId::Briefing,
                json!({
                    "ingest": { "title": "T", "authors": [], "summary": "", "outline": [] },
                    "compose": { "slides": [] }
                }),
            )]),
        );

        let value = stage.execute(&cx).await.unwrap();
        let result: EvidenceResult = serde_json::from_value(value).unwrap();

        assert_eq!(result.figures.items.len(), 1);
        assert_eq!(result.figures.items[0].kind, EvidenceKind::Figure);
    }

    #[tokio::test]
    async fn test_evidence_requires_briefing() {
        let generator = Arc::new(ScriptedGenerator::new());
        let stage = EvidenceStage::new(generator);
        let cx = stage_context_with_prior(StageId::Evidence, prior_outputs(&[]));

        assert!(matches!(
            stage.execute(&cx).await.unwrap_err(),
            StageError::MissingDependency {
                stage: StageId::Briefing
            }
        ));
    }
}
