//! Podcast stage: a two-language plan generated concurrently.

use super::{call_service, encode, Stage};
use crate::context::{Language, StageContext};
use crate::core::StageId;
use crate::errors::StageError;
use crate::generate::{inject_language, with_context_json, ContentGenerator, GenerateRequest};
use crate::model::{BriefingResult, ConsistencyResult, PodcastData, PodcastResult};
use crate::pipeline::RetryConfig;
use crate::{prompts, repair};
use async_trait::async_trait;
use futures::future::try_join;
use serde_json::json;
use std::sync::Arc;

/// Produces the podcast plan in both languages at once. The fan-out is
/// internal: the runner sees a single pending operation that settles once
/// with both plans or with the first failure.
pub struct PodcastStage {
    generator: Arc<dyn ContentGenerator>,
    retry: RetryConfig,
}

impl PodcastStage {
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

    async fn plan_for(
        &self,
        cx: &StageContext,
        language: Language,
        context: &serde_json::Value,
    ) -> Result<PodcastData, StageError> {
        let prompt = with_context_json(&inject_language(prompts::PODCAST_PROMPT, language), context);
        let request = GenerateRequest::new(prompt, cx.document().clone());
        let text = call_service(self.generator.as_ref(), &self.retry, cx, &request).await?;
        let plan: PodcastData = repair::parse(&text)?;

        cx.emit_substep(format!("podcast {language} ready"));
        Ok(plan)
    }
}

#[async_trait]
impl Stage for PodcastStage {
    fn id(&self) -> StageId {
        StageId::Podcast
    }

    async fn execute(&self, cx: &StageContext) -> Result<serde_json::Value, StageError> {
        let briefing: BriefingResult = cx.require(StageId::Briefing)?;
        let consistency: ConsistencyResult = cx.require(StageId::Consistency)?;

        cx.emit_substep("podcast");
        let context = json!({
            "outline": briefing.ingest.outline,
            "claims": consistency.claims.claims,
        });

        let (en, pt) = try_join(
            self.plan_for(cx, Language::En, &context),
            self.plan_for(cx, Language::Pt, &context),
        )
        .await?;

        encode(&PodcastResult { en, pt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{prior_outputs, stage_context_with_prior, ScriptedGenerator};
    use serde_json::json;

    fn plan_json(title: &str) -> serde_json::Value {
        json!({
            "title": title,
            "estimatedDurationSeconds": 240,
            "segments": [{
                "id": "intro",
                "title": "Intro",
                "startSeconds": 0,
                "endSeconds": 40,
                "summary": "Opening.",
                "citations": [{ "page": 1, "text": "abstract" }],
                "transcript": [
                    { "speaker": "A", "text": "Welcome to the show." },
                    { "speaker": "B", "text": "Glad to be here." }
                ]
            }]
        })
    }

    fn podcast_prior() -> crate::context::StageOutputs {
        prior_outputs(&[
            (
                StageId::Briefing,
                json!({
                    "ingest": { "title": "T", "authors": [], "summary": "", "outline": ["Intro"] },
                    "compose": { "slides": [] }
                }),
            ),
            (
                StageId::Consistency,
                json!({
                    "claims": { "claims": [{ "text": "c", "topic": "t" }] },
                    "check": { "checks": [] }
                }),
            ),
        ])
    }

    #[tokio::test]
    async fn test_podcast_generates_both_languages() {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .respond_json(&plan_json("Deep Dive"))
                .respond_json(&plan_json("Mergulho Profundo")),
        );
        let stage = PodcastStage::new(generator.clone());
        let cx = stage_context_with_prior(StageId::Podcast, podcast_prior());

        let value = stage.execute(&cx).await.unwrap();
        let result: PodcastResult = serde_json::from_value(value).unwrap();

        assert_eq!(result.en.segments.len(), 1);
        assert_eq!(result.pt.segments.len(), 1);
        assert_eq!(generator.call_count(), 2);

        // One request per language, each with the language name substituted.
        let prompts_seen = generator.prompts();
        assert!(prompts_seen.iter().any(|p| p.contains("English")));
        assert!(prompts_seen
            .iter()
            .any(|p| p.contains("Portuguese (Brazil)")));
    }

    #[tokio::test]
    async fn test_podcast_settles_once_on_failure() {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .respond("garbage that will not parse")
                .respond("garbage that will not parse"),
        );
        let stage = PodcastStage::new(generator);
        let cx = stage_context_with_prior(StageId::Podcast, podcast_prior());

        assert!(matches!(
            stage.execute(&cx).await.unwrap_err(),
            StageError::Parse(_)
        ));
    }

    #[tokio::test]
    async fn test_podcast_requires_consistency() {
        let generator = Arc::new(ScriptedGenerator::new());
        let stage = PodcastStage::new(generator);
        let cx = stage_context_with_prior(
            StageId::Podcast,
            prior_outputs(&[(
                StageId::Briefing,
                json!({
                    "ingest": { "title": "T", "authors": [], "summary": "", "outline": [] },
                    "compose": { "slides": [] }
                }),
            )]),
        );

        assert!(matches!(
            stage.execute(&cx).await.unwrap_err(),
            StageError::MissingDependency {
                stage: StageId::Consistency
            }
        ));
    }
}
