//! Run context, the outputs accumulator, and the per-stage view handed to
//! stage functions.

use crate::cancellation::CancellationToken;
use crate::core::{StageId, StageProgress};
use crate::errors::StageError;
use crate::events::ProgressSink;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Output language for generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,
    /// Brazilian Portuguese.
    Pt,
}

impl Language {
    /// The human-readable name injected into prompts.
    #[must_use]
    pub fn full_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Pt => "Portuguese (Brazil)",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::En => write!(f, "en"),
            Self::Pt => write!(f, "pt"),
        }
    }
}

/// The source document shared by every stage, held base64-encoded the way
/// the generation service consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPayload {
    /// Base64-encoded document bytes.
    data: String,
    /// MIME type of the document.
    mime_type: String,
}

impl DocumentPayload {
    /// Wraps already-encoded PDF data.
    #[must_use]
    pub fn from_base64(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: "application/pdf".to_string(),
        }
    }

    /// Encodes raw document bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_base64(BASE64.encode(bytes))
    }

    /// Overrides the MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Returns the base64 form.
    #[must_use]
    pub fn as_base64(&self) -> &str {
        &self.data
    }

    /// Returns the MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Decodes back to raw bytes.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }
}

/// Identity of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunIdentity {
    /// Unique id of the run.
    pub run_id: Uuid,
    /// When the run context was created.
    pub started_at: DateTime<Utc>,
}

impl RunIdentity {
    /// Creates a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable input shared by all stages of one execution.
///
/// Created once at pipeline start; neither the runner nor stage functions
/// mutate it.
#[derive(Debug)]
pub struct PipelineContext {
    identity: RunIdentity,
    document: DocumentPayload,
    language: Language,
    signal: Arc<CancellationToken>,
}

impl PipelineContext {
    /// Creates a context with a fresh cancellation token.
    #[must_use]
    pub fn new(document: DocumentPayload, language: Language) -> Self {
        Self {
            identity: RunIdentity::new(),
            document,
            language,
            signal: CancellationToken::new(),
        }
    }

    /// Supplies an externally owned cancellation token.
    #[must_use]
    pub fn with_signal(mut self, signal: Arc<CancellationToken>) -> Self {
        self.signal = signal;
        self
    }

    /// Returns the run identity.
    #[must_use]
    pub fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    /// Returns the source document.
    #[must_use]
    pub fn document(&self) -> &DocumentPayload {
        &self.document
    }

    /// Returns the target language.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the run's cancellation token.
    #[must_use]
    pub fn signal(&self) -> &Arc<CancellationToken> {
        &self.signal
    }
}

/// Accumulated results of completed stages, keyed by stage identifier.
///
/// The runner owns the live accumulator; each stage receives a snapshot
/// taken at invocation time, so a stage can never observe outputs of stages
/// that settle after it started.
#[derive(Debug, Clone, Default)]
pub struct StageOutputs {
    outputs: HashMap<StageId, serde_json::Value>,
}

impl StageOutputs {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, stage: StageId, value: serde_json::Value) {
        self.outputs.insert(stage, value);
    }

    /// Returns a stage's raw result value, if it has completed.
    #[must_use]
    pub fn get(&self, stage: StageId) -> Option<&serde_json::Value> {
        self.outputs.get(&stage)
    }

    /// Decodes a stage's result into a typed value.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the stored value does not match `T`.
    pub fn decode<T: DeserializeOwned>(
        &self,
        stage: StageId,
    ) -> Result<Option<T>, serde_json::Error> {
        self.outputs
            .get(&stage)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }

    /// Returns true if the stage has a recorded result.
    #[must_use]
    pub fn contains(&self, stage: StageId) -> bool {
        self.outputs.contains_key(&stage)
    }

    /// Number of completed stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Returns true if no stage has completed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Identifiers of all completed stages.
    #[must_use]
    pub fn stages(&self) -> Vec<StageId> {
        self.outputs.keys().copied().collect()
    }
}

/// Everything a stage function sees for one invocation: the shared context,
/// a snapshot of prior outputs, the progress sink, and the run's signal.
#[derive(Clone)]
pub struct StageContext {
    ctx: Arc<PipelineContext>,
    stage: StageId,
    prior: StageOutputs,
    sink: Arc<dyn ProgressSink>,
    signal: Arc<CancellationToken>,
}

impl StageContext {
    /// Creates a stage context.
    #[must_use]
    pub fn new(
        ctx: Arc<PipelineContext>,
        stage: StageId,
        prior: StageOutputs,
        sink: Arc<dyn ProgressSink>,
        signal: Arc<CancellationToken>,
    ) -> Self {
        Self {
            ctx,
            stage,
            prior,
            sink,
            signal,
        }
    }

    /// The stage being executed.
    #[must_use]
    pub fn stage(&self) -> StageId {
        self.stage
    }

    /// The shared run context.
    #[must_use]
    pub fn pipeline(&self) -> &PipelineContext {
        &self.ctx
    }

    /// The source document.
    #[must_use]
    pub fn document(&self) -> &DocumentPayload {
        self.ctx.document()
    }

    /// The target language.
    #[must_use]
    pub fn language(&self) -> Language {
        self.ctx.language()
    }

    /// Snapshot of outputs from stages that settled before this one.
    #[must_use]
    pub fn prior(&self) -> &StageOutputs {
        &self.prior
    }

    /// The run's cancellation token.
    #[must_use]
    pub fn signal(&self) -> &Arc<CancellationToken> {
        &self.signal
    }

    /// Emits a sub-step progress message for this stage.
    pub fn emit_substep(&self, message: impl Into<String>) {
        self.sink
            .emit(&StageProgress::running(self.stage).with_message(message));
    }

    /// Decodes a required prior output.
    ///
    /// # Errors
    ///
    /// `StageError::MissingDependency` if the stage has no recorded output;
    /// `StageError::Other` if the stored value does not match `T`.
    pub fn require<T: DeserializeOwned>(&self, stage: StageId) -> Result<T, StageError> {
        self.prior
            .decode(stage)
            .map_err(|err| {
                StageError::Other(anyhow::anyhow!(
                    "output of stage '{stage}' has unexpected shape: {err}"
                ))
            })?
            .ok_or(StageError::MissingDependency { stage })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoOpProgressSink;
    use serde_json::json;

    #[test]
    fn test_language_full_name() {
        assert_eq!(Language::En.full_name(), "English");
        assert_eq!(Language::Pt.full_name(), "Portuguese (Brazil)");
    }

    #[test]
    fn test_document_payload_round_trip() {
        let payload = DocumentPayload::from_bytes(b"%PDF-1.7 minimal");
        assert_eq!(payload.mime_type(), "application/pdf");
        assert_eq!(payload.decode().unwrap(), b"%PDF-1.7 minimal");
    }

    #[test]
    fn test_outputs_accumulator() {
        let mut outputs = StageOutputs::new();
        assert!(outputs.is_empty());

        outputs.insert(StageId::Briefing, json!({"slides": 3}));

        assert!(outputs.contains(StageId::Briefing));
        assert!(!outputs.contains(StageId::Podcast));
        assert_eq!(outputs.len(), 1);
        assert_eq!(
            outputs.get(StageId::Briefing),
            Some(&json!({"slides": 3}))
        );
    }

    #[test]
    fn test_outputs_decode_typed() {
        #[derive(serde::Deserialize)]
        struct Payload {
            slides: u32,
        }

        let mut outputs = StageOutputs::new();
        outputs.insert(StageId::Briefing, json!({"slides": 3}));

        let decoded: Option<Payload> = outputs.decode(StageId::Briefing).unwrap();
        assert_eq!(decoded.map(|p| p.slides), Some(3));

        let absent: Option<Payload> = outputs.decode(StageId::Podcast).unwrap();
        assert!(absent.is_none());
    }

    #[test]
    fn test_stage_context_require() {
        let ctx = Arc::new(PipelineContext::new(
            DocumentPayload::from_base64("aGk="),
            Language::En,
        ));
        let mut prior = StageOutputs::new();
        prior.insert(StageId::Briefing, json!({"title": "A paper"}));

        let cx = StageContext::new(
            ctx.clone(),
            StageId::Consistency,
            prior,
            Arc::new(NoOpProgressSink),
            ctx.signal().clone(),
        );

        let value: serde_json::Value = cx.require(StageId::Briefing).unwrap();
        assert_eq!(value["title"], "A paper");

        let missing = cx.require::<serde_json::Value>(StageId::Evidence);
        assert!(matches!(
            missing,
            Err(StageError::MissingDependency {
                stage: StageId::Evidence
            })
        ));
    }
}
