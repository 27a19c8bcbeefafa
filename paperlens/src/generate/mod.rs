//! The content-generation service boundary.
//!
//! The pipeline never talks to a network itself; stages hand a
//! [`GenerateRequest`] to whatever [`ContentGenerator`] the caller wired in
//! and get raw text back. Transport, authentication, and vendor specifics
//! all live behind the trait.

use crate::cancellation::CancellationToken;
use crate::context::{DocumentPayload, Language};
use crate::errors::GenerateError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which capability tier a request should run against.
///
/// Implementations map tiers to concrete model identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    /// The strongest tier; used where output structure matters most.
    Pro,
    /// The fast tier; used for lightweight extraction.
    Flash,
}

/// One request to the generation service.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// The fully prepared prompt text.
    pub prompt: String,
    /// The source document attached to the request.
    pub document: DocumentPayload,
    /// Requested capability tier.
    pub tier: ModelTier,
    /// Whether the service should be asked for a JSON response body.
    pub json_response: bool,
}

impl GenerateRequest {
    /// Creates a pro-tier JSON request.
    #[must_use]
    pub fn new(prompt: impl Into<String>, document: DocumentPayload) -> Self {
        Self {
            prompt: prompt.into(),
            document,
            tier: ModelTier::Pro,
            json_response: true,
        }
    }

    /// Selects the capability tier.
    #[must_use]
    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }

    /// Requests free text instead of JSON.
    #[must_use]
    pub fn plain_text(mut self) -> Self {
        self.json_response = false;
        self
    }
}

/// Produces content from a prepared request.
///
/// On cancellation, implementations must abort their in-flight work and
/// resolve promptly with [`GenerateError::Cancelled`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Runs one generation request to completion.
    async fn generate(
        &self,
        request: &GenerateRequest,
        signal: &CancellationToken,
    ) -> Result<String, GenerateError>;
}

/// Substitutes the target language's name into a prompt template.
#[must_use]
pub fn inject_language(prompt: &str, language: Language) -> String {
    prompt.replace("{{LANGUAGE}}", language.full_name())
}

/// Appends serialized context data to a prompt.
#[must_use]
pub fn with_context_json(prompt: &str, context: &serde_json::Value) -> String {
    format!("{prompt}\n\nCONTEXT_JSON:\n{context}")
}

/// Substitutes the claims list into the checker prompt template.
#[must_use]
pub fn inject_claims(prompt: &str, claims: &serde_json::Value) -> String {
    prompt.replace("{{CLAIMS_JSON}}", &claims.to_string())
}
