//! Error taxonomy for the briefing pipeline.
//!
//! Cancellation is a distinguished outcome, never a reportable failure: the
//! runner maps it to an aborted run instead of recording it per stage.

use crate::core::StageId;
use thiserror::Error;

/// Failure of a single stage function.
///
/// The runner catches every variant, records it in the run's error map, and
/// never re-throws; `Cancelled` (and cancelled generation) instead halts the
/// run unconditionally.
#[derive(Debug, Error)]
pub enum StageError {
    /// The run's cancellation signal fired while the stage was in flight.
    #[error("operation cancelled")]
    Cancelled,

    /// A call to the content-generation service failed.
    #[error("content generation failed: {0}")]
    Generation(#[from] GenerateError),

    /// The service's text response could not be recovered into a structured
    /// value.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// A stage read a prior output that was never produced.
    #[error("missing output from prior stage '{stage}'")]
    MissingDependency {
        /// The stage whose output was expected.
        stage: StageId,
    },

    /// Any other failure from a caller-supplied stage function.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    /// Creates a missing-dependency error.
    #[must_use]
    pub fn missing_dependency(stage: StageId) -> Self {
        Self::MissingDependency { stage }
    }

    /// Returns true if this failure is really a cancellation outcome.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Cancelled | Self::Generation(GenerateError::Cancelled)
        )
    }
}

/// Failure of one request to the content-generation service.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    /// The service rejected the request for quota reasons.
    #[error("rate limited: {message}")]
    RateLimited {
        /// The service's message.
        message: String,
    },

    /// The service is overloaded or temporarily down.
    #[error("service unavailable: {message}")]
    Unavailable {
        /// The service's message.
        message: String,
    },

    /// The service answered without any text content.
    #[error("empty response from generation service")]
    EmptyResponse,

    /// The request was cancelled cooperatively.
    #[error("operation cancelled")]
    Cancelled,

    /// Any other request failure.
    #[error("request failed: {message}")]
    Request {
        /// The failure description.
        message: String,
    },
}

impl GenerateError {
    /// Creates a rate-limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a generic request error.
    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Classifies a service failure from its status code and message.
    ///
    /// Rate-limit class: status 429 or a quota complaint. Unavailable class:
    /// status 500/503 or an overloaded/unavailable/internal-error complaint.
    /// Everything else is a plain request failure.
    #[must_use]
    pub fn classify(status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();

        if status == Some(429) || lowered.contains("429") || lowered.contains("quota") {
            return Self::RateLimited { message };
        }

        if matches!(status, Some(500 | 503))
            || lowered.contains("overloaded")
            || lowered.contains("unavailable")
            || lowered.contains("internal error")
        {
            return Self::Unavailable { message };
        }

        Self::Request { message }
    }

    /// Returns true if the failure class is worth retrying with backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Unavailable { .. })
    }
}

/// Irrecoverable failure of the lenient JSON recovery passes.
#[derive(Debug, Clone, Error)]
#[error("model output could not be parsed: {message} (head: {head:?}, tail: {tail:?})")]
pub struct ParseError {
    /// The underlying serde message.
    pub message: String,
    /// Leading characters of the candidate text.
    pub head: String,
    /// Trailing characters of the candidate text.
    pub tail: String,
}

impl ParseError {
    const SNIPPET_LEN: usize = 100;

    /// Creates a parse error from the serde failure and the candidate text.
    #[must_use]
    pub fn new(message: impl Into<String>, candidate: &str) -> Self {
        Self {
            message: message.into(),
            head: truncated(candidate, Self::SNIPPET_LEN, false),
            tail: truncated(candidate, Self::SNIPPET_LEN, true),
        }
    }
}

fn truncated(text: &str, limit: usize, from_end: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= limit {
        return text.to_string();
    }
    if from_end {
        chars[chars.len() - limit..].iter().collect()
    } else {
        chars[..limit].iter().collect()
    }
}
