//! Core pipeline vocabulary: stage identifiers, statuses, progress records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one phase of the briefing pipeline.
///
/// The set of identifiers is fixed, but the execution order is supplied by
/// the caller per run; nothing here implies a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    /// Paper ingestion plus slide composition.
    Briefing,
    /// Claim extraction plus evidence checking.
    Consistency,
    /// Figure and table extraction.
    Evidence,
    /// Researcher-grade insight generation.
    Insights,
    /// Two-language podcast plan generation.
    Podcast,
}

impl StageId {
    /// All identifiers in their conventional order.
    ///
    /// Convenience for callers that want the standard full run; `run` takes
    /// any order.
    #[must_use]
    pub fn standard_order() -> [Self; 5] {
        [
            Self::Briefing,
            Self::Consistency,
            Self::Evidence,
            Self::Insights,
            Self::Podcast,
        ]
    }

    /// Returns the identifier's wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Briefing => "briefing",
            Self::Consistency => "consistency",
            Self::Evidence => "evidence",
            Self::Insights => "insights",
            Self::Podcast => "podcast",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reported status of a single stage.
///
/// Transitions within one run: `Running` to either `Done` or `Error`;
/// terminal states are never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// The stage function has been invoked and has not settled.
    Running,
    /// The stage settled successfully (or was skipped).
    Done,
    /// The stage settled with a failure.
    Error,
}

impl StageStatus {
    /// Returns true if the status is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Done => write!(f, "done"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The overall outcome of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every executed stage succeeded.
    Done,
    /// At least one stage failed; earlier successes are retained.
    Partial,
    /// Cancellation was observed before the run could complete.
    Aborted,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "done"),
            Self::Partial => write!(f, "partial"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// One progress transition, delivered to the caller's sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    /// The stage the transition belongs to.
    pub stage: StageId,
    /// The new status.
    pub status: StageStatus,
    /// Optional detail: a sub-step name, a skip marker, or a failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StageProgress {
    /// A `Running` transition.
    #[must_use]
    pub fn running(stage: StageId) -> Self {
        Self {
            stage,
            status: StageStatus::Running,
            message: None,
        }
    }

    /// A successful terminal transition.
    #[must_use]
    pub fn done(stage: StageId) -> Self {
        Self {
            stage,
            status: StageStatus::Done,
            message: None,
        }
    }

    /// The terminal transition for an identifier with no registered stage.
    #[must_use]
    pub fn skipped(stage: StageId) -> Self {
        Self {
            stage,
            status: StageStatus::Done,
            message: Some("skipped".to_string()),
        }
    }

    /// A failed terminal transition carrying the failure message.
    #[must_use]
    pub fn error(stage: StageId, message: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Error,
            message: Some(message.into()),
        }
    }

    /// Attaches a detail message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
