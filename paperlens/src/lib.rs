//! # PaperLens
//!
//! A staged briefing pipeline for research papers. A caller supplies a
//! document, a table of stages, and an execution order; the pipeline runner
//! drives the stages strictly in sequence, threading each stage's output to
//! the ones after it, reporting progress on every transition, tolerating
//! partial failure, and honoring cooperative cancellation.
//!
//! The built-in stages turn a paper into a slide briefing, a claim
//! consistency report, evidence cards, researcher insights, and a
//! two-language podcast plan, all through a pluggable content-generation
//! boundary.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paperlens::prelude::*;
//! use std::sync::Arc;
//!
//! let generator: Arc<dyn ContentGenerator> = Arc::new(my_service_client());
//! let ctx = Arc::new(PipelineContext::new(
//!     DocumentPayload::from_bytes(&pdf_bytes),
//!     Language::En,
//! ));
//!
//! let runner = PipelineRunner::new()
//!     .stage(Arc::new(BriefingStage::new(generator.clone())))
//!     .stage(Arc::new(ConsistencyStage::new(generator.clone())))
//!     .stage(Arc::new(EvidenceStage::new(generator.clone())))
//!     .stage(Arc::new(InsightsStage::new(generator.clone())))
//!     .stage(Arc::new(PodcastStage::new(generator)))
//!     .with_sink(Arc::new(LoggingProgressSink::default()));
//!
//! let result = runner.run(ctx, &StageId::standard_order()).await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod generate;
pub mod model;
pub mod observability;
pub mod pipeline;
pub mod prompts;
pub mod repair;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::context::{
        DocumentPayload, Language, PipelineContext, RunIdentity, StageContext, StageOutputs,
    };
    pub use crate::core::{RunStatus, StageId, StageProgress, StageStatus};
    pub use crate::errors::{GenerateError, ParseError, StageError};
    pub use crate::events::{
        CollectingProgressSink, LoggingProgressSink, NoOpProgressSink, ProgressSink,
    };
    pub use crate::generate::{ContentGenerator, GenerateRequest, ModelTier};
    pub use crate::pipeline::{with_backoff, PipelineRunner, RetryConfig, RunResult};
    pub use crate::stages::{
        BriefingStage, ConsistencyStage, EvidenceStage, FnStage, InsightsStage, PodcastStage,
        Stage,
    };
}
