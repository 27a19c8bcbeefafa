//! Content data model: the structured values the stages produce.
//!
//! Field names and enum strings match the generation prompts' schemas
//! exactly, so these types deserialize straight out of the recovered
//! service output. Optional fields default leniently; the service is an
//! untrusted producer.

use crate::context::Language;
use serde::{Deserialize, Serialize};

/// A grounding reference into the source paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Citation {
    /// Page number in the paper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Short excerpt copied from the paper.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Figure or table id, e.g. "Fig 1".
    #[serde(default, rename = "sourceId", skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

/// High-level paper metadata from the ingest call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IngestData {
    /// Paper title.
    #[serde(default)]
    pub title: String,
    /// Author list.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Two-sentence abstract summary.
    #[serde(default)]
    pub summary: String,
    /// Section outline, at most ten entries.
    #[serde(default)]
    pub outline: Vec<String>,
}

/// One bullet point on a briefing slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlidePoint {
    /// The bullet text.
    pub text: String,
    /// Grounding citation for the bullet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<Citation>,
}

/// One slide of the composed briefing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingSlide {
    /// Slide title.
    pub title: String,
    /// Exactly three bullet points in practice.
    #[serde(default)]
    pub points: Vec<SlidePoint>,
}

/// The composed briefing deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ComposeData {
    /// The briefing slides.
    #[serde(default)]
    pub slides: Vec<BriefingSlide>,
}

/// Combined result of the briefing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefingResult {
    /// Paper metadata from the ingest call.
    pub ingest: IngestData,
    /// The composed slide deck.
    pub compose: ComposeData,
}

/// One extracted scientific claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// The claim text.
    pub text: String,
    /// Topic label for the claim.
    #[serde(default)]
    pub topic: String,
}

/// The claim-extraction call's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClaimsData {
    /// Extracted claims.
    #[serde(default)]
    pub claims: Vec<Claim>,
}

/// Verdict of checking one claim against the paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// The paper clearly supports the claim.
    Supported,
    /// Partially supported or ambiguous.
    Weak,
    /// No supporting text found.
    #[serde(rename = "Not Found")]
    NotFound,
}

/// Reported confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// High confidence.
    High,
    /// Medium confidence.
    Medium,
    /// Low confidence.
    Low,
}

/// One claim's consistency verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyCheck {
    /// The checked claim.
    pub claim: String,
    /// Verdict.
    pub status: ClaimStatus,
    /// Explanation of the verdict.
    #[serde(default)]
    pub explanation: String,
    /// Reported confidence.
    pub confidence: Confidence,
    /// Evidence excerpt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<Citation>,
}

/// The checker call's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CheckData {
    /// Per-claim verdicts.
    #[serde(default)]
    pub checks: Vec<ConsistencyCheck>,
}

/// Combined result of the consistency stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyResult {
    /// Extracted claims.
    pub claims: ClaimsData,
    /// Their verdicts.
    pub check: CheckData,
}

/// Whether an evidence card refers to a figure or a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceKind {
    /// A figure.
    Figure,
    /// A table.
    Table,
}

/// One extracted figure or table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceCard {
    /// Identifier, e.g. "Fig 1".
    pub id: String,
    /// Figure or table.
    #[serde(rename = "type")]
    pub kind: EvidenceKind,
    /// Exact caption text.
    #[serde(default)]
    pub caption: String,
    /// One-sentence interpretation.
    #[serde(default)]
    pub description: String,
    /// Page number.
    #[serde(default)]
    pub page: u32,
    /// Why it matters.
    #[serde(default)]
    pub relevance: String,
}

/// The figures/tables call's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FiguresData {
    /// The extracted cards, most important first.
    #[serde(default)]
    pub items: Vec<EvidenceCard>,
}

/// Combined result of the evidence stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceResult {
    /// The extracted figures and tables.
    pub figures: FiguresData,
}

/// Category of a generated insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightKind {
    /// A different framing of the work.
    #[serde(rename = "Alternative Lens")]
    AlternativeLens,
    /// An assumption the paper does not state.
    #[serde(rename = "Hidden Assumption")]
    HiddenAssumption,
    /// A connection to another field.
    #[serde(rename = "Cross-Domain Link")]
    CrossDomainLink,
    /// Where the results stop applying.
    #[serde(rename = "Scope Boundary")]
    ScopeBoundary,
    /// A method worth porting elsewhere.
    #[serde(rename = "Method Transfer")]
    MethodTransfer,
    /// A testable hypothesis.
    Hypothesis,
    /// A follow-up experiment.
    #[serde(rename = "Experiment Idea")]
    ExperimentIdea,
    /// An internal tension in the paper.
    #[serde(rename = "Contradiction/Tension")]
    ContradictionTension,
    /// A limitation reframed as an opening.
    #[serde(rename = "Limitation → Opportunity")]
    LimitationOpportunity,
}

/// How an insight is grounded in the paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Grounding {
    /// Backed by citations into the paper.
    Grounded {
        /// The supporting citations.
        #[serde(default)]
        citations: Vec<Citation>,
    },
    /// Not directly evidenced.
    Speculative {
        /// Why no evidence was found.
        reason: String,
        /// Where to look for confirmation.
        #[serde(default, rename = "suggestedWhereToCheck")]
        suggested_where_to_check: Vec<String>,
    },
}

/// One researcher-grade insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightItem {
    /// Identifier, e.g. "INS-1".
    pub id: String,
    /// Short title.
    pub title: String,
    /// Category.
    pub kind: InsightKind,
    /// The insight itself, 2-4 sentences.
    pub insight: String,
    /// Why it matters, 1-2 sentences.
    #[serde(rename = "whyItMatters")]
    pub why_it_matters: String,
    /// A concrete next action.
    #[serde(rename = "actionableNextStep")]
    pub actionable_next_step: String,
    /// Reported confidence.
    pub confidence: Confidence,
    /// Grounding record.
    pub grounding: Grounding,
}

/// The insights call's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InsightsData {
    /// The generated insights.
    #[serde(default)]
    pub items: Vec<InsightItem>,
}

/// A podcast transcript speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    /// The host.
    A,
    /// The expert.
    B,
}

/// One transcript line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Who speaks.
    pub speaker: Speaker,
    /// What they say.
    pub text: String,
}

/// One planned podcast segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastSegment {
    /// Segment identifier.
    pub id: String,
    /// Segment title.
    pub title: String,
    /// Cumulative start offset in seconds.
    #[serde(rename = "startSeconds")]
    pub start_seconds: u32,
    /// Cumulative end offset in seconds.
    #[serde(rename = "endSeconds")]
    pub end_seconds: u32,
    /// One-sentence summary.
    #[serde(default)]
    pub summary: String,
    /// Grounding citations for the segment.
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// Two-speaker dialogue, if produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Vec<TranscriptLine>>,
}

/// A complete podcast plan in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PodcastData {
    /// Podcast title.
    #[serde(default)]
    pub title: String,
    /// Estimated total duration.
    #[serde(default, rename = "estimatedDurationSeconds")]
    pub estimated_duration_seconds: u32,
    /// The planned segments.
    #[serde(default)]
    pub segments: Vec<PodcastSegment>,
}

/// Combined result of the podcast stage: one plan per language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastResult {
    /// English plan.
    pub en: PodcastData,
    /// Brazilian-Portuguese plan.
    pub pt: PodcastData,
}

impl PodcastResult {
    /// Returns the plan for a language.
    #[must_use]
    pub fn for_language(&self, language: Language) -> &PodcastData {
        match language {
            Language::En => &self.en,
            Language::Pt => &self.pt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_ingest_data_lenient_defaults() {
        let data: IngestData = serde_json::from_value(json!({"title": "T"})).unwrap();
        assert_eq!(data.title, "T");
        assert!(data.authors.is_empty());
        assert!(data.outline.is_empty());
    }

    #[test]
    fn test_claim_status_wire_names() {
        let status: ClaimStatus = serde_json::from_value(json!("Not Found")).unwrap();
        assert_eq!(status, ClaimStatus::NotFound);
        assert_eq!(
            serde_json::to_value(ClaimStatus::Supported).unwrap(),
            json!("Supported")
        );
    }

    #[test]
    fn test_evidence_card_type_field() {
        let card: EvidenceCard = serde_json::from_value(json!({
            "id": "Fig 1",
            "type": "figure",
            "caption": "Accuracy over epochs",
            "description": "Shows convergence.",
            "page": 4,
            "relevance": "Supports the main result."
        }))
        .unwrap();
        assert_eq!(card.kind, EvidenceKind::Figure);
    }

    #[test]
    fn test_insight_grounding_tagged_enum() {
        let grounded: Grounding = serde_json::from_value(json!({
            "status": "Grounded",
            "citations": [{"page": 2, "text": "excerpt"}]
        }))
        .unwrap();
        assert!(matches!(grounded, Grounding::Grounded { ref citations } if citations.len() == 1));

        let speculative: Grounding = serde_json::from_value(json!({
            "status": "Speculative",
            "reason": "no table matches",
            "suggestedWhereToCheck": ["appendix"]
        }))
        .unwrap();
        assert!(matches!(
            speculative,
            Grounding::Speculative { ref suggested_where_to_check, .. }
                if suggested_where_to_check == &vec!["appendix".to_string()]
        ));
    }

    #[test]
    fn test_insight_kind_arrow_variant() {
        let kind: InsightKind =
            serde_json::from_value(json!("Limitation → Opportunity")).unwrap();
        assert_eq!(kind, InsightKind::LimitationOpportunity);
    }

    #[test]
    fn test_podcast_camel_case_fields() {
        let plan: PodcastData = serde_json::from_value(json!({
            "title": "Deep Dive",
            "estimatedDurationSeconds": 300,
            "segments": [{
                "id": "intro",
                "title": "Intro",
                "startSeconds": 0,
                "endSeconds": 45,
                "summary": "Opening.",
                "citations": [],
                "transcript": [{"speaker": "A", "text": "Welcome!"}]
            }]
        }))
        .unwrap();

        assert_eq!(plan.estimated_duration_seconds, 300);
        assert_eq!(plan.segments[0].end_seconds, 45);
        assert_eq!(
            plan.segments[0].transcript.as_ref().unwrap()[0].speaker,
            Speaker::A
        );
    }

    #[test]
    fn test_podcast_result_for_language() {
        let result = PodcastResult {
            en: PodcastData {
                title: "English".to_string(),
                ..PodcastData::default()
            },
            pt: PodcastData {
                title: "Português".to_string(),
                ..PodcastData::default()
            },
        };

        assert_eq!(result.for_language(Language::En).title, "English");
        assert_eq!(result.for_language(Language::Pt).title, "Português");
    }
}
