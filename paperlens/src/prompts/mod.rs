//! Prompt templates for the research-paper stages.
//!
//! Templates carry `{{LANGUAGE}}` (and, for the checker, `{{CLAIMS_JSON}}`)
//! placeholders filled by the helpers in [`crate::generate`].

/// Extracts high-level paper metadata.
pub const INGEST_PROMPT: &str = r#"You are the Ingest Agent. Analyze this research paper.
Extract the following high-level metadata:
1. Title
2. Authors
3. Abstract Summary (2 sentences max)
4. A rough outline of sections (max 10).
Language: {{LANGUAGE}} (Output content in this language, but keep JSON keys in English).

Return ONLY valid JSON (no markdown, no code fences, no extra text):
{
  "title": "string",
  "authors": ["string"],
  "summary": "string",
  "outline": ["string"]
}"#;

/// Composes the three-slide briefing from the ingested paper.
pub const COMPOSER_PROMPT: &str = r#"You are the Briefing Composer Agent.
Create a high-level 3-slide briefing based on the paper.
Each slide: title + exactly 3 bullet points.
Language: {{LANGUAGE}} (Output content in this language).

Each bullet must include a citation object with:
- page (number) AND/OR sourceId ("Fig 5" / "Table 2")
- a short snippet (<= 160 chars) copied from the paper for grounding

Return ONLY valid JSON (no markdown, no code fences, no extra text):
{
  "slides": [
    {
      "title": "string",
      "points": [
        {
          "text": "string",
          "citation": {
            "page": number,
            "text": "string",
            "sourceId": "string (optional)"
          }
        }
      ]
    }
  ]
}"#;

/// Extracts the paper's most critical findings.
pub const CLAIM_PROMPT: &str = r#"You are the Claim Extraction Agent. Extract the 5 most critical scientific findings from this paper.
Language: {{LANGUAGE}} (Output content in this language, but keep JSON keys in English).

Return ONLY valid JSON (no markdown, no code fences, no extra text):
{
  "claims": [
    {
      "text": "string",
      "topic": "string"
    }
  ]
}"#;

/// Verifies extracted claims against the paper's full text.
pub const EVIDENCE_CHECKER_PROMPT: &str = r#"You are the Consistency Checker Agent.
I will provide a list of claims. Verify each claim against the paper's full text.
Determine if the claim is "Supported", "Weak" (partially supported/ambiguous), or "Not Found".
Provide an exact excerpt from the paper as evidence and a page number.
Language: {{LANGUAGE}} (Output explanation in this language, keep status/confidence in English).

Claims to check:
{{CLAIMS_JSON}}

Return ONLY valid JSON (no markdown, no code fences, no extra text):
{
  "checks": [
    {
      "claim": "string",
      "status": "Supported" | "Weak" | "Not Found",
      "explanation": "string",
      "confidence": "High" | "Medium" | "Low",
      "citation": {
        "page": number,
        "text": "string"
      }
    }
  ]
}"#;

/// Scans the paper for figures and tables.
pub const FIGURE_TABLE_PROMPT: &str = r#"You are the Evidence Agent. Scan the paper for Figures and Tables.
For each, provide:
1. id (e.g., "Fig 1", "Table 2")
2. type ("figure" or "table")
3. caption (exact text)
4. description (what does it show? 1 sentence)
5. page (integer page number)
6. relevance (why it matters? 1 sentence)
Language: {{LANGUAGE}} (Output content in this language, but keep JSON keys in English).

Limit to the most important 8 items.
Return ONLY valid JSON (no markdown, no code fences, no extra text):
{
  "items": [
    {
      "id": "string",
      "type": "figure" | "table",
      "caption": "string",
      "description": "string",
      "page": number,
      "relevance": "string"
    }
  ]
}"#;

/// Generates researcher-grade insights.
pub const INSIGHTS_PROMPT: &str = r#"You are the Insights Agent for PaperLens.
Goal: generate advanced, researcher-grade insights that create "a-ha" moments.
Language: {{LANGUAGE}} (Output content in this language, but keep JSON keys/enums in English).

Rules:
- Output 8-12 insights.
- Each insight must be concise, dense, and actionable.
- Every insight MUST be grounded with at least one citation (page number or figure/table id).
- If you cannot locate supporting evidence in the paper, mark it as Speculative and explain what to check.
- Do not invent facts, results, or citations.

Input context (may include outline, top claims, and evidence cards) is provided, but the PDF is the source of truth.

Return valid JSON ONLY in this schema:
{
  "items": [
    {
      "id": "INS-1",
      "title": "string",
      "kind": "Alternative Lens" | "Hidden Assumption" | "Cross-Domain Link" | "Scope Boundary" | "Method Transfer" | "Hypothesis" | "Experiment Idea" | "Contradiction/Tension" | "Limitation → Opportunity",
      "insight": "string (2-4 sentences)",
      "whyItMatters": "string (1-2 sentences)",
      "actionableNextStep": "string (concrete step)",
      "confidence": "High" | "Medium" | "Low",
      "grounding": {
        "status": "Grounded",
        "citations": [
          { "page": number, "sourceId": "string (optional)", "text": "string (optional short excerpt)" }
        ]
      }
    }
  ]
}

If not grounded:
"grounding": {
  "status": "Speculative",
  "reason": "string",
  "suggestedWhereToCheck": ["string"]
}"#;

/// Produces a structured podcast plan with a grounded two-speaker transcript.
pub const PODCAST_PROMPT: &str = r#"You are the PaperLens Podcast Producer.
Goal: Create a structured podcast plan about the attached research paper.
Format: JSON matching the schema below.
Language: {{LANGUAGE}}. (Generate the Titles, Summaries, and Transcript strictly in {{LANGUAGE}}).

Structure:
- Title (Catchy, podcast style)
- Estimated Duration (in seconds)
- Segments (Intro, Key Concepts, Methodology, Results, Discussion/Impact)

For each segment:
- Provide start/end seconds (cumulative).
- Summary (1 sentence).
- Citations: STRICTLY GROUNDED. Extract specific citations (page number, exact text snippet, sourceId if figure/table) that support the discussion in this segment.
- Transcript: A dialogue between Speaker A (Host) and Speaker B (Expert) discussing the points.

CRITICAL JSON RULES:
1. Return ONLY valid JSON. No markdown fences.
2. ESCAPE all double quotes inside strings using a backslash (e.g., \"quote\").
3. Ensure no trailing commas.
4. Ensure every property pair is separated by a comma.
5. Do not include any text outside the JSON object.

JSON Schema:
{
  "title": "string",
  "estimatedDurationSeconds": number,
  "segments": [
    {
      "id": "string",
      "title": "string",
      "startSeconds": number,
      "endSeconds": number,
      "summary": "string",
      "citations": [
        { "page": number, "text": "string", "sourceId": "string (optional)" }
      ],
      "transcript": [
        { "speaker": "A", "text": "string" },
        { "speaker": "B", "text": "string" }
      ]
    }
  ]
}"#;
