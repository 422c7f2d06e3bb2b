//! Turns retrieval results into a cited, scored answer.

use std::sync::Arc;

use tracing::debug;

use ragdb_core::error::{Error, Result};
use ragdb_core::traits::Generator;
use ragdb_core::types::{Citation, QueryMode, RetrievalResult};

use crate::prompt::build_prompt;

/// Fixed response when retrieval produced nothing to ground on.
pub const REFUSAL_ANSWER: &str = "No relevant information found in the uploaded documents.";

/// Substrings marking an in-text citation or paraphrase marker, matched
/// case-insensitively against the answer.
const CITATION_INDICATORS: [&str; 7] =
    ["[1]", "[2]", "[3]", "[4]", "[5]", "based on", "according to"];

/// Phrases signalling that the generator declined to answer.
const REFUSAL_MARKERS: [&str; 2] = ["cannot answer", "don't have"];

#[derive(Debug, Clone)]
pub struct GroundedAnswer {
    pub answer: String,
    pub citations: Vec<Citation>,
    pub faithfulness: f32,
    pub refused: bool,
}

impl GroundedAnswer {
    fn refusal() -> Self {
        Self {
            answer: REFUSAL_ANSWER.to_string(),
            citations: Vec::new(),
            faithfulness: 0.0,
            refused: true,
        }
    }
}

pub struct GroundingOrchestrator {
    generator: Arc<dyn Generator>,
}

impl GroundingOrchestrator {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    /// Generates a grounded answer for `query` over `results`.
    ///
    /// Empty results short-circuit to a refusal without invoking the
    /// generator at all. A generator failure is fatal to this query and
    /// surfaces as [`Error::Generator`]; it is never retried here.
    pub async fn answer(
        &self,
        query: &str,
        mode: QueryMode,
        results: &[RetrievalResult],
    ) -> Result<GroundedAnswer> {
        if results.is_empty() {
            debug!("no retrieval results, refusing without generation");
            return Ok(GroundedAnswer::refusal());
        }

        let prompt = build_prompt(query, mode, results);
        let answer = self
            .generator
            .complete(&prompt.system, &prompt.user)
            .await
            .map_err(|e| Error::Generator(e.to_string()))?;

        let refused = detect_refusal(&answer);
        let citations: Vec<Citation> = results.iter().map(Citation::from_result).collect();
        let faithfulness = if refused { 0.0 } else { faithfulness_score(&answer, &citations) };

        Ok(GroundedAnswer { answer, citations, faithfulness, refused })
    }
}

/// Heuristic refusal check on the generated text.
pub fn detect_refusal(answer: &str) -> bool {
    let lowered = answer.to_lowercase();
    REFUSAL_MARKERS.iter().any(|m| lowered.contains(m))
}

/// Confidence that the answer is supported by its citations: 70% from
/// the average citation similarity, 30% from the presence of any
/// citation indicator in the text, clamped to 1.0.
pub fn faithfulness_score(answer: &str, citations: &[Citation]) -> f32 {
    if citations.is_empty() {
        return 0.0;
    }
    let lowered = answer.to_lowercase();
    let has_indicator = CITATION_INDICATORS.iter().any(|m| lowered.contains(m));
    let avg_similarity =
        citations.iter().map(|c| c.similarity).sum::<f32>() / citations.len() as f32;
    let score = avg_similarity * 0.7 + if has_indicator { 0.3 } else { 0.0 };
    score.min(1.0)
}
