//! Domain types shared by the index, grounding, and engine crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PassageId = String;
pub type DocumentId = String;

/// Maximum number of characters of passage text carried by a citation.
pub const CITATION_TEXT_LIMIT: usize = 300;

/// A chunk of extracted document text together with its embedding.
///
/// Immutable once created at ingestion time; destroyed when the owning
/// document is deleted. Every embedding in a given index has the same
/// dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub id: PassageId,
    pub document_id: DocumentId,
    pub document_name: String,
    pub position: usize,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Metadata record for an ingested document. Owns its passages 1:N.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: DocumentId,
    pub name: String,
    pub total_passages: usize,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
}

impl DocumentInfo {
    pub fn new(id: DocumentId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            total_passages: 0,
            processed: false,
            created_at: Utc::now(),
        }
    }
}

/// Answer style requested by the caller. Selects a prompt style
/// instruction and the retrieval depth; grounding rules are identical
/// across modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Concise,
    Detailed,
    Research,
}

impl QueryMode {
    /// How many passages to retrieve for this mode.
    pub fn top_k(self) -> usize {
        match self {
            QueryMode::Concise => 5,
            QueryMode::Detailed | QueryMode::Research => 8,
        }
    }
}

impl Default for QueryMode {
    fn default() -> Self {
        QueryMode::Detailed
    }
}

/// How the index reacts to a document deletion.
///
/// `Prune` drops the deleted passages' metadata in place and leaves their
/// vectors as dead rows, filtered out after every search: O(deleted) per
/// delete, with inert rows leaked until the next full rebuild. `Rebuild`
/// reconstructs the whole index from the store: O(total) per delete, no
/// dead rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteStrategy {
    Prune,
    Rebuild,
}

impl Default for DeleteStrategy {
    fn default() -> Self {
        DeleteStrategy::Prune
    }
}

/// A single passage surfaced by similarity search. Transient, produced
/// per query. `similarity` is in (0, 1], higher is better; `distance` is
/// the raw search distance it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub passage_id: PassageId,
    pub document_id: DocumentId,
    pub document_name: String,
    pub text: String,
    pub similarity: f32,
    pub distance: f32,
}

/// A source reference attached to a generated answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub passage_id: PassageId,
    pub document_id: DocumentId,
    pub document_name: String,
    pub text: String,
    pub similarity: f32,
}

impl Citation {
    /// Builds a citation from a retrieval result, truncating the passage
    /// text to [`CITATION_TEXT_LIMIT`] characters with an ellipsis marker.
    pub fn from_result(result: &RetrievalResult) -> Self {
        let text = if result.text.chars().count() > CITATION_TEXT_LIMIT {
            let head: String = result.text.chars().take(CITATION_TEXT_LIMIT).collect();
            format!("{}...", head)
        } else {
            result.text.clone()
        };
        Self {
            passage_id: result.passage_id.clone(),
            document_id: result.document_id.clone(),
            document_name: result.document_name.clone(),
            text,
            similarity: result.similarity,
        }
    }
}

/// A grounded question against the ingested corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub mode: QueryMode,
    /// When present, only passages from these documents are eligible.
    #[serde(default)]
    pub document_scope: Option<Vec<DocumentId>>,
}

/// Per-result retrieval detail exposed for debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPassageDebug {
    pub document: String,
    pub similarity: f32,
    pub distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalDebug {
    pub count: usize,
    pub results: Vec<RetrievedPassageDebug>,
}

impl RetrievalDebug {
    pub fn from_results(results: &[RetrievalResult]) -> Self {
        Self {
            count: results.len(),
            results: results
                .iter()
                .map(|r| RetrievedPassageDebug {
                    document: r.document_name.clone(),
                    similarity: r.similarity,
                    distance: r.distance,
                })
                .collect(),
        }
    }
}

/// The full response for a query. A refusal is a valid terminal outcome,
/// not a failure: `refused = true` with faithfulness 0.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub citations: Vec<Citation>,
    pub faithfulness: f32,
    pub refused: bool,
    pub retrieval: RetrievalDebug,
}
