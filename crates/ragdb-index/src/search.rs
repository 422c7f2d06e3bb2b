//! Similarity search over the shared index.

use ragdb_core::types::{DocumentId, RetrievalResult};

use crate::sync::SharedIndex;

/// Matches farther than this distance are treated as noise, not hits.
pub const MAX_DISTANCE: f32 = 2.0;

/// Over-fetch multiplier compensating for post-search filtering.
const OVERFETCH: usize = 3;

pub struct Retriever {
    slot: SharedIndex,
}

impl Retriever {
    pub fn new(slot: SharedIndex) -> Self {
        Self { slot }
    }

    /// Exact nearest-neighbor search with scope and quality filtering.
    /// Read-only and side-effect-free; an empty or absent index yields
    /// an empty vec, never an error.
    pub fn search(
        &self,
        query_vector: &[f32],
        top_k: usize,
        document_scope: Option<&[DocumentId]>,
    ) -> Vec<RetrievalResult> {
        let slot = self.slot.read();
        let Some(index) = slot.as_ref() else {
            return Vec::new();
        };
        if index.live_count() == 0 {
            return Vec::new();
        }

        let k = (top_k * OVERFETCH).min(index.row_count());
        let mut results = Vec::new();
        for (distance, row) in index.nearest(query_vector, k) {
            // Dead slots from prunes resolve to nothing and are skipped.
            let Some((id, meta)) = index.resolve(row) else {
                continue;
            };
            if let Some(scope) = document_scope {
                if !scope.is_empty() && !scope.contains(&meta.document_id) {
                    continue;
                }
            }
            if distance > MAX_DISTANCE {
                continue;
            }
            let similarity = 1.0 / (1.0 + distance);
            results.push(RetrievalResult {
                passage_id: id.clone(),
                document_id: meta.document_id.clone(),
                document_name: meta.document_name.clone(),
                text: meta.text.clone(),
                similarity,
                distance,
            });
        }

        // Stable sort: equal similarities keep ascending-distance order.
        results.sort_by(|a, b| {
            b.similarity.partial_cmp(&a.similarity).unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);
        results
    }
}
