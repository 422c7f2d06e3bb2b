//! Flat in-memory vector index.
//!
//! Three parallel structures rebuilt together: a row-major `f32` arena,
//! a row-to-passage-id table, and a passage-id-to-metadata map. The
//! index is derived state; the passage store remains the source of
//! truth and the whole thing can be reconstructed from it at any time.

use std::collections::HashMap;

use ragdb_core::types::{DocumentId, Passage, PassageId};

/// Per-passage metadata kept alongside the vector arena.
#[derive(Debug, Clone, PartialEq)]
pub struct PassageMeta {
    pub document_id: DocumentId,
    pub document_name: String,
    pub position: usize,
    pub text: String,
}

pub struct VectorIndex {
    dim: usize,
    /// Row-major arena, `dim` floats per row.
    vectors: Vec<f32>,
    /// Row -> passage id. A `None` slot is a dead row left behind by a
    /// prune: its vector is still scanned but can never resolve to a
    /// result. Length always equals the arena's row count.
    rows: Vec<Option<PassageId>>,
    metadata: HashMap<PassageId, PassageMeta>,
}

impl VectorIndex {
    /// Builds an index over every passage, in the given order. Returns
    /// `None` when there is nothing to index. Fails if any embedding is
    /// empty or disagrees with the dimension of the first one.
    pub fn from_passages(passages: &[Passage]) -> anyhow::Result<Option<Self>> {
        let embedded: Vec<&Passage> =
            passages.iter().filter(|p| !p.embedding.is_empty()).collect();
        if embedded.is_empty() {
            return Ok(None);
        }

        let dim = embedded[0].embedding.len();
        let mut vectors = Vec::with_capacity(embedded.len() * dim);
        let mut rows = Vec::with_capacity(embedded.len());
        let mut metadata = HashMap::with_capacity(embedded.len());

        for passage in embedded {
            anyhow::ensure!(
                passage.embedding.len() == dim,
                "passage {} has dimension {} but the index is {}-dimensional",
                passage.id,
                passage.embedding.len(),
                dim
            );
            vectors.extend_from_slice(&passage.embedding);
            rows.push(Some(passage.id.clone()));
            metadata.insert(
                passage.id.clone(),
                PassageMeta {
                    document_id: passage.document_id.clone(),
                    document_name: passage.document_name.clone(),
                    position: passage.position,
                    text: passage.text.clone(),
                },
            );
        }

        Ok(Some(Self { dim, vectors, rows, metadata }))
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Total rows in the arena, dead slots included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows that still resolve to a passage.
    pub fn live_count(&self) -> usize {
        self.metadata.len()
    }

    pub fn resolve(&self, row: usize) -> Option<(&PassageId, &PassageMeta)> {
        let id = self.rows.get(row)?.as_ref()?;
        self.metadata.get(id).map(|meta| (id, meta))
    }

    pub fn passage_ids(&self) -> impl Iterator<Item = &PassageId> {
        self.metadata.keys()
    }

    pub fn meta(&self, id: &str) -> Option<&PassageMeta> {
        self.metadata.get(id)
    }

    /// Exact squared-L2 scan. Returns up to `k` `(distance, row)` pairs
    /// in ascending distance order. Squared distance is the flat-index
    /// convention; it is monotonic with true Euclidean distance, so the
    /// downstream threshold and similarity map apply to it directly.
    pub fn nearest(&self, query: &[f32], k: usize) -> Vec<(f32, usize)> {
        if query.len() != self.dim || k == 0 {
            return Vec::new();
        }
        let mut scored: Vec<(f32, usize)> = self
            .vectors
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(row, v)| {
                let d: f32 = v.iter().zip(query).map(|(a, b)| (a - b) * (a - b)).sum();
                (d, row)
            })
            .collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    /// Drops every passage owned by `document_id` from the metadata map
    /// and tombstones its rows. The vectors stay in the arena as dead
    /// rows until the next full rebuild. Returns how many passages were
    /// pruned.
    pub fn prune_document(&mut self, document_id: &str) -> usize {
        let doomed: Vec<PassageId> = self
            .metadata
            .iter()
            .filter(|(_, meta)| meta.document_id == document_id)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &doomed {
            self.metadata.remove(id);
        }
        for slot in self.rows.iter_mut() {
            if slot.as_ref().is_some_and(|id| doomed.contains(id)) {
                *slot = None;
            }
        }
        doomed.len()
    }
}
