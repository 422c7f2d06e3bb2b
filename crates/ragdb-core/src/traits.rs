use crate::types::{DocumentId, DocumentInfo, Passage};
use async_trait::async_trait;

/// Maps text to a fixed-dimension float vector. The same instance is
/// used for ingested passages and incoming queries, so the dimension
/// contract holds by construction.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;

    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut vecs = self.embed_batch(&[text.to_string()]).await?;
        anyhow::ensure!(!vecs.is_empty(), "embedder returned no vector");
        Ok(vecs.remove(0))
    }
}

/// Turns an assembled prompt into prose. Single request/response; any
/// failure (including timeout) is fatal to the current query and is not
/// retried here.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> anyhow::Result<String>;
}

/// Durable home of documents and their passages. The index is derived
/// from this store and can always be reconstructed from it.
pub trait PassageStore: Send + Sync {
    fn insert_document(&self, doc: DocumentInfo) -> anyhow::Result<()>;
    fn mark_processed(&self, document_id: &str, total_passages: usize) -> anyhow::Result<()>;
    fn remove_document(&self, document_id: &str) -> anyhow::Result<()>;
    fn documents(&self) -> anyhow::Result<Vec<DocumentInfo>>;

    fn insert_passages(&self, passages: Vec<Passage>) -> anyhow::Result<()>;
    /// All passages that carry a non-empty embedding, in stable store order.
    fn list_embedded_passages(&self) -> anyhow::Result<Vec<Passage>>;
    fn passages_for(&self, document_id: &DocumentId) -> anyhow::Result<Vec<Passage>>;
    /// Cascade-deletes the document's passages; returns how many were removed.
    fn delete_passages_by_document(&self, document_id: &DocumentId) -> anyhow::Result<usize>;
}
