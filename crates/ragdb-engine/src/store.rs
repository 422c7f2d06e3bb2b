//! In-process passage store.
//!
//! Keeps documents and passages in maps behind a mutex. Passages keep
//! their insertion order so index rebuilds see a stable iteration
//! order across runs.

use parking_lot::Mutex;
use std::collections::HashMap;

use ragdb_core::traits::PassageStore;
use ragdb_core::types::{DocumentId, DocumentInfo, Passage};

#[derive(Default)]
struct StoreInner {
    documents: HashMap<DocumentId, DocumentInfo>,
    /// Insertion-ordered; rebuilds iterate this directly.
    passages: Vec<Passage>,
}

#[derive(Default)]
pub struct MemoryPassageStore {
    inner: Mutex<StoreInner>,
}

impl MemoryPassageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PassageStore for MemoryPassageStore {
    fn insert_document(&self, doc: DocumentInfo) -> anyhow::Result<()> {
        self.inner.lock().documents.insert(doc.id.clone(), doc);
        Ok(())
    }

    fn mark_processed(&self, document_id: &str, total_passages: usize) -> anyhow::Result<()> {
        let mut inner = self.inner.lock();
        let doc = inner
            .documents
            .get_mut(document_id)
            .ok_or_else(|| anyhow::anyhow!("unknown document {}", document_id))?;
        doc.total_passages = total_passages;
        doc.processed = true;
        Ok(())
    }

    fn remove_document(&self, document_id: &str) -> anyhow::Result<()> {
        self.inner.lock().documents.remove(document_id);
        Ok(())
    }

    fn documents(&self) -> anyhow::Result<Vec<DocumentInfo>> {
        let mut docs: Vec<DocumentInfo> = self.inner.lock().documents.values().cloned().collect();
        docs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(docs)
    }

    fn insert_passages(&self, mut passages: Vec<Passage>) -> anyhow::Result<()> {
        self.inner.lock().passages.append(&mut passages);
        Ok(())
    }

    fn list_embedded_passages(&self) -> anyhow::Result<Vec<Passage>> {
        Ok(self
            .inner
            .lock()
            .passages
            .iter()
            .filter(|p| !p.embedding.is_empty())
            .cloned()
            .collect())
    }

    fn passages_for(&self, document_id: &DocumentId) -> anyhow::Result<Vec<Passage>> {
        Ok(self
            .inner
            .lock()
            .passages
            .iter()
            .filter(|p| &p.document_id == document_id)
            .cloned()
            .collect())
    }

    fn delete_passages_by_document(&self, document_id: &DocumentId) -> anyhow::Result<usize> {
        let mut inner = self.inner.lock();
        let before = inner.passages.len();
        inner.passages.retain(|p| &p.document_id != document_id);
        Ok(before - inner.passages.len())
    }
}
