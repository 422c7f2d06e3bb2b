//! ragdb-engine
//!
//! The service context that owns the shared index slot and wires the
//! passage store, embedder, retriever, and grounding orchestrator into
//! the ingest / delete / query pipeline.

pub mod store;

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use ragdb_core::chunker::Chunker;
use ragdb_core::config::EngineOptions;
use ragdb_core::error::{Error, Result};
use ragdb_core::traits::{Embedder, Generator, PassageStore};
use ragdb_core::types::{
    DeleteStrategy, DocumentId, DocumentInfo, Passage, QueryRequest, QueryResponse, RetrievalDebug,
    RetrievalResult,
};
use ragdb_ground::GroundingOrchestrator;
use ragdb_index::{new_shared_index, IndexSynchronizer, Retriever};

pub use store::MemoryPassageStore;

pub struct RagEngine {
    store: Arc<dyn PassageStore>,
    embedder: Arc<dyn Embedder>,
    orchestrator: GroundingOrchestrator,
    synchronizer: IndexSynchronizer,
    retriever: Retriever,
    chunker: Chunker,
    delete_strategy: DeleteStrategy,
}

impl RagEngine {
    /// Wires the engine and performs the startup rebuild so queries see
    /// whatever the store already holds.
    pub fn new(
        store: Arc<dyn PassageStore>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        options: EngineOptions,
    ) -> Self {
        let slot = new_shared_index();
        let synchronizer = IndexSynchronizer::new(slot.clone());
        let retriever = Retriever::new(slot);
        synchronizer.rebuild(store.as_ref());
        Self {
            store,
            embedder,
            orchestrator: GroundingOrchestrator::new(generator),
            synchronizer,
            retriever,
            chunker: Chunker::new(options.chunking),
            delete_strategy: options.delete_strategy,
        }
    }

    /// Chunks, embeds, and stores a document's text, then rebuilds the
    /// index. A failed ingest removes the partial document record.
    pub async fn ingest(&self, name: &str, text: &str) -> Result<DocumentInfo> {
        if text.trim().is_empty() {
            return Err(Error::Validation("no text could be extracted".to_string()));
        }
        let chunks = self.chunker.split(text);
        if chunks.is_empty() {
            return Err(Error::Validation("document produced no passages".to_string()));
        }

        let mut doc = DocumentInfo::new(Uuid::new_v4().to_string(), name);
        self.store
            .insert_document(doc.clone())
            .map_err(|e| Error::Operation(e.to_string()))?;

        match self.embed_and_store(&doc.id, name, &chunks).await {
            Ok(total) => {
                doc.total_passages = total;
                doc.processed = true;
                self.synchronizer.rebuild(self.store.as_ref());
                info!(document = name, passages = total, "document ingested");
                Ok(doc)
            }
            Err(e) => {
                error!(document = name, error = %e, "ingest failed, removing document record");
                let _ = self.store.delete_passages_by_document(&doc.id);
                let _ = self.store.remove_document(&doc.id);
                Err(Error::Operation(e.to_string()))
            }
        }
    }

    async fn embed_and_store(
        &self,
        document_id: &str,
        document_name: &str,
        chunks: &[String],
    ) -> anyhow::Result<usize> {
        let embeddings = self.embedder.embed_batch(chunks).await?;
        anyhow::ensure!(
            embeddings.len() == chunks.len(),
            "embedder returned {} vectors for {} chunks",
            embeddings.len(),
            chunks.len()
        );
        let passages: Vec<Passage> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(position, (text, embedding))| Passage {
                id: Uuid::new_v4().to_string(),
                document_id: document_id.to_string(),
                document_name: document_name.to_string(),
                position,
                text: text.clone(),
                embedding,
            })
            .collect();
        let total = passages.len();
        self.store.insert_passages(passages)?;
        // Marking processed is part of the commit: if it fails, the
        // caller's cleanup removes the stored passages with the record.
        self.store.mark_processed(document_id, total)?;
        Ok(total)
    }

    /// Cascade-deletes a document from the store, then updates the index
    /// per the configured strategy: a targeted prune of the live set, or
    /// a full rebuild.
    pub fn delete_document(&self, document_id: &DocumentId) -> Result<()> {
        self.store
            .delete_passages_by_document(document_id)
            .map_err(|e| Error::Operation(e.to_string()))?;
        self.store
            .remove_document(document_id)
            .map_err(|e| Error::Operation(e.to_string()))?;
        match self.delete_strategy {
            DeleteStrategy::Prune => {
                self.synchronizer.prune_document(document_id);
            }
            DeleteStrategy::Rebuild => {
                self.synchronizer.rebuild(self.store.as_ref());
            }
        }
        Ok(())
    }

    /// Embeds the query and searches the current index. Read-only; an
    /// empty index yields no results.
    pub async fn retrieve(&self, request: &QueryRequest) -> Result<Vec<RetrievalResult>> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(Error::Validation("query cannot be empty".to_string()));
        }
        let query_vector =
            self.embedder.embed(query).await.map_err(|e| Error::Operation(e.to_string()))?;
        Ok(self.retriever.search(
            &query_vector,
            request.mode.top_k(),
            request.document_scope.as_deref(),
        ))
    }

    /// Full query pipeline: validate, retrieve, ground, score. A refusal
    /// is a well-formed response; only validation and generator failures
    /// surface as errors.
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let results = self.retrieve(request).await?;
        let grounded =
            self.orchestrator.answer(&request.query, request.mode, &results).await?;
        Ok(QueryResponse {
            answer: grounded.answer,
            citations: grounded.citations,
            faithfulness: grounded.faithfulness,
            refused: grounded.refused,
            retrieval: RetrievalDebug::from_results(&results),
        })
    }

    pub fn documents(&self) -> Result<Vec<DocumentInfo>> {
        self.store.documents().map_err(|e| Error::Operation(e.to_string()))
    }

    pub fn passages(&self, document_id: &DocumentId) -> Result<Vec<Passage>> {
        self.store.passages_for(document_id).map_err(|e| Error::Operation(e.to_string()))
    }
}
