//! Keeps the in-memory index in step with the passage store.
//!
//! Rebuilds construct the replacement index fully off to the side and
//! then swap it in under a brief write lock, so readers either see the
//! old index or the new one, never a half-built mixture. Rebuilds and
//! prunes serialize on a writer gate.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use ragdb_core::traits::PassageStore;

use crate::index::VectorIndex;

/// The process-wide index slot. `None` means "no grounding available":
/// searches short-circuit to empty rather than erroring.
pub type SharedIndex = Arc<RwLock<Option<VectorIndex>>>;

pub fn new_shared_index() -> SharedIndex {
    Arc::new(RwLock::new(None))
}

pub struct IndexSynchronizer {
    slot: SharedIndex,
    write_gate: Mutex<()>,
}

impl IndexSynchronizer {
    pub fn new(slot: SharedIndex) -> Self {
        Self { slot, write_gate: Mutex::new(()) }
    }

    /// Rebuilds the index from every embedded passage in the store and
    /// swaps it into the shared slot. Any failure degrades the slot to
    /// empty and is logged, never propagated: queries then refuse until
    /// the next successful rebuild. Returns the number of indexed
    /// passages.
    pub fn rebuild(&self, store: &dyn PassageStore) -> usize {
        let _gate = self.write_gate.lock();
        let built = store
            .list_embedded_passages()
            .and_then(|passages| VectorIndex::from_passages(&passages));
        match built {
            Ok(Some(index)) => {
                let count = index.live_count();
                *self.slot.write() = Some(index);
                info!(passages = count, "index rebuilt");
                count
            }
            Ok(None) => {
                *self.slot.write() = None;
                info!("no embedded passages in store, index empty");
                0
            }
            Err(e) => {
                *self.slot.write() = None;
                warn!(error = %e, "index rebuild failed, degrading to empty");
                0
            }
        }
    }

    /// Targeted in-place prune after a document deletion. Returns how
    /// many passages were dropped from the live set.
    pub fn prune_document(&self, document_id: &str) -> usize {
        let _gate = self.write_gate.lock();
        let mut slot = self.slot.write();
        match slot.as_mut() {
            Some(index) => {
                let pruned = index.prune_document(document_id);
                info!(document_id, pruned, "pruned document from index");
                pruned
            }
            None => 0,
        }
    }
}
