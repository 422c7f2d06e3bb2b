//! ragdb-index
//!
//! In-memory flat vector index plus the synchronizer that keeps it in
//! step with the passage store and the retriever that searches it. The
//! index is never persisted; it is rebuilt from the store on startup
//! and after every membership change.

pub mod index;
pub mod search;
pub mod sync;

pub use index::{PassageMeta, VectorIndex};
pub use search::{Retriever, MAX_DISTANCE};
pub use sync::{new_shared_index, IndexSynchronizer, SharedIndex};
