//! ragdb-embed
//!
//! Embedder implementations behind `ragdb_core::traits::Embedder`: a
//! deterministic hash-based embedder for offline use and tests, and a
//! remote HTTP provider for a hosted embeddings API.

pub mod hash;
pub mod remote;

use std::sync::Arc;

use ragdb_core::traits::Embedder;

pub use hash::HashEmbedder;
pub use remote::{RemoteEmbedder, RemoteEmbedderConfig};

/// Default embedding dimension when no config overrides it.
pub const DEFAULT_DIM: usize = 384;

/// Picks the embedder for this process. `APP_USE_FAKE_EMBEDDINGS=1`
/// forces the hash embedder; otherwise the remote provider is built
/// from the environment.
pub fn get_default_embedder(dim: usize) -> anyhow::Result<Arc<dyn Embedder>> {
    if std::env::var("APP_USE_FAKE_EMBEDDINGS").as_deref() == Ok("1") {
        tracing::info!(dim, "using deterministic hash embedder");
        return Ok(Arc::new(HashEmbedder::new(dim)));
    }
    let config = RemoteEmbedderConfig::from_env(dim)?;
    Ok(Arc::new(RemoteEmbedder::new(config)?))
}
