//! HTTP embedder against an OpenAI-compatible `/embeddings` endpoint.

use async_trait::async_trait;
use ragdb_core::traits::Embedder;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct RemoteEmbedderConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub dim: usize,
    pub timeout_secs: u64,
}

impl RemoteEmbedderConfig {
    /// Reads `OPENAI_API_KEY` (required) and `OPENAI_BASE_URL`,
    /// `APP_EMBED_MODEL` (optional) from the environment.
    pub fn from_env(dim: usize) -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY not set"))?;
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("APP_EMBED_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self { api_key, base_url, model, dim, timeout_secs: DEFAULT_TIMEOUT_SECS })
    }
}

pub struct RemoteEmbedder {
    client: Client,
    config: RemoteEmbedderConfig,
}

impl RemoteEmbedder {
    pub fn new(config: RemoteEmbedderConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    fn dim(&self) -> usize {
        self.config.dim
    }

    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.config.base_url);
        let body = EmbeddingRequest { model: &self.config.model, input: texts };
        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("embeddings request failed with {}: {}", status, detail);
        }
        let parsed: EmbeddingResponse = response.json().await?;
        anyhow::ensure!(
            parsed.data.len() == texts.len(),
            "embeddings response has {} rows for {} inputs",
            parsed.data.len(),
            texts.len()
        );
        let mut vectors = Vec::with_capacity(parsed.data.len());
        for row in parsed.data {
            anyhow::ensure!(
                row.embedding.len() == self.config.dim,
                "embedding dimension {} does not match configured {}",
                row.embedding.len(),
                self.config.dim
            );
            vectors.push(row.embedding);
        }
        Ok(vectors)
    }
}
