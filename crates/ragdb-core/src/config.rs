//! Lightweight configuration loader.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*`
//! env vars, and provides typed extraction of the engine options.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::env;

use crate::chunker::ChunkerConfig;
use crate::types::DeleteStrategy;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_"));

        Ok(Self { figment })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }
}

/// Engine-level knobs with defaults matching the reference behavior of
/// the query pipeline. Every key is optional in the merged config.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub chunking: ChunkerConfig,
    pub delete_strategy: DeleteStrategy,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            chunking: ChunkerConfig::default(),
            delete_strategy: DeleteStrategy::default(),
        }
    }
}

impl EngineOptions {
    pub fn from_config(cfg: &Config) -> Self {
        let mut opts = Self::default();
        if let Ok(max) = cfg.get::<usize>("engine.chunk.max_chars") {
            opts.chunking.max_chars = max;
        }
        if let Ok(overlap) = cfg.get::<usize>("engine.chunk.overlap_chars") {
            opts.chunking.overlap_chars = overlap;
        }
        if let Ok(strategy) = cfg.get::<DeleteStrategy>("engine.delete.strategy") {
            opts.delete_strategy = strategy;
        }
        opts
    }
}
