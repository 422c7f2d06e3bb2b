//! ragdb-llm
//!
//! Generator implementations behind `ragdb_core::traits::Generator`.
//! One HTTP round trip per answer, with an explicit timeout; retry and
//! backoff policy belongs to the caller, not here.

pub mod openai;

pub use openai::{OpenAiGenerator, OpenAiGeneratorConfig};
