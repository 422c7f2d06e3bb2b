//! ragdb-ground
//!
//! Grounding orchestration: prompt assembly over retrieved passages,
//! the single generator call, refusal detection, and the faithfulness
//! score attached to every answer.

pub mod orchestrator;
pub mod prompt;

pub use orchestrator::{
    detect_refusal, faithfulness_score, GroundedAnswer, GroundingOrchestrator, REFUSAL_ANSWER,
};
pub use prompt::{build_prompt, GroundingPrompt};
