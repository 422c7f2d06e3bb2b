//! Builds the cited prompt handed to the generator.
//!
//! The grounding rules are invariant: the mode only swaps the style
//! instruction. The citation budget in the system message always equals
//! the number of retrieved passages, so the generator is never invited
//! to cite a source that does not exist.

use ragdb_core::types::{QueryMode, RetrievalResult};

pub struct GroundingPrompt {
    pub system: String,
    pub user: String,
}

fn style_instruction(mode: QueryMode) -> &'static str {
    match mode {
        QueryMode::Concise => "Provide a concise, direct answer in 2-3 sentences.",
        QueryMode::Detailed => "Provide a comprehensive answer with detailed explanation.",
        QueryMode::Research => {
            "Provide an in-depth research-style answer with proper academic \
             structure and extensive citations."
        }
    }
}

pub fn build_prompt(query: &str, mode: QueryMode, results: &[RetrievalResult]) -> GroundingPrompt {
    let num_sources = results.len();

    let context = results
        .iter()
        .enumerate()
        .map(|(idx, r)| format!("[Source {} - {}]\n{}", idx + 1, r.document_name, r.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    let system = format!(
        "You are an assistant answering questions from a set of provided document \
         passages.\n\n\
         CONTENT RULES:\n\
         - Answer exclusively using information from the provided sources.\n\
         - If the information is unavailable, state: \"I don't have information \
         about this in the provided documents.\"\n\
         - Write naturally; do not mention that you were given documents.\n\n\
         CITATIONS:\n\
         - You have access to exactly {num} sources: [1] through [{num}].\n\
         - NEVER use citation numbers higher than [{num}].\n\
         - Place citations immediately after the statement they support, for \
         example: \"The system processes data efficiently [1]\".\n\
         - You may cite the same source multiple times; do not group citations \
         at the end of paragraphs.\n\n\
         STYLE:\n\
         - {style}\n\
         - Use markdown sparingly: **bold** for key terms, headings only for \
         major topic shifts.\n\n\
         Output well-written prose with inline citations [1] to [{num}] embedded \
         naturally in the text.",
        num = num_sources,
        style = style_instruction(mode),
    );

    let user = format!("Context Documents:\n{}\n\nQuestion: {}\n\nAnswer:", context, query);

    GroundingPrompt { system, user }
}
