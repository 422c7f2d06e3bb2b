use ragdb_core::chunker::{Chunker, ChunkerConfig};
use ragdb_core::types::{Citation, QueryMode, RetrievalResult, CITATION_TEXT_LIMIT};

fn result_with_text(text: &str) -> RetrievalResult {
    RetrievalResult {
        passage_id: "p1".to_string(),
        document_id: "d1".to_string(),
        document_name: "doc.txt".to_string(),
        text: text.to_string(),
        similarity: 0.9,
        distance: 0.1,
    }
}

#[test]
fn short_text_becomes_one_chunk() {
    let chunker = Chunker::default();
    let chunks = chunker.split("Short text");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0], "Short text");
}

#[test]
fn blank_text_yields_no_chunks() {
    let chunker = Chunker::default();
    assert!(chunker.split("").is_empty());
    assert!(chunker.split("  \n\n   \n ").is_empty());
}

#[test]
fn paragraphs_pack_until_budget() {
    let chunker = Chunker::new(ChunkerConfig { max_chars: 40, overlap_chars: 8 });
    let text = "alpha bravo charlie.\n\ndelta echo foxtrot.\n\ngolf hotel india.";
    let chunks = chunker.split(text);
    assert!(chunks.len() >= 2, "three paragraphs cannot fit one 40-char chunk");
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 40, "chunk over budget: {:?}", chunk);
    }
}

#[test]
fn long_paragraph_windows_carry_overlap() {
    let chunker = Chunker::new(ChunkerConfig { max_chars: 60, overlap_chars: 20 });
    let words: Vec<String> = (0..50).map(|i| format!("word{:02}", i)).collect();
    let text = words.join(" ");
    let chunks = chunker.split(&text);
    assert!(chunks.len() > 1);
    for pair in chunks.windows(2) {
        let tail_word = pair[0].split_whitespace().last().expect("nonempty chunk");
        assert!(
            pair[1].contains(tail_word),
            "expected overlap between {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn mode_selects_retrieval_depth() {
    assert_eq!(QueryMode::Concise.top_k(), 5);
    assert_eq!(QueryMode::Detailed.top_k(), 8);
    assert_eq!(QueryMode::Research.top_k(), 8);
}

#[test]
fn citation_keeps_short_text_intact() {
    let citation = Citation::from_result(&result_with_text("short passage"));
    assert_eq!(citation.text, "short passage");
}

#[test]
fn citation_truncates_long_text_with_marker() {
    let long = "x".repeat(CITATION_TEXT_LIMIT + 50);
    let citation = Citation::from_result(&result_with_text(&long));
    assert_eq!(citation.text.chars().count(), CITATION_TEXT_LIMIT + 3);
    assert!(citation.text.ends_with("..."));
}

#[test]
fn query_mode_deserializes_lowercase() {
    let mode: QueryMode = serde_json::from_str("\"research\"").expect("parse mode");
    assert_eq!(mode, QueryMode::Research);
}
