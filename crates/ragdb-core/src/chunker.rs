//! Splits extracted document text into passages for embedding.
//!
//! Paragraphs are packed whole while they fit the character budget;
//! oversized paragraphs fall back to a word window with overlap so that
//! no sentence boundary context is lost between adjacent passages.

#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self { max_chars: 1000, overlap_chars: 150 }
    }
}

#[derive(Default)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Splits `text` into chunks of at most `max_chars` characters
    /// (except for single words longer than the budget). Returns an
    /// empty vec for blank input.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut buffer = String::new();

        for paragraph in text.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            if paragraph.chars().count() > self.config.max_chars {
                if !buffer.is_empty() {
                    chunks.push(std::mem::take(&mut buffer));
                }
                chunks.extend(self.split_long_paragraph(paragraph));
                continue;
            }
            let joined_len = buffer.chars().count() + 2 + paragraph.chars().count();
            if !buffer.is_empty() && joined_len > self.config.max_chars {
                chunks.push(std::mem::take(&mut buffer));
            }
            if buffer.is_empty() {
                buffer.push_str(paragraph);
            } else {
                buffer.push_str("\n\n");
                buffer.push_str(paragraph);
            }
        }
        if !buffer.is_empty() {
            chunks.push(buffer);
        }
        chunks
    }

    /// Word-window split for a paragraph above the budget. Each window
    /// starts with the trailing `overlap_chars` worth of words from the
    /// previous window.
    fn split_long_paragraph(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0usize;

        for word in words {
            let word_len = word.chars().count();
            if !current.is_empty() && current_len + 1 + word_len > self.config.max_chars {
                chunks.push(current.join(" "));
                let carry = Self::tail_words(&current, self.config.overlap_chars);
                current = carry;
                current_len = current.iter().map(|w| w.chars().count() + 1).sum::<usize>();
            }
            current_len += if current.is_empty() { word_len } else { word_len + 1 };
            current.push(word);
        }
        if !current.is_empty() {
            chunks.push(current.join(" "));
        }
        chunks
    }

    /// Last words of `words` totaling at most `budget` characters.
    fn tail_words<'a>(words: &[&'a str], budget: usize) -> Vec<&'a str> {
        let mut taken = Vec::new();
        let mut len = 0usize;
        for word in words.iter().rev() {
            let word_len = word.chars().count() + 1;
            if len + word_len > budget {
                break;
            }
            len += word_len;
            taken.push(*word);
        }
        taken.reverse();
        taken
    }
}
