//! Character-window chunking with overlap.
//!
//! Windows end on the last paragraph break, line break or space found in the
//! second half of the window; otherwise they are cut at the hard limit.

use crate::config::ChunkingConfig;
use crate::document::Document;

const SEPARATORS: &[&[char]] = &[&['\n', '\n'], &['\n'], &[' ']];

/// Splits `text` into trimmed chunks of at most `size` characters.
///
/// Consecutive chunks share up to `overlap` characters. Blank input yields no chunks.
pub fn split_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if size == 0 || chars.is_empty() {
        return Vec::new();
    }
    if chars.len() <= size {
        let t = text.trim();
        return if t.is_empty() {
            Vec::new()
        } else {
            vec![t.to_string()]
        };
    }

    let overlap = overlap.min(size - 1);
    let mut out = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let hard_end = (start + size).min(chars.len());
        let end = if hard_end == chars.len() {
            hard_end
        } else {
            soft_break(&chars, start, hard_end)
        };

        let piece: String = chars[start..end].iter().collect();
        let piece = piece.trim();
        if !piece.is_empty() {
            out.push(piece.to_string());
        }
        if end == chars.len() {
            break;
        }

        let next = end.saturating_sub(overlap);
        start = if next > start { next } else { end };
    }

    out
}

/// Last separator end in `(start + half, hard_end]`, or `hard_end`.
fn soft_break(chars: &[char], start: usize, hard_end: usize) -> usize {
    let min_end = start + (hard_end - start) / 2;
    for sep in SEPARATORS {
        let mut p = hard_end;
        while p >= min_end + sep.len() && p > start {
            if chars[p - sep.len()..p] == **sep {
                return p;
            }
            p -= 1;
        }
    }
    hard_end
}

/// Splits every document into chunk documents.
///
/// Each chunk keeps the parent's name, description and type; its id is
/// `{parent_id}#{n}`.
pub fn chunk_documents(docs: &[Document], cfg: &ChunkingConfig) -> Vec<Document> {
    let mut out = Vec::new();
    for doc in docs {
        for (n, piece) in split_text(&doc.content, cfg.chunk_size, cfg.chunk_overlap)
            .into_iter()
            .enumerate()
        {
            out.push(Document {
                id: format!("{}#{}", doc.id, n),
                name: doc.name.clone(),
                content: piece,
                description: doc.description.clone(),
                doc_type: doc.doc_type,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_text("  hello world \n", 1000, 200), vec!["hello world"]);
        assert!(split_text("   ", 1000, 200).is_empty());
        assert!(split_text("", 1000, 200).is_empty());
    }

    #[test]
    fn long_text_respects_size_and_overlaps() {
        let text = (0..300).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let chunks = split_text(&text, 100, 20);
        assert!(chunks.len() > 1);
        for c in &chunks {
            assert!(c.chars().count() <= 100);
        }
        // Consecutive chunks share text because of the overlap.
        let tail: String = chunks[0].chars().rev().take(8).collect::<Vec<_>>().into_iter().rev().collect();
        assert!(chunks[1].contains(tail.trim()));
        // Nothing is lost at the end.
        assert!(chunks.last().expect("last").ends_with("w299"));
    }

    #[test]
    fn prefers_paragraph_breaks() {
        let para_a = "a".repeat(70);
        let para_b = "b".repeat(70);
        let text = format!("{para_a}\n\n{para_b}");
        let chunks = split_text(&text, 100, 10);
        assert_eq!(chunks[0], para_a);
    }

    #[test]
    fn chunk_ids_and_metadata() {
        let doc = Document::new("42", "Guide", "x ".repeat(800)).with_description("setup");
        let chunks = chunk_documents(&[doc], &ChunkingConfig::default());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, "42#0");
        assert_eq!(chunks[1].id, "42#1");
        assert_eq!(chunks[1].name, "Guide");
        assert_eq!(chunks[1].description.as_deref(), Some("setup"));
    }
}
