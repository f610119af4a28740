//! Keyword retrieval for document Q&A.
//!
//! Documents are cut into passages of at most [`MAX_PASSAGE_WORDS`] words (paragraph
//! boundaries are kept where possible) and scored against the question with TF-IDF:
//! `tf * (ln((N + 1) / (df + 1)) + 1)` summed over the distinct question terms. Equal
//! scores keep document order, so rankings are reproducible.

use std::collections::{HashMap, HashSet};

pub const MAX_PASSAGE_WORDS: usize = 120;
pub const TOP_PASSAGES: usize = 3;

pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn split_passages(text: &str, max_words: usize) -> Vec<String> {
    let max_words = max_words.max(1);
    let mut passages = Vec::new();

    for paragraph in text.split("\n\n") {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        for chunk in words.chunks(max_words) {
            passages.push(chunk.join(" "));
        }
    }
    passages
}

/// Indices of the `top_k` best passages, best first. Falls back to the first `top_k`
/// passages when nothing matches.
pub fn rank_passages(passages: &[String], question: &str, top_k: usize) -> Vec<usize> {
    let query: Vec<String> = {
        let mut seen = HashSet::new();
        tokenize(question)
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect()
    };

    let term_counts: Vec<HashMap<String, usize>> = passages
        .iter()
        .map(|p| {
            let mut counts = HashMap::new();
            for token in tokenize(p) {
                *counts.entry(token).or_insert(0) += 1;
            }
            counts
        })
        .collect();

    let n = passages.len() as f64;
    let idf: HashMap<&str, f64> = query
        .iter()
        .map(|term| {
            let df = term_counts.iter().filter(|c| c.contains_key(term)).count() as f64;
            (term.as_str(), ((n + 1.0) / (df + 1.0)).ln() + 1.0)
        })
        .collect();

    let mut scored: Vec<(usize, f64)> = term_counts
        .iter()
        .enumerate()
        .map(|(index, counts)| {
            let score = query
                .iter()
                .map(|term| {
                    let tf = counts.get(term).copied().unwrap_or(0) as f64;
                    tf * idf[term.as_str()]
                })
                .sum();
            (index, score)
        })
        .filter(|(_, score)| *score > 0.0)
        .collect();

    if scored.is_empty() {
        return (0..passages.len().min(top_k)).collect();
    }

    // stable sort keeps passage order among equal scores
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().take(top_k).map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn tokenize_lowercases_and_drops_punctuation() {
        assert_eq!(tokenize("Deadlock, (mutual-exclusion)!"), vec!["deadlock", "mutual", "exclusion"]);
    }

    #[test]
    fn long_paragraphs_are_chunked() {
        let text = (0..250).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let chunks = split_passages(&text, MAX_PASSAGE_WORDS);
        assert_eq!(chunks.len(), 3);
        assert_eq!(word_count(&chunks[0]), 120);
        assert_eq!(word_count(&chunks[2]), 10);
    }

    #[test]
    fn paragraphs_start_new_passages() {
        let chunks = split_passages("first paragraph\n\nsecond one\n\n\n", 120);
        assert_eq!(chunks, vec!["first paragraph", "second one"]);
    }

    #[test]
    fn rare_terms_outrank_common_ones() {
        let docs = passages(&[
            "the process scheduler picks the next process",
            "a semaphore guards the critical section",
            "the process table lists every process",
        ]);
        let ranked = rank_passages(&docs, "what is a semaphore process", 3);
        assert_eq!(ranked[0], 1);
    }

    #[test]
    fn ties_keep_document_order() {
        let docs = passages(&["paging basics", "unrelated text", "paging basics"]);
        assert_eq!(rank_passages(&docs, "paging", 3), vec![0, 2]);
    }

    #[test]
    fn no_match_falls_back_to_leading_passages() {
        let docs = passages(&["alpha", "beta", "gamma", "delta"]);
        assert_eq!(rank_passages(&docs, "zeta", 3), vec![0, 1, 2]);
    }

    #[test]
    fn empty_document_ranks_nothing() {
        assert!(rank_passages(&[], "anything", 3).is_empty());
    }
}
