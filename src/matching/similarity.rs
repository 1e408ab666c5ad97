//! Text scoring and span helpers shared by the match strategies.

use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::OnceLock;

fn sentence_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([.!?]+)(?:\s+|$)").expect("valid sentence regex"))
}

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Jaccard similarity of the lower-cased word sets of two strings.
///
/// Returns 1.0 when both are empty and 0.0 when exactly one is.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = word_set(a);
    let b = word_set(b);

    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    intersection as f64 / union as f64
}

/// Significant words of `text`: punctuation stripped, lower-cased, at least
/// `min_len` characters long, first occurrence order, no duplicates.
pub fn keywords(text: &str, min_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| w.chars().count() >= min_len)
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Case-insensitive substring search returning the byte range in `haystack`.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }

    for (start, _) in haystack.char_indices() {
        let mut hay = haystack[start..].char_indices();
        let mut end = start;
        let mut matched = true;

        for n in needle.chars() {
            match hay.next() {
                Some((offset, h)) if h.to_lowercase().eq(n.to_lowercase()) => {
                    end = start + offset + h.len_utf8();
                }
                _ => {
                    matched = false;
                    break;
                }
            }
        }

        if matched {
            return Some(start..end);
        }
    }

    None
}

/// Byte ranges of the sentences in `text`, trimmed of surrounding whitespace.
///
/// A sentence ends at a run of `.`, `!` or `?` followed by whitespace or the
/// end of the text. Trailing text without a terminator is a final sentence.
pub fn sentences(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;

    for caps in sentence_end().captures_iter(text) {
        let (Some(whole), Some(punct)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_trimmed(text, start..punct.end(), &mut ranges);
        start = whole.end();
    }
    if start < text.len() {
        push_trimmed(text, start..text.len(), &mut ranges);
    }

    ranges
}

fn push_trimmed(text: &str, range: Range<usize>, out: &mut Vec<Range<usize>>) {
    let slice = &text[range.clone()];
    let lead = slice.len() - slice.trim_start().len();
    let trail = slice.len() - slice.trim_end().len();
    if lead + trail < slice.len() {
        out.push(range.start + lead..range.end - trail);
    }
}

/// The sentence of a multi-sentence `text` most similar to `target`.
///
/// Returns `None` for single-sentence text or when no sentence shares a
/// word with the target. Ties go to the earlier sentence.
pub fn best_sentence(text: &str, target: &str) -> Option<Range<usize>> {
    let ranges = sentences(text);
    if ranges.len() < 2 {
        return None;
    }

    let mut best: Option<(f64, Range<usize>)> = None;
    for range in ranges {
        let score = similarity(&text[range.clone()], target);
        if score > 0.0 && best.as_ref().map_or(true, |(s, _)| score > *s) {
            best = Some((score, range));
        }
    }
    best.map(|(_, range)| range)
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_identity_and_empty() {
        assert_eq!(similarity("Review super fees", "review SUPER fees"), 1.0);
        assert_eq!(similarity("", "   "), 1.0);
        assert_eq!(similarity("", "text"), 0.0);
        assert_eq!(similarity("text", ""), 0.0);
    }

    #[test]
    fn test_similarity_symmetric() {
        let a = "Review your super fees annually";
        let b = "review fees with your adviser";
        assert_eq!(similarity(a, b), similarity(b, a));
        // {review, your, fees} over 7 distinct words
        assert!((similarity(a, b) - 3.0 / 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_similarity_boundary() {
        // 3 shared of 5 distinct words: exactly 0.6
        let score = similarity("a b c d", "a b c e");
        assert!((score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_keywords() {
        let kws = keywords("Consider maximising your super, super contributions!", 4);
        assert_eq!(kws, vec!["consider", "maximising", "your", "super", "contributions"]);
        assert_eq!(keywords("a an the", 4), Vec::<String>::new());
    }

    #[test]
    fn test_find_ignore_case() {
        let text = "Review super. Check Fees.";
        assert_eq!(find_ignore_case(text, "check fees."), Some(14..25));
        assert_eq!(find_ignore_case(text, "missing"), None);
        assert_eq!(find_ignore_case(text, ""), None);
    }

    #[test]
    fn test_find_ignore_case_multibyte() {
        let text = "Café résumé";
        let range = find_ignore_case(text, "RÉSUMÉ").unwrap();
        assert_eq!(&text[range], "résumé");
    }

    #[test]
    fn test_sentences() {
        let text = "Review super. Check fees!  Call provider";
        let parts: Vec<&str> = sentences(text).into_iter().map(|r| &text[r]).collect();
        assert_eq!(parts, vec!["Review super.", "Check fees!", "Call provider"]);
    }

    #[test]
    fn test_sentences_keeps_decimal_points() {
        let text = "Fees rose 1.5 percent. Review.";
        assert_eq!(sentences(text).len(), 2);
    }

    #[test]
    fn test_best_sentence() {
        let text = "Review super. Check the annual fees. Send statement.";
        let range = best_sentence(text, "check annual fees").unwrap();
        assert_eq!(&text[range], "Check the annual fees.");
        assert_eq!(best_sentence("Only one sentence.", "one"), None);
    }
}
