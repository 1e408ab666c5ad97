//! Pure string edits on paragraph text.

use crate::matching::similarity::{find_ignore_case, sentences, word_count};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

struct Cleanup {
    spaces: Regex,
    space_before_punct: Regex,
    doubled_separator: Regex,
    separator_before_stop: Regex,
    leading_separator: Regex,
    trailing_separator: Regex,
}

fn cleanup() -> &'static Cleanup {
    static RE: OnceLock<Cleanup> = OnceLock::new();
    RE.get_or_init(|| Cleanup {
        spaces: Regex::new(r"\s{2,}").expect("valid regex"),
        space_before_punct: Regex::new(r"\s+([,.;:!?])").expect("valid regex"),
        doubled_separator: Regex::new(r"([,;])(?:\s*[,;])+").expect("valid regex"),
        separator_before_stop: Regex::new(r"[,;]\s*([.!?])").expect("valid regex"),
        leading_separator: Regex::new(r"^[\s,;]+").expect("valid regex"),
        trailing_separator: Regex::new(r"[\s,;]+$").expect("valid regex"),
    })
}

/// Tidy text after a span was cut out of it: single spaces, no space
/// before punctuation, no orphaned commas or semicolons.
pub fn normalize_spacing(text: &str) -> String {
    let re = cleanup();
    let text = re.spaces.replace_all(text, " ");
    let text = re.space_before_punct.replace_all(&text, "$1");
    let text = re.doubled_separator.replace_all(&text, "$1");
    let text = re.separator_before_stop.replace_all(&text, "$1");
    let text = re.leading_separator.replace(&text, "");
    let text = re.trailing_separator.replace(&text, "");
    text.trim().to_string()
}

/// Cut `span` out of `text` and tidy the result.
pub fn remove_span(text: &str, span: Range<usize>) -> String {
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..span.start]);
    out.push(' ');
    out.push_str(&text[span.end..]);
    normalize_spacing(&out)
}

/// Put `replacement` in place of `span`.
pub fn splice(text: &str, span: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..span.start]);
    out.push_str(replacement);
    out.push_str(&text[span.end..]);
    normalize_spacing(&out)
}

/// Whether so little survives a deletion that the whole paragraph should go:
/// fewer than half of the original words remain, or only punctuation does.
pub fn mostly_removed(original: &str, remainder: &str) -> bool {
    if !remainder.chars().any(char::is_alphanumeric) {
        return true;
    }
    word_count(remainder) * 2 < word_count(original)
}

/// Insert a handwritten note into `text`.
///
/// The note goes after the second sentence of longer paragraphs and at the
/// end otherwise. After a closing `.` or `;` it is parenthesised and placed
/// before that punctuation.
pub fn append_note(text: &str, note: &str) -> String {
    let ranges = sentences(text);
    if ranges.is_empty() {
        return note.to_string();
    }

    let at = if ranges.len() > 2 {
        ranges[1].end
    } else {
        text.trim_end().len()
    };
    let (before, after) = text.split_at(at);

    match before.chars().last() {
        Some(punct @ ('.' | ';')) => {
            let stem = &before[..before.len() - punct.len_utf8()];
            format!("{} ({}){}{}", stem, note, punct, after)
        }
        _ => format!("{} {}{}", before, note, after),
    }
}

/// Apply `replacements` (original, replacement) to `text`, ignoring case.
pub fn rewrite(text: &str, replacements: &[(String, String)]) -> String {
    let mut out = text.to_string();
    for (original, replacement) in replacements {
        let mut from = 0;
        while let Some(range) = find_ignore_case(&out[from..], original) {
            let start = from + range.start;
            let end = from + range.end;
            out.replace_range(start..end, replacement);
            from = start + replacement.len();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_sentence() {
        let text = "Review super. Check fees.";
        assert_eq!(remove_span(text, 14..25), "Review super.");
        assert!(!mostly_removed(text, "Review super."));
    }

    #[test]
    fn test_remove_phrase_mid_sentence() {
        let text = "We reviewed your super, insurance, and fees.";
        let start = text.find("insurance").unwrap();
        let out = remove_span(text, start..start + "insurance".len());
        assert_eq!(out, "We reviewed your super, and fees.");
    }

    #[test]
    fn test_remove_trailing_clause() {
        let text = "Keep the account open; close it later.";
        let start = text.find("close").unwrap();
        let out = remove_span(text, start..text.len());
        assert_eq!(out, "Keep the account open");
    }

    #[test]
    fn test_mostly_removed() {
        assert!(mostly_removed("Review your super fees today", "today"));
        assert!(mostly_removed("Fees.", "."));
        assert!(!mostly_removed("one two three four", "one two"));
    }

    #[test]
    fn test_splice() {
        let text = "Review fees annually.";
        let start = text.find("annually").unwrap();
        assert_eq!(
            splice(text, start..start + 8, "quarterly"),
            "Review fees quarterly."
        );
    }

    #[test]
    fn test_append_before_period() {
        assert_eq!(
            append_note("Review super.", "done 3/5"),
            "Review super (done 3/5)."
        );
        assert_eq!(
            append_note("Keep the account;", "confirmed"),
            "Keep the account (confirmed);"
        );
    }

    #[test]
    fn test_append_without_punctuation() {
        assert_eq!(append_note("Review super", "done"), "Review super done");
        assert_eq!(append_note("", "done"), "done");
    }

    #[test]
    fn test_append_after_second_sentence() {
        let out = append_note("One. Two. Three.", "note");
        assert_eq!(out, "One. Two (note). Three.");
    }

    #[test]
    fn test_rewrite() {
        let replacements = vec![("annually".to_string(), "quarterly".to_string())];
        assert_eq!(
            rewrite("Review fees Annually.", &replacements),
            "Review fees quarterly."
        );
    }
}
