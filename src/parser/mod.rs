//! Entry grammar for rights-holder cells.
//!
//! A cell holds comma-separated tokens of the form
//! `Name (ORG share) [identifier]`. Only the first `(`, the first `)` before any
//! second `(`, and the first `[...]` after that `)` are honoured.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::constants::ENTRY_SEPARATOR;
use crate::types::Entry;

// A share is the first digit run that starts the text or follows whitespace
static SHARE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(\d+)").expect("share pattern compiles"));

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]").expect("identifier pattern compiles"));

/// Parse one raw token. Returns `None` for tokens the grammar rejects:
/// no `(`, no `)` before the next `(`, or an empty name.
pub fn parse_entry(token: &str) -> Option<Entry> {
    let (head, tail) = token.split_once('(')?;

    // Anything from a second '(' on is ignored
    let segment = tail.split_once('(').map_or(tail, |(before, _)| before);
    let (inner, remainder) = segment.split_once(')')?;

    let name = head.trim();
    if name.is_empty() {
        return None;
    }

    let (org, share) = split_org_share(inner);
    let identifier = IDENTIFIER_RE
        .captures(remainder)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Some(Entry {
        name: name.to_string(),
        org: org.to_string(),
        share,
        identifier,
    })
}

/// Split the parenthesised part into organization and share.
/// Without a whitespace-delimited number the whole text is the organization
/// and the share is 0.
fn split_org_share(inner: &str) -> (&str, u32) {
    match SHARE_RE.captures(inner).and_then(|caps| caps.get(1)) {
        Some(digits) => {
            let org = inner[..digits.start()].trim();
            // Digit runs too long for u32 count as absent
            let share = digits.as_str().parse().unwrap_or(0);
            (org, share)
        }
        None => (inner.trim(), 0),
    }
}

/// Parse every token of a cell, dropping the ones the grammar rejects.
/// Returns the entries and the number of non-blank tokens dropped.
pub fn parse_cell(cell: &str) -> (Vec<Entry>, usize) {
    let mut entries = Vec::new();
    let mut dropped = 0usize;
    for token in cell.split(ENTRY_SEPARATOR) {
        if token.trim().is_empty() {
            continue;
        }
        match parse_entry(token) {
            Some(entry) => entries.push(entry),
            None => {
                dropped += 1;
                debug!("parse_cell: dropped token {:?}", token);
            }
        }
    }
    (entries, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, org: &str, share: u32, identifier: &str) -> Entry {
        Entry {
            name: name.to_string(),
            org: org.to_string(),
            share,
            identifier: identifier.to_string(),
        }
    }

    #[test]
    fn test_well_formed_token() {
        assert_eq!(
            parse_entry("Name (ORG 37) [I-123]"),
            Some(entry("Name", "ORG", 37, "I-123"))
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(
            parse_entry("   Jane Doe   (  GEMA 25 ) [ 42 ]  "),
            Some(entry("Jane Doe", "GEMA", 25, " 42 "))
        );
    }

    #[test]
    fn test_missing_identifier_is_empty() {
        assert_eq!(parse_entry("Bob (BMI 40)"), Some(entry("Bob", "BMI", 40, "")));
    }

    #[test]
    fn test_missing_share_defaults_to_zero() {
        assert_eq!(parse_entry("Bob (BMI) [9]"), Some(entry("Bob", "BMI", 0, "9")));
        assert_eq!(parse_entry("Bob ()"), Some(entry("Bob", "", 0, "")));
    }

    #[test]
    fn test_digits_glued_to_org_are_not_a_share() {
        assert_eq!(parse_entry("Bob (PRS2 ) [1]"), Some(entry("Bob", "PRS2", 0, "1")));
    }

    #[test]
    fn test_share_with_suffix() {
        assert_eq!(
            parse_entry("Bob (SOCAN 12.5%)"),
            Some(entry("Bob", "SOCAN", 12, ""))
        );
    }

    #[test]
    fn test_multi_word_org() {
        assert_eq!(
            parse_entry("Eve (Sound Exchange 15) [77]"),
            Some(entry("Eve", "Sound Exchange", 15, "77"))
        );
    }

    #[test]
    fn test_share_only() {
        assert_eq!(parse_entry("Eve (50)"), Some(entry("Eve", "", 50, "")));
    }

    #[test]
    fn test_no_open_paren_is_rejected() {
        assert_eq!(parse_entry("Alice ASCAP 50 [1]"), None);
        assert_eq!(parse_entry(""), None);
        assert_eq!(parse_entry("nan"), None);
    }

    #[test]
    fn test_no_close_paren_is_rejected() {
        assert_eq!(parse_entry("Alice (ASCAP 50 [1]"), None);
    }

    #[test]
    fn test_close_paren_after_second_open_is_rejected() {
        assert_eq!(parse_entry("Alice (ASCAP 50 (x) [1]"), None);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert_eq!(parse_entry("  (ASCAP 50) [1]"), None);
    }

    #[test]
    fn test_text_after_second_paren_is_ignored() {
        assert_eq!(
            parse_entry("Alice (ASCAP 50) (BMI 10) [2]"),
            Some(entry("Alice", "ASCAP", 50, ""))
        );
        assert_eq!(
            parse_entry("Alice (ASCAP 50) [1] (BMI 10) [2]"),
            Some(entry("Alice", "ASCAP", 50, "1"))
        );
    }

    #[test]
    fn test_first_bracket_pair_wins() {
        assert_eq!(
            parse_entry("Alice (ASCAP 50) [1] [2]"),
            Some(entry("Alice", "ASCAP", 50, "1"))
        );
    }

    #[test]
    fn test_oversized_share_counts_as_absent() {
        assert_eq!(
            parse_entry("Alice (ASCAP 99999999999)"),
            Some(entry("Alice", "ASCAP", 0, ""))
        );
    }

    #[test]
    fn test_parse_cell_counts_dropped_tokens() {
        let (entries, dropped) =
            parse_cell("Alice (ASCAP 60) [111], Bob (BMI 40) [222], garbage");
        assert_eq!(
            entries,
            vec![
                entry("Alice", "ASCAP", 60, "111"),
                entry("Bob", "BMI", 40, "222")
            ]
        );
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_parse_cell_ignores_blank_tokens() {
        assert_eq!(parse_cell(""), (Vec::new(), 0));
        let (entries, dropped) = parse_cell("Alice (ASCAP 100), ,");
        assert_eq!(entries.len(), 1);
        assert_eq!(dropped, 0);
    }
}
