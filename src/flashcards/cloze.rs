//! Cloze deletion grammar
//!
//! Authored text marks answers as `{{cN::word}}`, where `N` is a positive
//! group number. Every occurrence sharing a group number belongs to the same
//! gradable unit. Anything that does not scan as a complete deletion stays
//! literal text, so parsing never fails.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::Serialize;

use super::errors::{FlashcardError, Result};

const OPEN: &[u8] = b"{{c";
const SEPARATOR: &[u8] = b"::";
const CLOSE: &[u8] = b"}}";

/// A single `{{cN::word}}` occurrence in the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClozeMatch {
    /// Group number `N` (always >= 1)
    pub index: u32,
    /// Answer text between `::` and `}}`, untrimmed
    pub word: String,
    /// Character offsets of the whole occurrence, braces included
    pub span: Range<usize>,
    /// Same occurrence as a byte range, for slicing the source `str`
    #[serde(skip)]
    pub byte_span: Range<usize>,
}

/// Group number -> positions of its occurrences in the match list, in source order
pub type ClozeGroups = BTreeMap<u32, Vec<usize>>;

enum Scan {
    Match {
        index: u32,
        word: Range<usize>,
        end: usize,
    },
    /// Well-formed deletion whose group number is 0 or does not fit a u32
    InvalidGroup { end: usize },
    NoMatch,
}

/// Try to recognize a deletion starting exactly at `start`.
fn scan_at(bytes: &[u8], start: usize) -> Scan {
    let mut pos = start;
    if !bytes[pos..].starts_with(OPEN) {
        return Scan::NoMatch;
    }
    pos += OPEN.len();

    let digits_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == digits_start {
        return Scan::NoMatch;
    }
    let digits = &bytes[digits_start..pos];

    if !bytes[pos..].starts_with(SEPARATOR) {
        return Scan::NoMatch;
    }
    pos += SEPARATOR.len();

    let word_start = pos;
    while pos < bytes.len() && bytes[pos] != b'}' {
        pos += 1;
    }
    if pos == word_start || !bytes[pos..].starts_with(CLOSE) {
        return Scan::NoMatch;
    }
    let word = word_start..pos;
    let end = pos + CLOSE.len();

    let index = std::str::from_utf8(digits)
        .ok()
        .and_then(|d| d.parse::<u32>().ok());
    match index {
        Some(index) if index > 0 => Scan::Match { index, word, end },
        _ => Scan::InvalidGroup { end },
    }
}

/// Extract every valid deletion from `text`, left to right.
///
/// The scanner works on bytes: every delimiter is ASCII and UTF-8
/// continuation bytes never collide with ASCII, so byte spans and words
/// always fall on `char` boundaries. Character offsets are counted along
/// the way.
pub fn parse_cloze(text: &str) -> Vec<ClozeMatch> {
    let bytes = text.as_bytes();
    let mut matches = Vec::new();
    let mut pos = 0;
    let mut chars = 0;

    while pos < bytes.len() {
        match scan_at(bytes, pos) {
            Scan::Match { index, word, end } => {
                let len = text[pos..end].chars().count();
                matches.push(ClozeMatch {
                    index,
                    word: text[word].to_string(),
                    span: chars..chars + len,
                    byte_span: pos..end,
                });
                chars += len;
                pos = end;
            }
            // Consumed as literal text, like any other non-deletion
            Scan::InvalidGroup { end } => {
                chars += text[pos..end].chars().count();
                pos = end;
            }
            Scan::NoMatch => {
                if !is_continuation(bytes[pos]) {
                    chars += 1;
                }
                pos += 1;
            }
        }
    }

    matches
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Sorted, de-duplicated group numbers
pub fn distinct_indices(matches: &[ClozeMatch]) -> Vec<u32> {
    group_matches(matches).into_keys().collect()
}

/// Group occurrences by group number
pub fn group_matches(matches: &[ClozeMatch]) -> ClozeGroups {
    let mut groups = ClozeGroups::new();
    for (position, m) in matches.iter().enumerate() {
        groups.entry(m.index).or_default().push(position);
    }
    groups
}

/// Group number an author should use for a new deletion.
///
/// `None` when the text already uses `u32::MAX`.
pub fn next_cloze_index(matches: &[ClozeMatch]) -> Option<u32> {
    match matches.iter().map(|m| m.index).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Parse `text`, rejecting it when it holds no deletion at all.
///
/// Used when authoring cloze cards: a cloze card without deletions would
/// yield zero practice units.
pub fn require_cloze(text: &str) -> Result<Vec<ClozeMatch>> {
    let matches = parse_cloze(text);
    if matches.is_empty() {
        return Err(FlashcardError::NoClozeFound);
    }
    Ok(matches)
}

/// Wrap the byte range `selection` of `text` in a deletion.
///
/// Uses `group` when given, otherwise the next free group number.
pub fn insert_cloze(text: &str, selection: Range<usize>, group: Option<u32>) -> Result<String> {
    if group == Some(0) {
        return Err(FlashcardError::InvalidGroup(0));
    }
    if selection.start >= selection.end {
        return Err(FlashcardError::InvalidSelection(
            "selection is empty".to_string(),
        ));
    }
    if selection.end > text.len() {
        return Err(FlashcardError::InvalidSelection(format!(
            "selection ends at {} but the text is {} bytes long",
            selection.end,
            text.len()
        )));
    }
    if !text.is_char_boundary(selection.start) || !text.is_char_boundary(selection.end) {
        return Err(FlashcardError::InvalidSelection(
            "selection splits a character".to_string(),
        ));
    }

    let selected = &text[selection.clone()];
    if selected.contains('}') {
        return Err(FlashcardError::InvalidSelection(
            "selection contains '}'".to_string(),
        ));
    }

    let matches = parse_cloze(text);
    if matches
        .iter()
        .any(|m| m.byte_span.start < selection.end && selection.start < m.byte_span.end)
    {
        return Err(FlashcardError::InvalidSelection(
            "selection overlaps an existing deletion".to_string(),
        ));
    }

    let index = match group {
        Some(index) => index,
        None => next_cloze_index(&matches).ok_or(FlashcardError::InvalidGroup(u32::MAX))?,
    };
    let updated = format!(
        "{}{{{{c{}::{}}}}}{}",
        &text[..selection.start],
        index,
        selected,
        &text[selection.end..]
    );

    // An unclosed `{{cN::` before the selection would swallow the new deletion
    let inserted = parse_cloze(&updated)
        .iter()
        .any(|m| m.index == index && m.byte_span.start == selection.start);
    if !inserted {
        return Err(FlashcardError::InvalidSelection(
            "selection would not parse as a deletion".to_string(),
        ));
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(text: &str) -> Vec<u32> {
        parse_cloze(text).iter().map(|m| m.index).collect()
    }

    #[test]
    fn test_parse_two_groups() {
        let text = "El {{c1::perro}} corre en el {{c2::parque}}.";
        let matches = parse_cloze(text);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].index, 1);
        assert_eq!(matches[0].word, "perro");
        assert_eq!(&text[matches[0].byte_span.clone()], "{{c1::perro}}");
        assert_eq!(matches[1].index, 2);
        assert_eq!(matches[1].word, "parque");
        assert_eq!(&text[matches[1].byte_span.clone()], "{{c2::parque}}");
        assert_eq!(distinct_indices(&matches), vec![1, 2]);
    }

    #[test]
    fn test_parse_repeated_group() {
        let matches = parse_cloze("{{c1::Hola}}, {{c1::hola}}!");
        assert_eq!(matches.len(), 2);
        assert_eq!(distinct_indices(&matches), vec![1]);

        let groups = group_matches(&matches);
        assert_eq!(groups.get(&1), Some(&vec![0, 1]));
    }

    #[test]
    fn test_parse_no_deletions() {
        assert!(parse_cloze("").is_empty());
        assert!(parse_cloze("plain text").is_empty());
        assert_eq!(require_cloze("plain text"), Err(FlashcardError::NoClozeFound));
    }

    #[test]
    fn test_malformed_deletions_are_literal() {
        assert!(parse_cloze("{{c1::open").is_empty());
        assert!(parse_cloze("{{c1:single}}").is_empty());
        assert!(parse_cloze("{{c::word}}").is_empty());
        assert!(parse_cloze("{{cx::word}}").is_empty());
        assert!(parse_cloze("{{c1::}}").is_empty());
        assert!(parse_cloze("{c1::word}}").is_empty());
        assert!(parse_cloze("{{c1::word}").is_empty());
        assert!(parse_cloze("{{c1::wo}rd}}").is_empty());
        assert!(parse_cloze("{{C1::word}}").is_empty());
    }

    #[test]
    fn test_group_zero_and_overflow_are_skipped() {
        assert!(parse_cloze("{{c0::zero}}").is_empty());
        assert!(parse_cloze("{{c99999999999::big}}").is_empty());
        assert_eq!(indices("{{c0::zero}} {{c3::three}}"), vec![3]);
    }

    #[test]
    fn test_leading_zeros_parse_as_number() {
        assert_eq!(indices("{{c01::a}} {{c1::b}}"), vec![1, 1]);
    }

    #[test]
    fn test_scanning_resumes_after_stray_braces() {
        let text = "{{{c1::a}} and {{c2::b}}}";
        let matches = parse_cloze(text);
        assert_eq!(indices(text), vec![1, 2]);
        assert_eq!(matches[0].span, 1..10);
        assert_eq!(matches[0].byte_span, 1..10);
        assert_eq!(matches[1].word, "b");
    }

    #[test]
    fn test_word_keeps_internal_formatting() {
        let matches = parse_cloze("{{c2:: spaced <b>bold</b> ::colons }}");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].word, " spaced <b>bold</b> ::colons ");
    }

    #[test]
    fn test_multibyte_text() {
        let text = "Ça {{c1::été}} — {{c2::niño}}";
        let matches = parse_cloze(text);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].word, "été");
        assert_eq!(matches[1].word, "niño");
        assert_eq!(&text[matches[1].byte_span.clone()], "{{c2::niño}}");
    }

    #[test]
    fn test_span_counts_characters() {
        let text = "Ça {{c1::été}}";
        let matches = parse_cloze(text);
        assert_eq!(matches[0].span, 3..14);
        assert_eq!(matches[0].byte_span, 4..17);

        let text = "{{c0::ñ}} ü {{c2::año}} x";
        let matches = parse_cloze(text);
        assert_eq!(matches[0].span, 12..23);
        assert_eq!(text.chars().skip(12).take(11).collect::<String>(), "{{c2::año}}");
    }

    #[test]
    fn test_span_serializes_as_characters() {
        let value = serde_json::to_value(&parse_cloze("Ça {{c1::été}}")[0]).unwrap();
        assert_eq!(value["span"]["start"], 3);
        assert_eq!(value["span"]["end"], 14);
        assert!(value.get("byteSpan").is_none());
    }

    #[test]
    fn test_order_is_source_order() {
        assert_eq!(indices("{{c3::c}} {{c1::a}} {{c2::b}} {{c1::d}}"), vec![3, 1, 2, 1]);
        assert_eq!(
            distinct_indices(&parse_cloze("{{c3::c}} {{c1::a}} {{c2::b}} {{c1::d}}")),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_next_cloze_index() {
        assert_eq!(next_cloze_index(&[]), Some(1));
        assert_eq!(next_cloze_index(&parse_cloze("{{c1::a}} {{c4::b}}")), Some(5));
        assert_eq!(next_cloze_index(&parse_cloze("{{c4294967295::a}}")), None);
    }

    #[test]
    fn test_insert_cloze_without_free_group() {
        let text = "{{c4294967295::a}} b";
        assert_eq!(
            insert_cloze(text, 19..20, None),
            Err(FlashcardError::InvalidGroup(u32::MAX))
        );
        // An explicit group still works
        assert_eq!(
            insert_cloze(text, 19..20, Some(1)).unwrap(),
            "{{c4294967295::a}} {{c1::b}}"
        );
    }

    #[test]
    fn test_insert_cloze_after_unclosed_prefix() {
        assert_eq!(
            insert_cloze("{{c2::foo bar", 10..13, None),
            Err(FlashcardError::InvalidSelection(
                "selection would not parse as a deletion".to_string()
            ))
        );
    }

    #[test]
    fn test_insert_cloze_uses_next_group() {
        let text = "El {{c1::perro}} corre en el parque.";
        let start = text.find("parque").unwrap();
        let updated = insert_cloze(text, start..start + "parque".len(), None).unwrap();

        assert_eq!(updated, "El {{c1::perro}} corre en el {{c2::parque}}.");
    }

    #[test]
    fn test_insert_cloze_explicit_group() {
        let updated = insert_cloze("hola hola", 5..9, Some(1)).unwrap();
        assert_eq!(updated, "hola {{c1::hola}}");
    }

    #[test]
    fn test_insert_cloze_rejects_bad_selections() {
        let text = "El {{c1::perro}} corre";
        assert!(matches!(
            insert_cloze(text, 3..3, None),
            Err(FlashcardError::InvalidSelection(_))
        ));
        assert!(matches!(
            insert_cloze(text, 0..100, None),
            Err(FlashcardError::InvalidSelection(_))
        ));
        assert!(matches!(
            insert_cloze(text, 5..10, None),
            Err(FlashcardError::InvalidSelection(_))
        ));
        assert!(matches!(
            insert_cloze("niño", 2..3, None),
            Err(FlashcardError::InvalidSelection(_))
        ));
        assert!(matches!(
            insert_cloze("a}b", 0..3, None),
            Err(FlashcardError::InvalidSelection(_))
        ));
        assert_eq!(insert_cloze("abc", 0..1, Some(0)), Err(FlashcardError::InvalidGroup(0)));
    }
}
