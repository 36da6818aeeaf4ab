//! Free-text verse reference parsing
//!
//! Accepted shapes, tried in this order:
//! 1. `2:255` or `2:255-257`
//! 2. `Al-Baqara 255` or `Al-Baqara 255-257`
//! 3. `2 255` or `2 255-257`
//!
//! The words "surah", "ayah" and "ayat" may appear anywhere and are ignored.

use crate::chapters::{find_by_name, ChapterMeta};
use crate::error::QuranError;
use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const INVALID_FORMAT: &str = r#"Invalid input format. Use "Surah Name Ayah", "2:4", or "2 4-6"."#;

const NOISE_WORDS: [&str; 3] = ["surah", "ayat", "ayah"];

/// A chapter and an inclusive verse span within it.
///
/// Bounds are checked against chapter metadata by
/// [`validate_range`](crate::validate::validate_range), not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRange {
    pub chapter_id: u32,
    pub from: u32,
    pub to: u32,
}

struct Patterns {
    colon: Regex,
    named: Regex,
    numeric: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        colon: Regex::new(r"^(\d+):(\d+)(?:-(\d+))?$").expect("colon pattern"),
        named: Regex::new(r"^([a-z\d\s-]+[a-z])\s+(\d+)(?:-(\d+))?$").expect("named pattern"),
        numeric: Regex::new(r"^(\d+)\s+(\d+)(?:-(\d+))?$").expect("numeric pattern"),
    })
}

/// Lowercase, drop the noise words and trim.
pub fn normalize_query(raw: &str) -> String {
    let mut query = raw.to_lowercase();
    for word in NOISE_WORDS {
        query = query.replace(word, "");
    }
    query.trim().to_string()
}

fn parse_number(text: &str) -> Result<u32, QuranError> {
    text.parse()
        .map_err(|_| QuranError::Parse(format!("Number \"{}\" is out of range.", text)))
}

/// Verse bounds from capture groups 2 and 3; a missing upper bound means a single verse.
fn verse_bounds(caps: &Captures) -> Result<(u32, u32), QuranError> {
    let from = parse_number(&caps[2])?;
    let to = match caps.get(3) {
        Some(m) => parse_number(m.as_str())?,
        None => from,
    };
    Ok((from, to))
}

/// Parse a user-typed reference into a [`ParsedRange`].
///
/// `chapters` is only consulted when the reference names a chapter.
pub fn parse_query(raw: &str, chapters: &[ChapterMeta]) -> Result<ParsedRange, QuranError> {
    let query = normalize_query(raw);
    let patterns = patterns();

    if let Some(caps) = patterns.colon.captures(&query) {
        let chapter_id = parse_number(&caps[1])?;
        let (from, to) = verse_bounds(&caps)?;
        return Ok(ParsedRange { chapter_id, from, to });
    }

    let caps = patterns
        .named
        .captures(&query)
        .or_else(|| patterns.numeric.captures(&query))
        .ok_or_else(|| QuranError::Parse(INVALID_FORMAT.to_string()))?;

    let identifier = caps[1].trim();
    let (from, to) = verse_bounds(&caps)?;

    let chapter_id = if identifier.bytes().all(|b| b.is_ascii_digit()) {
        parse_number(identifier)?
    } else {
        find_by_name(chapters, identifier)
            .map(|c| c.id)
            .ok_or_else(|| QuranError::Parse(format!("Surah \"{}\" not found.", identifier)))?
    };

    Ok(ParsedRange { chapter_id, from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::sample_chapters;

    fn range(chapter_id: u32, from: u32, to: u32) -> ParsedRange {
        ParsedRange { chapter_id, from, to }
    }

    #[test]
    fn test_colon_form() {
        let chapters = sample_chapters();
        assert_eq!(parse_query("2:255", &chapters).unwrap(), range(2, 255, 255));
        assert_eq!(parse_query("2:255-257", &chapters).unwrap(), range(2, 255, 257));
        assert_eq!(parse_query("  Surah 2:255  ", &chapters).unwrap(), range(2, 255, 255));
    }

    #[test]
    fn test_named_form() {
        let chapters = sample_chapters();
        assert_eq!(parse_query("Al-Baqara 255", &chapters).unwrap(), range(2, 255, 255));
        assert_eq!(parse_query("al baqara 1-5", &chapters).unwrap(), range(2, 1, 5));
        assert_eq!(parse_query("Surah Yaseen Ayah 1-12", &chapters).unwrap(), range(36, 1, 12));
        assert_eq!(parse_query("SURAH AL-IKHLAAS AYAT 1-4", &chapters).unwrap(), range(112, 1, 4));
    }

    #[test]
    fn test_numeric_space_form() {
        let chapters = sample_chapters();
        assert_eq!(parse_query("2 4", &chapters).unwrap(), range(2, 4, 4));
        assert_eq!(parse_query("2   4-6", &chapters).unwrap(), range(2, 4, 6));
        assert_eq!(parse_query("surah 112 ayah 2", &chapters).unwrap(), range(112, 2, 2));
    }

    #[test]
    fn test_numeric_form_needs_no_directory() {
        assert_eq!(parse_query("2:255", &[]).unwrap(), range(2, 255, 255));
        assert_eq!(parse_query("36 1-3", &[]).unwrap(), range(36, 1, 3));
    }

    #[test]
    fn test_whitespace_and_case_do_not_change_result() {
        let chapters = sample_chapters();
        let inputs = [
            ("2:3-4", "\t2:3-4\n"),
            ("Al-Baqara 3-4", "  aL-bAqArA 3-4 "),
            ("2 3-4", " surah 2 ayat 3-4 "),
        ];
        for (plain, noisy) in inputs {
            let a = parse_query(plain, &chapters).unwrap();
            let b = parse_query(noisy, &chapters).unwrap();
            assert_eq!(a, b);
            assert_eq!(a, range(2, 3, 4));
            assert_eq!(parse_query(plain, &chapters).unwrap(), a);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = parse_query("Al-Fil 1", &sample_chapters()).unwrap_err();
        assert_eq!(err, QuranError::Parse("Surah \"al-fil\" not found.".to_string()));
    }

    #[test]
    fn test_unrecognized_input() {
        let chapters = sample_chapters();
        for input in ["", "surah", "2:", ":255", "2:255-", "Al-Baqara", "255 Al-Baqara", "2-3:4"] {
            let err = parse_query(input, &chapters).unwrap_err();
            assert_eq!(err, QuranError::Parse(INVALID_FORMAT.to_string()), "input {:?}", input);
        }
    }

    #[test]
    fn test_oversized_number_is_parse_error() {
        let err = parse_query("2:99999999999", &[]).unwrap_err();
        assert!(matches!(err, QuranError::Parse(_)));
    }

    #[test]
    fn test_reversed_bounds_pass_through() {
        // Ordering is the validator's concern.
        assert_eq!(parse_query("2:7-3", &[]).unwrap(), range(2, 7, 3));
    }
}
