//! Display-ready lookup result

use crate::align::AlignedVerse;
use crate::chapters::ChapterMeta;
use serde::{Deserialize, Serialize};

/// Separator between the bounds of a range label
pub const RANGE_SEPARATOR: char = '\u{2013}';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedResult {
    pub chapter_name_simple: String,
    pub chapter_name_arabic: String,
    pub chapter_id: u32,
    /// "255" or "1–7"
    pub range_label: String,
    pub verses: Vec<AlignedVerse>,
}

pub fn range_label(from: u32, to: u32) -> String {
    if from == to {
        from.to_string()
    } else {
        format!("{}{}{}", from, RANGE_SEPARATOR, to)
    }
}

pub fn assemble(chapter: &ChapterMeta, chapter_id: u32, from: u32, to: u32, verses: Vec<AlignedVerse>) -> FormattedResult {
    FormattedResult {
        chapter_name_simple: chapter.name_simple.clone(),
        chapter_name_arabic: chapter.name_arabic.clone(),
        chapter_id,
        range_label: range_label(from, to),
        verses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_label() {
        assert_eq!(range_label(255, 255), "255");
        assert_eq!(range_label(1, 7), "1\u{2013}7");
        assert_eq!(range_label(1, 7).as_bytes(), b"1\xE2\x80\x937");
    }

    #[test]
    fn test_assemble() {
        let chapter = ChapterMeta {
            id: 112,
            name_simple: "Al-Ikhlaas".to_string(),
            name_arabic: "سُورَةُ الإِخۡلَاصِ".to_string(),
            verse_count: 4,
        };
        let verses = vec![AlignedVerse {
            number: 1,
            arabic_text: "a".to_string(),
            translated_text: "b".to_string(),
        }];

        let result = assemble(&chapter, 112, 1, 1, verses.clone());
        assert_eq!(result.chapter_name_simple, "Al-Ikhlaas");
        assert_eq!(result.chapter_name_arabic, chapter.name_arabic);
        assert_eq!(result.chapter_id, 112);
        assert_eq!(result.range_label, "1");
        assert_eq!(result.verses, verses);
    }
}
