//! Range validation against chapter metadata

use crate::chapters::{find_by_id, ChapterMeta};
use crate::error::QuranError;
use crate::query::ParsedRange;

/// Check `range` against the chapter it names and return that chapter.
pub fn validate_range<'a>(range: &ParsedRange, chapters: &'a [ChapterMeta]) -> Result<&'a ChapterMeta, QuranError> {
    let chapter = find_by_id(chapters, range.chapter_id)
        .ok_or_else(|| QuranError::Validation("Surah not found.".to_string()))?;

    if range.from < 1 || range.to > chapter.verse_count || range.from > range.to {
        return Err(QuranError::Validation(format!(
            "Invalid ayah range for {}. It has {} verses.",
            chapter.name_simple, chapter.verse_count
        )));
    }

    Ok(chapter)
}
