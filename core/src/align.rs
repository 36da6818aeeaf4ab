//! Verse-by-verse alignment of two editions

use crate::error::QuranError;
use crate::verses::RawVerse;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedVerse {
    pub number: u32,
    pub arabic_text: String,
    pub translated_text: String,
}

/// Pair the verses `from..=to` of both editions.
///
/// Position `i` is read from offset `i - 1` of each sequence and kept only if
/// both entries exist and both declare themselves verse `i`. Mismatched
/// positions are logged and skipped; a range with nothing left is an error.
pub fn align_verses(
    primary: &[RawVerse],
    translated: &[RawVerse],
    from: u32,
    to: u32,
) -> Result<Vec<AlignedVerse>, QuranError> {
    let mut aligned = Vec::new();

    for number in from..=to {
        let Some(offset) = (number as usize).checked_sub(1) else {
            tracing::warn!(verse = number, "Data integrity error: verse numbers start at 1. Skipping.");
            continue;
        };

        match (primary.get(offset), translated.get(offset)) {
            (Some(p), Some(t)) if p.index_in_chapter == number && t.index_in_chapter == number => {
                aligned.push(AlignedVerse {
                    number,
                    arabic_text: p.text.clone(),
                    translated_text: t.text.clone(),
                });
            }
            _ => {
                tracing::warn!(verse = number, "Data integrity error at ayah {}. Skipping this verse.", number);
            }
        }
    }

    if aligned.is_empty() {
        return Err(QuranError::EmptyResult(
            "No verses were found for the specified range. This might be due to an API data issue.".to_string(),
        ));
    }

    Ok(aligned)
}
