//! Chapter metadata and the process-wide chapter directory

use crate::error::QuranError;
use crate::provider::ContentProvider;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterMeta {
    pub id: u32,
    /// Latin-script name used for lookups, e.g. "Al-Baqara"
    pub name_simple: String,
    /// Original-script name
    pub name_arabic: String,
    pub verse_count: u32,
}

/// Comparison key for chapter names: lowercase, no whitespace or hyphens.
pub fn name_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Find a chapter by its simple name, ignoring case, whitespace and hyphens.
pub fn find_by_name<'a>(chapters: &'a [ChapterMeta], identifier: &str) -> Option<&'a ChapterMeta> {
    let key = name_key(identifier);
    chapters.iter().find(|c| name_key(&c.name_simple) == key)
}

pub fn find_by_id(chapters: &[ChapterMeta], id: u32) -> Option<&ChapterMeta> {
    chapters.iter().find(|c| c.id == id)
}

/// Loads chapter metadata once and keeps it for the life of the instance.
///
/// Concurrent first loads are serialized; a failed load leaves the directory
/// empty so the next call goes back to the provider.
#[derive(Debug, Default)]
pub struct ChapterDirectory {
    chapters: OnceCell<Vec<ChapterMeta>>,
}

impl ChapterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory pre-populated with fixed metadata. Never touches the provider.
    pub fn with_chapters(chapters: Vec<ChapterMeta>) -> Self {
        Self {
            chapters: OnceCell::new_with(Some(chapters)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.chapters.initialized()
    }

    pub async fn list<P: ContentProvider>(&self, provider: &P) -> Result<&[ChapterMeta], QuranError> {
        let chapters = self
            .chapters
            .get_or_try_init(|| async {
                let chapters = provider.fetch_chapters().await?;
                tracing::info!(count = chapters.len(), "loaded chapter directory");
                Ok::<_, QuranError>(chapters)
            })
            .await?;

        Ok(chapters.as_slice())
    }
}
