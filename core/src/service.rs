//! Query-to-result pipeline
//!
//! text -> parse -> validate -> fetch both editions -> align -> assemble

use crate::align::align_verses;
use crate::chapters::{ChapterDirectory, ChapterMeta};
use crate::error::QuranError;
use crate::provider::ContentProvider;
use crate::query::{parse_query, ParsedRange};
use crate::result::{assemble, FormattedResult};
use crate::validate::validate_range;
use crate::verses::{fetch_editions, EditionCache, EditionPair};

pub struct VerseService<P> {
    provider: P,
    directory: ChapterDirectory,
    editions: EditionPair,
    edition_cache: EditionCache,
}

impl<P: ContentProvider> VerseService<P> {
    pub fn new(provider: P, editions: EditionPair) -> Self {
        Self::with_directory(provider, ChapterDirectory::new(), editions)
    }

    pub fn with_directory(provider: P, directory: ChapterDirectory, editions: EditionPair) -> Self {
        Self {
            provider,
            directory,
            editions,
            edition_cache: EditionCache::default(),
        }
    }

    pub fn with_edition_cache(mut self, cache: EditionCache) -> Self {
        self.edition_cache = cache;
        self
    }

    pub fn editions(&self) -> &EditionPair {
        &self.editions
    }

    pub fn directory(&self) -> &ChapterDirectory {
        &self.directory
    }

    pub fn edition_cache(&self) -> &EditionCache {
        &self.edition_cache
    }

    pub async fn chapters(&self) -> Result<&[ChapterMeta], QuranError> {
        self.directory.list(&self.provider).await
    }

    /// Parse `query` without fetching any verses.
    pub async fn parse(&self, query: &str) -> Result<ParsedRange, QuranError> {
        let chapters = self.chapters().await?;
        parse_query(query, chapters)
    }

    /// Fetch and align a parsed range.
    pub async fn fetch(&self, range: ParsedRange) -> Result<FormattedResult, QuranError> {
        let chapters = self.chapters().await?;
        let chapter = validate_range(&range, chapters)?;

        let (primary, translated) =
            fetch_editions(&self.provider, &self.edition_cache, range.chapter_id, &self.editions).await?;

        let aligned = align_verses(&primary, &translated, range.from, range.to);

        // A pair with skipped positions is not served from the cache again
        let requested = (range.to - range.from + 1) as usize;
        if aligned.as_ref().map_or(true, |verses| verses.len() < requested) {
            self.edition_cache.evict_pair(range.chapter_id, &self.editions);
        }

        let verses = aligned?;
        Ok(assemble(chapter, range.chapter_id, range.from, range.to, verses))
    }

    /// Run the whole pipeline for a user-typed reference.
    pub async fn lookup(&self, query: &str) -> Result<FormattedResult, QuranError> {
        let range = self.parse(query).await?;
        tracing::debug!(?range, query, "parsed verse reference");
        self.fetch(range).await
    }
}
