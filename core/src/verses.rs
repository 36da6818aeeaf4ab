//! Edition fetching with LRU caching of per-chapter verse sequences

use crate::error::QuranError;
use crate::provider::{ContentProvider, DEFAULT_PRIMARY_EDITION, DEFAULT_TRANSLATION_EDITION};
use futures_util::future::join;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Default edition cache capacity (chapter/edition pairs)
pub const DEFAULT_EDITION_CACHE_CAPACITY: usize = 32;

/// One verse as the provider numbers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVerse {
    /// 1-based verse number within the chapter
    pub index_in_chapter: u32,
    pub text: String,
}

/// The original-language edition and the translation shown alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionPair {
    pub primary: String,
    pub translation: String,
}

impl Default for EditionPair {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_EDITION.to_string(),
            translation: DEFAULT_TRANSLATION_EDITION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct EditionKey {
    chapter_id: u32,
    edition: String,
}

/// Chapter editions keyed by (chapter, edition). Only pairs that passed the
/// length check are stored.
pub struct EditionCache {
    cache: Mutex<LruCache<EditionKey, Arc<Vec<RawVerse>>>>,
}

impl EditionCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { cache: Mutex::new(LruCache::new(capacity)) }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<EditionKey, Arc<Vec<RawVerse>>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, chapter_id: u32, edition: &str) -> Option<Arc<Vec<RawVerse>>> {
        let key = EditionKey { chapter_id, edition: edition.to_string() };
        self.lock().get(&key).cloned()
    }

    pub fn insert(&self, chapter_id: u32, edition: &str, verses: Arc<Vec<RawVerse>>) {
        let key = EditionKey { chapter_id, edition: edition.to_string() };
        self.lock().put(key, verses);
    }

    pub fn remove(&self, chapter_id: u32, edition: &str) {
        let key = EditionKey { chapter_id, edition: edition.to_string() };
        self.lock().pop(&key);
    }

    /// Drop both editions of a chapter so the next request goes to the provider.
    pub fn evict_pair(&self, chapter_id: u32, editions: &EditionPair) {
        self.remove(chapter_id, &editions.primary);
        self.remove(chapter_id, &editions.translation);
    }

    /// Cached sequence, or a fresh fetch. Fresh results are not stored here.
    async fn get_or_fetch<P: ContentProvider>(
        &self,
        provider: &P,
        chapter_id: u32,
        edition: &str,
    ) -> Result<(Arc<Vec<RawVerse>>, bool), QuranError> {
        if let Some(verses) = self.get(chapter_id, edition) {
            tracing::debug!(chapter_id, edition, "edition cache hit");
            return Ok((verses, true));
        }

        let verses = provider.fetch_edition(chapter_id, edition).await?;
        Ok((Arc::new(verses), false))
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// (entries, capacity)
    pub fn stats(&self) -> (usize, usize) {
        let cache = self.lock();
        (cache.len(), cache.cap().get())
    }
}

impl Default for EditionCache {
    fn default() -> Self {
        Self::new(DEFAULT_EDITION_CACHE_CAPACITY)
    }
}

/// Fetch both editions of a chapter concurrently.
///
/// Both requests always run to completion. Either failing fails the whole
/// fetch, and sequences of different length are an alignment fault. The
/// cache is only written once the pair has passed the length check.
pub async fn fetch_editions<P: ContentProvider>(
    provider: &P,
    cache: &EditionCache,
    chapter_id: u32,
    editions: &EditionPair,
) -> Result<(Arc<Vec<RawVerse>>, Arc<Vec<RawVerse>>), QuranError> {
    let (primary, translated) = join(
        cache.get_or_fetch(provider, chapter_id, &editions.primary),
        cache.get_or_fetch(provider, chapter_id, &editions.translation),
    )
    .await;

    let (primary, primary_cached) = primary?;
    let (translated, translated_cached) = translated?;

    if primary.len() != translated.len() {
        cache.evict_pair(chapter_id, editions);
        return Err(QuranError::Alignment(format!(
            "Data mismatch: verse count mismatch between {} ({}) and {} ({}) editions.",
            editions.primary,
            primary.len(),
            editions.translation,
            translated.len()
        )));
    }

    if !primary_cached {
        cache.insert(chapter_id, &editions.primary, Arc::clone(&primary));
    }
    if !translated_cached {
        cache.insert(chapter_id, &editions.translation, Arc::clone(&translated));
    }

    Ok((primary, translated))
}
