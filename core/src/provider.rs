//! Remote content provider access
//!
//! Fetches the chapter list and per-chapter editions from the alquran.cloud
//! JSON API. The [`ContentProvider`] trait is the seam the rest of the crate
//! talks to, so tests can swap in fixed data.

use crate::chapters::ChapterMeta;
use crate::error::QuranError;
use crate::verses::{EditionPair, RawVerse};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

/// Public API root
pub const DEFAULT_BASE_URL: &str = "https://api.alquran.cloud/v1";
/// Canonical Arabic text
pub const DEFAULT_PRIMARY_EDITION: &str = "quran-uthmani";
/// Fateh Muhammad Jalandhry Urdu translation
pub const DEFAULT_TRANSLATION_EDITION: &str = "ur.jalandhry";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of chapter metadata and edition text.
pub trait ContentProvider: Send + Sync {
    /// Fetch metadata for every chapter, ordered by chapter number.
    fn fetch_chapters(&self) -> impl Future<Output = Result<Vec<ChapterMeta>, QuranError>> + Send;

    /// Fetch the full verse sequence of one chapter in one edition.
    fn fetch_edition(
        &self,
        chapter_id: u32,
        edition: &str,
    ) -> impl Future<Output = Result<Vec<RawVerse>, QuranError>> + Send;
}

/// Provider connection settings
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub editions: EditionPair,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            editions: EditionPair::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// === Wire types ===

#[derive(Deserialize)]
struct Envelope<T> {
    code: Option<i64>,
    data: Option<T>,
}

#[derive(Deserialize)]
struct ChapterRecord {
    number: u32,
    name: String,
    #[serde(rename = "englishName")]
    english_name: String,
    #[serde(rename = "numberOfAyahs")]
    number_of_ayahs: u32,
}

#[derive(Deserialize)]
struct SurahEdition {
    ayahs: Option<Vec<AyahRecord>>,
}

#[derive(Deserialize)]
struct AyahRecord {
    #[serde(rename = "numberInSurah")]
    number_in_surah: u32,
    text: String,
}

impl From<ChapterRecord> for ChapterMeta {
    fn from(record: ChapterRecord) -> Self {
        ChapterMeta {
            id: record.number,
            name_simple: record.english_name,
            name_arabic: record.name,
            verse_count: record.number_of_ayahs,
        }
    }
}

/// Decode a `/surah` response body.
pub(crate) fn parse_chapter_list(body: &str) -> Result<Vec<ChapterMeta>, QuranError> {
    let invalid = || QuranError::Provider("Invalid data format for Surah list.".to_string());

    let envelope: Envelope<Vec<ChapterRecord>> = serde_json::from_str(body).map_err(|_| invalid())?;
    let records = envelope.data.ok_or_else(invalid)?;

    Ok(records.into_iter().map(ChapterMeta::from).collect())
}

/// Decode a `/surah/{chapter}/{edition}` response body.
pub(crate) fn parse_edition(body: &str, edition: &str) -> Result<Vec<RawVerse>, QuranError> {
    let invalid = || {
        QuranError::Provider(format!(
            "Received invalid data structure for edition {} from the server.",
            edition
        ))
    };

    let envelope: Envelope<SurahEdition> = serde_json::from_str(body).map_err(|_| invalid())?;
    if envelope.code != Some(200) {
        return Err(invalid());
    }
    let ayahs = envelope.data.and_then(|d| d.ayahs).ok_or_else(invalid)?;

    Ok(ayahs
        .into_iter()
        .map(|a| RawVerse {
            index_in_chapter: a.number_in_surah,
            text: a.text,
        })
        .collect())
}

/// Transport failure while fetching one edition, naming the edition.
fn edition_error(edition: &str, chapter_id: u32, e: reqwest::Error) -> QuranError {
    let cause = QuranError::from(e);
    QuranError::Provider(format!(
        "Failed to fetch edition {} for Surah {}: {}",
        edition, chapter_id, cause
    ))
}

/// [`ContentProvider`] backed by the alquran.cloud HTTP API
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, QuranError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl ContentProvider for HttpProvider {
    async fn fetch_chapters(&self) -> Result<Vec<ChapterMeta>, QuranError> {
        let url = format!("{}/surah", self.base_url);
        tracing::debug!(%url, "fetching chapter list");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(QuranError::Provider("Failed to fetch Surah list.".to_string()));
        }

        let body = response.text().await?;
        parse_chapter_list(&body)
    }

    async fn fetch_edition(&self, chapter_id: u32, edition: &str) -> Result<Vec<RawVerse>, QuranError> {
        let url = format!("{}/surah/{}/{}", self.base_url, chapter_id, edition);
        tracing::debug!(%url, "fetching edition");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| edition_error(edition, chapter_id, e))?;

        if !response.status().is_success() {
            return Err(QuranError::Provider(format!(
                "Failed to fetch edition {} for Surah {}. Status: {}",
                edition,
                chapter_id,
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| edition_error(edition, chapter_id, e))?;
        parse_edition(&body, edition)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chapter_list() {
        let body = r#"{
            "code": 200,
            "status": "OK",
            "data": [
                {"number": 1, "name": "سُورَةُ ٱلْفَاتِحَةِ", "englishName": "Al-Faatiha",
                 "englishNameTranslation": "The Opening", "numberOfAyahs": 7, "revelationType": "Meccan"},
                {"number": 2, "name": "سُورَةُ البَقَرَةِ", "englishName": "Al-Baqara",
                 "englishNameTranslation": "The Cow", "numberOfAyahs": 286, "revelationType": "Medinan"}
            ]
        }"#;

        let chapters = parse_chapter_list(body).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].id, 2);
        assert_eq!(chapters[1].name_simple, "Al-Baqara");
        assert_eq!(chapters[1].verse_count, 286);
        assert_eq!(chapters[0].name_arabic, "سُورَةُ ٱلْفَاتِحَةِ");
    }

    #[test]
    fn test_chapter_list_without_data_is_provider_error() {
        let err = parse_chapter_list(r#"{"code": 200, "status": "OK"}"#).unwrap_err();
        assert_eq!(err, QuranError::Provider("Invalid data format for Surah list.".to_string()));
    }

    #[test]
    fn test_chapter_record_missing_field_is_provider_error() {
        let body = r#"{"code": 200, "data": [{"number": 1, "name": "x", "numberOfAyahs": 7}]}"#;
        assert!(matches!(parse_chapter_list(body), Err(QuranError::Provider(_))));
    }

    #[test]
    fn test_parse_edition() {
        let body = r#"{
            "code": 200,
            "status": "OK",
            "data": {
                "number": 112,
                "ayahs": [
                    {"number": 6222, "text": "first", "numberInSurah": 1, "juz": 30},
                    {"number": 6223, "text": "second", "numberInSurah": 2, "juz": 30}
                ]
            }
        }"#;

        let verses = parse_edition(body, "quran-uthmani").unwrap();
        assert_eq!(
            verses,
            vec![
                RawVerse { index_in_chapter: 1, text: "first".to_string() },
                RawVerse { index_in_chapter: 2, text: "second".to_string() },
            ]
        );
    }

    #[test]
    fn test_edition_errors_name_the_edition() {
        let missing_ayahs = r#"{"code": 200, "data": {"number": 1}}"#;
        let bad_code = r#"{"code": 404, "data": {"ayahs": []}}"#;

        for body in [missing_ayahs, bad_code, "not json"] {
            match parse_edition(body, "ur.jalandhry") {
                Err(QuranError::Provider(msg)) => assert!(msg.contains("ur.jalandhry"), "{}", msg),
                other => panic!("expected provider error, got {:?}", other),
            }
        }
    }

    /// Server that answers every request with a body shorter than its Content-Length.
    fn truncating_server() -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 500\r\n\r\n{\"code\": 200");
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_body_read_failure_names_edition() {
        let config = ProviderConfig {
            base_url: truncating_server(),
            timeout: Duration::from_secs(5),
            ..ProviderConfig::default()
        };
        let provider = HttpProvider::new(&config).unwrap();

        match provider.fetch_edition(2, "ur.jalandhry").await {
            Err(QuranError::Provider(msg)) => {
                assert!(msg.starts_with("Failed to fetch edition ur.jalandhry for Surah 2"), "{}", msg)
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_names_edition() {
        // Accepted by the kernel backlog, never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let config = ProviderConfig {
            base_url: format!("http://{}", listener.local_addr().unwrap()),
            timeout: Duration::from_millis(100),
            ..ProviderConfig::default()
        };
        let provider = HttpProvider::new(&config).unwrap();

        match provider.fetch_edition(1, "quran-uthmani").await {
            Err(QuranError::Provider(msg)) => {
                assert!(msg.contains("edition quran-uthmani"), "{}", msg);
                assert!(msg.contains("timed out"), "{}", msg);
            }
            other => panic!("expected provider error, got {:?}", other),
        }
        drop(listener);
    }

    #[test]
    fn test_default_config() {
        let config = ProviderConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.editions.primary, DEFAULT_PRIMARY_EDITION);
        assert_eq!(config.editions.translation, DEFAULT_TRANSLATION_EDITION);
    }
}
