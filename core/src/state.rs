//! Application state management

use crate::history::{get_settings_db_path, HistoryStore};
use crate::provider::{ContentProvider, HttpProvider, ProviderConfig};
use crate::service::VerseService;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Verse service, history store and the client used for side lookups
pub struct AppState<P = HttpProvider> {
    pub verses: VerseService<P>,
    pub history: HistoryStore,
    pub http: reqwest::Client,
    pub data_dir: PathBuf,
}

impl AppState<HttpProvider> {
    /// Initialize application state
    pub fn new(data_dir: PathBuf, config: &ProviderConfig) -> Result<Self> {
        let provider = HttpProvider::new(config)?;
        let verses = VerseService::new(provider, config.editions.clone());
        Self::with_service(verses, data_dir, config.timeout)
    }
}

impl<P: ContentProvider> AppState<P> {
    /// State around an already-built verse service
    pub fn with_service(verses: VerseService<P>, data_dir: PathBuf, timeout: Duration) -> Result<Self> {
        // Settings database is created on first run
        let history = HistoryStore::open(get_settings_db_path(&data_dir))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            verses,
            history,
            http,
            data_dir,
        })
    }
}
