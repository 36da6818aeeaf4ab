//! Ayat - Quranic verse lookup
//!
//! Turns a loose reference such as "Al-Baqara 255" or "2:255-257" into a
//! validated verse range, fetches the Arabic text and a translation from the
//! content provider, aligns them verse by verse and returns a display-ready
//! result.

pub mod error;
pub mod chapters;
pub mod provider;
pub mod query;
pub mod validate;
pub mod verses;
pub mod align;
pub mod result;
pub mod service;
pub mod history;
pub mod date;
pub mod state;

pub use error::QuranError;
pub use state::AppState;
pub use chapters::{ChapterDirectory, ChapterMeta};
pub use provider::{ContentProvider, HttpProvider, ProviderConfig};
pub use query::{parse_query, ParsedRange};
pub use validate::validate_range;
pub use verses::{fetch_editions, EditionCache, EditionPair, RawVerse};
pub use align::{align_verses, AlignedVerse};
pub use result::{assemble, range_label, FormattedResult};
pub use service::VerseService;
pub use history::{get_data_dir, get_settings_db_path, HistoryStore};
pub use date::{fetch_hijri_date, fetch_hijri_today};
