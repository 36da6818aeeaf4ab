//! Error types for Ayat
//!
//! Every variant carries a message meant to be shown to the user as-is.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuranError {
    /// Input text did not match any accepted reference shape.
    #[error("{0}")]
    Parse(String),

    /// Well-formed reference outside the chapter's bounds.
    #[error("{0}")]
    Validation(String),

    /// Content provider unreachable or returned an unexpected payload.
    #[error("{0}")]
    Provider(String),

    /// The two editions disagree in shape.
    #[error("{0}")]
    Alignment(String),

    /// The requested range produced no usable verses.
    #[error("{0}")]
    EmptyResult(String),

    #[error("{0}")]
    Database(String),
}

impl QuranError {
    /// Whether the user can fix this by editing the query.
    pub fn is_user_error(&self) -> bool {
        matches!(self, QuranError::Parse(_) | QuranError::Validation(_))
    }
}

impl From<reqwest::Error> for QuranError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            QuranError::Provider(format!("Request to content provider timed out: {}", e))
        } else {
            QuranError::Provider(e.to_string())
        }
    }
}

impl From<rusqlite::Error> for QuranError {
    fn from(e: rusqlite::Error) -> Self {
        QuranError::Database(e.to_string())
    }
}

impl serde::Serialize for QuranError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
