//! Error types for the library layer.

use std::fmt;

use crate::db::DbError;

/// Errors produced by the library layer: archive access, the draw store,
/// and caller input that failed validation.
#[derive(Debug)]
pub enum StalottoError {
    /// An error from the archive client.
    Archive(stalotto_archive::Error),
    /// A store operation failed (connection, statement or constraint).
    Db(DbError),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for StalottoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive(e) => write!(f, "Archive error: {}", e),
            Self::Db(e) => write!(f, "Store error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for StalottoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Archive(e) => Some(e),
            Self::Db(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<stalotto_archive::Error> for StalottoError {
    fn from(e: stalotto_archive::Error) -> Self {
        Self::Archive(e)
    }
}

impl From<DbError> for StalottoError {
    fn from(e: DbError) -> Self {
        Self::Db(e)
    }
}
