//! Watchlist error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while editing a watchlist.
#[derive(Debug, Error)]
pub enum WatchlistError {
    /// Symbol missing or blank.
    #[error("Symbol is required")]
    SymbolRequired,

    /// Name missing or blank.
    #[error("Name is required")]
    NameRequired,

    /// Symbol or name longer than its stored column.
    #[error("{field} must be at most {max} characters")]
    FieldTooLong {
        /// The offending field.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },

    /// Symbol already on the list.
    #[error("{0} is already in the watchlist")]
    AlreadyWatched(String),

    /// The owning user does not exist.
    #[error("User {0} not found")]
    UserNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl WatchlistError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::SymbolRequired | Self::NameRequired | Self::FieldTooLong { .. } => 400,
            Self::UserNotFound(_) => 404,
            Self::AlreadyWatched(_) => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::SymbolRequired => "SYMBOL_REQUIRED",
            Self::NameRequired => "NAME_REQUIRED",
            Self::FieldTooLong { .. } => "FIELD_TOO_LONG",
            Self::AlreadyWatched(_) => "ALREADY_WATCHED",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
