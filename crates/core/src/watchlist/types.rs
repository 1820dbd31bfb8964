//! Watchlist domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One symbol on a user's watchlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistItem {
    /// Uppercase ticker symbol, unique per user.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// When the symbol was added.
    pub added_at: DateTime<Utc>,
}

impl WatchlistItem {
    /// Case-insensitive symbol comparison.
    #[must_use]
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol.trim())
    }
}
