//! Watchlist validation rules.

use chrono::{DateTime, Utc};

use crate::watchlist::error::WatchlistError;
use crate::watchlist::types::WatchlistItem;
use crate::workflow::{MAX_NAME_LEN, MAX_SYMBOL_LEN};

/// Stateless watchlist rules.
pub struct WatchlistService;

impl WatchlistService {
    /// Trims and uppercases a symbol.
    pub fn normalize_symbol(symbol: &str) -> Result<String, WatchlistError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(WatchlistError::SymbolRequired);
        }
        let symbol = symbol.to_uppercase();
        if symbol.chars().count() > MAX_SYMBOL_LEN {
            return Err(WatchlistError::FieldTooLong {
                field: "symbol",
                max: MAX_SYMBOL_LEN,
            });
        }
        Ok(symbol)
    }

    /// Validates an addition against the current list and builds the item.
    ///
    /// Duplicates are detected case-insensitively.
    pub fn prepare_add(
        existing: &[WatchlistItem],
        symbol: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<WatchlistItem, WatchlistError> {
        let symbol = Self::normalize_symbol(symbol)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(WatchlistError::NameRequired);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(WatchlistError::FieldTooLong {
                field: "name",
                max: MAX_NAME_LEN,
            });
        }

        if existing.iter().any(|item| item.is_symbol(&symbol)) {
            return Err(WatchlistError::AlreadyWatched(symbol));
        }

        Ok(WatchlistItem {
            symbol,
            name: name.to_string(),
            added_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn item(symbol: &str) -> WatchlistItem {
        WatchlistItem {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            added_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("aapl", "AAPL")]
    #[case("  msft ", "MSFT")]
    #[case("BRK.b", "BRK.B")]
    fn test_normalize_symbol(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(WatchlistService::normalize_symbol(input).unwrap(), expected);
    }

    #[test]
    fn test_blank_symbol_fails() {
        assert!(matches!(
            WatchlistService::normalize_symbol("   "),
            Err(WatchlistError::SymbolRequired)
        ));
    }

    #[test]
    fn test_prepare_add() {
        let now = Utc::now();
        let added = WatchlistService::prepare_add(&[item("MSFT")], "nvda", " Nvidia ", now).unwrap();
        assert_eq!(added.symbol, "NVDA");
        assert_eq!(added.name, "Nvidia");
        assert_eq!(added.added_at, now);
    }

    #[test]
    fn test_prepare_add_requires_name() {
        assert!(matches!(
            WatchlistService::prepare_add(&[], "AAPL", "", Utc::now()),
            Err(WatchlistError::NameRequired)
        ));
    }

    #[test]
    fn test_overlong_fields_fail() {
        let symbol = "X".repeat(MAX_SYMBOL_LEN + 1);
        assert!(matches!(
            WatchlistService::prepare_add(&[], &symbol, "Too long", Utc::now()),
            Err(WatchlistError::FieldTooLong { field: "symbol", .. })
        ));

        let name = "n".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            WatchlistService::prepare_add(&[], "AAPL", &name, Utc::now()),
            Err(WatchlistError::FieldTooLong { field: "name", .. })
        ));

        let at_limit = "X".repeat(MAX_SYMBOL_LEN);
        assert!(WatchlistService::prepare_add(&[], &at_limit, "Edge", Utc::now()).is_ok());
    }

    #[test]
    fn test_duplicate_is_case_insensitive() {
        let result = WatchlistService::prepare_add(&[item("AAPL")], "aapl", "Apple", Utc::now());
        assert!(matches!(
            result,
            Err(WatchlistError::AlreadyWatched(symbol)) if symbol == "AAPL"
        ));
    }
}
