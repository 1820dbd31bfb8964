//! Per-user watchlists of stock symbols.
//!
//! Only the rules live here; persistence is in the db crate.

pub mod error;
pub mod service;
pub mod types;

pub use error::WatchlistError;
pub use service::WatchlistService;
pub use types::WatchlistItem;
