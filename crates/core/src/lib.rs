//! Core business logic for Stockdesk.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and state transitions live here.
//!
//! # Modules
//!
//! - `workflow` - Buy/sell request approval workflow, store seam, and queries
//! - `watchlist` - Watchlist validation rules

pub mod watchlist;
pub mod workflow;
