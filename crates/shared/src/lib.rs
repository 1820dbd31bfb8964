//! Shared types, errors, and configuration for Stockdesk.
//!
//! This crate provides common types used across all other crates:
//! - Pagination types for list endpoints
//! - Caller roles and JWT claims issued by the identity provider
//! - Configuration management

pub mod auth;
pub mod config;
pub mod jwt;
pub mod types;

pub use auth::{Claims, Role};
pub use config::AppConfig;
pub use jwt::{JwtConfig, JwtError, JwtService};
