//! Transaction workflow management for Stockdesk.
//!
//! This module implements the buy/sell request lifecycle: submission,
//! the one-time admin decision (approve or reject), and the read side.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (TransactionStatus, WorkflowAction, ...)
//! - `error` - Workflow-specific error types
//! - `service` - Pure validation and state transition rules
//! - `store` - Persistence seam with compare-and-set decisions
//! - `memory` - In-process store implementation
//! - `engine` - Submit/approve/reject against a store
//! - `query` - Newest-first listing and filtering

pub mod engine;
pub mod error;
pub mod memory;
pub mod query;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod service_props;

pub use engine::TransactionEngine;
pub use error::{ErrorKind, WorkflowError};
pub use memory::InMemoryTransactionStore;
pub use query::TransactionQueryService;
pub use service::{MAX_NAME_LEN, MAX_SYMBOL_LEN, PRICE_SCALE, WorkflowService};
pub use store::TransactionStore;
pub use types::{
    NewTransaction, Transaction, TransactionFilter, TransactionKind, TransactionStatus,
    WorkflowAction,
};
