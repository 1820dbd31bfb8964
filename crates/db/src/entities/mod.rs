//! `SeaORM` entity definitions.

#![allow(missing_docs)]

pub mod prelude;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod users;
pub mod watchlist_items;
