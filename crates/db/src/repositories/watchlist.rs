//! Watchlist repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use stockdesk_core::watchlist::{WatchlistError, WatchlistItem, WatchlistService};
use tracing::info;
use uuid::Uuid;

use crate::entities::{users, watchlist_items};

/// Per-user watchlist storage.
#[derive(Debug, Clone)]
pub struct WatchlistRepository {
    db: DatabaseConnection,
}

fn database_error(err: DbErr) -> WatchlistError {
    WatchlistError::Database(err.to_string())
}

impl WatchlistRepository {
    /// Creates a new watchlist repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a user's watchlist, oldest addition first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<WatchlistItem>, WatchlistError> {
        self.ensure_user(user_id).await?;
        self.items(user_id).await
    }

    /// Adds a symbol and returns the updated list.
    pub async fn add(
        &self,
        user_id: Uuid,
        symbol: &str,
        name: &str,
    ) -> Result<Vec<WatchlistItem>, WatchlistError> {
        self.ensure_user(user_id).await?;

        let existing = self.items(user_id).await?;
        let item = WatchlistService::prepare_add(&existing, symbol, name, Utc::now())?;

        let model = watchlist_items::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            symbol: Set(item.symbol.clone()),
            name: Set(item.name),
            added_at: Set(item.added_at.fixed_offset()),
        };

        // The unique index catches a concurrent add of the same symbol.
        if let Err(err) = model.insert(&self.db).await {
            return Err(match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    WatchlistError::AlreadyWatched(item.symbol)
                }
                _ => database_error(err),
            });
        }

        info!(user_id = %user_id, symbol = %item.symbol, "Symbol added to watchlist");
        self.items(user_id).await
    }

    /// Removes a symbol, case-insensitively, and returns the updated list.
    ///
    /// Removing a symbol that is not on the list is a no-op.
    pub async fn remove(
        &self,
        user_id: Uuid,
        symbol: &str,
    ) -> Result<Vec<WatchlistItem>, WatchlistError> {
        let symbol = WatchlistService::normalize_symbol(symbol)?;
        self.ensure_user(user_id).await?;

        watchlist_items::Entity::delete_many()
            .filter(watchlist_items::Column::UserId.eq(user_id))
            .filter(watchlist_items::Column::Symbol.eq(symbol))
            .exec(&self.db)
            .await
            .map_err(database_error)?;

        self.items(user_id).await
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<(), WatchlistError> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(database_error)?
            .map(|_| ())
            .ok_or(WatchlistError::UserNotFound(user_id))
    }

    async fn items(&self, user_id: Uuid) -> Result<Vec<WatchlistItem>, WatchlistError> {
        let rows = watchlist_items::Entity::find()
            .filter(watchlist_items::Column::UserId.eq(user_id))
            .order_by_asc(watchlist_items::Column::AddedAt)
            .order_by_asc(watchlist_items::Column::Id)
            .all(&self.db)
            .await
            .map_err(database_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
