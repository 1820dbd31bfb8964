//! Transaction repository backing the workflow store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use stockdesk_core::workflow::{
    Transaction, TransactionFilter, TransactionStore, WorkflowAction, WorkflowError,
};
use stockdesk_shared::types::PageRequest;
use tracing::error;
use uuid::Uuid;

use crate::entities::{
    sea_orm_active_enums::{TransactionStatus, TransactionType},
    transactions,
};

/// SeaORM implementation of [`TransactionStore`].
///
/// Decisions are a single conditional `UPDATE ... WHERE id = ? AND status = 'pending'`;
/// the affected-row count decides which concurrent caller won.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn filtered(filter: &TransactionFilter) -> Select<transactions::Entity> {
        let mut query = transactions::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(TransactionStatus::from(status)));
        }
        if let Some(owner_id) = filter.owner_id {
            query = query.filter(transactions::Column::OwnerId.eq(owner_id));
        }

        query
    }
}

fn store_error(err: DbErr) -> WorkflowError {
    error!(error = %err, "Transaction store operation failed");
    WorkflowError::Store(err.to_string())
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn insert(&self, transaction: Transaction) -> Result<Transaction, WorkflowError> {
        let model = transactions::ActiveModel {
            id: Set(transaction.id),
            owner_id: Set(transaction.owner_id),
            stock_symbol: Set(transaction.stock_symbol),
            stock_name: Set(transaction.stock_name),
            transaction_type: Set(TransactionType::from(transaction.kind)),
            quantity: Set(transaction.quantity),
            unit_price: Set(transaction.unit_price),
            total_amount: Set(transaction.total_amount),
            status: Set(TransactionStatus::from(transaction.status)),
            decided_by: Set(transaction.decided_by),
            rejection_reason: Set(transaction.rejection_reason),
            created_at: Set(transaction.created_at.fixed_offset()),
            updated_at: Set(transaction.updated_at.fixed_offset()),
        };

        let saved = model.insert(&self.db).await.map_err(store_error)?;
        Ok(saved.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, WorkflowError> {
        let found = transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(found.map(Into::into))
    }

    async fn decide_if_pending(
        &self,
        id: Uuid,
        action: &WorkflowAction,
    ) -> Result<Option<Transaction>, WorkflowError> {
        let changes = transactions::ActiveModel {
            status: Set(TransactionStatus::from(action.new_status())),
            decided_by: Set(Some(action.decided_by())),
            rejection_reason: Set(action.rejection_reason().map(ToString::to_string)),
            updated_at: Set(action.decided_at().fixed_offset()),
            ..Default::default()
        };

        let result = transactions::Entity::update_many()
            .set(changes)
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::Status.eq(TransactionStatus::Pending))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn list(
        &self,
        filter: &TransactionFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Transaction>, WorkflowError> {
        let mut query = Self::filtered(filter)
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id);

        if let Some(page) = page {
            query = query.offset(page.offset()).limit(page.limit());
        }

        let rows = query.all(&self.db).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &TransactionFilter) -> Result<u64, WorkflowError> {
        Self::filtered(filter)
            .count(&self.db)
            .await
            .map_err(store_error)
    }
}
