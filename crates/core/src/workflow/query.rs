//! Read side of the workflow: owner history and admin review queues.

use std::sync::Arc;

use stockdesk_shared::types::{PageRequest, PageResponse};
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::store::TransactionStore;
use crate::workflow::types::{Transaction, TransactionFilter};

/// Read-only queries over a [`TransactionStore`].
///
/// Every listing is newest-first by `created_at`, ties broken by id.
#[derive(Clone)]
pub struct TransactionQueryService {
    store: Arc<dyn TransactionStore>,
}

impl std::fmt::Debug for TransactionQueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionQueryService")
            .finish_non_exhaustive()
    }
}

impl TransactionQueryService {
    /// Creates a query service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// All transactions submitted by `owner_id`, in any status.
    ///
    /// An owner with no submissions gets an empty list, not an error.
    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Transaction>, WorkflowError> {
        self.store
            .list(&TransactionFilter::for_owner(owner_id), None)
            .await
    }

    /// All transactions matching `filter`.
    pub async fn list_all(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, WorkflowError> {
        self.store.list(filter, None).await
    }

    /// One page of transactions matching `filter`, with totals.
    pub async fn paginate(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Transaction>, WorkflowError> {
        let total = self.store.count(filter).await?;
        let data = self.store.list(filter, Some(page)).await?;
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::engine::TransactionEngine;
    use crate::workflow::memory::InMemoryTransactionStore;
    use crate::workflow::types::{NewTransaction, TransactionKind, TransactionStatus};
    use rust_decimal_macros::dec;

    fn services() -> (TransactionEngine, TransactionQueryService) {
        let store: Arc<dyn TransactionStore> = Arc::new(InMemoryTransactionStore::new());
        (
            TransactionEngine::new(store.clone()),
            TransactionQueryService::new(store),
        )
    }

    fn order(owner_id: Uuid, symbol: &str) -> NewTransaction {
        NewTransaction {
            owner_id,
            stock_symbol: symbol.to_string(),
            stock_name: symbol.to_string(),
            kind: TransactionKind::Sell,
            quantity: 1,
            unit_price: dec!(10),
        }
    }

    #[tokio::test]
    async fn test_owner_without_submissions_gets_empty_list() {
        let (_engine, queries) = services();
        let rows = queries.list_for_owner(Uuid::new_v4()).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_list_for_owner_only_returns_own_records() {
        let (engine, queries) = services();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        engine.submit(order(alice, "AAPL")).await.unwrap();
        engine.submit(order(bob, "MSFT")).await.unwrap();
        engine.submit(order(alice, "NVDA")).await.unwrap();

        let rows = queries.list_for_owner(alice).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|t| t.owner_id == alice));
        assert!(rows[0].created_at >= rows[1].created_at);
    }

    #[tokio::test]
    async fn test_pending_queue_after_one_approval() {
        let (engine, queries) = services();
        let owner = Uuid::new_v4();

        let first = engine.submit(order(owner, "AAPL")).await.unwrap();
        engine.submit(order(owner, "MSFT")).await.unwrap();
        engine.submit(order(owner, "NVDA")).await.unwrap();
        engine.approve(first.id, Uuid::new_v4()).await.unwrap();

        let pending = queries
            .list_all(&TransactionFilter {
                status: Some(TransactionStatus::Pending),
                owner_id: None,
            })
            .await
            .unwrap();

        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|t| t.id != first.id));
        assert!(pending.iter().all(Transaction::is_pending));

        let everything = queries.list_all(&TransactionFilter::default()).await.unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[tokio::test]
    async fn test_paginate_reports_totals() {
        let (engine, queries) = services();
        let owner = Uuid::new_v4();
        for symbol in ["A", "B", "C", "D", "E"] {
            engine.submit(order(owner, symbol)).await.unwrap();
        }

        let page = queries
            .paginate(&TransactionFilter::for_owner(owner), PageRequest::new(2, 2))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.meta.total, 5);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.page, 2);

        let last = queries
            .paginate(&TransactionFilter::for_owner(owner), PageRequest::new(3, 2))
            .await
            .unwrap();
        assert_eq!(last.data.len(), 1);
    }
}
