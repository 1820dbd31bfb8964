//! In-process transaction store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use stockdesk_shared::types::PageRequest;
use uuid::Uuid;

use crate::workflow::error::WorkflowError;
use crate::workflow::store::TransactionStore;
use crate::workflow::types::{Transaction, TransactionFilter, WorkflowAction};

/// Transaction store backed by a concurrent hash map.
///
/// Decisions hold the shard write lock between the status check and the
/// write, so concurrent decisions on one record have exactly one winner.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    records: DashMap<Uuid, Transaction>,
}

impl InMemoryTransactionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matching(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        let mut rows: Vec<Transaction> = self
            .records
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, transaction: Transaction) -> Result<Transaction, WorkflowError> {
        match self.records.entry(transaction.id) {
            Entry::Occupied(_) => Err(WorkflowError::Store(format!(
                "duplicate transaction id {}",
                transaction.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(transaction.clone());
                Ok(transaction)
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, WorkflowError> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn decide_if_pending(
        &self,
        id: Uuid,
        action: &WorkflowAction,
    ) -> Result<Option<Transaction>, WorkflowError> {
        let Some(mut record) = self.records.get_mut(&id) else {
            return Ok(None);
        };

        if !record.is_pending() {
            return Ok(None);
        }

        record.apply_decision(action);
        Ok(Some(record.clone()))
    }

    async fn list(
        &self,
        filter: &TransactionFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<Transaction>, WorkflowError> {
        let rows = self.matching(filter);

        let Some(page) = page else {
            return Ok(rows);
        };

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, filter: &TransactionFilter) -> Result<u64, WorkflowError> {
        let count = self
            .records
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
