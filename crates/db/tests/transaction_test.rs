//! Integration tests for the SQL transaction store.

mod common;

use std::sync::Arc;

use rust_decimal_macros::dec;
use stockdesk_core::workflow::{
    NewTransaction, TransactionEngine, TransactionFilter, TransactionKind,
    TransactionQueryService, TransactionStatus, TransactionStore, WorkflowError,
    WorkflowService,
};
use stockdesk_db::TransactionRepository;
use stockdesk_shared::types::PageRequest;
use uuid::Uuid;

fn order(owner_id: Uuid, symbol: &str) -> NewTransaction {
    NewTransaction {
        owner_id,
        stock_symbol: symbol.to_string(),
        stock_name: format!("{symbol} Corp"),
        kind: TransactionKind::Buy,
        quantity: 10,
        unit_price: dec!(150.00),
    }
}

async fn services() -> (TransactionEngine, TransactionQueryService) {
    let store: Arc<dyn TransactionStore> = Arc::new(TransactionRepository::new(common::setup().await));
    (
        TransactionEngine::new(store.clone()),
        TransactionQueryService::new(store),
    )
}

#[tokio::test]
async fn test_insert_and_find_round_trip() {
    let repo = TransactionRepository::new(common::setup().await);
    let tx = WorkflowService::prepare_submission(order(Uuid::new_v4(), "aapl"), chrono::Utc::now())
        .expect("valid submission");

    let saved = repo.insert(tx.clone()).await.expect("insert");
    assert_eq!(saved.id, tx.id);
    assert_eq!(saved.stock_symbol, "AAPL");
    assert_eq!(saved.kind, TransactionKind::Buy);
    assert_eq!(saved.total_amount, dec!(1500));
    assert_eq!(saved.status, TransactionStatus::Pending);

    let found = repo
        .find_by_id(tx.id)
        .await
        .expect("query")
        .expect("record should exist");
    assert_eq!(found, saved);
}

#[tokio::test]
async fn test_find_missing_returns_none() {
    let repo = TransactionRepository::new(common::setup().await);
    let found = repo.find_by_id(Uuid::new_v4()).await.expect("query");
    assert!(found.is_none());
}

#[tokio::test]
async fn test_approve_persists_decision() {
    let (engine, queries) = services().await;
    let admin = Uuid::new_v4();
    let tx = engine.submit(order(Uuid::new_v4(), "msft")).await.expect("submit");

    let approved = engine.approve(tx.id, admin).await.expect("approve");
    assert_eq!(approved.status, TransactionStatus::Approved);
    assert_eq!(approved.decided_by, Some(admin));
    assert_eq!(approved.rejection_reason, None);

    let result = engine.reject(tx.id, admin, "too late").await;
    assert!(matches!(
        result,
        Err(WorkflowError::InvalidTransition {
            from: TransactionStatus::Approved,
            to: TransactionStatus::Rejected,
        })
    ));

    let history = queries.list_for_owner(tx.owner_id).await.expect("list");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, TransactionStatus::Approved);
}

#[tokio::test]
async fn test_reject_persists_reason() {
    let (engine, _queries) = services().await;
    let tx = engine.submit(order(Uuid::new_v4(), "nvda")).await.expect("submit");

    let rejected = engine
        .reject(tx.id, Uuid::new_v4(), "  Exceeds risk limit ")
        .await
        .expect("reject");

    assert_eq!(rejected.status, TransactionStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Exceeds risk limit"));
}

#[tokio::test]
async fn test_decide_if_pending_is_one_shot() {
    let repo = TransactionRepository::new(common::setup().await);
    let tx = WorkflowService::prepare_submission(order(Uuid::new_v4(), "ibm"), chrono::Utc::now())
        .expect("valid submission");
    repo.insert(tx.clone()).await.expect("insert");

    let first = WorkflowService::approve(TransactionStatus::Pending, Uuid::new_v4()).expect("action");
    let second =
        WorkflowService::reject(TransactionStatus::Pending, Uuid::new_v4(), "late").expect("action");

    assert!(repo.decide_if_pending(tx.id, &first).await.expect("update").is_some());
    assert!(repo.decide_if_pending(tx.id, &second).await.expect("update").is_none());
    assert!(
        repo.decide_if_pending(Uuid::new_v4(), &first)
            .await
            .expect("update")
            .is_none()
    );

    let stored = repo.find_by_id(tx.id).await.expect("query").expect("exists");
    assert_eq!(stored.status, TransactionStatus::Approved);
    assert_eq!(stored.rejection_reason, None);
}

#[tokio::test]
async fn test_pending_filter_newest_first() {
    let (engine, queries) = services().await;
    let owner = Uuid::new_v4();

    let first = engine.submit(order(owner, "AAPL")).await.expect("submit");
    let second = engine.submit(order(owner, "MSFT")).await.expect("submit");
    let third = engine.submit(order(owner, "NVDA")).await.expect("submit");
    engine.approve(first.id, Uuid::new_v4()).await.expect("approve");

    let pending = queries
        .list_all(&TransactionFilter {
            status: Some(TransactionStatus::Pending),
            owner_id: None,
        })
        .await
        .expect("list");

    let ids: Vec<Uuid> = pending.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![third.id, second.id]);
}

#[tokio::test]
async fn test_owner_filter_and_pagination() {
    let (engine, queries) = services().await;
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    for symbol in ["A", "B", "C"] {
        engine.submit(order(alice, symbol)).await.expect("submit");
    }
    engine.submit(order(bob, "Z")).await.expect("submit");

    let page = queries
        .paginate(&TransactionFilter::for_owner(alice), PageRequest::new(1, 2))
        .await
        .expect("paginate");
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.total_pages, 2);
    assert!(page.data.iter().all(|t| t.owner_id == alice));

    let empty = queries.list_for_owner(Uuid::new_v4()).await.expect("list");
    assert!(empty.is_empty());
}
