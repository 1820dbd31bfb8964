//! Transaction request routes.
//!
//! Owners submit and list their own requests; admins list everything and
//! record the one-time approve/reject decision.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockdesk_core::workflow::{
    NewTransaction, Transaction, TransactionFilter, TransactionKind, TransactionStatus,
    WorkflowError,
};
use stockdesk_shared::types::{PageMeta, PageRequest};
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/user/{user_id}", get(list_user_transactions))
        .route("/transactions/{transaction_id}/approve", put(approve_transaction))
        .route("/transactions/{transaction_id}/reject", put(reject_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for submitting a buy/sell request.
///
/// Missing fields deserialize to blanks so they surface as validation errors.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Ticker symbol, any case.
    #[serde(default)]
    pub stock_symbol: String,
    /// Company name.
    #[serde(default)]
    pub stock_name: String,
    /// `buy` or `sell`.
    #[serde(default)]
    pub transaction_type: String,
    /// Number of shares.
    #[serde(default)]
    pub quantity: i64,
    /// Price per share.
    pub price: Option<Decimal>,
}

/// Request body for rejecting a transaction.
#[derive(Debug, Deserialize)]
pub struct RejectTransactionRequest {
    /// Why the request was rejected.
    #[serde(default, alias = "rejection_reason")]
    pub reason: String,
}

/// Paging parameters for a user's own listing.
#[derive(Debug, Deserialize)]
pub struct OwnerTransactionsQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub per_page: Option<u32>,
}

/// Query parameters for the admin listing.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by owner.
    pub user_id: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub per_page: Option<u32>,
}

/// Transaction as returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Submitting user.
    pub user_id: Uuid,
    /// Uppercase ticker symbol.
    pub stock_symbol: String,
    /// Company name.
    pub stock_name: String,
    /// `buy` or `sell`.
    pub transaction_type: TransactionKind,
    /// Number of shares.
    pub quantity: i64,
    /// Price per share at submission.
    pub price: Decimal,
    /// `quantity * price`.
    pub total_amount: Decimal,
    /// `pending`, `approved` or `rejected`.
    pub status: TransactionStatus,
    /// Admin who decided the request.
    pub decided_by: Option<Uuid>,
    /// Reason given on rejection.
    pub rejection_reason: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            user_id: tx.owner_id,
            stock_symbol: tx.stock_symbol,
            stock_name: tx.stock_name,
            transaction_type: tx.kind,
            quantity: tx.quantity,
            price: tx.unit_price,
            total_amount: tx.total_amount,
            status: tx.status,
            decided_by: tx.decided_by,
            rejection_reason: tx.rejection_reason,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}

/// Response for a single changed transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    /// Human-readable outcome.
    pub message: String,
    /// The record after the change.
    pub transaction: TransactionResponse,
}

/// Response for transaction listings, newest first.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionListResponse {
    /// Number of transactions in this response.
    pub count: usize,
    /// The transactions.
    pub transactions: Vec<TransactionResponse>,
    /// Paging totals, present when a page was requested.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meta: Option<PageMeta>,
}

impl TransactionListResponse {
    fn new(rows: Vec<Transaction>, meta: Option<PageMeta>) -> Self {
        let transactions: Vec<TransactionResponse> = rows.into_iter().map(Into::into).collect();
        Self {
            count: transactions.len(),
            transactions,
            meta,
        }
    }
}

/// A page is only requested when either paging parameter is present.
fn page_request(page: Option<u32>, per_page: Option<u32>) -> Option<PageRequest> {
    if page.is_none() && per_page.is_none() {
        return None;
    }
    let defaults = PageRequest::default();
    Some(PageRequest::new(
        page.unwrap_or(defaults.page),
        per_page.unwrap_or(defaults.per_page),
    ))
}

async fn list_page(
    state: &AppState,
    filter: &TransactionFilter,
    page: Option<PageRequest>,
) -> Result<TransactionListResponse, ApiError> {
    let Some(page) = page else {
        let rows = state.queries.list_all(filter).await?;
        return Ok(TransactionListResponse::new(rows, None));
    };
    let paged = state.queries.paginate(filter, page).await?;
    Ok(TransactionListResponse::new(paged.data, Some(paged.meta)))
}

fn envelope(message: &str, tx: Transaction) -> Json<TransactionEnvelope> {
    Json(TransactionEnvelope {
        message: message.to_string(),
        transaction: tx.into(),
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/transactions` - Submit a buy/sell request for approval.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;

    let kind = TransactionKind::parse(&body.transaction_type)
        .ok_or_else(|| WorkflowError::InvalidKind(body.transaction_type.clone()))?;
    let unit_price = body.price.ok_or(WorkflowError::MissingField("price"))?;

    let tx = state
        .engine
        .submit(NewTransaction {
            owner_id: auth.user_id(),
            stock_symbol: body.stock_symbol,
            stock_name: body.stock_name,
            kind,
            quantity: body.quantity,
            unit_price,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        envelope("Transaction request submitted for approval", tx),
    ))
}

/// GET `/transactions/user/{user_id}` - A user's own requests, any status.
async fn list_user_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<OwnerTransactionsQuery>, QueryRejection>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let Path(user_id) = path?;
    auth.require_self_or_admin(user_id)?;
    let Query(query) = query?;

    let page = page_request(query.page, query.per_page);
    Ok(Json(
        list_page(&state, &TransactionFilter::for_owner(user_id), page).await?,
    ))
}

/// GET `/transactions` - All requests, optionally filtered and paged (admin).
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<ListTransactionsQuery>, QueryRejection>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    auth.require_admin()?;
    let Query(query) = query?;

    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            TransactionStatus::parse(s).ok_or_else(|| WorkflowError::InvalidStatus(s.to_string()))
        })
        .transpose()?;

    let filter = TransactionFilter {
        status,
        owner_id: query.user_id,
    };

    let page = page_request(query.page, query.per_page);
    Ok(Json(list_page(&state, &filter, page).await?))
}

/// PUT `/transactions/{transaction_id}/approve` - Approve a pending request (admin).
async fn approve_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TransactionEnvelope>, ApiError> {
    auth.require_admin()?;
    let Path(transaction_id) = path?;

    let tx = state.engine.approve(transaction_id, auth.user_id()).await?;
    Ok(envelope("Transaction approved successfully", tx))
}

/// PUT `/transactions/{transaction_id}/reject` - Reject a pending request (admin).
async fn reject_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RejectTransactionRequest>, JsonRejection>,
) -> Result<Json<TransactionEnvelope>, ApiError> {
    auth.require_admin()?;
    let Path(transaction_id) = path?;
    let Json(body) = payload?;

    let tx = state
        .engine
        .reject(transaction_id, auth.user_id(), &body.reason)
        .await?;
    Ok(envelope("Transaction rejected", tx))
}
