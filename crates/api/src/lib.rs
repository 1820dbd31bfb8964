//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for transaction requests
//! - Authentication middleware
//! - JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use axum::http::header::AUTHORIZATION;
use std::iter::once;
use std::sync::Arc;
use stockdesk_core::workflow::{TransactionEngine, TransactionQueryService, TransactionStore};
use stockdesk_shared::JwtService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Submit/approve/reject.
    pub engine: TransactionEngine,
    /// Owner and admin listings.
    pub queries: TransactionQueryService,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    /// Builds the state over one transaction store.
    #[must_use]
    pub fn new(store: Arc<dyn TransactionStore>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            engine: TransactionEngine::new(store.clone()),
            queries: TransactionQueryService::new(store),
            jwt_service,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new(once(AUTHORIZATION)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
