//! Shared setup for repository integration tests.

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use stockdesk_db::migration::{Migrator, MigratorTrait};

/// Fresh in-memory SQLite database with the full schema applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}
