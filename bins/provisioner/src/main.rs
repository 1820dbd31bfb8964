//! Admin provisioning for Stockdesk.
//!
//! Promotes an existing user to admin by email. Run once per operator
//! after they have signed up; the server never does this on its own.
//!
//! Usage:
//!   provisioner <email>
//!   STOCKDESK_ADMIN_EMAIL=<email> provisioner
//!
//! Reads `DATABASE_URL`, falling back to `STOCKDESK__DATABASE__URL`.

use anyhow::Context;
use stockdesk_db::{UserRepository, connect};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockdesk=info,provisioner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let email = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("STOCKDESK_ADMIN_EMAIL").ok())
        .filter(|e| !e.trim().is_empty())
        .context("usage: provisioner <email> (or set STOCKDESK_ADMIN_EMAIL)")?;

    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("STOCKDESK__DATABASE__URL"))
        .context("DATABASE_URL must be set")?;

    let db = connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let users = UserRepository::new(db);

    match users.promote_to_admin(&email).await? {
        Some(user) => info!(user_id = %user.id, email = %user.email, "Admin role granted"),
        None => warn!(email = %email, "No user with this email; nothing to do"),
    }

    Ok(())
}
