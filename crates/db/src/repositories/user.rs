//! User repository for database operations.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use stockdesk_shared::Role;
use tracing::info;
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::UserRole, users};

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new user. The email is stored lowercased.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails, including when the
    /// email is already registered.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        role: Role,
    ) -> Result<users::Model, DbErr> {
        let now = Utc::now().fixed_offset();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            username: Set(username.trim().to_string()),
            email: Set(normalize_email(email)),
            role: Set(UserRole::from(role)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Grants the admin role to the user with `email`.
    ///
    /// Returns `None` if no such user exists. Promoting an existing admin
    /// is a no-op that still returns the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn promote_to_admin(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        if user.role == UserRole::Admin {
            return Ok(Some(user));
        }

        let user_id = user.id;
        let mut active: users::ActiveModel = user.into();
        active.role = Set(UserRole::Admin);
        active.updated_at = Set(Utc::now().fixed_offset());
        let updated = active.update(&self.db).await?;

        info!(user_id = %user_id, "User promoted to admin");
        Ok(Some(updated))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
