use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::types::db::user::{self, Entity as User, Role, Status};

/// Fields required to create an identity record
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub status: Status,
}

/// Fields an update may change. `username` is deliberately absent -
/// usernames are immutable.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub status: Option<Status>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.status.is_none()
    }
}

/// Storage interface for identity records
///
/// One concrete implementation per backend, selected at startup. The
/// underlying storage enforces the unique constraints on `username`
/// and `email`; implementations must surface violations as
/// `ApiError::Conflict`, never as a generic failure.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ApiError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, ApiError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<user::Model>, ApiError>;
    async fn list(&self) -> Result<Vec<user::Model>, ApiError>;
    async fn create(&self, new_user: NewUser) -> Result<user::Model, ApiError>;
    async fn update(&self, id: &str, changes: UserChanges) -> Result<user::Model, ApiError>;
    async fn delete(&self, id: &str) -> Result<bool, ApiError>;
    async fn record_login(&self, id: &str, at: i64) -> Result<(), ApiError>;
}

/// SQL-backed user store (sea-orm)
pub struct SqlUserStore {
    db: DatabaseConnection,
}

impl SqlUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Classify a database error, turning unique-key violations into
    /// a `Conflict` naming the colliding field.
    fn classify(e: sea_orm::DbErr, operation: &str) -> ApiError {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                if msg.contains("email") {
                    ApiError::conflict("email")
                } else {
                    ApiError::conflict("username")
                }
            }
            _ => ApiError::internal_error(format!("{}: {}", operation, e)),
        }
    }
}

#[async_trait]
impl UserStore for SqlUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ApiError> {
        User::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| ApiError::internal_error(format!("find_by_email: {}", e)))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, ApiError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| ApiError::internal_error(format!("find_by_username: {}", e)))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<user::Model>, ApiError> {
        User::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ApiError::internal_error(format!("find_by_id: {}", e)))
    }

    async fn list(&self) -> Result<Vec<user::Model>, ApiError> {
        User::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ApiError::internal_error(format!("list: {}", e)))
    }

    async fn create(&self, new_user: NewUser) -> Result<user::Model, ApiError> {
        let now = Utc::now().timestamp();

        let record = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(new_user.username),
            email: Set(new_user.email.to_lowercase()),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role),
            status: Set(new_user.status),
            last_login: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| Self::classify(e, "create"))
    }

    async fn update(&self, id: &str, changes: UserChanges) -> Result<user::Model, ApiError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User"))?;

        let mut record = existing.into_active_model();
        if let Some(email) = changes.email {
            record.email = Set(email.to_lowercase());
        }
        if let Some(password_hash) = changes.password_hash {
            record.password_hash = Set(password_hash);
        }
        if let Some(role) = changes.role {
            record.role = Set(role);
        }
        if let Some(status) = changes.status {
            record.status = Set(status);
        }
        record.updated_at = Set(Utc::now().timestamp());

        record
            .update(&self.db)
            .await
            .map_err(|e| Self::classify(e, "update"))
    }

    async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        let existing = self.find_by_id(id).await?;
        match existing {
            None => Ok(false),
            Some(record) => {
                record
                    .delete(&self.db)
                    .await
                    .map_err(|e| ApiError::internal_error(format!("delete: {}", e)))?;
                Ok(true)
            }
        }
    }

    async fn record_login(&self, id: &str, at: i64) -> Result<(), ApiError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("User"))?;

        let mut record = existing.into_active_model();
        record.last_login = Set(Some(at));
        record.updated_at = Set(at);
        record
            .update(&self.db)
            .await
            .map_err(|e| ApiError::internal_error(format!("record_login: {}", e)))?;
        Ok(())
    }
}

impl std::fmt::Debug for SqlUserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlUserStore")
            .field("db", &"<connection>")
            .finish()
    }
}
