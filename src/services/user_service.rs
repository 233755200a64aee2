use std::sync::Arc;

use crate::errors::ApiError;
use crate::services::validation::RegistrationValidator;
use crate::services::PasswordHasher;
use crate::stores::{UserChanges, UserStore};
use crate::types::db::user;
use crate::types::dto::user::UpdateUserRequest;

/// Profile reads and admin-or-owner account management
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    validator: RegistrationValidator,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            validator: RegistrationValidator::new(),
        }
    }

    /// Owner-or-admin gate, checked before the target is even looked
    /// up so a non-admin probing foreign ids always sees `Forbidden`
    /// rather than learning which ids exist.
    fn authorize(actor: &user::Model, target_id: &str) -> Result<(), ApiError> {
        if actor.id == target_id || actor.role.is_admin() {
            Ok(())
        } else {
            tracing::warn!(actor_id = %actor.id, %target_id, "denied cross-account access");
            Err(ApiError::forbidden())
        }
    }

    /// List every account. Admin only.
    pub async fn list(&self, actor: &user::Model) -> Result<Vec<user::Model>, ApiError> {
        if !actor.role.is_admin() {
            return Err(ApiError::forbidden());
        }
        self.store.list().await
    }

    /// Fetch a single account the actor is allowed to see.
    pub async fn get(&self, actor: &user::Model, id: &str) -> Result<user::Model, ApiError> {
        Self::authorize(actor, id)?;
        match self.store.find_by_id(id).await? {
            Some(user) => Ok(user),
            None => Err(ApiError::not_found("User")),
        }
    }

    /// Apply a partial update to an account.
    ///
    /// Usernames are immutable once registered. Role and status are
    /// admin-only fields even on the actor's own account, so a user
    /// cannot promote themselves. Email and password changes go back
    /// through registration validation, and passwords are re-hashed.
    /// A non-admin changing their own password must also supply the
    /// current one; admins can reset without it.
    pub async fn update(
        &self,
        actor: &user::Model,
        id: &str,
        req: &UpdateUserRequest,
    ) -> Result<user::Model, ApiError> {
        Self::authorize(actor, id)?;

        if req.username.is_some() {
            return Err(ApiError::validation_failed(
                "Username cannot be changed after registration",
            ));
        }
        if (req.role.is_some() || req.status.is_some()) && !actor.role.is_admin() {
            return Err(ApiError::forbidden());
        }

        let mut changes = UserChanges::default();

        if let Some(ref email) = req.email {
            let email = self
                .validator
                .validate_email(email)
                .map_err(|e| ApiError::validation_failed(e.to_string()))?;
            if let Some(existing) = self.store.find_by_email(&email).await? {
                if existing.id != id {
                    return Err(ApiError::conflict("email"));
                }
            }
            changes.email = Some(email);
        }

        if let Some(ref password) = req.password {
            // Non-admins can only reach their own record here, and a
            // bearer token alone is not proof enough to rotate the
            // password it was issued against.
            if !actor.role.is_admin() {
                let current = req.current_password.as_deref().ok_or_else(|| {
                    ApiError::validation_failed(
                        "Current password is required to change password",
                    )
                })?;
                let matches = self
                    .hasher
                    .verify(current, &actor.password_hash)
                    .map_err(|e| ApiError::internal_error(format!("verify password: {}", e)))?;
                if !matches {
                    return Err(ApiError::incorrect_password());
                }
            }

            let password = self
                .validator
                .validate_password(password)
                .map_err(|e| ApiError::validation_failed(e.to_string()))?;
            let hash = self
                .hasher
                .hash(&password)
                .map_err(|e| ApiError::internal_error(format!("hash password: {}", e)))?;
            changes.password_hash = Some(hash);
        }

        if let Some(ref role) = req.role {
            changes.role = Some(
                role.parse()
                    .map_err(|e: String| ApiError::validation_failed(e))?,
            );
        }
        if let Some(ref status) = req.status {
            changes.status = Some(
                status
                    .parse()
                    .map_err(|e: String| ApiError::validation_failed(e))?,
            );
        }

        if changes.is_empty() {
            return Err(ApiError::validation_failed("No updatable fields provided"));
        }

        let updated = self.store.update(id, changes).await?;
        tracing::info!(actor_id = %actor.id, user_id = %updated.id, "user updated");
        Ok(updated)
    }

    /// Delete an account the actor is allowed to remove.
    pub async fn delete(&self, actor: &user::Model, id: &str) -> Result<(), ApiError> {
        Self::authorize(actor, id)?;

        if self.store.delete(id).await? {
            tracing::info!(actor_id = %actor.id, user_id = %id, "user deleted");
            Ok(())
        } else {
            Err(ApiError::not_found("User"))
        }
    }
}
