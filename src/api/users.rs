use poem::Request;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::extract_token;
use crate::errors::ApiError;
use crate::services::{AuthService, UserService};
use crate::types::dto::user::{DeleteUserResponse, UpdateUserRequest, UserResponse};

/// User management API endpoints
///
/// Every route authenticates the caller first; authorization is
/// owner-or-admin per record, with listing restricted to admins.
pub struct UsersApi {
    auth: Arc<AuthService>,
    users: Arc<UserService>,
}

impl UsersApi {
    pub fn new(auth: Arc<AuthService>, users: Arc<UserService>) -> Self {
        Self { auth, users }
    }
}

/// API tags for user management endpoints
#[derive(Tags)]
enum UserTags {
    /// User management endpoints
    Users,
}

#[OpenApi(prefix_path = "/users")]
impl UsersApi {
    /// List all users. Admin only.
    #[oai(path = "/", method = "get", tag = "UserTags::Users")]
    async fn list(&self, req: &Request) -> Result<Json<Vec<UserResponse>>, ApiError> {
        let actor = self.auth.authenticate(extract_token(req).as_deref()).await?;
        let users = self.users.list(&actor).await?;
        Ok(Json(users.into_iter().map(UserResponse::from).collect()))
    }

    /// Fetch a single user by id
    #[oai(path = "/:id", method = "get", tag = "UserTags::Users")]
    async fn get(&self, req: &Request, id: Path<String>) -> Result<Json<UserResponse>, ApiError> {
        let actor = self.auth.authenticate(extract_token(req).as_deref()).await?;
        let user = self.users.get(&actor, &id).await?;
        Ok(Json(UserResponse::from(user)))
    }

    /// Partially update a user record
    #[oai(path = "/:id", method = "put", tag = "UserTags::Users")]
    async fn update(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let actor = self.auth.authenticate(extract_token(req).as_deref()).await?;
        let user = self.users.update(&actor, &id, &body).await?;
        Ok(Json(UserResponse::from(user)))
    }

    /// Delete a user record
    #[oai(path = "/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete(
        &self,
        req: &Request,
        id: Path<String>,
    ) -> Result<Json<DeleteUserResponse>, ApiError> {
        let actor = self.auth.authenticate(extract_token(req).as_deref()).await?;
        self.users.delete(&actor, &id).await?;
        Ok(Json(DeleteUserResponse {
            message: "User deleted successfully".to_string(),
        }))
    }
}
