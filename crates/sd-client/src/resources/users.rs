//! User endpoints.

use sd_model::{CreateUserRequest, Page, UpdateProfileRequest, UpdateUserRequest, User, UserQuery};

use super::with_query;
use crate::api::ApiClient;
use crate::error::ClientResult;

/// Client for `/users`.
#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a> {
    api: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Lists users, one page at a time.
    pub async fn list(&self, query: &UserQuery) -> ClientResult<Page<User>> {
        self.api.get(&with_query("/users", &query.to_pairs())).await
    }

    /// Gets a user by ID.
    pub async fn get(&self, id: u64) -> ClientResult<User> {
        self.api.get(&format!("/users/{id}")).await
    }

    /// Gets the signed-in user's own record.
    pub async fn me(&self) -> ClientResult<User> {
        self.api.get("/users/me").await
    }

    /// Updates the signed-in user's own record.
    ///
    /// The returned record replaces the user held by the session, so the
    /// new identity survives a restart.
    pub async fn update_me(&self, request: &UpdateProfileRequest) -> ClientResult<User> {
        let user: User = self.api.put("/users/me", request).await?;

        let session = self.api.session();
        if session.user().is_some_and(|current| current.id == user.id) {
            session.update_user(user.clone())?;
        }
        Ok(user)
    }

    /// Creates a user.
    pub async fn create(&self, request: &CreateUserRequest) -> ClientResult<User> {
        self.api.post("/users", request).await
    }

    /// Updates a user.
    pub async fn update(&self, id: u64, request: &UpdateUserRequest) -> ClientResult<User> {
        self.api.put(&format!("/users/{id}"), request).await
    }

    /// Deletes a user.
    pub async fn delete(&self, id: u64) -> ClientResult<()> {
        self.api.delete(&format!("/users/{id}")).await
    }
}
