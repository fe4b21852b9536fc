//! User directory lookups.

use std::sync::Arc;

use crate::cache::UserCache;
use crate::client::{Host, HttpClient};
use crate::error::{Result, SymError};
use crate::types::*;

/// Client for user lookups. Lookups by id and email are served from the
/// shared [`UserCache`] when possible.
#[derive(Clone)]
pub struct UsersClient {
    client: HttpClient,
    cache: Arc<UserCache>,
}

impl UsersClient {
    pub fn new(client: HttpClient, cache: Arc<UserCache>) -> Self {
        Self { client, cache }
    }

    /// Get the shared user cache.
    pub fn cache(&self) -> &Arc<UserCache> {
        &self.cache
    }

    /// Look up a user by id.
    pub async fn user_by_id(&self, user_id: UserId, local: bool) -> Result<SymUser> {
        if let Some(user) = self.cache.get_by_id(user_id) {
            return Ok(user);
        }
        let id = user_id.to_string();
        let user = self
            .first_user(&[("uid", id.as_str()), ("local", bool_str(local))], || {
                format!("user {user_id} not found")
            })
            .await?;
        self.cache.put(&user);
        Ok(user)
    }

    /// Look up a user by email address.
    pub async fn user_by_email(&self, email: &str, local: bool) -> Result<SymUser> {
        if let Some(user) = self.cache.get_by_email(email) {
            return Ok(user);
        }
        let user = self
            .first_user(&[("email", email), ("local", bool_str(local))], || {
                format!("user with email {email} not found")
            })
            .await?;
        self.cache.put(&user);
        Ok(user)
    }

    /// Look up a user by username (same pod only).
    pub async fn user_by_username(&self, username: &str) -> Result<SymUser> {
        let user: SymUser = self
            .client
            .get(
                Host::Pod,
                "/pod/v2/user",
                Some([("username", username)].as_slice()),
                None,
            )
            .await?;
        self.cache.put(&user);
        Ok(user)
    }

    /// Look up several users by id in one call. Missing users are omitted.
    pub async fn users_by_ids(&self, user_ids: &[UserId], local: bool) -> Result<Vec<SymUser>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = user_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let list = self
            .user_list(&[("uid", ids.as_str()), ("local", bool_str(local))])
            .await?;
        for user in &list {
            self.cache.put(user);
        }
        Ok(list)
    }

    /// Get the user the current session belongs to.
    pub async fn session_user(&self) -> Result<SessionInfo> {
        self.client
            .get(Host::Pod, "/pod/v2/sessioninfo", None, None)
            .await
    }

    /// Search the directory.
    pub async fn search_users(
        &self,
        query: &UserSearchQuery,
        local: bool,
        skip: u32,
        limit: u32,
    ) -> Result<UserSearchResults> {
        let skip = skip.to_string();
        let limit = limit.to_string();
        let params = [
            ("local", bool_str(local)),
            ("skip", skip.as_str()),
            ("limit", limit.as_str()),
        ];
        self.client
            .post(Host::Pod, "/pod/v1/user/search", Some(query), Some(params.as_slice()))
            .await
    }

    async fn user_list(&self, query: &[(&str, &str)]) -> Result<Vec<SymUser>> {
        let list: Option<UserList> = self
            .client
            .get(Host::Pod, "/pod/v3/users", Some(query), None)
            .await?;
        Ok(list.map(|l| l.users).unwrap_or_default())
    }

    async fn first_user(
        &self,
        query: &[(&str, &str)],
        missing: impl FnOnce() -> String,
    ) -> Result<SymUser> {
        self.user_list(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SymError::api(404, "not_found", missing()))
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
