//! Remote user accessors.
//!
//! Users on the coordination service mirror the namespace operation set and
//! are likewise addressed by name. These are not the dashboard's own login
//! accounts; those live in the local credential store.

use crate::{Client, Result};
use serde::Deserialize;
use urlencoding::encode;

/// A user record as returned by the coordination API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: User,
}

pub(crate) fn user_path(name: &str) -> String {
    format!("user/{}", encode(name))
}

pub(crate) fn rename_path(old: &str, new: &str) -> String {
    format!("user/{}/rename/{}", encode(old), encode(new))
}

impl Client {
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let resp: UsersResponse = self.get("user").await?;
        Ok(resp.users)
    }

    pub async fn get_user(&self, name: &str) -> Result<User> {
        let resp: UserResponse = self.get(&user_path(name)).await?;
        Ok(resp.user)
    }

    pub async fn create_user(&self, name: &str) -> Result<User> {
        let resp: UserResponse = self
            .post_json("user", &serde_json::json!({ "name": name }))
            .await?;
        Ok(resp.user)
    }

    pub async fn rename_user(&self, old: &str, new: &str) -> Result<User> {
        let resp: UserResponse = self.post(&rename_path(old, new)).await?;
        Ok(resp.user)
    }

    pub async fn delete_user(&self, name: &str) -> Result<()> {
        self.delete(&user_path(name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_paths() {
        assert_eq!(user_path("alice"), "user/alice");
        assert_eq!(rename_path("alice", "bob"), "user/alice/rename/bob");
    }
}
