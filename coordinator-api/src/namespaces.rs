//! Namespace accessors.
//!
//! Namespaces are tenant-like groupings of machines. They are addressed by
//! name everywhere, including rename (old and new name as path segments).

use crate::{Client, Result};
use serde::Deserialize;
use urlencoding::encode;

/// A namespace record as returned by the coordination API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
struct NamespacesResponse {
    namespaces: Vec<Namespace>,
}

#[derive(Debug, Deserialize)]
struct NamespaceResponse {
    namespace: Namespace,
}

pub(crate) fn namespace_path(name: &str) -> String {
    format!("namespace/{}", encode(name))
}

pub(crate) fn rename_path(old: &str, new: &str) -> String {
    format!("namespace/{}/rename/{}", encode(old), encode(new))
}

impl Client {
    pub async fn list_namespaces(&self) -> Result<Vec<Namespace>> {
        let resp: NamespacesResponse = self.get("namespace").await?;
        Ok(resp.namespaces)
    }

    pub async fn get_namespace(&self, name: &str) -> Result<Namespace> {
        let resp: NamespaceResponse = self.get(&namespace_path(name)).await?;
        Ok(resp.namespace)
    }

    pub async fn create_namespace(&self, name: &str) -> Result<Namespace> {
        let resp: NamespaceResponse = self
            .post_json("namespace", &serde_json::json!({ "name": name }))
            .await?;
        Ok(resp.namespace)
    }

    pub async fn rename_namespace(&self, old: &str, new: &str) -> Result<Namespace> {
        let resp: NamespaceResponse = self.post(&rename_path(old, new)).await?;
        Ok(resp.namespace)
    }

    pub async fn delete_namespace(&self, name: &str) -> Result<()> {
        self.delete(&namespace_path(name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_paths() {
        assert_eq!(namespace_path("team-a"), "namespace/team-a");
        assert_eq!(rename_path("team-a", "team-b"), "namespace/team-a/rename/team-b");
    }

    #[test]
    fn test_names_are_percent_encoded() {
        assert_eq!(namespace_path("a b"), "namespace/a%20b");
        assert_eq!(namespace_path("a/b"), "namespace/a%2Fb");
    }
}
