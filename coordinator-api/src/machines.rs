//! Machine accessors.
//!
//! Machines are registered client devices tracked by the coordination
//! service. Unlike namespaces and users they are addressed by their opaque
//! server-assigned id; the human-facing name only appears in rename.

use crate::{Client, Namespace, Result};
use serde::Deserialize;
use urlencoding::encode;

/// A machine record as returned by the coordination API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    pub machine_key: String,
    pub node_key: String,
    pub disco_key: String,
    #[serde(default)]
    pub ip_addresses: Vec<String>,
    pub name: String,
    pub given_name: String,
    pub namespace: Namespace,
    pub last_seen: String,
    #[serde(default)]
    pub last_successful_update: Option<String>,
    #[serde(default)]
    pub expiry: Option<String>,
    pub created_at: String,
    pub register_method: String,
    #[serde(default)]
    pub forced_tags: Vec<String>,
    #[serde(default)]
    pub invalid_tags: Vec<String>,
    #[serde(default)]
    pub valid_tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MachinesResponse {
    machines: Vec<Machine>,
}

#[derive(Debug, Deserialize)]
struct MachineResponse {
    machine: Machine,
}

pub(crate) fn machine_path(id: &str) -> String {
    format!("machine/{}", encode(id))
}

pub(crate) fn rename_path(id: &str, new_name: &str) -> String {
    format!("machine/{}/rename/{}", encode(id), encode(new_name))
}

impl Client {
    pub async fn list_machines(&self) -> Result<Vec<Machine>> {
        let resp: MachinesResponse = self.get("machine").await?;
        Ok(resp.machines)
    }

    pub async fn get_machine(&self, id: &str) -> Result<Machine> {
        let resp: MachineResponse = self.get(&machine_path(id)).await?;
        Ok(resp.machine)
    }

    /// Register a pre-authenticated machine key into a namespace.
    pub async fn register_machine(&self, namespace: &str, key: &str) -> Result<Machine> {
        let resp: MachineResponse = self
            .post_query("machine/register", &[("namespace", namespace), ("key", key)])
            .await?;
        Ok(resp.machine)
    }

    pub async fn rename_machine(&self, id: &str, new_name: &str) -> Result<Machine> {
        let resp: MachineResponse = self.post(&rename_path(id, new_name)).await?;
        Ok(resp.machine)
    }

    pub async fn delete_machine(&self, id: &str) -> Result<()> {
        self.delete(&machine_path(id)).await
    }
}
