//! Askama templates for the dashboard UI.

use askama::Template;

/// Base data available to all authenticated templates
pub struct BaseContext {
    /// Active nav section ("machines", "users", "namespaces", "settings")
    pub section: &'static str,
}

/// Login page template
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub redirect_to: String,
}

/// Machine summary for list view
pub struct MachineRow {
    pub id: String,
    pub given_name: String,
    pub namespace: String,
    pub ip_addresses: Vec<String>,
    pub last_seen: String,
}

/// Namespace option for the register-machine form
pub struct NamespaceOption {
    pub name: String,
}

/// Machines list page template
#[derive(Template)]
#[template(path = "machines.html")]
pub struct MachinesTemplate {
    pub base: BaseContext,
    pub machines: Vec<MachineRow>,
    pub namespaces: Vec<NamespaceOption>,
    pub error: Option<String>,
    pub namespace_error: Option<String>,
    pub key_error: Option<String>,
}

/// Row in a named-resource table (namespaces, users)
pub struct ResourceRow {
    pub name: String,
    pub created_at: String,
}

/// Namespaces list page template
#[derive(Template)]
#[template(path = "namespaces.html")]
pub struct NamespacesTemplate {
    pub base: BaseContext,
    pub rows: Vec<ResourceRow>,
    pub error: Option<String>,
    pub name_error: Option<String>,
}

/// Users list page template
#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub base: BaseContext,
    pub rows: Vec<ResourceRow>,
    pub error: Option<String>,
    pub name_error: Option<String>,
}

/// Rename confirmation page template (machines, users, namespaces)
#[derive(Template)]
#[template(path = "rename.html")]
pub struct RenameTemplate {
    pub base: BaseContext,
    pub title: String,
    /// POST target of the form
    pub action: String,
    pub current_name: String,
    pub error: Option<String>,
    pub name_error: Option<String>,
}

/// Removal confirmation page template
#[derive(Template)]
#[template(path = "remove.html")]
pub struct RemoveTemplate {
    pub base: BaseContext,
    pub title: String,
    /// POST target of the form
    pub action: String,
    pub name: String,
    pub error: Option<String>,
}

/// Settings page template
#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub base: BaseContext,
    pub api_url: String,
    pub auth_backend: &'static str,
    pub mode: &'static str,
}
