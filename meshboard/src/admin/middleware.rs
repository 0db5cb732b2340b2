//! Shared admin state.

use crate::auth::CredentialStore;
use crate::config::Config;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

/// State shared by all dashboard routes
#[derive(Clone)]
pub struct AdminState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Authenticated client for the coordination API
    pub api: Arc<coordinator_api::Client>,
    /// Login credential backend
    pub credentials: Arc<dyn CredentialStore>,
    /// Key for signing/encrypting session cookies
    pub session_key: Key,
}

impl FromRef<AdminState> for Key {
    fn from_ref(state: &AdminState) -> Self {
        state.session_key.clone()
    }
}
