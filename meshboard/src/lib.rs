//! Web dashboard for a mesh VPN coordination service.
//!
//! Serves an authenticated admin UI over the coordination service's HTTP
//! API: machines, users, namespaces, and settings pages, with login
//! sessions held in signed+encrypted cookies.

pub mod admin;
pub mod auth;
pub mod config;
pub mod db;
pub mod server;
pub mod session;
mod sql;
