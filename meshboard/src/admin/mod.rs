//! Web dashboard module.
//!
//! Provides:
//! - Login/logout against the configured credential backend
//! - Session cookie handling
//! - Server-rendered pages for machines, users, namespaces, and settings

pub mod forms;
pub mod machines;
pub mod middleware;
pub mod namespaces;
pub mod routes;
pub mod templates;
pub mod users;

pub use middleware::AdminState;
pub use routes::admin_router;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Map a coordination API failure to a response status and a message safe
/// to show in the page. Structured API errors carry their upstream status
/// and message through; transport-tier failures collapse to a generic 500.
pub(crate) fn error_parts(err: &coordinator_api::Error) -> (StatusCode, String) {
    match err {
        coordinator_api::Error::Api {
            status, message, ..
        } => (*status, message.clone()),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong".to_string(),
        ),
    }
}

/// Render a template to an HTML response with the given status.
pub(crate) fn render_html(status: StatusCode, template: &impl Template) -> Response {
    (
        status,
        Html(
            template
                .render()
                .unwrap_or_else(|e| format!("Template error: {e}")),
        ),
    )
        .into_response()
}

/// Render a template to a 200 HTML response.
pub(crate) fn render_ok(template: &impl Template) -> Response {
    render_html(StatusCode::OK, template)
}

/// Format an RFC 3339 timestamp from the API for display. Falls back to the
/// raw string if it does not parse.
pub(crate) fn format_timestamp(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%b %e, %Y %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_parts_preserves_api_status_and_message() {
        let err = coordinator_api::Error::Api {
            status: StatusCode::NOT_FOUND,
            status_text: "Not Found".into(),
            code: 5,
            message: "namespace not found".into(),
            details: Vec::new(),
        };
        let (status, message) = error_parts(&err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "namespace not found");
    }

    #[test]
    fn test_error_parts_hides_transport_detail() {
        let err = coordinator_api::Error::Http(StatusCode::BAD_GATEWAY);
        let (status, message) = error_parts(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Something went wrong");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp("2024-03-05T14:30:00Z"),
            "Mar  5, 2024 14:30"
        );
        assert_eq!(format_timestamp("garbage"), "garbage");
    }
}
