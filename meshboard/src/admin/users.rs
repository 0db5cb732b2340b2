//! User page handlers.
//!
//! Users own machine registrations on the mesh. Like namespaces they are
//! addressed by name, so a rename changes the addressable identifier.

use crate::admin::forms::{validate_name, IntentForm};
use crate::admin::templates::{
    BaseContext, RemoveTemplate, RenameTemplate, ResourceRow, UsersTemplate,
};
use crate::admin::{error_parts, format_timestamp, render_html, render_ok, AdminState};
use crate::session;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use tracing::error;

fn base() -> BaseContext {
    BaseContext { section: "users" }
}

/// Users list page handler.
pub async fn list_page(State(state): State<AdminState>, jar: PrivateCookieJar) -> Response {
    if let Err(redirect) = session::require_user(&jar, "/admin/users") {
        return redirect.into_response();
    }
    render_list(&state, StatusCode::OK, None, None).await
}

async fn render_list(
    state: &AdminState,
    status: StatusCode,
    error: Option<String>,
    name_error: Option<String>,
) -> Response {
    let (status, error, rows) = match state.api.list_users().await {
        Ok(users) => (status, error, users),
        Err(e) => {
            error!("Failed to list users: {e}");
            let (status, message) = error_parts(&e);
            (status, Some(message), Vec::new())
        }
    };

    let template = UsersTemplate {
        base: base(),
        rows: rows
            .into_iter()
            .map(|u| ResourceRow {
                name: u.name,
                created_at: format_timestamp(&u.created_at),
            })
            .collect(),
        error,
        name_error,
    };
    render_html(status, &template)
}

/// Users list form handler. Dispatches on the `intent` field.
pub async fn list_submit(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Form(form): Form<IntentForm>,
) -> Response {
    if let Err(redirect) = session::require_user(&jar, "/admin/users") {
        return redirect.into_response();
    }

    match form.intent.as_str() {
        "create" => {
            let name = match validate_name(form.name.as_deref()) {
                Ok(n) => n,
                Err(msg) => {
                    return render_list(&state, StatusCode::BAD_REQUEST, None, Some(msg)).await;
                }
            };
            match state.api.create_user(&name).await {
                Ok(_) => Redirect::to("/admin/users").into_response(),
                Err(e) => {
                    error!(user = %name, "Failed to create user: {e}");
                    let (status, message) = error_parts(&e);
                    render_list(&state, status, Some(message), None).await
                }
            }
        }
        "edit" => match form.name {
            Some(name) => Redirect::to(&format!(
                "/admin/users/{}/edit",
                urlencoding::encode(&name)
            ))
            .into_response(),
            None => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
        },
        "remove" => match form.name {
            Some(name) => Redirect::to(&format!(
                "/admin/users/{}/remove",
                urlencoding::encode(&name)
            ))
            .into_response(),
            None => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
        },
        _ => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
    }
}

/// User rename page handler.
pub async fn rename_page(jar: PrivateCookieJar, Path(name): Path<String>) -> Response {
    if let Err(redirect) = session::require_user(&jar, &format!("/admin/users/{name}/edit")) {
        return redirect.into_response();
    }

    let template = RenameTemplate {
        base: base(),
        title: "Rename user".to_string(),
        action: format!("/admin/users/{}/edit", urlencoding::encode(&name)),
        current_name: name,
        error: None,
        name_error: None,
    };
    render_ok(&template)
}

/// User rename form handler.
pub async fn rename_submit(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Path(name): Path<String>,
    Form(form): Form<IntentForm>,
) -> Response {
    if let Err(redirect) = session::require_user(&jar, &format!("/admin/users/{name}/edit")) {
        return redirect.into_response();
    }

    let rename_template = |error, name_error| RenameTemplate {
        base: base(),
        title: "Rename user".to_string(),
        action: format!("/admin/users/{}/edit", urlencoding::encode(&name)),
        current_name: name.clone(),
        error,
        name_error,
    };

    match form.intent.as_str() {
        "update_name" => {
            let new_name = match validate_name(form.name.as_deref()) {
                Ok(n) => n,
                Err(msg) => {
                    return render_html(StatusCode::BAD_REQUEST, &rename_template(None, Some(msg)));
                }
            };
            match state.api.rename_user(&name, &new_name).await {
                Ok(_) => Redirect::to("/admin/users").into_response(),
                Err(e) => {
                    error!(user = %name, "Failed to rename user: {e}");
                    let (status, message) = error_parts(&e);
                    render_html(status, &rename_template(Some(message), None))
                }
            }
        }
        "cancel" => Redirect::to("/admin/users").into_response(),
        _ => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
    }
}

/// User removal confirmation page handler.
pub async fn remove_page(jar: PrivateCookieJar, Path(name): Path<String>) -> Response {
    if let Err(redirect) = session::require_user(&jar, &format!("/admin/users/{name}/remove")) {
        return redirect.into_response();
    }

    let template = RemoveTemplate {
        base: base(),
        title: "Remove user".to_string(),
        action: format!("/admin/users/{}/remove", urlencoding::encode(&name)),
        name,
        error: None,
    };
    render_ok(&template)
}

/// User removal form handler.
pub async fn remove_submit(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Path(name): Path<String>,
    Form(form): Form<IntentForm>,
) -> Response {
    if let Err(redirect) = session::require_user(&jar, &format!("/admin/users/{name}/remove")) {
        return redirect.into_response();
    }

    match form.intent.as_str() {
        "remove_confirm" => match state.api.delete_user(&name).await {
            Ok(()) => Redirect::to("/admin/users").into_response(),
            Err(e) => {
                error!(user = %name, "Failed to remove user: {e}");
                let (status, message) = error_parts(&e);
                let template = RemoveTemplate {
                    base: base(),
                    title: "Remove user".to_string(),
                    action: format!("/admin/users/{}/remove", urlencoding::encode(&name)),
                    name: name.clone(),
                    error: Some(message),
                };
                render_html(status, &template)
            }
        },
        "cancel" => Redirect::to("/admin/users").into_response(),
        _ => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
    }
}
