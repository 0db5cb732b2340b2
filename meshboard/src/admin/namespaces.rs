//! Namespace page handlers.
//!
//! Namespaces partition machines on the mesh. They are addressed by name;
//! renaming one changes the name every subsequent request must use.

use crate::admin::forms::{validate_name, IntentForm};
use crate::admin::templates::{
    BaseContext, NamespacesTemplate, RemoveTemplate, RenameTemplate, ResourceRow,
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
    BaseContext {
        section: "namespaces",
    }
}

/// Namespaces list page handler.
pub async fn list_page(State(state): State<AdminState>, jar: PrivateCookieJar) -> Response {
    if let Err(redirect) = session::require_user(&jar, "/admin/namespaces") {
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
    let (status, error, rows) = match state.api.list_namespaces().await {
        Ok(namespaces) => (status, error, namespaces),
        Err(e) => {
            error!("Failed to list namespaces: {e}");
            let (status, message) = error_parts(&e);
            (status, Some(message), Vec::new())
        }
    };

    let template = NamespacesTemplate {
        base: base(),
        rows: rows
            .into_iter()
            .map(|n| ResourceRow {
                name: n.name,
                created_at: format_timestamp(&n.created_at),
            })
            .collect(),
        error,
        name_error,
    };
    render_html(status, &template)
}

/// Namespaces list form handler. Dispatches on the `intent` field.
pub async fn list_submit(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Form(form): Form<IntentForm>,
) -> Response {
    if let Err(redirect) = session::require_user(&jar, "/admin/namespaces") {
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
            match state.api.create_namespace(&name).await {
                Ok(_) => Redirect::to("/admin/namespaces").into_response(),
                Err(e) => {
                    error!(namespace = %name, "Failed to create namespace: {e}");
                    let (status, message) = error_parts(&e);
                    render_list(&state, status, Some(message), None).await
                }
            }
        }
        "edit" => match form.name {
            Some(name) => Redirect::to(&format!(
                "/admin/namespaces/{}/edit",
                urlencoding::encode(&name)
            ))
            .into_response(),
            None => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
        },
        "remove" => match form.name {
            Some(name) => Redirect::to(&format!(
                "/admin/namespaces/{}/remove",
                urlencoding::encode(&name)
            ))
            .into_response(),
            None => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
        },
        _ => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
    }
}

/// Namespace rename page handler.
pub async fn rename_page(jar: PrivateCookieJar, Path(name): Path<String>) -> Response {
    if let Err(redirect) =
        session::require_user(&jar, &format!("/admin/namespaces/{name}/edit"))
    {
        return redirect.into_response();
    }

    let template = RenameTemplate {
        base: base(),
        title: "Rename namespace".to_string(),
        action: format!("/admin/namespaces/{}/edit", urlencoding::encode(&name)),
        current_name: name,
        error: None,
        name_error: None,
    };
    render_ok(&template)
}

/// Namespace rename form handler.
pub async fn rename_submit(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Path(name): Path<String>,
    Form(form): Form<IntentForm>,
) -> Response {
    if let Err(redirect) =
        session::require_user(&jar, &format!("/admin/namespaces/{name}/edit"))
    {
        return redirect.into_response();
    }

    let rename_template = |error, name_error| RenameTemplate {
        base: base(),
        title: "Rename namespace".to_string(),
        action: format!("/admin/namespaces/{}/edit", urlencoding::encode(&name)),
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
            match state.api.rename_namespace(&name, &new_name).await {
                Ok(_) => Redirect::to("/admin/namespaces").into_response(),
                Err(e) => {
                    error!(namespace = %name, "Failed to rename namespace: {e}");
                    let (status, message) = error_parts(&e);
                    render_html(status, &rename_template(Some(message), None))
                }
            }
        }
        "cancel" => Redirect::to("/admin/namespaces").into_response(),
        _ => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
    }
}

/// Namespace removal confirmation page handler.
pub async fn remove_page(jar: PrivateCookieJar, Path(name): Path<String>) -> Response {
    if let Err(redirect) =
        session::require_user(&jar, &format!("/admin/namespaces/{name}/remove"))
    {
        return redirect.into_response();
    }

    let template = RemoveTemplate {
        base: base(),
        title: "Remove namespace".to_string(),
        action: format!("/admin/namespaces/{}/remove", urlencoding::encode(&name)),
        name,
        error: None,
    };
    render_ok(&template)
}

/// Namespace removal form handler.
pub async fn remove_submit(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Path(name): Path<String>,
    Form(form): Form<IntentForm>,
) -> Response {
    if let Err(redirect) =
        session::require_user(&jar, &format!("/admin/namespaces/{name}/remove"))
    {
        return redirect.into_response();
    }

    match form.intent.as_str() {
        "remove_confirm" => match state.api.delete_namespace(&name).await {
            Ok(()) => Redirect::to("/admin/namespaces").into_response(),
            Err(e) => {
                error!(namespace = %name, "Failed to remove namespace: {e}");
                let (status, message) = error_parts(&e);
                let template = RemoveTemplate {
                    base: base(),
                    title: "Remove namespace".to_string(),
                    action: format!("/admin/namespaces/{}/remove", urlencoding::encode(&name)),
                    name: name.clone(),
                    error: Some(message),
                };
                render_html(status, &template)
            }
        },
        "cancel" => Redirect::to("/admin/namespaces").into_response(),
        _ => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
    }
}
