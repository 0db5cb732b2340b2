//! Machine page handlers.
//!
//! Machines are registered devices on the mesh. The dashboard can register
//! a pre-authenticated key into a namespace, rename a machine's display
//! name, and remove a machine. Machines are addressed by their numeric id.

use crate::admin::forms::{validate_name, IntentForm};
use crate::admin::templates::{
    BaseContext, MachineRow, MachinesTemplate, NamespaceOption, RemoveTemplate, RenameTemplate,
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
        section: "machines",
    }
}

/// Machines list page handler.
pub async fn list_page(State(state): State<AdminState>, jar: PrivateCookieJar) -> Response {
    if let Err(redirect) = session::require_user(&jar, "/admin/machines") {
        return redirect.into_response();
    }
    render_list(&state, StatusCode::OK, None, None, None).await
}

/// Render the machines list, optionally with an error banner or per-field
/// errors on the register form.
async fn render_list(
    state: &AdminState,
    status: StatusCode,
    error: Option<String>,
    namespace_error: Option<String>,
    key_error: Option<String>,
) -> Response {
    let (status, error, machines) = match state.api.list_machines().await {
        Ok(machines) => (status, error, machines),
        Err(e) => {
            error!("Failed to list machines: {e}");
            let (status, message) = error_parts(&e);
            (status, Some(message), Vec::new())
        }
    };

    let namespaces = state.api.list_namespaces().await.unwrap_or_default();

    let template = MachinesTemplate {
        base: base(),
        machines: machines
            .into_iter()
            .map(|m| MachineRow {
                id: m.id,
                given_name: if m.given_name.is_empty() {
                    m.name
                } else {
                    m.given_name
                },
                namespace: m.namespace.name,
                ip_addresses: m.ip_addresses,
                last_seen: format_timestamp(&m.last_seen),
            })
            .collect(),
        namespaces: namespaces
            .into_iter()
            .map(|n| NamespaceOption { name: n.name })
            .collect(),
        error,
        namespace_error,
        key_error,
    };
    render_html(status, &template)
}

/// Machines list form handler. Dispatches on the `intent` field.
pub async fn list_submit(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Form(form): Form<IntentForm>,
) -> Response {
    if let Err(redirect) = session::require_user(&jar, "/admin/machines") {
        return redirect.into_response();
    }

    match form.intent.as_str() {
        "register" => {
            let namespace = validate_name(form.namespace.as_deref());
            let key = match form.key.as_deref().map(str::trim) {
                Some(k) if !k.is_empty() => Ok(k.to_string()),
                _ => Err("Registration key is required".to_string()),
            };
            let (namespace, key) = match (namespace, key) {
                (Ok(n), Ok(k)) => (n, k),
                (namespace, key) => {
                    return render_list(
                        &state,
                        StatusCode::BAD_REQUEST,
                        None,
                        namespace.err(),
                        key.err(),
                    )
                    .await;
                }
            };

            match state.api.register_machine(&namespace, &key).await {
                Ok(_) => Redirect::to("/admin/machines").into_response(),
                Err(e) => {
                    error!(namespace = %namespace, "Failed to register machine: {e}");
                    let (status, message) = error_parts(&e);
                    render_list(&state, status, Some(message), None, None).await
                }
            }
        }
        "edit" => match form.id {
            Some(id) => Redirect::to(&format!("/admin/machines/{id}/edit")).into_response(),
            None => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
        },
        "remove" => match form.id {
            Some(id) => Redirect::to(&format!("/admin/machines/{id}/remove")).into_response(),
            None => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
        },
        _ => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
    }
}

/// Machine rename page handler.
pub async fn rename_page(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Path(id): Path<String>,
) -> Response {
    if let Err(redirect) = session::require_user(&jar, &format!("/admin/machines/{id}/edit")) {
        return redirect.into_response();
    }

    let machine = match state.api.get_machine(&id).await {
        Ok(m) => m,
        Err(e) => {
            let (status, message) = error_parts(&e);
            return (status, message).into_response();
        }
    };

    let template = RenameTemplate {
        base: base(),
        title: "Rename machine".to_string(),
        action: format!("/admin/machines/{id}/edit"),
        current_name: if machine.given_name.is_empty() {
            machine.name
        } else {
            machine.given_name
        },
        error: None,
        name_error: None,
    };
    render_ok(&template)
}

/// Machine rename form handler.
pub async fn rename_submit(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Path(id): Path<String>,
    Form(form): Form<IntentForm>,
) -> Response {
    if let Err(redirect) = session::require_user(&jar, &format!("/admin/machines/{id}/edit")) {
        return redirect.into_response();
    }

    let rename_template = |current_name: String, error, name_error| RenameTemplate {
        base: base(),
        title: "Rename machine".to_string(),
        action: format!("/admin/machines/{id}/edit"),
        current_name,
        error,
        name_error,
    };

    match form.intent.as_str() {
        "update_name" => {
            let submitted = form.name.clone().unwrap_or_default();
            let name = match validate_name(form.name.as_deref()) {
                Ok(n) => n,
                Err(msg) => {
                    return render_html(
                        StatusCode::BAD_REQUEST,
                        &rename_template(submitted, None, Some(msg)),
                    );
                }
            };
            match state.api.rename_machine(&id, &name).await {
                Ok(_) => Redirect::to("/admin/machines").into_response(),
                Err(e) => {
                    error!(machine = %id, "Failed to rename machine: {e}");
                    let (status, message) = error_parts(&e);
                    render_html(status, &rename_template(submitted, Some(message), None))
                }
            }
        }
        "cancel" => Redirect::to("/admin/machines").into_response(),
        _ => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
    }
}

/// Machine removal confirmation page handler.
pub async fn remove_page(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Path(id): Path<String>,
) -> Response {
    if let Err(redirect) = session::require_user(&jar, &format!("/admin/machines/{id}/remove")) {
        return redirect.into_response();
    }

    let machine = match state.api.get_machine(&id).await {
        Ok(m) => m,
        Err(e) => {
            let (status, message) = error_parts(&e);
            return (status, message).into_response();
        }
    };

    let template = RemoveTemplate {
        base: base(),
        title: "Remove machine".to_string(),
        action: format!("/admin/machines/{id}/remove"),
        name: if machine.given_name.is_empty() {
            machine.name
        } else {
            machine.given_name
        },
        error: None,
    };
    render_ok(&template)
}

/// Machine removal form handler.
pub async fn remove_submit(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Path(id): Path<String>,
    Form(form): Form<IntentForm>,
) -> Response {
    if let Err(redirect) = session::require_user(&jar, &format!("/admin/machines/{id}/remove")) {
        return redirect.into_response();
    }

    match form.intent.as_str() {
        "remove_confirm" => match state.api.delete_machine(&id).await {
            Ok(()) => Redirect::to("/admin/machines").into_response(),
            Err(e) => {
                error!(machine = %id, "Failed to remove machine: {e}");
                let (status, message) = error_parts(&e);
                let template = RemoveTemplate {
                    base: base(),
                    title: "Remove machine".to_string(),
                    action: format!("/admin/machines/{id}/remove"),
                    name: id.clone(),
                    error: Some(message),
                };
                render_html(status, &template)
            }
        },
        "cancel" => Redirect::to("/admin/machines").into_response(),
        _ => (StatusCode::BAD_REQUEST, "Invalid intent").into_response(),
    }
}
