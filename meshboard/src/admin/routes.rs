//! Login, logout, and settings handlers, plus the dashboard router.

use crate::admin::forms::{validate_login, LoginForm};
use crate::admin::templates::{BaseContext, LoginTemplate, SettingsTemplate};
use crate::admin::{machines, namespaces, users, AdminState};
use crate::admin::{render_html, render_ok};
use crate::session;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use tracing::{error, info};

/// Build the dashboard router. Mounted under `/admin`; login and logout
/// live at the top level and are wired by the server.
pub fn admin_router() -> Router<AdminState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/admin/machines") }))
        .route(
            "/machines",
            get(machines::list_page).post(machines::list_submit),
        )
        .route(
            "/machines/{id}/edit",
            get(machines::rename_page).post(machines::rename_submit),
        )
        .route(
            "/machines/{id}/remove",
            get(machines::remove_page).post(machines::remove_submit),
        )
        .route(
            "/namespaces",
            get(namespaces::list_page).post(namespaces::list_submit),
        )
        .route(
            "/namespaces/{name}/edit",
            get(namespaces::rename_page).post(namespaces::rename_submit),
        )
        .route(
            "/namespaces/{name}/remove",
            get(namespaces::remove_page).post(namespaces::remove_submit),
        )
        .route("/users", get(users::list_page).post(users::list_submit))
        .route(
            "/users/{name}/edit",
            get(users::rename_page).post(users::rename_submit),
        )
        .route(
            "/users/{name}/remove",
            get(users::remove_page).post(users::remove_submit),
        )
        .route("/settings", get(settings_page))
}

/// Standalone router for the authentication endpoints.
pub fn auth_router() -> Router<AdminState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", post(logout))
}

#[derive(Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "redirectTo")]
    redirect_to: Option<String>,
}

/// Login page handler.
async fn login_page(jar: PrivateCookieJar, Query(query): Query<LoginQuery>) -> Response {
    // If already logged in, go straight to the dashboard
    if session::user_id(&jar).is_some() {
        return Redirect::to("/admin").into_response();
    }

    let template = LoginTemplate {
        error: None,
        email_error: None,
        password_error: None,
        redirect_to: query.redirect_to.unwrap_or_default(),
    };
    render_ok(&template)
}

/// Login form submission handler.
async fn login_submit(
    State(state): State<AdminState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let redirect_to = form.redirect_to.clone().unwrap_or_default();

    let errors = validate_login(&form);
    if !errors.is_empty() {
        let template = LoginTemplate {
            error: None,
            email_error: errors.email,
            password_error: errors.password,
            redirect_to,
        };
        return render_html(StatusCode::BAD_REQUEST, &template);
    }

    let user = match state.credentials.login(&form.email, &form.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            let template = LoginTemplate {
                error: Some("Invalid email or password".to_string()),
                email_error: None,
                password_error: None,
                redirect_to,
            };
            return render_html(StatusCode::BAD_REQUEST, &template);
        }
        Err(e) => {
            error!("Login error: {e:#}");
            let template = LoginTemplate {
                error: Some("An error occurred. Please try again.".to_string()),
                email_error: None,
                password_error: None,
                redirect_to,
            };
            return render_html(StatusCode::INTERNAL_SERVER_ERROR, &template);
        }
    };

    info!(email = %form.email, "Login succeeded");
    let target = session::safe_redirect(&redirect_to);
    session::create_user_session(jar, &user.id, state.config.is_production(), target)
        .into_response()
}

/// Logout handler.
async fn logout(jar: PrivateCookieJar) -> Response {
    session::destroy_session(jar).into_response()
}

/// Settings page handler. Read-only view of the effective configuration.
async fn settings_page(State(state): State<AdminState>, jar: PrivateCookieJar) -> Response {
    if let Err(redirect) = session::require_user(&jar, "/admin/settings") {
        return redirect.into_response();
    }

    let template = SettingsTemplate {
        base: BaseContext {
            section: "settings",
        },
        api_url: state.config.api.url.clone(),
        auth_backend: state.config.auth.backend.as_str(),
        mode: state.config.mode.as_str(),
    };
    render_ok(&template)
}
