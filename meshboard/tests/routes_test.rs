//! End-to-end router tests using in-memory requests.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use meshboard::admin::AdminState;
use meshboard::auth::{AuthenticatedUser, CredentialStore};
use meshboard::config::{
    ApiConfig, AuthConfig, Config, DeploymentMode, HttpConfig, SessionConfig,
};
use meshboard::server::app_router;
use meshboard::session;
use std::sync::Arc;
use tower::ServiceExt;

/// Backend that rejects every credential pair.
struct NoCredentials;

#[async_trait]
impl CredentialStore for NoCredentials {
    async fn login(&self, _email: &str, _password: &str) -> anyhow::Result<Option<AuthenticatedUser>> {
        Ok(None)
    }
}

/// Backend that accepts every credential pair.
struct AlwaysUser;

#[async_trait]
impl CredentialStore for AlwaysUser {
    async fn login(&self, email: &str, _password: &str) -> anyhow::Result<Option<AuthenticatedUser>> {
        Ok(Some(AuthenticatedUser {
            id: "account-1".to_string(),
            email: email.to_string(),
        }))
    }
}

const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

fn test_state(credentials: Arc<dyn CredentialStore>) -> AdminState {
    let config = Config {
        api: ApiConfig {
            // Port 9 (discard); API-backed pages degrade to an error banner
            url: "http://127.0.0.1:9".to_string(),
            key: "test-key".to_string(),
        },
        session: SessionConfig {
            secret: SECRET.to_string(),
        },
        http: HttpConfig::default(),
        auth: AuthConfig::default(),
        mode: DeploymentMode::Development,
    };
    let api = Arc::new(coordinator_api::Client::new(&config.api.url, &config.api.key).unwrap());
    AdminState {
        config: Arc::new(config),
        api,
        credentials,
        session_key: session::session_key(SECRET),
    }
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_root_redirects_to_dashboard() {
    let app = app_router(test_state(Arc::new(NoCredentials)));
    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin");
}

#[tokio::test]
async fn test_login_page_renders() {
    let app = app_router(test_state(Arc::new(NoCredentials)));
    let response = app
        .oneshot(Request::get("/login").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unauthenticated_page_bounces_to_login() {
    let app = app_router(test_state(Arc::new(NoCredentials)));
    let response = app
        .oneshot(
            Request::get("/admin/machines")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/login?redirectTo=%2Fadmin%2Fmachines"
    );
}

#[tokio::test]
async fn test_login_validation_failure_sets_no_cookie() {
    let app = app_router(test_state(Arc::new(AlwaysUser)));
    let response = app
        .oneshot(form_request(
            "/login",
            "email=a%40b.com&password=short",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    // The failing field gets a message; the valid one does not.
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Password must be at least"));
    assert!(!html.contains("Enter a valid email address"));
}

#[tokio::test]
async fn test_login_rejection_is_a_400_without_cookie() {
    let app = app_router(test_state(Arc::new(NoCredentials)));
    let response = app
        .oneshot(form_request(
            "/login",
            "email=admin%40example.com&password=hunter22",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_successful_login_sets_session_and_redirects() {
    let app = app_router(test_state(Arc::new(AlwaysUser)));
    let response = app
        .oneshot(form_request(
            "/login",
            "email=admin%40example.com&password=hunter22",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin");

    let cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    // Development mode keeps cookies usable over plain HTTP
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn test_login_honours_redirect_target() {
    let app = app_router(test_state(Arc::new(AlwaysUser)));
    let response = app
        .oneshot(form_request(
            "/login",
            "email=admin%40example.com&password=hunter22&redirectTo=%2Fadmin%2Fusers",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin/users");
}

#[tokio::test]
async fn test_login_rejects_offsite_redirect_target() {
    let app = app_router(test_state(Arc::new(AlwaysUser)));
    let response = app
        .oneshot(form_request(
            "/login",
            "email=admin%40example.com&password=hunter22&redirectTo=https%3A%2F%2Fevil.example",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin");
}

#[tokio::test]
async fn test_authenticated_page_degrades_when_api_is_down() {
    let state = test_state(Arc::new(AlwaysUser));
    let app = app_router(state.clone());

    // Log in to get a session cookie
    let login = app
        .clone()
        .oneshot(form_request(
            "/login",
            "email=admin%40example.com&password=hunter22",
        ))
        .await
        .unwrap();
    let cookie = login.headers()[header::SET_COOKIE].to_str().unwrap();
    let session_cookie = cookie.split(';').next().unwrap().to_string();

    // The API endpoint is unreachable; the page still renders with an
    // error banner instead of leaking transport detail.
    let response = app
        .oneshot(
            Request::get("/admin/machines")
                .header(header::COOKIE, session_cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Something went wrong"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = app_router(test_state(Arc::new(AlwaysUser)));

    // Log in to get a session cookie
    let login = app
        .clone()
        .oneshot(form_request(
            "/login",
            "email=admin%40example.com&password=hunter22",
        ))
        .await
        .unwrap();
    let cookie = login.headers()[header::SET_COOKIE].to_str().unwrap();
    let session_cookie = cookie.split(';').next().unwrap().to_string();

    // Logging out with the cookie presented expires it
    let response = app
        .oneshot(
            Request::post("/logout")
                .header(header::COOKIE, session_cookie)
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");

    let removal = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(removal.starts_with("_session="));
    assert!(removal.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_unknown_intent_is_rejected() {
    let state = test_state(Arc::new(AlwaysUser));
    let app = app_router(state);

    let login = app
        .clone()
        .oneshot(form_request(
            "/login",
            "email=admin%40example.com&password=hunter22",
        ))
        .await
        .unwrap();
    let cookie = login.headers()[header::SET_COOKIE].to_str().unwrap();
    let session_cookie = cookie.split(';').next().unwrap().to_string();

    let response = app
        .oneshot(
            Request::post("/admin/namespaces")
                .header(header::COOKIE, session_cookie)
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from("intent=explode"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
