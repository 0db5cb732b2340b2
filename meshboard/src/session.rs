//! Session cookie handling.
//!
//! Sessions are stateless: the account id lives inside a signed and
//! encrypted cookie (`PrivateCookieJar`), so the server keeps no session
//! table. Rotating the configured secret invalidates every outstanding
//! session at once.

use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use time::Duration;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "_session";

/// Sessions last 30 days from issuance; there is no sliding refresh.
const SESSION_TTL_DAYS: i64 = 30;

/// Derive the cookie signing/encryption key from the configured secret.
pub fn session_key(secret: &str) -> Key {
    Key::derive_from(secret.as_bytes())
}

fn session_cookie(user_id: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, user_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Issue a session for `user_id` and redirect to the post-login target.
pub fn create_user_session(
    jar: PrivateCookieJar,
    user_id: &str,
    secure: bool,
    redirect_to: &str,
) -> (PrivateCookieJar, Redirect) {
    let jar = jar.add(session_cookie(user_id.to_string(), secure));
    (jar, Redirect::to(redirect_to))
}

/// Read the logged-in account id from the jar, if a valid session cookie is
/// present. Tampered or wrongly-keyed cookies fail decryption and read as
/// absent.
pub fn user_id(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Require a logged-in session, or bounce to the login page with the
/// original path preserved so login can return the user where they were
/// headed.
pub fn require_user(jar: &PrivateCookieJar, original_path: &str) -> Result<String, Redirect> {
    match user_id(jar) {
        Some(id) => Ok(id),
        None => Err(Redirect::to(&login_redirect(original_path))),
    }
}

/// Login URL carrying the page to return to after authentication.
pub fn login_redirect(path: &str) -> String {
    format!("/login?redirectTo={}", urlencoding::encode(path))
}

/// Remove the session cookie and send the user back to the login page.
pub fn destroy_session(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/login"))
}

/// Clamp a client-supplied redirect target to a local path.
///
/// Only same-site absolute paths are honoured; anything else (full URLs,
/// scheme-relative `//host` forms, empty strings) falls back to the
/// dashboard root so the login form cannot be used as an open redirect.
pub fn safe_redirect(target: &str) -> &str {
    if target.starts_with('/') && !target.starts_with("//") {
        target
    } else {
        "/admin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> Key {
        session_key("0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef")
    }

    #[test]
    fn test_session_round_trip() {
        let jar = PrivateCookieJar::new(test_key());
        assert!(user_id(&jar).is_none());

        let (jar, _) = create_user_session(jar, "account-42", false, "/admin");
        assert_eq!(user_id(&jar).as_deref(), Some("account-42"));

        let (jar, _) = destroy_session(jar);
        assert!(user_id(&jar).is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("account-42".into(), true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::days(30)));
    }

    #[test]
    fn test_secure_flag_follows_mode() {
        let cookie = session_cookie("account-42".into(), false);
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn test_require_user_redirects_with_original_path() {
        let jar = PrivateCookieJar::new(test_key());
        let err = require_user(&jar, "/admin/machines").unwrap_err();
        // Redirect target is checked indirectly via login_redirect
        drop(err);
        assert_eq!(
            login_redirect("/admin/machines"),
            "/login?redirectTo=%2Fadmin%2Fmachines"
        );
    }

    #[test]
    fn test_safe_redirect() {
        assert_eq!(safe_redirect("/admin/users"), "/admin/users");
        assert_eq!(safe_redirect("https://evil.example"), "/admin");
        assert_eq!(safe_redirect("//evil.example"), "/admin");
        assert_eq!(safe_redirect(""), "/admin");
    }
}
