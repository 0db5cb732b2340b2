//! Form payloads and field validation.
//!
//! Mutating pages receive a single form shape whose `intent` field selects
//! the action, mirroring how the HTML puts several submit buttons on one
//! form. Validation failures surface as per-field messages rendered next to
//! the input, not as request rejections.

use serde::Deserialize;

/// Resource names are bounded like DNS labels.
pub const MAX_NAME_LEN: usize = 63;

/// Minimum accepted login password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

/// Per-field login validation errors.
#[derive(Debug, Default)]
pub struct LoginErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Validate a login submission before touching the credential backend.
pub fn validate_login(form: &LoginForm) -> LoginErrors {
    let mut errors = LoginErrors::default();
    if !form.email.contains('@') {
        errors.email = Some("Enter a valid email address".to_string());
    }
    if form.password.len() < MIN_PASSWORD_LEN {
        errors.password = Some(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    errors
}

/// Intent-dispatched form used by every mutating dashboard page.
///
/// All value fields are optional; which ones a given intent requires is
/// checked by the handler dispatching on `intent`.
#[derive(Debug, Deserialize)]
pub struct IntentForm {
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// Validate a resource name, returning the trimmed value or a field error.
pub fn validate_name(raw: Option<&str>) -> Result<String, String> {
    let name = raw.unwrap_or("").trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!("Name must be at most {MAX_NAME_LEN} characters"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_login() {
        let ok = LoginForm {
            email: "admin@example.com".into(),
            password: "hunter22".into(),
            redirect_to: None,
        };
        assert!(validate_login(&ok).is_empty());

        let bad_email = LoginForm {
            email: "not-an-email".into(),
            password: "hunter22".into(),
            redirect_to: None,
        };
        assert!(validate_login(&bad_email).email.is_some());

        let short_password = LoginForm {
            email: "admin@example.com".into(),
            password: "short".into(),
            redirect_to: None,
        };
        assert!(validate_login(&short_password).password.is_some());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name(Some("  mesh  ")).unwrap(), "mesh");
        assert!(validate_name(None).is_err());
        assert!(validate_name(Some("   ")).is_err());
        assert!(validate_name(Some(&"x".repeat(64))).is_err());
        assert_eq!(validate_name(Some(&"x".repeat(63))).unwrap().len(), 63);
    }
}
