//! Login credential validation.
//!
//! Handles password hashing (argon2), the local account store, and the
//! pluggable [`CredentialStore`] strategy the login handler talks to:
//! either a database lookup + hash comparison, or delegation to the
//! coordination API.

use crate::db::DbPool;
use crate::sql;
use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

/// Local dashboard account record
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Identity carried by a session after a successful login.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
}

/// Strategy validating submitted credentials.
///
/// `login` returns `Ok(None)` for any credential mismatch; callers must not
/// be able to distinguish "unknown email" from "wrong password". Errors are
/// reserved for infrastructure failures (database down, API unreachable).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Option<AuthenticatedUser>>;
}

/// Database-backed storage for dashboard accounts.
pub struct AccountStore {
    pool: DbPool,
}

impl AccountStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Hash a password using Argon2id.
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("Failed to hash password: {e}"))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash.
    pub fn verify_password(password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Create a new account.
    pub async fn create_account(&self, email: &str, password: &str) -> Result<Account> {
        let password_hash = Self::hash_password(password)?;
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(sql::INSERT_ACCOUNT)
            .bind(&id)
            .bind(email)
            .bind(&password_hash)
            .bind(now.to_rfc3339())
            .execute(&self.pool)
            .await
            .context("Failed to create account")?;

        Ok(Account {
            id,
            email: email.to_string(),
            password_hash,
            created_at: now,
            last_login: None,
        })
    }

    /// Get an account by email.
    pub async fn get_account(&self, email: &str) -> Result<Option<Account>> {
        let row = sqlx::query(sql::SELECT_ACCOUNT_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query account")?;

        let account = match row {
            Some(row) => Some(Account {
                id: row.get("id"),
                email: row.get("email"),
                password_hash: row.get("password_hash"),
                created_at: DateTime::parse_from_rfc3339(row.get("created_at"))
                    .context("Invalid created_at timestamp")?
                    .with_timezone(&Utc),
                last_login: row
                    .get::<Option<String>, _>("last_login")
                    .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                    .map(|dt| dt.with_timezone(&Utc)),
            }),
            None => None,
        };

        Ok(account)
    }

    /// List all accounts.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(sql::SELECT_ALL_ACCOUNTS)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list accounts")?;

        let accounts = rows
            .into_iter()
            .filter_map(|row| {
                Some(Account {
                    id: row.get("id"),
                    email: row.get("email"),
                    password_hash: row.get("password_hash"),
                    created_at: DateTime::parse_from_rfc3339(row.get("created_at"))
                        .ok()?
                        .with_timezone(&Utc),
                    last_login: row
                        .get::<Option<String>, _>("last_login")
                        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                        .map(|dt| dt.with_timezone(&Utc)),
                })
            })
            .collect();

        Ok(accounts)
    }

    /// Delete an account by email.
    pub async fn delete_account(&self, email: &str) -> Result<()> {
        let result = sqlx::query(sql::DELETE_ACCOUNT)
            .bind(email)
            .execute(&self.pool)
            .await
            .context("Failed to delete account")?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Account not found: {email}"));
        }

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for AccountStore {
    async fn login(&self, email: &str, password: &str) -> Result<Option<AuthenticatedUser>> {
        let account = match self.get_account(email).await? {
            Some(a) => a,
            None => return Ok(None),
        };

        if !Self::verify_password(password, &account.password_hash) {
            return Ok(None);
        }

        // Update last login
        sqlx::query(sql::UPDATE_ACCOUNT_LAST_LOGIN)
            .bind(Utc::now().to_rfc3339())
            .bind(&account.id)
            .execute(&self.pool)
            .await
            .ok(); // Don't fail login if this doesn't work

        Ok(Some(AuthenticatedUser {
            id: account.id,
            email: account.email,
        }))
    }
}

/// Credential strategy that delegates to the coordination API.
///
/// The submitted password is treated as a coordination API key and verified
/// by issuing one authenticated probe request with it. A 401/403 answer is
/// a credential mismatch; anything else that fails is an infrastructure
/// error.
pub struct ApiCredentialStore {
    api_url: String,
}

impl ApiCredentialStore {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl CredentialStore for ApiCredentialStore {
    async fn login(&self, email: &str, password: &str) -> Result<Option<AuthenticatedUser>> {
        let client = coordinator_api::Client::new(&self.api_url, password)
            .context("Failed to build probe client")?;

        use coordinator_api::{Error, StatusCode};
        match client.list_users().await {
            Ok(_) => Ok(Some(AuthenticatedUser {
                id: email.to_string(),
                email: email.to_string(),
            })),
            Err(Error::Api { status, .. }) | Err(Error::Http(status))
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                Ok(None)
            }
            Err(e) => Err(e).context("Credential probe against the coordination API failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = "test_password_123";
        let hash = AccountStore::hash_password(password).unwrap();

        // Hash should be different from password
        assert_ne!(hash, password);

        // Should verify correctly
        assert!(AccountStore::verify_password(password, &hash));

        // Wrong password should fail
        assert!(!AccountStore::verify_password("wrong_password", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!AccountStore::verify_password("anything", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let temp = tempfile::TempDir::new().unwrap();
        let db = crate::db::Database::new(&crate::config::DatabaseConfig::default(), temp.path())
            .await
            .unwrap();
        let store = AccountStore::new(db.pool());

        let created = store.create_account("a@b.com", "hunter22").await.unwrap();

        // Matching credentials resolve to the stored account id.
        let user = store.login("a@b.com", "hunter22").await.unwrap().unwrap();
        assert_eq!(user.id, created.id);
        assert_eq!(user.email, "a@b.com");

        // Wrong password and unknown email both come back as "no match",
        // never as an error.
        assert!(store.login("a@b.com", "wrong").await.unwrap().is_none());
        assert!(store.login("nobody@b.com", "hunter22").await.unwrap().is_none());

        // Successful login recorded last_login.
        let account = store.get_account("a@b.com").await.unwrap().unwrap();
        assert!(account.last_login.is_some());
    }
}
