//! SQL query constants for the local account store.

pub const INSERT_ACCOUNT: &str = r#"
    INSERT INTO accounts (id, email, password_hash, created_at)
    VALUES (?, ?, ?, ?)
"#;

pub const SELECT_ACCOUNT_BY_EMAIL: &str =
    "SELECT id, email, password_hash, created_at, last_login FROM accounts WHERE email = ?";

pub const SELECT_ALL_ACCOUNTS: &str =
    "SELECT id, email, password_hash, created_at, last_login FROM accounts ORDER BY created_at";

pub const DELETE_ACCOUNT: &str = "DELETE FROM accounts WHERE email = ?";

pub const UPDATE_ACCOUNT_LAST_LOGIN: &str = "UPDATE accounts SET last_login = ? WHERE id = ?";
