//! Credential store: user records and password digests.
//!
//! Passwords are stored as unsalted hex SHA-256 digests, matching what the
//! household already has on disk. Authentication compares email and digest
//! in a single lookup, so a wrong email and a wrong password are
//! indistinguishable to the caller.

use anyhow::Result;
use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::error::Error;

/// One row of the users table, minus the password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub role: String,
}

/// Demo accounts inserted on first initialization.
const DEMO_ACCOUNTS: &[(&str, &str, &str)] = &[
    ("john@family.com", "demo123", "Dad"),
    ("mary@family.com", "demo123", "Mum"),
    ("sarah@family.com", "demo123", "Daughter"),
];

pub fn hash_password(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Insert a new user. No password strength or email format checks; role is
/// any string the caller chooses.
pub fn register(conn: &Connection, email: &str, password: &str, role: &str) -> Result<i64> {
    let digest = hash_password(password);
    let result = conn.execute(
        "INSERT INTO users (email, password, role) VALUES (?, ?, ?)",
        rusqlite::params![email, digest, role],
    );
    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(Error::DuplicateEmail.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Look up a user by email and password digest. Returns the id and role on
/// a match, `None` on any mismatch.
pub fn authenticate(
    conn: &Connection,
    email: &str,
    password: &str,
) -> Result<Option<(i64, String)>> {
    let digest = hash_password(password);
    let result = conn.query_row(
        "SELECT id, role FROM users WHERE email = ? AND password = ?",
        rusqlite::params![email, digest],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
    );
    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Every registered user in insertion order. No pagination; the people
/// picker and the role map both consume the full list.
pub fn list_all(conn: &Connection) -> Result<Vec<UserSummary>> {
    let mut stmt = conn.prepare("SELECT id, email, role FROM users")?;
    let users = stmt
        .query_map([], |row| {
            Ok(UserSummary {
                id: row.get(0)?,
                email: row.get(1)?,
                role: row.get(2)?,
            })
        })?
        .filter_map(|r| r.ok())
        .collect();
    Ok(users)
}

pub fn get_by_id(conn: &Connection, user_id: i64) -> Result<Option<UserSummary>> {
    let result = conn.query_row(
        "SELECT id, email, role FROM users WHERE id = ?",
        [user_id],
        |row| {
            Ok(UserSummary {
                id: row.get(0)?,
                email: row.get(1)?,
                role: row.get(2)?,
            })
        },
    );
    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert the demo accounts if absent. Safe to run on every initialization.
pub fn seed_demo_accounts(conn: &Connection) -> Result<()> {
    for (email, password, role) in DEMO_ACCOUNTS {
        let digest = hash_password(password);
        conn.execute(
            "INSERT OR IGNORE INTO users (email, password, role) VALUES (?, ?, ?)",
            rusqlite::params![email, digest, role],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::SCHEMA;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn
    }

    #[test]
    fn test_register_then_duplicate() {
        let conn = test_conn();
        let id = register(&conn, "nana@family.com", "hunter2", "Grandparent").unwrap();
        assert!(id > 0);

        let err = register(&conn, "nana@family.com", "other", "Other").unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::DuplicateEmail));
    }

    #[test]
    fn test_authenticate_matches_digest() {
        let conn = test_conn();
        let id = register(&conn, "tom@family.com", "secret", "Son").unwrap();

        let (auth_id, role) = authenticate(&conn, "tom@family.com", "secret")
            .unwrap()
            .unwrap();
        assert_eq!(auth_id, id);
        assert_eq!(role, "Son");
    }

    #[test]
    fn test_authenticate_mismatches_are_indistinguishable() {
        let conn = test_conn();
        register(&conn, "tom@family.com", "secret", "Son").unwrap();

        let wrong_password = authenticate(&conn, "tom@family.com", "nope").unwrap();
        let unknown_email = authenticate(&conn, "who@family.com", "secret").unwrap();
        assert_eq!(wrong_password, None);
        assert_eq!(unknown_email, None);
    }

    #[test]
    fn test_get_by_id_missing_is_none() {
        let conn = test_conn();
        assert_eq!(get_by_id(&conn, 9999).unwrap(), None);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let conn = test_conn();
        seed_demo_accounts(&conn).unwrap();
        seed_demo_accounts(&conn).unwrap();
        assert_eq!(list_all(&conn).unwrap().len(), 3);
    }

    #[test]
    fn test_role_is_free_text() {
        let conn = test_conn();
        seed_demo_accounts(&conn).unwrap();
        // A second "Dad" is allowed; role carries no uniqueness.
        register(&conn, "stepdad@family.com", "pw", "Dad").unwrap();
        register(&conn, "dog@family.com", "woof", "Golden Retriever").unwrap();
        assert_eq!(list_all(&conn).unwrap().len(), 5);
    }
}
