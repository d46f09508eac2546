mod schema;
pub mod photos;
pub mod users;

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;

pub use photos::Photo;
pub use users::UserSummary;

use schema::SCHEMA;

/// Access layer over the two stores.
///
/// Holds only the database path: every operation opens its own connection,
/// acts, and drops it on return. There is no shared mutable handle, so no
/// locking; concurrent writers rely on SQLite's per-statement atomicity.
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Create the schema and, when asked, the demo accounts. Idempotent:
    /// repeated runs neither duplicate rows nor error.
    pub fn initialize(&self, seed_demo_accounts: bool) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        if seed_demo_accounts {
            users::seed_demo_accounts(&conn)?;
        }
        info!("Database initialized at {:?}", self.path);
        Ok(())
    }

    // ========================================================================
    // Credential store
    // ========================================================================

    pub fn register_user(&self, email: &str, password: &str, role: &str) -> Result<i64> {
        users::register(&self.connect()?, email, password, role)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<(i64, String)>> {
        users::authenticate(&self.connect()?, email, password)
    }

    pub fn list_users(&self) -> Result<Vec<UserSummary>> {
        users::list_all(&self.connect()?)
    }

    pub fn get_user(&self, user_id: i64) -> Result<Option<UserSummary>> {
        users::get_by_id(&self.connect()?, user_id)
    }

    /// Resolve people ids to users, silently dropping ids with no matching
    /// record. A stale id must never break photo rendering.
    pub fn resolve_people(&self, ids: &[i64]) -> Result<Vec<UserSummary>> {
        let conn = self.connect()?;
        let mut people = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(user) = users::get_by_id(&conn, id)? {
                people.push(user);
            }
        }
        Ok(people)
    }

    // ========================================================================
    // Photo store
    // ========================================================================

    #[allow(clippy::too_many_arguments)]
    pub fn save_photo(
        &self,
        title: &str,
        description: &str,
        date: NaiveDate,
        location: &str,
        people: &[i64],
        tags: &[String],
        uploader_id: i64,
        image_data: &str,
    ) -> Result<i64> {
        let id = photos::save(
            &self.connect()?,
            title,
            description,
            date,
            location,
            people,
            tags,
            uploader_id,
            image_data,
        )?;
        info!(photo_id = id, uploader_id, "Photo saved");
        Ok(id)
    }

    pub fn list_photos(&self) -> Result<Vec<Photo>> {
        photos::list_all(&self.connect()?)
    }

    pub fn search_photos(&self, query: &str) -> Result<Vec<Photo>> {
        photos::search(&self.connect()?, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("famstory.db")).unwrap();
        db.initialize(true).unwrap();
        (dir, db)
    }

    #[test]
    fn test_initialize_twice_keeps_three_demo_accounts() {
        let (_dir, db) = test_db();
        db.initialize(true).unwrap();
        assert_eq!(db.list_users().unwrap().len(), 3);
    }

    #[test]
    fn test_demo_account_can_authenticate() {
        let (_dir, db) = test_db();
        let (_, role) = db
            .authenticate("john@family.com", "demo123")
            .unwrap()
            .unwrap();
        assert_eq!(role, "Dad");
    }

    #[test]
    fn test_resolve_people_drops_missing_ids() {
        let (_dir, db) = test_db();
        let known: Vec<i64> = db.list_users().unwrap().iter().map(|u| u.id).collect();

        let mut ids = known.clone();
        ids.push(9999); // never existed
        let resolved = db.resolve_people(&ids).unwrap();
        assert_eq!(
            resolved.iter().map(|u| u.id).collect::<Vec<_>>(),
            known
        );
    }

    #[test]
    fn test_operations_span_connections() {
        let (_dir, db) = test_db();
        let uploader = db.list_users().unwrap()[0].id;
        let date = chrono::NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        db.save_photo("Christmas", "", date, "Home", &[uploader], &[], uploader, "")
            .unwrap();

        // Each call opens a fresh connection against the same file.
        assert_eq!(db.list_photos().unwrap().len(), 1);
        assert_eq!(db.search_photos("christmas").unwrap().len(), 1);
    }

    #[test]
    fn test_initialize_without_seed() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("bare.db")).unwrap();
        db.initialize(false).unwrap();
        assert!(db.list_users().unwrap().is_empty());
    }
}
