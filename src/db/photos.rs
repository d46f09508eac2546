//! Photo store: uploaded photos with captions, relations and payload.
//!
//! People and tags are denormalized as comma-joined text on the photo row.
//! Round-tripping through list/search reproduces the same sets; order
//! within a set carries no meaning.

use anyhow::Result;
use chrono::{NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, Row};

/// One row of the photos table.
#[derive(Debug, Clone)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
    pub people: Vec<i64>,
    pub tags: Vec<String>,
    pub uploader_id: i64,
    /// Base64-encoded JPEG, bounded by the configured maximum dimension.
    pub image_data: String,
    pub created_at: String,
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn split_ids(text: &str) -> Vec<i64> {
    text.split(',').filter_map(|s| s.trim().parse().ok()).collect()
}

fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn photo_from_row(row: &Row) -> rusqlite::Result<Photo> {
    let people: String = row.get(5)?;
    let tags: String = row.get(6)?;
    Ok(Photo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        date: row.get(3)?,
        location: row.get(4)?,
        people: split_ids(&people),
        tags: split_tags(&tags),
        uploader_id: row.get(7)?,
        image_data: row.get(8)?,
        created_at: row.get(9)?,
    })
}

const PHOTO_COLUMNS: &str =
    "id, title, description, date, location, people, tags, uploader_id, image_data, created_at";

/// Persist a new photo. `created_at` is assigned from the clock with
/// sub-second precision so equal-dated photos keep their insertion order.
/// Uploader existence is not checked here; the caller validates it.
#[allow(clippy::too_many_arguments)]
pub fn save(
    conn: &Connection,
    title: &str,
    description: &str,
    date: NaiveDate,
    location: &str,
    people: &[i64],
    tags: &[String],
    uploader_id: i64,
    image_data: &str,
) -> Result<i64> {
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    conn.execute(
        r#"
        INSERT INTO photos (title, description, date, location, people, tags, uploader_id, image_data, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        rusqlite::params![
            title,
            description,
            date,
            location,
            join_ids(people),
            join_tags(tags),
            uploader_id,
            image_data,
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Every photo, newest calendar date first; within a date, the most
/// recently inserted photo first (id breaks exact timestamp ties).
pub fn list_all(conn: &Connection) -> Result<Vec<Photo>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PHOTO_COLUMNS} FROM photos ORDER BY date DESC, created_at DESC, id DESC"
    ))?;
    let photos = stmt
        .query_map([], photo_from_row)?
        .filter_map(|r| r.ok())
        .collect();
    Ok(photos)
}

/// Substring search over title, description, location, tags and the
/// serialized people ids, in list order. Matching is case-insensitive for
/// ASCII (SQLite `LIKE` semantics). People match only on the literal
/// numeric id, an artifact of the denormalized storage.
pub fn search(conn: &Connection, query: &str) -> Result<Vec<Photo>> {
    let like = format!("%{query}%");
    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {PHOTO_COLUMNS} FROM photos
        WHERE title LIKE ?1 OR description LIKE ?1 OR location LIKE ?1 OR tags LIKE ?1 OR people LIKE ?1
        ORDER BY date DESC, created_at DESC, id DESC
        "#
    ))?;
    let photos = stmt
        .query_map([&like], photo_from_row)?
        .filter_map(|r| r.ok())
        .collect();
    Ok(photos)
}
