pub const SCHEMA: &str = r#"
-- Users table: one record per family member
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,            -- hex SHA-256 digest of the plaintext
    role TEXT NOT NULL,                -- free-text family role ("Mum", "Dad", ...)
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- Photos table: uploaded photos with their captions and relations
CREATE TABLE IF NOT EXISTS photos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    date TEXT NOT NULL,                -- calendar date of the photo, YYYY-MM-DD
    location TEXT NOT NULL,
    people TEXT NOT NULL DEFAULT '',   -- comma-joined user ids
    tags TEXT NOT NULL DEFAULT '',     -- comma-joined labels
    uploader_id INTEGER NOT NULL,
    image_data TEXT NOT NULL,          -- base64-encoded JPEG
    created_at TEXT NOT NULL,          -- RFC 3339, sub-second precision
    FOREIGN KEY (uploader_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_photos_date ON photos(date);
CREATE INDEX IF NOT EXISTS idx_photos_uploader ON photos(uploader_id);
"#;
