//! SQL schema for the BioLab SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Contact-form submissions. Rows are never deleted; archival is the
-- ARCHIVED status value. Only the status column is ever updated.
CREATE TABLE IF NOT EXISTS inquiries (
    inquiry_id   TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    email        TEXT NOT NULL,
    phone        TEXT,
    university   TEXT,
    subject      TEXT,
    service_type TEXT,
    message      TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'NEW',  -- 'NEW' | 'IN_PROGRESS' | 'COMPLETED' | 'ARCHIVED'
    created_at   TEXT NOT NULL                 -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS posts (
    post_id      TEXT PRIMARY KEY,
    slug         TEXT NOT NULL UNIQUE,
    title_bg     TEXT NOT NULL,
    title_en     TEXT NOT NULL,
    excerpt_bg   TEXT,
    excerpt_en   TEXT,
    body_bg      TEXT NOT NULL,
    body_en      TEXT NOT NULL,
    author       TEXT,
    published    INTEGER NOT NULL DEFAULT 0,
    published_at TEXT,                         -- stamped on first publish
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS inquiries_created_idx ON inquiries(created_at);
CREATE INDEX IF NOT EXISTS inquiries_status_idx  ON inquiries(status);
CREATE INDEX IF NOT EXISTS posts_published_idx   ON posts(published, published_at);

PRAGMA user_version = 1;
";
