//! SQL schema for the FindIt SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    username    TEXT NOT NULL,
    avatar_url  TEXT NOT NULL,
    email       TEXT,
    phone       TEXT
);

-- Items are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS items (
    seq           INTEGER PRIMARY KEY AUTOINCREMENT,  -- insertion order
    item_id       TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL CHECK (trim(name) != ''),
    description   TEXT NOT NULL DEFAULT '',
    status        TEXT NOT NULL,   -- 'Lost' | 'Found'
    image_url     TEXT NOT NULL,
    latitude      REAL NOT NULL CHECK (latitude  BETWEEN -90  AND 90),
    longitude     REAL NOT NULL CHECK (longitude BETWEEN -180 AND 180),
    location_text TEXT NOT NULL,
    reported_at   TEXT NOT NULL,   -- fixed-width RFC 3339 UTC; server-assigned
    author_id     TEXT NOT NULL REFERENCES users(user_id),
    region        TEXT NOT NULL    -- 'Local' | 'America' | 'Asia' | 'Africa' | 'Europe'
);

CREATE INDEX IF NOT EXISTS items_reported_idx ON items(reported_at);
CREATE INDEX IF NOT EXISTS items_author_idx   ON items(author_id);

PRAGMA user_version = 1;
";
