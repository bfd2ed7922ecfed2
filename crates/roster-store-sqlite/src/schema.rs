//! SQL schema for the Roster SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Listing order is insertion order (rowid); updates keep a row's position.
CREATE TABLE IF NOT EXISTS contacts (
    id          TEXT PRIMARY KEY,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    email       TEXT NOT NULL,
    role        TEXT NOT NULL,     -- 'Admin' | 'User' | 'Viewer'
    gender      TEXT NOT NULL,     -- 'Male' | 'Female' | 'Other'
    is_active   INTEGER NOT NULL,
    newsletter  INTEGER NOT NULL,
    birth_date  TEXT NOT NULL,     -- YYYY-MM-DD
    created_at  TEXT NOT NULL,     -- RFC 3339 UTC; server-assigned
    updated_at  TEXT NOT NULL
);

PRAGMA user_version = 1;
";
