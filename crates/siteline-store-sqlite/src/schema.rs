//! SQL schema for the Siteline SQLite store.
//!
//! A single key-value table: the whole RFI lives in `body_json`. The
//! `rfi_number` and `updated_at` columns are denormalised copies kept for
//! uniqueness and inspection, never read back as the source of truth.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS rfis (
    rfi_id     TEXT PRIMARY KEY,
    rfi_number TEXT NOT NULL UNIQUE,
    body_json  TEXT NOT NULL,
    updated_at TEXT NOT NULL    -- ISO 8601 UTC; copied from the body
);

CREATE INDEX IF NOT EXISTS rfis_updated_idx ON rfis(updated_at);

PRAGMA user_version = 1;
";
