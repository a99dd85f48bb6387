//! SQL schema for the SQLite entity store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS entities (
    entity_id    TEXT PRIMARY KEY,
    kind         TEXT NOT NULL,   -- 'journal' | 'issue' | 'document'
    status       TEXT NOT NULL,   -- migration lifecycle, SCREAMING_SNAKE_CASE
    isis_created TEXT,            -- normalized legacy timestamps
    isis_updated TEXT,
    created_at   TEXT,            -- ISO 8601 UTC; stamped on first save
    updated_at   TEXT,            -- ISO 8601 UTC; stamped on every save
    record_json  TEXT,            -- the raw legacy record, verbatim
    details_json TEXT NOT NULL    -- kind-tagged derived fields
);

CREATE INDEX IF NOT EXISTS entities_kind_idx         ON entities(kind);
CREATE INDEX IF NOT EXISTS entities_status_idx       ON entities(status);
CREATE INDEX IF NOT EXISTS entities_isis_updated_idx ON entities(isis_updated);

PRAGMA user_version = 1;
";
