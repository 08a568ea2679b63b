//! SQL schema for the Kibble SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Feedings are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS feedings (
    feeding_id     TEXT PRIMARY KEY,
    subject        TEXT NOT NULL,   -- normalised subject name
    fed_on         TEXT NOT NULL,   -- ISO 8601 calendar date (YYYY-MM-DD)
    food_class     TEXT NOT NULL,   -- 'dry' | 'wet'
    food_id        TEXT NOT NULL,
    quantity_grams REAL NOT NULL CHECK (quantity_grams >= 0),
    kcal_total     REAL NOT NULL CHECK (kcal_total >= 0),  -- server-derived
    recorded_at    TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS feedings_fed_on_idx  ON feedings(fed_on);
CREATE INDEX IF NOT EXISTS feedings_subject_idx ON feedings(subject);

PRAGMA user_version = 1;
";
