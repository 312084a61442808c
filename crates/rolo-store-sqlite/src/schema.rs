//! SQL schema for the Rolo SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS contacts (
    contact_id   TEXT PRIMARY KEY,
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL,
    email        TEXT NOT NULL UNIQUE,
    phone_number TEXT NOT NULL UNIQUE,
    birthday     TEXT,            -- YYYY-MM-DD or NULL
    address      TEXT,
    notes        TEXT,
    gender       TEXT,            -- 'Male' | 'Female' | 'Other' or NULL
    category     TEXT NOT NULL,   -- one of the fifteen Category names
    image_url    TEXT             -- /uploads/<file> or NULL
);

PRAGMA user_version = 1;
";

/// Column list shared by every `SELECT`, in [`crate::encode::RawContact`]
/// field order.
pub const CONTACT_COLUMNS: &str = "contact_id, first_name, last_name, email, \
  phone_number, birthday, address, notes, gender, category, image_url";
