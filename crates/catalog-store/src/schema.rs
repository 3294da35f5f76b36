//! Table definition for products
//!
//! The schema is created idempotently at startup; there is no versioned
//! migration history.

use rusqlite::Connection;

use crate::errors::{from_rusqlite, Result};

/// `price` holds the decimal text at scale 2, so equality lookups compare
/// normalized strings. `available` is 0/1.
pub const CREATE_PRODUCT_TABLE: &str = "
CREATE TABLE IF NOT EXISTS product (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL CHECK (length(trim(name)) > 0),
    description TEXT    NOT NULL,
    price       TEXT    NOT NULL,
    available   INTEGER NOT NULL CHECK (available IN (0, 1)),
    category    TEXT    NOT NULL DEFAULT 'UNKNOWN'
);
CREATE INDEX IF NOT EXISTS idx_product_name ON product (name);
CREATE INDEX IF NOT EXISTS idx_product_category ON product (category);
";

/// Create the product table and its indexes if they do not exist
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_PRODUCT_TABLE)
        .map_err(from_rusqlite)
}
