//! Error helpers for catalog-store
//!
//! Store failures are `ExError`s with a persistence-side kind; validation
//! failures arrive already converted from `DataValidationError`.

use catalog_core::errors::{ExError, ExErrorKind};
use rust_decimal::Decimal;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// No row for `id` when one was expected
pub fn not_found(op: &str, id: i64) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(op.to_string())
        .with_product_id(id)
        .with_message("product not found")
}

/// Price does not fit the stored NUMERIC(10,2) representation
pub fn price_overflow(op: &str, price: Decimal) -> ExError {
    ExError::new(ExErrorKind::ConstraintViolation)
        .with_op(op.to_string())
        .with_message(format!(
            "numeric field overflow: price {} exceeds precision 10, scale 2",
            price
        ))
}

/// Configuration could not be loaded or is not usable
pub fn config_error(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_config")
        .with_message(reason)
}

pub fn io_error(op: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(op.to_string())
        .with_message(err.to_string())
}
