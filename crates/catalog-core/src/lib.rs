//! Catalog Core - the Product model
//!
//! - `Product` and the closed `Category` enum
//! - Validation of untyped input mappings (all-or-nothing deserialize)
//! - Serialization to the flat mapping used by callers
//! - Error facility (`ExError`, `DataValidationError`) and structured logging
//!
//! Persistence is in `catalog-store`.

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;

// Used by the logging macros
pub use catalog_core_types as core_types;

pub use errors::{DataValidationError, ExError, ExErrorKind, Result};
pub use model::{Category, Product};
