//! Redaction wrapper for credentials
//!
//! Connection strings routinely embed a password, so configuration values
//! that may contain one are held as `Sensitive<T>` and print as a fixed
//! placeholder in both `Debug` and `Display`.

use std::fmt;

pub const REDACTED: &str = "***REDACTED***";

/// Wrapper that redacts its value in Debug and Display
///
/// # Example
///
/// ```
/// use catalog_core_types::Sensitive;
///
/// let uri = Sensitive::new("postgresql://app:hunter2@db/catalog".to_string());
/// assert_eq!(format!("{}", uri), "***REDACTED***");
/// assert!(uri.expose().contains("hunter2"));
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the real value; only call this where the value is consumed
    /// (opening a connection), never on a logging path.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: PartialEq> PartialEq for Sensitive<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Eq> Eq for Sensitive<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_are_redacted() {
        let uri = Sensitive::new("sqlite://secret.db");
        assert_eq!(format!("{:?}", uri), REDACTED);
        assert_eq!(format!("{}", uri), REDACTED);
    }

    #[test]
    fn test_expose_and_into_inner() {
        let uri = Sensitive::new(String::from("sqlite::memory:"));
        assert_eq!(uri.expose(), "sqlite::memory:");
        assert_eq!(uri.into_inner(), "sqlite::memory:");
    }

    #[test]
    fn test_equality_compares_inner_value() {
        let a = Sensitive::new(1);
        assert_eq!(a.clone(), Sensitive::new(1));
        assert_ne!(a, Sensitive::new(2));
    }

    #[test]
    fn test_redacted_inside_derived_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Settings {
            busy_timeout_ms: u64,
            database_uri: Sensitive<String>,
        }

        let settings = Settings {
            busy_timeout_ms: 5000,
            database_uri: Sensitive::new("postgresql://app:pw@db/x".to_string()),
        };

        let debug_str = format!("{:?}", settings);
        assert!(debug_str.contains("5000"));
        assert!(debug_str.contains(REDACTED));
        assert!(!debug_str.contains("pw@db"));
    }
}
