//! Input validation for product mappings
//!
//! Everything here is pure: a mapping goes in, either a fully validated
//! [`ProductInput`] or the first [`DataValidationError`] comes out. Callers
//! apply the result only on success, which is what makes deserialization
//! all-or-nothing.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::errors::DataValidationError;
use crate::model::Category;

/// Digits kept after the decimal point when a price is stored
pub const PRICE_SCALE: u32 = 2;

/// Digits allowed before the decimal point (NUMERIC(10,2))
pub const PRICE_INTEGER_DIGITS: u32 = 8;

/// Validated field values of a product mapping
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

/// Validate a product mapping
///
/// Keys are checked in the order `name, description, price, available,
/// category`; the first problem found is reported. A missing `price` is
/// bad-or-no-data like a `null` one, not a missing key. `id` is ignored.
pub fn validate_product_input(data: &Value) -> Result<ProductInput, DataValidationError> {
    let obj = data.as_object().ok_or_else(|| {
        DataValidationError::bad_or_no_data(format!("(expected an object, got {})", json_type_name(data)))
    })?;

    let name = require_string(obj, "name")?;
    if name.trim().is_empty() {
        return Err(DataValidationError::bad_or_no_data("(name must not be empty)"));
    }
    let description = require_string(obj, "description")?;
    let price = match obj.get("price") {
        Some(value) => parse_price_value(value)?,
        None => return Err(DataValidationError::bad_or_no_data("([price] is missing)")),
    };
    let available = require_bool(obj, "available")?;
    let category = parse_category_value(require(obj, "category")?)?;

    Ok(ProductInput {
        name,
        description,
        price,
        available,
        category,
    })
}

fn require<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Value, DataValidationError> {
    obj.get(key)
        .ok_or_else(|| DataValidationError::missing_field(key))
}

fn require_string(obj: &Map<String, Value>, key: &str) -> Result<String, DataValidationError> {
    match require(obj, key)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(DataValidationError::bad_or_no_data(format!(
            "([{}] must be a string, got {})",
            key,
            json_type_name(other)
        ))),
    }
}

fn require_bool(obj: &Map<String, Value>, key: &str) -> Result<bool, DataValidationError> {
    match require(obj, key)? {
        Value::Bool(b) => Ok(*b),
        other => Err(DataValidationError::InvalidBooleanType {
            field: key.to_string(),
            found: json_type_name(other).to_string(),
        }),
    }
}

/// Price from a JSON string or number; `null` and other types are bad data
pub fn parse_price_value(value: &Value) -> Result<Decimal, DataValidationError> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(DataValidationError::bad_or_no_data(format!(
                "([price] must be a decimal string or number, got {})",
                json_type_name(other)
            )))
        }
    };

    parse_decimal(&text).ok_or_else(|| {
        DataValidationError::bad_or_no_data(format!("([price] '{}' is not a decimal value)", text))
    })
}

fn parse_category_value(value: &Value) -> Result<Category, DataValidationError> {
    match value {
        Value::String(s) => s.parse(),
        other => Err(DataValidationError::InvalidAttribute {
            token: other.to_string(),
        }),
    }
}

/// Coerce a price lookup token to a decimal
///
/// Tolerates surrounding whitespace and double quotes, as left behind by
/// query strings like `price="12.50"`.
pub fn parse_price_token(token: &str) -> Result<Decimal, DataValidationError> {
    let cleaned = token.trim_matches(|c: char| c.is_whitespace() || c == '"');
    parse_decimal(cleaned).ok_or_else(|| DataValidationError::InvalidPrice {
        token: token.to_string(),
    })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Round a price to the stored scale
///
/// Returns `None` when the rounded value does not fit in
/// [`PRICE_INTEGER_DIGITS`] integer digits.
pub fn normalize_price(price: Decimal) -> Option<Decimal> {
    let mut rounded =
        price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);

    let limit = Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS));
    if rounded.abs() >= limit {
        None
    } else {
        Some(rounded)
    }
}

/// JSON type name used in validation messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
