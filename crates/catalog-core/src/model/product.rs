use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use std::fmt;

use super::category::Category;
use crate::errors::DataValidationError;
use crate::rules::validation::validate_product_input;

/// Product - the single catalog entity
///
/// `id` is `None` while the product is transient and is assigned by the
/// store on insert. Persistence lives in `catalog-store`; this type only
/// knows how to validate and (de)serialize itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Store-assigned primary key
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    /// Exact monetary value; stored rounded to two places
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Product {
    /// Create a transient product
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            available,
            category,
        }
    }

    /// True until the store has assigned an id
    pub fn is_transient(&self) -> bool {
        self.id.is_none()
    }

    /// Flat mapping with keys `id, name, description, price, available, category`
    ///
    /// `price` is rendered as a decimal string and `category` as its name.
    pub fn serialize(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), json!(self.id));
        map.insert("name".to_string(), json!(self.name));
        map.insert("description".to_string(), json!(self.description));
        map.insert("price".to_string(), json!(self.price.to_string()));
        map.insert("available".to_string(), json!(self.available));
        map.insert("category".to_string(), json!(self.category.as_str()));
        map
    }

    /// Populate every field except `id` from an untyped mapping
    ///
    /// On error the product is left exactly as it was.
    pub fn deserialize(&mut self, data: &Value) -> Result<&mut Self, DataValidationError> {
        let input = validate_product_input(data)?;

        self.name = input.name;
        self.description = input.description;
        self.price = input.price;
        self.available = input.available;
        self.category = input.category;
        Ok(self)
    }

    /// Build a transient product straight from a mapping
    pub fn from_value(data: &Value) -> Result<Self, DataValidationError> {
        let input = validate_product_input(data)?;
        Ok(Self::new(
            input.name,
            input.description,
            input.price,
            input.available,
            input.category,
        ))
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}
