pub mod validation;

pub use validation::{normalize_price, parse_price_token, validate_product_input, ProductInput};
