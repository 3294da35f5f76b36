use catalog_core::{Category, Product};
use catalog_store::{init_db, Database, DbConfig};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Names drawn from a small pool so that batches contain duplicates
pub const NAMES: [&str; 6] = ["Hat", "Pants", "Shirt", "Apple", "Banana", "Hammer"];

/// Fresh in-memory database with the product table
#[allow(dead_code)]
pub fn new_db() -> Database {
    init_db(&DbConfig::in_memory()).unwrap()
}

/// A transient product with fixed fields
#[allow(dead_code)]
pub fn product(name: &str, cents: i64, available: bool, category: Category) -> Product {
    Product::new(
        name,
        format!("{} for testing", name),
        Decimal::new(cents, 2),
        available,
        category,
    )
}

#[allow(dead_code)]
pub fn arb_category() -> impl Strategy<Value = Category> {
    proptest::sample::select(Category::ALL.to_vec())
}

/// Transient products with prices from a narrow band, so equal prices occur
#[allow(dead_code)]
pub fn arb_product() -> impl Strategy<Value = Product> {
    (
        proptest::sample::select(NAMES.to_vec()),
        "[a-z ]{0,30}",
        prop_oneof![Just(1250_i64), Just(500), 0_i64..5_000],
        any::<bool>(),
        arb_category(),
    )
        .prop_map(|(name, description, cents, available, category)| {
            Product::new(name, description, Decimal::new(cents, 2), available, category)
        })
}

#[allow(dead_code)]
pub fn arb_batch(max: usize) -> impl Strategy<Value = Vec<Product>> {
    proptest::collection::vec(arb_product(), 1..=max)
}
