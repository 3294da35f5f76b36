// Round-trip law: deserialize(serialize(p)) reproduces p (modulo id,
// which is store-owned and never read from input).

use catalog_core::{Category, Product};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value;

fn arb_category() -> impl Strategy<Value = Category> {
    proptest::sample::select(Category::ALL.to_vec())
}

fn arb_product() -> impl Strategy<Value = Product> {
    (
        "[A-Za-z][A-Za-z ]{0,19}",
        ".{0,40}",
        0_i64..200_000,
        any::<bool>(),
        arb_category(),
        proptest::option::of(1_i64..10_000),
    )
        .prop_map(|(name, description, cents, available, category, id)| {
            let mut product = Product::new(
                name,
                description,
                Decimal::new(cents, 2),
                available,
                category,
            );
            product.id = id;
            product
        })
}

proptest! {
    #[test]
    fn prop_serialize_then_deserialize_round_trips(original in arb_product()) {
        let data = Value::Object(original.serialize());

        let mut restored = Product::new("placeholder", "", Decimal::ZERO, false, Category::Unknown);
        restored.deserialize(&data).unwrap();

        prop_assert_eq!(&restored.name, &original.name);
        prop_assert_eq!(&restored.description, &original.description);
        prop_assert_eq!(restored.price, original.price);
        prop_assert_eq!(restored.available, original.available);
        prop_assert_eq!(restored.category, original.category);
        prop_assert_eq!(restored.id, None);
    }

    #[test]
    fn prop_serialized_price_is_a_string(original in arb_product()) {
        let map = original.serialize();
        prop_assert!(map["price"].is_string());
        prop_assert_eq!(map["category"].as_str(), Some(original.category.as_str()));
    }
}
