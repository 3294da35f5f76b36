//! Product persistence
//!
//! Every operation takes the connection explicitly. Passing a [`Session`]
//! (it dereferences to `Connection`) runs the operation inside that unit of
//! work; passing `Database::connection()` runs it in autocommit mode.
//!
//! [`Session`]: crate::db::Session

use catalog_core::errors::DataValidationError;
use catalog_core::rules::validation::{normalize_price, parse_price_token};
use catalog_core::{log_op_end, log_op_error, log_op_start, Category, Product};
use rusqlite::{params, Connection};
use std::time::Instant;

use crate::errors::{from_rusqlite, not_found, price_overflow, Result};
use crate::query::{ProductFilter, ProductQuery};

/// Repository for products
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a transient product
    ///
    /// On success the product carries its new id and the price as stored
    /// (rounded to two places). Returns the id.
    pub fn create(conn: &Connection, product: &mut Product) -> Result<i64> {
        let started = Instant::now();
        log_op_start!("product.create", category = product.category.as_str());

        let result = Self::insert(conn, product);

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(id) => log_op_end!("product.create", duration_ms = duration_ms, product_id = *id),
            Err(err) => log_op_error!("product.create", err, duration_ms = duration_ms),
        }
        result
    }

    fn insert(conn: &Connection, product: &mut Product) -> Result<i64> {
        if let Some(id) = product.id {
            return Err(DataValidationError::AlreadyPersisted { id }.into());
        }
        let price = normalize_price(product.price)
            .ok_or_else(|| price_overflow("create", product.price))?;

        conn.execute(
            "INSERT INTO product (name, description, price, available, category)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                product.name,
                product.description,
                price.to_string(),
                product.available,
                product.category.as_str(),
            ],
        )
        .map_err(|e| from_rusqlite(e).with_op("create"))?;

        let id = conn.last_insert_rowid();
        product.id = Some(id);
        product.price = price;
        Ok(id)
    }

    /// Write every field of a persisted product back to its row
    pub fn update(conn: &Connection, product: &mut Product) -> Result<()> {
        let started = Instant::now();
        match product.id {
            Some(id) => log_op_start!("product.update", product_id = id),
            None => log_op_start!("product.update"),
        }

        let result = Self::overwrite(conn, product);

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(id) => log_op_end!("product.update", duration_ms = duration_ms, product_id = *id),
            Err(err) => match err.product_id() {
                Some(id) => log_op_error!("product.update", err, duration_ms = duration_ms, product_id = id),
                None => log_op_error!("product.update", err, duration_ms = duration_ms),
            },
        }
        result.map(|_| ())
    }

    fn overwrite(conn: &Connection, product: &mut Product) -> Result<i64> {
        let id = product
            .id
            .ok_or_else(|| DataValidationError::missing_id("update"))?;
        let price = normalize_price(product.price)
            .ok_or_else(|| price_overflow("update", product.price).with_product_id(id))?;

        let changed = conn
            .execute(
                "UPDATE product
                 SET name = ?1, description = ?2, price = ?3, available = ?4, category = ?5
                 WHERE id = ?6",
                params![
                    product.name,
                    product.description,
                    price.to_string(),
                    product.available,
                    product.category.as_str(),
                    id,
                ],
            )
            .map_err(|e| from_rusqlite(e).with_op("update").with_product_id(id))?;

        if changed == 0 {
            return Err(not_found("update", id));
        }
        product.price = price;
        Ok(id)
    }

    /// Remove a persisted product's row
    ///
    /// The in-memory value keeps its id; using it again reports not-found.
    pub fn delete(conn: &Connection, product: &Product) -> Result<()> {
        let started = Instant::now();
        match product.id {
            Some(id) => log_op_start!("product.delete", product_id = id),
            None => log_op_start!("product.delete"),
        }

        let result = Self::remove(conn, product);

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(id) => log_op_end!("product.delete", duration_ms = duration_ms, product_id = *id),
            Err(err) => match err.product_id() {
                Some(id) => log_op_error!("product.delete", err, duration_ms = duration_ms, product_id = id),
                None => log_op_error!("product.delete", err, duration_ms = duration_ms),
            },
        }
        result.map(|_| ())
    }

    fn remove(conn: &Connection, product: &Product) -> Result<i64> {
        let id = product
            .id
            .ok_or_else(|| DataValidationError::missing_id("delete"))?;

        let changed = conn
            .execute("DELETE FROM product WHERE id = ?1", params![id])
            .map_err(|e| from_rusqlite(e).with_op("delete").with_product_id(id))?;

        if changed == 0 {
            return Err(not_found("delete", id));
        }
        Ok(id)
    }

    /// Every product, ordered by id
    pub fn all(conn: &Connection) -> Result<Vec<Product>> {
        ProductQuery::all().fetch(conn)
    }

    /// Look up by primary key
    pub fn find(conn: &Connection, id: i64) -> Result<Option<Product>> {
        ProductQuery::all().filter(ProductFilter::Id(id)).first(conn)
    }

    pub fn find_by_name(name: impl Into<String>) -> ProductQuery {
        ProductQuery::all().filter(ProductFilter::Name(name.into()))
    }

    pub fn find_by_availability(available: bool) -> ProductQuery {
        ProductQuery::all().filter(ProductFilter::Available(available))
    }

    pub fn find_by_category(category: Category) -> ProductQuery {
        ProductQuery::all().filter(ProductFilter::Category(category))
    }

    /// Products priced at `token`
    ///
    /// The token may carry surrounding whitespace or double quotes.
    pub fn find_by_price(token: &str) -> Result<ProductQuery> {
        let price = parse_price_token(token)?;
        Ok(ProductQuery::all().filter(ProductFilter::Price(price)))
    }

    /// Delete every product; returns the number of rows removed
    pub fn remove_all(conn: &Connection) -> Result<usize> {
        let started = Instant::now();
        log_op_start!("product.remove_all");

        let result = conn
            .execute("DELETE FROM product", [])
            .map_err(|e| from_rusqlite(e).with_op("remove_all"));

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(n) => log_op_end!("product.remove_all", duration_ms = duration_ms, row_count = *n as u64),
            Err(err) => log_op_error!("product.remove_all", err, duration_ms = duration_ms),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ensure_schema;
    use catalog_core::ExErrorKind;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    fn fedora() -> Product {
        Product::new(
            "Fedora",
            "A red hat",
            Decimal::from_str("12.5").unwrap(),
            true,
            Category::Cloths,
        )
    }

    #[test]
    fn test_create_assigns_id_and_normalizes_price() {
        let conn = setup();
        let mut product = fedora();

        let id = ProductRepo::create(&conn, &mut product).unwrap();

        assert_eq!(product.id, Some(id));
        assert_eq!(product.price.to_string(), "12.50");
        assert_eq!(ProductRepo::find(&conn, id).unwrap(), Some(product));
    }

    #[test]
    fn test_create_twice_is_rejected() {
        let conn = setup();
        let mut product = fedora();
        ProductRepo::create(&conn, &mut product).unwrap();

        let err = ProductRepo::create(&conn, &mut product).unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(DataValidationError::AlreadyPersisted { .. })
        ));
        assert_eq!(ProductRepo::all(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_update_transient_is_validation_error() {
        let conn = setup();
        let err = ProductRepo::update(&conn, &mut fedora()).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DataValidation);
        assert_eq!(err.message(), "update called with empty ID field");
    }

    #[test]
    fn test_delete_twice_is_not_found() {
        let conn = setup();
        let mut product = fedora();
        let id = ProductRepo::create(&conn, &mut product).unwrap();

        ProductRepo::delete(&conn, &product).unwrap();
        let err = ProductRepo::delete(&conn, &product).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.product_id(), Some(id));
    }

    #[test]
    fn test_price_overflow_is_constraint_violation() {
        let conn = setup();
        let mut product = fedora();
        product.price = Decimal::from(100_000_000_i64);

        let err = ProductRepo::create(&conn, &mut product).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
        assert!(product.is_transient());
    }

    #[test]
    fn test_blank_name_surfaces_store_error() {
        let conn = setup();
        let mut product = fedora();
        product.name = " ".to_string();

        let err = ProductRepo::create(&conn, &mut product).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Persistence);
        assert!(product.is_transient());
    }

    #[test]
    fn test_find_by_price_rejects_garbage() {
        let err = ProductRepo::find_by_price("cheap").unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(DataValidationError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_remove_all_counts_rows() {
        let conn = setup();
        for _ in 0..3 {
            ProductRepo::create(&conn, &mut fedora()).unwrap();
        }
        assert_eq!(ProductRepo::remove_all(&conn).unwrap(), 3);
        assert!(ProductRepo::all(&conn).unwrap().is_empty());
    }
}
