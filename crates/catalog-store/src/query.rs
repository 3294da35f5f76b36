//! Lazy product queries
//!
//! A [`ProductQuery`] only describes which rows are wanted. Nothing touches
//! the database until it is executed against a connection with `count`,
//! `fetch`, `first` or `prepare`.
//!
//! ```no_run
//! use catalog_core::Category;
//! use catalog_store::{DbConfig, init_db, ProductFilter, ProductQuery};
//!
//! # fn main() -> catalog_store::Result<()> {
//! let db = init_db(&DbConfig::in_memory())?;
//! let food = ProductQuery::all()
//!     .filter(ProductFilter::Category(Category::Food))
//!     .filter(ProductFilter::Available(true));
//!
//! let mut prepared = food.prepare(db.connection())?;
//! for product in prepared.iter()? {
//!     println!("{}", product?);
//! }
//! # Ok(())
//! # }
//! ```

use catalog_core::rules::validation::normalize_price;
use catalog_core::{log_op_end, log_op_error, log_op_start, Category, Product};
use rusqlite::types::{Type, Value};
use rusqlite::{params_from_iter, Connection, MappedRows, Row, Statement};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Instant;

use crate::errors::{from_rusqlite, Result};

const PRODUCT_COLUMNS: &str = "id, name, description, price, available, category";

/// Equality condition on one column
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    Id(i64),
    Name(String),
    Available(bool),
    Category(Category),
    /// Compared at the stored scale, so `12.5` matches `12.50`
    Price(Decimal),
}

impl ProductFilter {
    fn column(&self) -> &'static str {
        match self {
            ProductFilter::Id(_) => "id",
            ProductFilter::Name(_) => "name",
            ProductFilter::Available(_) => "available",
            ProductFilter::Category(_) => "category",
            ProductFilter::Price(_) => "price",
        }
    }

    fn value(&self) -> Value {
        match self {
            ProductFilter::Id(id) => Value::Integer(*id),
            ProductFilter::Name(name) => Value::Text(name.clone()),
            ProductFilter::Available(available) => Value::Integer(i64::from(*available)),
            ProductFilter::Category(category) => Value::Text(category.as_str().to_string()),
            // An out-of-range price can't be stored, so it simply matches nothing
            ProductFilter::Price(price) => {
                Value::Text(normalize_price(*price).unwrap_or(*price).to_string())
            }
        }
    }
}

/// Description of a product lookup, executed on demand
///
/// Filters are ANDed together; results are ordered by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    filters: Vec<ProductFilter>,
    limit: Option<u64>,
}

impl ProductQuery {
    /// Every product
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a condition
    pub fn filter(mut self, filter: ProductFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Cap the number of rows
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[ProductFilter] {
        &self.filters
    }

    fn where_clause(&self) -> String {
        if self.filters.is_empty() {
            return String::new();
        }
        let conditions: Vec<String> = self
            .filters
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{} = ?{}", f.column(), i + 1))
            .collect();
        format!(" WHERE {}", conditions.join(" AND "))
    }

    fn select_sql(&self) -> String {
        let mut sql = format!(
            "SELECT {} FROM product{} ORDER BY id",
            PRODUCT_COLUMNS,
            self.where_clause()
        );
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        sql
    }

    fn params(&self) -> Vec<Value> {
        self.filters.iter().map(ProductFilter::value).collect()
    }

    /// Number of matching rows
    pub fn count(&self, conn: &Connection) -> Result<u64> {
        let started = Instant::now();
        log_op_start!("product.query.count", filters = self.filters.len());

        let sql = format!("SELECT COUNT(*) FROM ({})", self.select_sql());
        let result = conn
            .query_row(&sql, params_from_iter(self.params()), |row| row.get::<_, i64>(0))
            .map(|n| u64::try_from(n).unwrap_or(0))
            .map_err(from_rusqlite);

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(n) => log_op_end!("product.query.count", duration_ms = duration_ms, row_count = *n),
            Err(err) => log_op_error!("product.query.count", err, duration_ms = duration_ms),
        }
        result
    }

    /// All matching products, materialized
    pub fn fetch(&self, conn: &Connection) -> Result<Vec<Product>> {
        let started = Instant::now();
        log_op_start!("product.query.fetch", filters = self.filters.len());

        let result = self.prepare(conn).and_then(|mut prepared| {
            let rows = prepared.iter()?.collect::<Result<Vec<_>>>();
            rows
        });

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(rows) => log_op_end!(
                "product.query.fetch",
                duration_ms = duration_ms,
                row_count = rows.len() as u64
            ),
            Err(err) => log_op_error!("product.query.fetch", err, duration_ms = duration_ms),
        }
        result
    }

    /// The lowest-id match, if any
    pub fn first(&self, conn: &Connection) -> Result<Option<Product>> {
        let mut prepared = self.clone().limit(1).prepare(conn)?;
        let first = prepared.iter()?.next().transpose();
        first
    }

    /// Compile against a connection for repeated lazy iteration
    pub fn prepare<'conn>(&self, conn: &'conn Connection) -> Result<PreparedProductQuery<'conn>> {
        let stmt = conn.prepare(&self.select_sql()).map_err(from_rusqlite)?;
        Ok(PreparedProductQuery {
            stmt,
            params: self.params(),
        })
    }
}

/// A compiled query bound to its connection
pub struct PreparedProductQuery<'conn> {
    stmt: Statement<'conn>,
    params: Vec<Value>,
}

impl PreparedProductQuery<'_> {
    /// Run the query, yielding products as rows are stepped
    ///
    /// Each call re-executes the statement from the start.
    pub fn iter(&mut self) -> Result<ProductRows<'_>> {
        let rows = self
            .stmt
            .query_map(
                params_from_iter(self.params.iter()),
                row_to_product as RowMapper,
            )
            .map_err(from_rusqlite)?;
        Ok(ProductRows { rows })
    }
}

type RowMapper = fn(&Row<'_>) -> rusqlite::Result<Product>;

/// Products of one execution of a [`PreparedProductQuery`]
pub struct ProductRows<'stmt> {
    rows: MappedRows<'stmt, RowMapper>,
}

impl Iterator for ProductRows<'_> {
    type Item = Result<Product>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|row| row.map_err(from_rusqlite))
    }
}

/// Map a row selected with [`PRODUCT_COLUMNS`]
pub(crate) fn row_to_product(row: &Row<'_>) -> rusqlite::Result<Product> {
    let price_text: String = row.get(3)?;
    let price = Decimal::from_str(&price_text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    let category_text: String = row.get(5)?;
    let category = Category::from_str(&category_text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Product {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        price,
        available: row.get(4)?,
        category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ensure_schema;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO product (name, description, price, available, category) VALUES
                ('Apple',  'Red',     '0.50',  1, 'FOOD'),
                ('Hammer', 'Claw',    '12.50', 1, 'TOOLS'),
                ('Apple',  'Green',   '0.55',  0, 'FOOD'),
                ('Wiper',  'Blade',   '12.50', 0, 'AUTOMOTIVE');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_where_clause_numbers_params() {
        let query = ProductQuery::all()
            .filter(ProductFilter::Name("Apple".into()))
            .filter(ProductFilter::Available(true));
        assert_eq!(query.where_clause(), " WHERE name = ?1 AND available = ?2");
        assert_eq!(ProductQuery::all().where_clause(), "");
    }

    #[test]
    fn test_count_and_fetch_agree() {
        let conn = seeded();
        let query = ProductQuery::all().filter(ProductFilter::Category(Category::Food));

        assert_eq!(query.count(&conn).unwrap(), 2);
        let rows = query.fetch(&conn).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|p| p.category == Category::Food));
        assert!(rows[0].id < rows[1].id);
    }

    #[test]
    fn test_price_filter_compares_at_stored_scale() {
        let conn = seeded();
        let query = ProductQuery::all().filter(ProductFilter::Price(Decimal::from_str("12.5").unwrap()));
        assert_eq!(query.count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_limit_applies_to_count() {
        let conn = seeded();
        assert_eq!(ProductQuery::all().limit(3).count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_first_returns_lowest_id() {
        let conn = seeded();
        let first = ProductQuery::all()
            .filter(ProductFilter::Name("Apple".into()))
            .first(&conn)
            .unwrap()
            .unwrap();
        assert_eq!(first.description, "Red");

        let none = ProductQuery::all()
            .filter(ProductFilter::Name("Nothing".into()))
            .first(&conn)
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_prepared_iteration_is_restartable() {
        let conn = seeded();
        let query = ProductQuery::all().filter(ProductFilter::Available(false));
        let mut prepared = query.prepare(&conn).unwrap();

        let first_pass: Vec<Product> = prepared.iter().unwrap().map(|p| p.unwrap()).collect();
        let second_pass: Vec<Product> = prepared.iter().unwrap().map(|p| p.unwrap()).collect();
        assert_eq!(first_pass.len(), 2);
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_corrupt_category_surfaces_as_error() {
        let conn = seeded();
        conn.execute("UPDATE product SET category = 'TOYS' WHERE id = 1", [])
            .unwrap();

        let err = ProductQuery::all().fetch(&conn).unwrap_err();
        assert_eq!(err.code(), "ERR_PERSISTENCE");
    }
}
