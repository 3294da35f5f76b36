//! Catalog Store - SQLite persistence for products
//!
//! Provides:
//! - `DbConfig`: connection settings from the environment (`DATABASE_URI`)
//! - `init_db`: open the configured database and create the `product` table
//! - `Database` / `Session`: an explicit store handle and per-request unit of work
//! - `ProductRepo`: create/update/delete/all/find and the `find_by_*` helpers
//! - `ProductQuery`: lazy, restartable query handles over matching rows

pub mod config;
pub mod db;
pub mod errors;
pub mod query;
pub mod repo;
pub mod schema;

pub use config::{DbConfig, DbTarget};
pub use db::{init_db, Database, Session};
pub use errors::Result;
pub use query::{PreparedProductQuery, ProductFilter, ProductQuery, ProductRows};
pub use repo::ProductRepo;
