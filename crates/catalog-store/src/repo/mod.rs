//! Repository layer

pub mod product_repo;

pub use product_repo::ProductRepo;
