//! List command
//!
//! Usage: catalog list [--name <NAME>] [--available <true|false>]
//!                     [--category <CATEGORY>] [--price <PRICE>] [--count]

use catalog_core::Category;
use catalog_store::{DbConfig, ProductFilter, ProductQuery, ProductRepo};
use clap::Args;
use serde_json::Value;

use super::open;

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub available: Option<bool>,

    #[arg(long)]
    pub category: Option<Category>,

    /// Price token; surrounding quotes and spaces are ignored
    #[arg(long)]
    pub price: Option<String>,

    /// Print the number of matches instead of the products
    #[arg(long)]
    pub count: bool,
}

/// Combine the requested filters into one query
pub fn build_query(args: &ListArgs) -> anyhow::Result<ProductQuery> {
    let mut query = match &args.price {
        Some(token) => ProductRepo::find_by_price(token)?,
        None => ProductQuery::all(),
    };
    if let Some(name) = &args.name {
        query = query.filter(ProductFilter::Name(name.clone()));
    }
    if let Some(available) = args.available {
        query = query.filter(ProductFilter::Available(available));
    }
    if let Some(category) = args.category {
        query = query.filter(ProductFilter::Category(category));
    }
    Ok(query)
}

pub fn execute(config: &DbConfig, args: ListArgs) -> anyhow::Result<()> {
    let query = build_query(&args)?;
    let db = open(config)?;

    if args.count {
        println!("{}", query.count(db.connection())?);
        return Ok(());
    }

    let products: Vec<Value> = query
        .fetch(db.connection())?
        .iter()
        .map(|p| Value::Object(p.serialize()))
        .collect();
    println!("{}", serde_json::to_string_pretty(&products)?);
    Ok(())
}
