//! Single-product commands
//!
//! Usage:
//!   catalog create --name <NAME> --price <PRICE> [--description <TEXT>]
//!                  [--available <true|false>] [--category <CATEGORY>]
//!   catalog show <ID>
//!   catalog update <ID> --json <OBJECT>
//!   catalog delete <ID>

use anyhow::{anyhow, Context};
use catalog_core::{Category, Product};
use catalog_store::{DbConfig, ProductRepo};
use clap::{ArgAction, Args};
use serde_json::{json, Value};

use super::{cli_context, open, print_product};

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Decimal price, e.g. 12.50
    #[arg(long)]
    pub price: String,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub available: bool,

    #[arg(long, default_value_t = Category::Unknown)]
    pub category: Category,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: i64,

    /// Full product object; every field except `id` is required
    #[arg(long)]
    pub json: String,
}

pub fn create(config: &DbConfig, args: CreateArgs) -> anyhow::Result<()> {
    // Same validation path as a request body
    let body = json!({
        "name": args.name,
        "description": args.description,
        "price": args.price,
        "available": args.available,
        "category": args.category.as_str(),
    });
    let mut product = Product::from_value(&body)?;

    let mut db = open(config)?;
    let session = db.session(cli_context())?;
    ProductRepo::create(&session, &mut product)?;
    session.commit()?;

    print_product(&product)
}

pub fn show(config: &DbConfig, args: IdArgs) -> anyhow::Result<()> {
    let db = open(config)?;
    let product = ProductRepo::find(db.connection(), args.id)?
        .ok_or_else(|| anyhow!("product {} not found", args.id))?;
    print_product(&product)
}

pub fn update(config: &DbConfig, args: UpdateArgs) -> anyhow::Result<()> {
    let body: Value = serde_json::from_str(&args.json).context("parsing --json")?;

    let mut db = open(config)?;
    let session = db.session(cli_context())?;
    let mut product = ProductRepo::find(&session, args.id)?
        .ok_or_else(|| anyhow!("product {} not found", args.id))?;
    product.deserialize(&body)?;
    ProductRepo::update(&session, &mut product)?;
    session.commit()?;

    print_product(&product)
}

pub fn delete(config: &DbConfig, args: IdArgs) -> anyhow::Result<()> {
    let mut db = open(config)?;
    let session = db.session(cli_context())?;
    let product = ProductRepo::find(&session, args.id)?
        .ok_or_else(|| anyhow!("product {} not found", args.id))?;
    ProductRepo::delete(&session, &product)?;
    session.commit()?;

    println!("Deleted {}", product);
    Ok(())
}
