//! Database maintenance commands
//!
//! Usage:
//!   catalog init
//!   catalog purge

use catalog_store::{DbConfig, DbTarget, ProductRepo};

use super::{cli_context, open};

pub fn init(config: &DbConfig) -> anyhow::Result<()> {
    let db = open(config)?;
    match db.target() {
        DbTarget::Memory => println!("Initialized in-memory database"),
        DbTarget::File(path) => println!("Initialized {}", path.display()),
    }
    db.close()?;
    Ok(())
}

pub fn purge(config: &DbConfig) -> anyhow::Result<()> {
    let mut db = open(config)?;
    let session = db.session(cli_context())?;
    let removed = ProductRepo::remove_all(&session)?;
    session.commit()?;

    println!("Removed {} product(s)", removed);
    Ok(())
}
