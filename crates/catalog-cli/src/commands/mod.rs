pub mod admin;
pub mod list;
pub mod product;

use anyhow::Context;
use catalog_core::Product;
use catalog_core_types::RequestContext;
use catalog_store::{init_db, Database, DbConfig};
use serde_json::Value;

/// Settings from the environment, with the URI from the command line if given
pub fn load_config(database_uri: Option<&str>) -> anyhow::Result<DbConfig> {
    let mut config = DbConfig::from_env().context("loading database configuration")?;
    if let Some(uri) = database_uri {
        config = DbConfig {
            busy_timeout: config.busy_timeout,
            ..DbConfig::new(uri)
        };
    }
    Ok(config)
}

pub fn open(config: &DbConfig) -> anyhow::Result<Database> {
    init_db(config).context("opening database")
}

pub fn cli_context() -> RequestContext {
    RequestContext::new().with_origin("cli")
}

pub fn print_product(product: &Product) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&Value::Object(product.serialize()))?
    );
    Ok(())
}
