//! Catalog CLI
//!
//! Command-line interface over the product store

use catalog_core::logging_facility::{self, Profile};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(about = "Catalog - product persistence", long_about = None)]
struct Cli {
    /// Database URI (`sqlite://<path>`, `sqlite::memory:` or a bare path)
    #[arg(long, global = true, env = "DATABASE_URI", hide_env_values = true)]
    database_uri: Option<String>,

    /// Human-readable debug logging instead of JSON
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the product table if it does not exist
    Init,
    /// Add a product
    Create(commands::product::CreateArgs),
    /// Print one product
    Show(commands::product::IdArgs),
    /// Replace a product's fields from a JSON object
    Update(commands::product::UpdateArgs),
    /// Remove a product
    Delete(commands::product::IdArgs),
    /// List products, optionally filtered
    List(commands::list::ListArgs),
    /// Remove every product
    Purge,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    logging_facility::init(if cli.verbose {
        Profile::Development
    } else {
        Profile::Production
    });
    tracing::debug!(command = ?cli.command, "dispatching");

    let result = commands::load_config(cli.database_uri.as_deref()).and_then(|config| {
        match cli.command {
            Commands::Init => commands::admin::init(&config),
            Commands::Create(args) => commands::product::create(&config, args),
            Commands::Show(args) => commands::product::show(&config, args),
            Commands::Update(args) => commands::product::update(&config, args),
            Commands::Delete(args) => commands::product::delete(&config, args),
            Commands::List(args) => commands::list::execute(&config, args),
            Commands::Purge => commands::admin::purge(&config),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
