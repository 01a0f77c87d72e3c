//! Command-line interface definitions

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "woo-cli")]
#[command(version, about = "Bulk operations against a WooCommerce store")]
pub struct Cli {
    /// Path to configuration file (defaults to ~/.config/woo-cli/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print a progress bar per completed request and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Product operations
    #[command(subcommand)]
    Products(ProductCommands),
    /// Category operations
    #[command(subcommand)]
    Categories(CategoryCommands),
}

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// Fetch every product
    List {
        /// Print the products as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Delete every product on the store
    Purge {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    Query {
        /// Only categories matching this text
        #[arg(short, long)]
        search: Option<String>,
        /// Print the categories as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
