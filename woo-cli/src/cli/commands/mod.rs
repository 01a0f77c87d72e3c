//! Command handlers

pub mod categories;
pub mod products;

use anyhow::{Context, Result};
use log::debug;

use super::{Cli, Commands};
use crate::api::Connection;
use crate::config::Config;

/// Load configuration, connect, and run the selected command
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let credentials = config.credentials()?;
    let resilience = config.resilience()?;
    debug!("Resolved tuning: {:?}", resilience);

    let mut connection = Connection::new();
    connection
        .init(credentials, resilience)
        .context("Failed to initialize the store connection")?;

    match cli.command {
        Commands::Products(command) => {
            products::handle_products_command(&connection, command, cli.verbose).await
        }
        Commands::Categories(command) => {
            categories::handle_categories_command(&connection, command).await
        }
    }
}
