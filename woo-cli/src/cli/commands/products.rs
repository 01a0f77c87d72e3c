//! Product command handlers

use std::time::Instant;

use anyhow::{Context, Result};
use colored::*;

use crate::api::{Connection, Product};
use crate::cli::ProductCommands;

pub async fn handle_products_command(
    connection: &Connection,
    command: ProductCommands,
    verbose: bool,
) -> Result<()> {
    match command {
        ProductCommands::List { json } => list_products(connection, json, verbose).await,
        ProductCommands::Purge { yes } => purge_products(connection, yes, verbose).await,
    }
}

async fn list_products(connection: &Connection, json: bool, verbose: bool) -> Result<()> {
    let start = Instant::now();
    let products = connection
        .get_all_products(verbose)
        .await
        .context("Failed to fetch products")?;

    if json {
        let output =
            serde_json::to_string_pretty(&products).context("Failed to format JSON output")?;
        println!("{}", output);
        return Ok(());
    }

    for product in &products {
        println!("{}", format_row(product));
    }
    println!();
    println!(
        "{} product(s) in {:.2}s",
        products.len().to_string().bright_green().bold(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

async fn purge_products(connection: &Connection, yes: bool, verbose: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("Refusing to delete every product without --yes");
    }

    let purged = connection
        .purge_products(verbose)
        .await
        .context("Failed to purge products")?;

    if purged == 0 {
        println!("{}", "No products to delete".dimmed());
    } else {
        println!(
            "Deleted {} product(s)",
            purged.to_string().bright_red().bold()
        );
    }
    Ok(())
}

fn format_row(product: &Product) -> String {
    let id = product
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let sku = if product.sku.is_empty() { "-" } else { product.sku.as_str() };
    let price = if product.regular_price.is_empty() {
        "-"
    } else {
        product.regular_price.as_str()
    };
    format!(
        "{:>8}  {:<16}  {:<40}  {:>10}  {}",
        id.cyan(),
        sku,
        product.name,
        price,
        product.stock_status.dimmed()
    )
}
