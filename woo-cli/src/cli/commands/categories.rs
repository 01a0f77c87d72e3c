//! Category command handlers

use anyhow::{Context, Result};
use colored::*;
use url::form_urlencoded;

use crate::api::{Category, Connection};
use crate::cli::CategoryCommands;

pub async fn handle_categories_command(
    connection: &Connection,
    command: CategoryCommands,
) -> Result<()> {
    match command {
        CategoryCommands::Query { search, json } => {
            let filter = search_filter(search.as_deref());
            let categories = connection
                .query_categories(&filter)
                .await
                .context("Failed to query categories")?;

            if json {
                let output = serde_json::to_string_pretty(&categories)
                    .context("Failed to format JSON output")?;
                println!("{}", output);
            } else {
                for category in &categories {
                    println!("{}", format_row(category));
                }
                println!();
                println!(
                    "{} categor{}",
                    categories.len().to_string().bright_green().bold(),
                    if categories.len() == 1 { "y" } else { "ies" }
                );
            }
            Ok(())
        }
    }
}

/// `&search=<encoded>`, or nothing when no search text is given
fn search_filter(search: Option<&str>) -> String {
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => format!(
            "&search={}",
            form_urlencoded::byte_serialize(text.as_bytes()).collect::<String>()
        ),
        None => String::new(),
    }
}

fn format_row(category: &Category) -> String {
    let id = category
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let parent = if category.is_top_level() {
        String::new()
    } else {
        format!("(parent {})", category.parent)
    };
    format!(
        "{:>6}  {:<32}  {:>5}  {}",
        id.cyan(),
        category.name,
        category.count,
        parent.dimmed()
    )
}
