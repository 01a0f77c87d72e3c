use clap::Parser;
use colored::*;

use woo_cli::cli::{Cli, commands};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    if let Err(err) = commands::run(cli).await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), err);
        std::process::exit(1);
    }
}
