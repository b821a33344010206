//! CLI administration tool for linkstash.
//!
//! Works directly on the links file, so run it while the server is stopped:
//! the server keeps its own in-memory copy and would overwrite changes made
//! behind its back on the next create.
//!
//! # Usage
//!
//! ```bash
//! # List all links
//! cargo run --bin admin -- list
//!
//! # Count links
//! cargo run --bin admin -- count
//!
//! # Look up a short id
//! cargo run --bin admin -- resolve a1b2c3
//!
//! # Create a link without the confirmation prompt
//! cargo run --bin admin -- add https://example.com -y
//! ```
//!
//! # Environment Variables
//!
//! - `LINKS_FILE` (default `links.json`): links file to operate on
//! - `PUBLIC_BASE_URL` (default `http://localhost:8080`): base of printed and stored short links
//! - `STORE_WRITE_TIMEOUT_MS`, `GENERATOR_MAX_ATTEMPTS`: same as the server

use linkstash::application::services::LinkRegistry;
use linkstash::config::Config;
use linkstash::domain::errors::RegistryError;
use linkstash::infrastructure::persistence::JsonFileStore;
use linkstash::utils::code_generator::RandomHexGenerator;
use linkstash::utils::short_link::short_url;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing linkstash.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Links file (overrides `LINKS_FILE`)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all links
    List,

    /// Print the number of links
    Count,

    /// Print the URL behind a short id
    Resolve {
        /// Short id, e.g. `a1b2c3`
        code: String,
    },

    /// Create a short link
    Add {
        /// URL to shorten
        url: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(file) = cli.file {
        config.links_file = file;
    }
    config.validate()?;

    let store = Arc::new(JsonFileStore::new(
        config.links_file.clone(),
        config.public_base_url.clone(),
    ));
    let registry = LinkRegistry::open(
        store,
        Box::new(RandomHexGenerator::default()),
        config.registry_options(),
    )
    .await;

    match cli.command {
        Commands::List => list_links(&registry, &config).await,
        Commands::Count => {
            println!("{}", registry.count().await);
            Ok(())
        }
        Commands::Resolve { code } => resolve_link(&registry, &code).await,
        Commands::Add { url, yes } => add_link(&registry, &config, url, yes).await,
    }
}

/// Lists all links in creation order.
///
/// # Output Format
///
/// ```text
/// Links (links.json)
///
///   Code    Created              URL
///   ───────────────────────────────────────────────────────────
///   a1b2c3  19/10/2026 14:03:22  https://example.com
/// ```
async fn list_links(registry: &LinkRegistry, config: &Config) -> Result<()> {
    println!(
        "{} {}",
        "Links".bright_blue().bold(),
        format!("({})", config.links_file.display()).bright_black()
    );
    println!();

    let links = registry.list_all().await;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin add <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<8} {:<20} {}",
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<8} {:<20} {}",
            link.short_id.cyan(),
            link.created_at
                .with_timezone(&Local)
                .format("%d/%m/%Y %H:%M:%S")
                .to_string()
                .bright_black(),
            link.original_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Prints the URL behind `code`; a missing id is an error exit.
async fn resolve_link(registry: &LinkRegistry, code: &str) -> Result<()> {
    match registry.resolve(code).await {
        Ok(url) => {
            println!("{url}");
            Ok(())
        }
        Err(RegistryError::NotFound(_)) => {
            anyhow::bail!("No link with short id '{code}'")
        }
        Err(e) => Err(e.into()),
    }
}

/// Creates a link through the registry, asking for confirmation first
/// unless `--yes` was passed.
async fn add_link(
    registry: &LinkRegistry,
    config: &Config,
    url: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create short link".bright_blue().bold());
    println!();
    println!("  URL:  {}", url.cyan());
    println!("  File: {}", config.links_file.display().to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let outcome = registry
        .shorten(&url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;
    let link = short_url(&config.public_base_url, outcome.short_id());

    if outcome.is_created() {
        println!("{}", "Link created".green().bold());
    } else {
        println!("{}", "URL already registered".yellow().bold());
    }
    println!("  {}", link.bright_yellow());
    println!();

    Ok(())
}
