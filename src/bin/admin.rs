//! CLI administration tool for snaplink.
//!
//! Runs the same services as the HTTP API directly against the configured
//! database.
//!
//! # Usage
//!
//! ```bash
//! # Create a short link
//! cargo run --bin snaplink-admin -- shorten https://example.com --slug docs
//!
//! # Look up a code
//! cargo run --bin snaplink-admin -- resolve docs
//!
//! # Show counters and recent visits
//! cargo run --bin snaplink-admin -- stats docs --limit 10
//!
//! # Check database connection / apply migrations
//! cargo run --bin snaplink-admin -- db check
//! cargo run --bin snaplink-admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (`DATABASE_URL`, `BASE_URL`,
//! `CODE_LENGTH`, `MAX_GENERATION_ATTEMPTS`, ...).

use snaplink::application::services::stats_service::DEFAULT_RECENT_VISITS;
use snaplink::application::services::{LinkService, Resolver, StatsService};
use snaplink::api::dto::shorten::short_url;
use snaplink::config::{self, Config, mask_connection_string};
use snaplink::error::AppError;
use snaplink::infrastructure::cache::NullCache;
use snaplink::infrastructure::persistence::{DatabasePool, open_repository};
use snaplink::utils::code_generator::RandomCodeGenerator;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "snaplink-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Shorten {
        /// Target URL, stored exactly as given
        url: String,

        /// Custom short code
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Print the target URL of a short code
    Resolve { code: String },

    /// Show counters and recent visits of a short code
    Stats {
        code: String,

        /// Number of recent visits to show (1-100)
        #[arg(short, long, default_value_t = DEFAULT_RECENT_VISITS)]
        limit: i64,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Shorten { url, slug } => handle_shorten(&config, url, slug).await,
        Commands::Resolve { code } => handle_resolve(&config, code).await,
        Commands::Stats { code, limit } => handle_stats(&config, code, limit).await,
        Commands::Db { action } => handle_db_action(action, &config).await,
    }
}

/// Converts a service error into a CLI error that keeps the error kind.
fn cli_error(err: AppError) -> anyhow::Error {
    anyhow::anyhow!("{} ({})", err, err.kind())
}

/// Creates a short link.
async fn handle_shorten(config: &Config, url: String, slug: Option<String>) -> Result<()> {
    let repository = open_repository(config).await?;
    let service = LinkService::new(
        repository,
        Arc::new(RandomCodeGenerator::new(config.code_length)),
        config.max_generation_attempts,
    );

    let link = service
        .shorten(&url, slug.as_deref())
        .await
        .map_err(cli_error)?;

    println!("{}", "✓ Short link created".green().bold());
    println!("  Code:   {}", link.code.cyan());
    println!(
        "  Short:  {}",
        short_url(&config.base_url, &link.code).bright_yellow()
    );
    println!("  Target: {}", link.target_url);

    Ok(())
}

/// Prints the stored target of a code.
async fn handle_resolve(config: &Config, code: String) -> Result<()> {
    let repository = open_repository(config).await?;
    let resolver = Resolver::new(repository, Arc::new(NullCache::new()));

    let target = resolver.resolve(&code).await.map_err(cli_error)?;
    println!("{target}");

    Ok(())
}

/// Displays counters and recent visits of a code.
///
/// # Output Format
///
/// ```text
/// Statistics for docs
///
///   Target:  https://example.com/docs
///   Created: 2024-01-15 10:30:00 UTC
///   Clicks:  2
///   Visits:  2
///
///   Time                 Client                                   Referer
///   ---------------------------------------------------------------------------
///   2024-01-16 14:20:11  10.0.0.1                                 -
/// ```
async fn handle_stats(config: &Config, code: String, limit: i64) -> Result<()> {
    let repository = open_repository(config).await?;
    let service = StatsService::new(repository);

    let stats = service.get_stats(&code, limit).await.map_err(cli_error)?;

    println!("{}", format!("Statistics for {code}").bright_blue().bold());
    println!();
    println!("  Target:  {}", stats.link.target_url);
    println!(
        "  Created: {}",
        stats.link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Clicks:  {}",
        stats.link.click_count.to_string().bright_green().bold()
    );
    println!(
        "  Visits:  {}",
        stats.visit_count.to_string().bright_green().bold()
    );
    println!();

    if stats.recent_visits.is_empty() {
        println!("{}", "  No visits recorded".yellow());
        return Ok(());
    }

    println!(
        "  {:<20} {:<40} {}",
        "Time".bright_white().bold(),
        "Client".bright_white().bold(),
        "Referer".bright_white().bold()
    );
    println!("  {}", "-".repeat(75).bright_black());

    for visit in &stats.recent_visits {
        println!(
            "  {:<20} {:<40} {}",
            visit
                .occurred_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black(),
            visit.client_ip.as_deref().unwrap_or("-"),
            visit.referer.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    println!(
        "{} {}",
        "Database:".bright_blue(),
        mask_connection_string(&config.database_url)
    );

    let pool = DatabasePool::connect(config).await?;

    match action {
        DbAction::Check => {
            let repository = pool.into_repository();
            repository
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {e}"))?;

            println!("{}", "✓ Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            pool.migrate().await?;
            println!("{}", "✓ Migrations applied".green().bold());
        }
    }

    Ok(())
}
