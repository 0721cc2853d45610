//! CLI administration tool for shorten-uri.
//!
//! Manages short links directly against PostgreSQL, without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL, optionally with a custom code and deadline
//! cargo run --bin admin -- link create https://example.com --code promo \
//!     --expires-at 2030-01-01T00:00:00Z
//!
//! # Inspect or delete a link
//! cargo run --bin admin -- link show promo
//! cargo run --bin admin -- link delete promo
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required)
//! - `BASE_URL` - Prefix for printed short URLs

use shorten_uri::application::services::{LinkService, RedirectService};
use shorten_uri::config::{Config, mask_connection_string};
use shorten_uri::error::AppError;
use shorten_uri::infrastructure::persistence::PgLinkRepository;
use shorten_uri::server::connect_pool;
use shorten_uri::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shorten-uri.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Shorten a URL
    Create {
        /// URL to shorten
        url: String,

        /// Custom short code
        #[arg(short, long)]
        code: Option<String>,

        /// Expiration time in RFC 3339 format (e.g. 2030-01-01T00:00:00Z)
        #[arg(short, long)]
        expires_at: Option<DateTime<Utc>>,
    },

    /// Show a link and its click count
    Show {
        /// Short code
        code: String,
    },

    /// Permanently delete a link
    Delete {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

type PgLinkService = LinkService<PgLinkRepository, RandomCodeGenerator>;
type PgRedirectService = RedirectService<PgLinkRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL or DB_USER/DB_PASSWORD/DB_NAME must be set")?;

    let pool = connect_pool(&config, &database_url).await?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &pool, &config).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &database_url).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool, config: &Config) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));

    match action {
        LinkAction::Create {
            url,
            code,
            expires_at,
        } => {
            let generator = Arc::new(RandomCodeGenerator::new());
            let service = LinkService::new(repo, generator, config.base_url.as_str())
                .with_max_attempts(config.code_max_attempts);
            create_link(&service, url, code, expires_at).await?;
        }
        LinkAction::Show { code } => {
            let service = RedirectService::new(repo, config.base_url.as_str());
            show_link(&service, &code).await?;
        }
        LinkAction::Delete { code, yes } => {
            let service = RedirectService::new(repo, config.base_url.as_str());
            delete_link(&service, &code, yes).await?;
        }
    }

    Ok(())
}

/// Creates a short link, or reports the existing one for the same URL.
async fn create_link(
    service: &PgLinkService,
    url: String,
    code: Option<String>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let link = match service.create_short_link(url.clone(), code, expires_at).await {
        Ok(link) => link,
        Err(AppError::Conflict { message, .. }) => {
            println!("{}", format!("❌ {}", message).red());
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to create link: {}", e)),
    };

    println!("{}", "✅ Short link ready".green().bold());

    println!();
    println!("  Code:      {}", link.code.cyan());
    println!(
        "  Short URL: {}",
        service.get_short_url(&link.code).bright_yellow().bold()
    );
    println!("  Target:    {}", link.long_url.bright_white());
    if let Some(deadline) = link.expires_at {
        println!("  Expires:   {}", format_time(deadline).bright_black());
    }
    println!();

    Ok(())
}

/// Prints the stats view of a link.
async fn show_link(service: &PgRedirectService, code: &str) -> Result<()> {
    let stats = match service.stats(code).await {
        Ok(stats) => stats,
        Err(AppError::NotFound { message, .. }) => {
            println!("{}", format!("⚠️  {}", message).yellow());
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
    };

    let status = match stats.expires_at {
        Some(deadline) if deadline < Utc::now() => "EXPIRED".red(),
        _ => "ACTIVE".green(),
    };

    println!("{}", "📋 Short Link".bright_blue().bold());
    println!();
    println!("  Code:      {}", stats.code.cyan());
    println!("  Short URL: {}", stats.short_url.bright_yellow());
    println!("  Target:    {}", stats.long_url.bright_white());
    println!("  Created:   {}", format_time(stats.created_at).bright_black());
    match stats.expires_at {
        Some(deadline) => println!("  Expires:   {}", format_time(deadline).bright_black()),
        None => println!("  Expires:   {}", "never".bright_black()),
    }
    println!("  Status:    {}", status);
    println!(
        "  Clicks:    {}",
        stats.click_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Deletes a link with confirmation prompt.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes` is given
/// - The code becomes free for reuse and its click count is lost
async fn delete_link(service: &PgRedirectService, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Short Link".bright_blue().bold());
    println!();

    let stats = match service.stats(code).await {
        Ok(stats) => stats,
        Err(AppError::NotFound { message, .. }) => {
            println!("{}", format!("⚠️  {}", message).yellow());
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
    };

    println!("  Code:   {}", stats.code.cyan());
    println!("  Target: {}", stats.long_url.bright_white());
    println!("  Clicks: {}", stats.click_count.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .remove(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!();
    println!("{}", "✅ Link deleted successfully!".green().bold());
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of links
/// - Links past their expiration time
/// - Total number of recorded clicks
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let expired_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE expires_at < NOW()")
            .fetch_one(pool)
            .await?;

    let clicks_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links")
            .fetch_one(pool)
            .await?;

    println!(
        "  Links:   {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Expired: {}",
        expired_count.to_string().bright_yellow().bold()
    );
    println!(
        "  Clicks:  {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, database_url: &str) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!(
                "  URL:        {}",
                mask_connection_string(database_url).bright_black()
            );
            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

fn format_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
