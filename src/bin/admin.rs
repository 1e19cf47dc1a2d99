//! CLI administration tool for clickr.
//!
//! Inspects codes, links, and counters without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Convert between identities and short codes (no database needed)
//! cargo run --bin admin -- encode 125
//! cargo run --bin admin -- decode 21
//!
//! # Inspect or delete a link
//! cargo run --bin admin -- link show 21
//! cargo run --bin admin -- link delete 21
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
//! - `DATABASE_URL` or `DB_*` components: required by every command that
//!   touches storage

use clickr::config::{Config, mask_connection_string};
use clickr::domain::repositories::LinkRepository;
use clickr::infrastructure::persistence::PgLinkRepository;
use clickr::utils::code_codec::{self, is_reserved};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing clickr.
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
    /// Encode a numeric identity as a short code
    Encode {
        /// Non-negative identity
        id: u64,
    },

    /// Decode a short code to its numeric identity
    Decode {
        /// Base62 short code
        code: String,
    },

    /// Inspect or remove links
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

/// Link subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Show a link and its counters
    Show { code: String },

    /// Delete a link
    Delete {
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
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { id } => handle_encode(id),
        Commands::Decode { code } => handle_decode(&code),
        Commands::Link { action } => {
            let pool = connect().await?;
            handle_link_action(action, &pool).await
        }
        Commands::Stats => {
            let pool = connect().await?;
            handle_stats(&pool).await
        }
        Commands::Db { action } => {
            let pool = connect().await?;
            handle_db_action(action, &pool).await
        }
    }
}

async fn connect() -> Result<PgPool> {
    let database_url = Config::load_database_url()?;

    PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })
}

fn handle_encode(id: u64) -> Result<()> {
    if id > i64::MAX as u64 {
        anyhow::bail!("Identity {} exceeds the storable maximum {}", id, i64::MAX);
    }

    let code = code_codec::encode(id);
    println!("{}", code.bright_yellow().bold());

    if is_reserved(&code) {
        println!(
            "{}",
            "⚠️  This code is reserved by a route and is never issued".yellow()
        );
    }

    Ok(())
}

fn handle_decode(code: &str) -> Result<()> {
    let id = code_codec::decode(code).with_context(|| format!("Cannot decode '{}'", code))?;
    println!("{}", id.to_string().bright_yellow().bold());

    Ok(())
}

/// Dispatches link commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    match action {
        LinkAction::Show { code } => show_link(&repo, &code).await,
        LinkAction::Delete { code, yes } => delete_link(&repo, &code, yes).await,
    }
}

async fn show_link(repo: &PgLinkRepository, code: &str) -> Result<()> {
    let link = repo
        .find_by_code(code)
        .await
        .context("Database error")?
        .with_context(|| format!("No link with code '{}'", code))?;

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  Code:         {}", link.code.cyan());
    println!("  ID:           {}", link.id.to_string().bright_black());
    println!("  Destination:  {}", link.long_url.bright_white());
    println!(
        "  Clicks:       {}",
        link.clicks.to_string().bright_green().bold()
    );
    println!(
        "  Created:      {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    match link.last_clicked_at {
        Some(ts) => println!("  Last click:   {}", ts.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("  Last click:   {}", "never".bright_black()),
    }
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(repo: &PgLinkRepository, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Link".bright_blue().bold());
    println!();

    let link = repo
        .find_by_code(code)
        .await
        .context("Database error")?
        .with_context(|| format!("No link with code '{}'", code))?;

    println!("  Code:         {}", link.code.cyan());
    println!("  Destination:  {}", link.long_url.bright_white());
    println!("  Clicks:       {}", link.clicks);
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

    let deleted = repo
        .delete_by_code(code)
        .await
        .context("Failed to delete link")?;

    if deleted {
        println!("{}", "✅ Link deleted".green().bold());
    } else {
        println!("{}", "⚠️  Link was already gone".yellow());
    }
    println!();

    Ok(())
}

/// Displays link and click totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let repo = PgLinkRepository::new(Arc::new(pool.clone()));
    let totals = repo
        .totals()
        .await
        .context("Failed to load totals")?;

    println!(
        "  Links:   {}",
        totals.links.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:  {}",
        totals.clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
