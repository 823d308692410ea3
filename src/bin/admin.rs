//! CLI administration tool for snaplink.
//!
//! Provides commands for managing the TTL policy, disabling links and
//! performing database maintenance without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the current policy
//! cargo run --bin admin -- settings show
//!
//! # Links live 48 hours, cache entries 10 minutes
//! cargo run --bin admin -- settings set --ttl-hours 48 --cache-ttl-minutes 10
//!
//! # Disable or re-enable a link (also evicts its cache entries)
//! cargo run --bin admin -- link disable Q0v
//! cargo run --bin admin -- link enable Q0v --yes
//!
//! # Delete links whose expiry has passed
//! cargo run --bin admin -- link purge-expired
//!
//! # Check database connection and apply migrations
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`) is required, `REDIS_URL`
//! (or `REDIS_*`) enables cache updates, `SETTINGS_CACHE_KEY` names the
//! policy hash.

use snaplink::application::services::settings_provider::POLICY_CACHE_TTL;
use snaplink::config::{self, Config};
use snaplink::domain::entities::{POLICY_FIELDS, Policy};
use snaplink::domain::repositories::{LinkRepository, SettingsRepository};
use snaplink::infrastructure::cache::{LinkCache, RedisCache, invalidate_link};
use snaplink::infrastructure::persistence::{PgLinkRepository, PgSettingsRepository};
use snaplink::server::{connect_cache, connect_database};

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing snaplink.
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
    /// Manage the link and cache TTL policy
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Manage individual links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the stored policy and whether it is cached
    Show,

    /// Replace the policy
    Set {
        /// Link lifetime in hours (0 = links never expire)
        #[arg(long)]
        ttl_hours: i32,

        /// Cache entry lifetime in minutes (0 = 5 minutes)
        #[arg(long)]
        cache_ttl_minutes: i32,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Stop a link from resolving
    Disable {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Let a disabled link resolve again
    Enable {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Delete links whose expiry has passed
    PurgeExpired {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and apply migrations
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let pool = connect_database(&config).await?;

    match cli.command {
        Commands::Settings { action } => handle_settings_action(action, &config, &pool).await?,
        Commands::Link { action } => handle_link_action(action, &config, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_settings_action(
    action: SettingsAction,
    config: &Config,
    pool: &PgPool,
) -> Result<()> {
    let repo = PgSettingsRepository::new(Arc::new(pool.clone()), config.store_timeouts());
    let redis = connect_cache(config).await;

    match action {
        SettingsAction::Show => show_settings(&repo, redis.as_deref(), config).await,
        SettingsAction::Set {
            ttl_hours,
            cache_ttl_minutes,
        } => {
            let policy = Policy::new(ttl_hours, cache_ttl_minutes);
            set_settings(&repo, redis.as_deref(), config, policy).await
        }
    }
}

/// Prints the durable policy.
///
/// # Output Format
///
/// ```text
/// ⚙️  Policy
///
///   ttl_hours            48
///   cache_ttl_minutes    10
///
///   Cached: yes (settings)
/// ```
async fn show_settings(
    repo: &PgSettingsRepository,
    redis: Option<&RedisCache>,
    config: &Config,
) -> Result<()> {
    println!("{}", "⚙️  Policy".bright_blue().bold());
    println!();

    let policy = repo
        .load_policy()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load policy: {}", e))?;

    if policy.is_zero() {
        println!("{}", "  No policy stored (links never expire)".yellow());
    } else {
        for (field, (_, value)) in POLICY_FIELDS.iter().zip(policy.to_hash_fields()) {
            println!(
                "  {:<20} {}",
                field.name.cyan(),
                value.bright_white().bold()
            );
        }
    }
    println!();

    match redis {
        Some(cache) => {
            let cached = cache
                .exists(&config.settings_cache_key)
                .await
                .map_err(|e| anyhow::anyhow!("Cache error: {}", e))?;
            let state = if cached { "yes".green() } else { "no".yellow() };
            println!(
                "  Cached: {} ({})",
                state,
                config.settings_cache_key.bright_black()
            );
        }
        None => println!("  Cached: {}", "cache not configured".bright_black()),
    }
    println!();

    Ok(())
}

/// Saves the policy and pushes it into the cache hash.
///
/// Running servers read the cache hash first, so they pick up the new
/// policy on their next request instead of after the old hash expires.
async fn set_settings(
    repo: &PgSettingsRepository,
    redis: Option<&RedisCache>,
    config: &Config,
    policy: Policy,
) -> Result<()> {
    repo.save_policy(policy)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to save policy: {}", e))?;

    println!("{}", "✅ Policy saved".green().bold());

    if let Some(cache) = redis {
        match cache
            .set_hash(
                &config.settings_cache_key,
                &policy.to_hash_fields(),
                POLICY_CACHE_TTL,
            )
            .await
        {
            Ok(()) => println!("{}", "✅ Cached policy updated".green()),
            Err(e) => println!(
                "{} {}",
                "⚠️  Cached policy not updated, servers will reload it within 5 minutes:"
                    .yellow(),
                e
            ),
        }
    }
    println!();

    Ok(())
}

async fn handle_link_action(action: LinkAction, config: &Config, pool: &PgPool) -> Result<()> {
    let repo = PgLinkRepository::new(Arc::new(pool.clone()), config.store_timeouts());

    match action {
        LinkAction::Disable { code, yes } => {
            let redis = connect_cache(config).await;
            set_link_disabled(&repo, redis.as_deref(), &code, true, yes).await
        }
        LinkAction::Enable { code, yes } => {
            let redis = connect_cache(config).await;
            set_link_disabled(&repo, redis.as_deref(), &code, false, yes).await
        }
        LinkAction::PurgeExpired { yes } => purge_expired(&repo, yes).await,
    }
}

/// Flips the `disabled` flag, then drops both cached directions.
///
/// # Safety
///
/// - Requires confirmation unless `--yes` is given
/// - Reports unknown codes without touching the cache
async fn set_link_disabled(
    repo: &PgLinkRepository,
    redis: Option<&RedisCache>,
    code: &str,
    disabled: bool,
    skip_confirm: bool,
) -> Result<()> {
    let verb = if disabled { "Disable" } else { "Enable" };
    println!("{}", format!("🔗 {} link", verb).bright_blue().bold());
    println!();

    let link = repo
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let Some(link) = link else {
        println!("{}", format!("❌ No link with code '{}'", code).red());
        return Ok(());
    };

    println!("  Code:   {}", link.code.cyan());
    println!("  Target: {}", link.target.bright_white());
    if let Some(expires_at) = link.expires_at {
        let expires = expires_at.format("%Y-%m-%d %H:%M").to_string();
        println!("  Expires: {}", expires.bright_black());
    }
    println!();

    if link.disabled == disabled {
        let state = if disabled { "disabled" } else { "enabled" };
        let notice = format!("⚠️  This link is already {}", state);
        println!("{}", notice.yellow());
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("{} this link?", verb))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.set_disabled(code, disabled)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update link: {}", e))?;

    if let Some(cache) = redis
        && let Err(e) = invalidate_link(cache, code, &link.target).await
    {
        println!(
            "{} {}",
            "⚠️  Cached entries not removed, they lapse with their TTL:".yellow(),
            e
        );
    }

    println!();
    let done = format!("✅ Link {}d", verb.to_lowercase());
    println!("{}", done.green().bold());
    println!();

    Ok(())
}

async fn purge_expired(repo: &PgLinkRepository, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Purge expired links".bright_blue().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Permanently delete all expired links?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .purge_expired(Utc::now())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to purge links: {}", e))?;

    println!("  Deleted: {}", deleted.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
///
/// Connecting already ran pending migrations, so reaching this point means
/// both succeeded.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("{}", "✅ Migrations up to date".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
