use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

use crate::cli::SessionArgs;
use crate::config::{self, ForgeConfig};
use crate::errors::ForgeError;
use crate::session::Session;
use crate::store::{InMemoryOracleStore, InMemoryUserStore};
use crate::tier::Tier;

pub mod checklist;
pub mod generate;
pub mod niches;
pub mod oracle;
pub mod status;

pub use checklist::ChecklistCommand;
pub use generate::GenerateCommand;
pub use niches::NichesCommand;
pub use oracle::OracleCommand;
pub use status::StatusCommand;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Configuration for this run: file and environment, then command-line overrides.
pub fn resolve_config(args: &SessionArgs) -> Result<ForgeConfig> {
    let mut config = match &args.config {
        Some(path) => ForgeConfig::load_from(Some(path.as_path()))
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => config::config()?.clone(),
    };

    if args.fast {
        config.generation.simulate_latency = false;
    }
    if args.seed.is_some() {
        config.session.seed = args.seed;
    }
    if args.user.is_some() {
        config.session.user_id = args.user;
    }
    Ok(config)
}

/// Opens a session against the bundled fixtures.
pub async fn open_session(config: &ForgeConfig, tier: Option<&str>) -> Result<Session> {
    let mut users = InMemoryUserStore::from_fixture().context("Failed to load user fixture")?;
    if let Some(id) = config.session.user_id {
        users = users.with_current_user(id);
    }
    let oracle = InMemoryOracleStore::from_fixture().context("Failed to load oracle fixture")?;

    let session = Session::start(config, Arc::new(users), Arc::new(oracle)).await?;
    if let Some(tier) = tier {
        session.change_tier(Tier::parse(tier)).await?;
    }
    Ok(session)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the inline notice for a recoverable error, or fails the command.
pub fn report(error: ForgeError) -> Result<()> {
    if error.is_recoverable() {
        println!("⚠️  {}", error.notice());
        Ok(())
    } else {
        Err(error.into())
    }
}

pub fn show_how_to_get_started() -> Result<()> {
    println!("🎯 Offer Forge - micro-product offers in minutes");
    println!();
    println!("To get started:");
    println!("  🚀 offer-forge generate --niche \"Health & Fitness\" --pain \"low energy\"");
    println!("  📊 offer-forge status     # See your tier and usage");
    println!("  🔮 offer-forge oracle     # Draw an inspiration card");
    println!("  📋 offer-forge checklist  # Preview the launch plan");
    println!("  🗂️  offer-forge niches     # Browse niches and formats");
    println!();
    println!("💡 Add --fast to skip the build-up and --json for machine-readable output.");
    Ok(())
}
