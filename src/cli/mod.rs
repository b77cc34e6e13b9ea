use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "offer-forge")]
#[command(about = "Turn a niche and a pain point into a launch-ready micro-product offer")]
#[command(long_about = "Offer Forge walks you from a niche and a pain point to a named offer, \
                       pricing, sales copy, a 48-hour launch checklist and a promo kit. \
                       Get started with 'offer-forge generate'.")]
pub struct Cli {
    #[command(flatten)]
    pub session: SessionArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command that opens a session
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Configuration file (defaults to ./offer-forge.toml when present)
    #[arg(long, global = true, help = "Path to an offer-forge.toml configuration file")]
    pub config: Option<PathBuf>,
    /// Act as this fixture user
    #[arg(long, global = true, help = "Fixture user id to sign in as")]
    pub user: Option<u64>,
    /// Override the signed-in user's tier for this run
    #[arg(long, global = true, help = "Tier to use: free, paid, lifetime")]
    pub tier: Option<String>,
    /// Seed the random generator for reproducible output
    #[arg(long, global = true, help = "Random seed for reproducible output")]
    pub seed: Option<u64>,
    /// Skip the simulated generation delay
    #[arg(long, global = true, help = "Skip simulated generation latency")]
    pub fast: bool,
    /// Print machine-readable JSON instead of formatted text
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every stage your tier unlocks, from offer to promo kit
    Generate {
        /// Audience niche, e.g. "Health & Fitness"
        #[arg(long, help = "Niche to build the offer for (see 'offer-forge niches')")]
        niche: String,
        /// Problem the product solves
        #[arg(long, help = "Pain point your audience struggles with")]
        pain: String,
        /// Product format
        #[arg(long, default_value = "pdf", help = "Format: pdf, checklist, template, audio, video, worksheet")]
        format: String,
        /// Copy the offer summary when done
        #[arg(long, help = "Copy the offer summary to the clipboard")]
        copy: bool,
    },
    /// Draw inspiration cards from the Offer Oracle
    Oracle {
        /// Only list cards whose archetype contains this text
        #[arg(long, help = "Filter the catalog by archetype instead of drawing")]
        archetype: Option<String>,
        /// Number of cards to draw
        #[arg(long, default_value = "1", help = "How many cards to draw (with replacement)")]
        count: u32,
    },
    /// Show the 48-hour launch checklist with progress
    Checklist {
        /// Task ids to mark as done
        #[arg(long, num_args = 1.., help = "Task ids (1-20) to mark complete")]
        done: Vec<u32>,
    },
    /// Display the signed-in user, tier, usage and unlocked stages
    Status,
    /// List the niches and formats with dedicated templates
    Niches,
}
