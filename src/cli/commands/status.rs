use anyhow::Result;

use crate::cli::commands::{open_session, print_json, Command};
use crate::config::ForgeConfig;
use crate::tier::{is_stage_enabled, usage_limit, Stage};
use crate::usage::usage_percentage;

pub struct StatusCommand {
    config: ForgeConfig,
    tier: Option<String>,
    json: bool,
}

impl StatusCommand {
    pub fn new(config: ForgeConfig) -> Self {
        Self {
            config,
            tier: None,
            json: false,
        }
    }

    pub fn with_tier(mut self, tier: Option<String>) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Command for StatusCommand {
    async fn execute(&self) -> Result<()> {
        let session = open_session(&self.config, self.tier.as_deref()).await?;
        if self.json {
            return print_json(&session.snapshot().await);
        }

        let user = session.user().await;
        println!("⚗️  OFFER FORGE STATUS");
        println!("=====================");
        println!();
        println!("👤 {} <{}>", user.name, user.email);
        println!("   🏷️  Tier: {}", user.tier);

        let limit = usage_limit(user.tier);
        match usage_percentage(&user) {
            Some(percentage) => println!(
                "   📦 Products: {}/{} ({}% of quota)",
                user.products_created, limit, percentage
            ),
            None => println!("   📦 Products: {} (unlimited)", user.products_created),
        }
        println!();

        println!("🗂️  STAGES:");
        for stage in Stage::ALL {
            if is_stage_enabled(user.tier, stage) {
                println!("   🟢 {}", stage.label());
            } else {
                println!("   🔒 {}", stage.label());
            }
        }

        if let Some(prompt) = session.upgrade_prompt().await {
            println!();
            println!("💡 {prompt}");
        }
        Ok(())
    }
}
