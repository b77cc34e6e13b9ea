use anyhow::Result;

use crate::cli::commands::{open_session, print_json, report, Command};
use crate::config::ForgeConfig;
use crate::store::OracleCard;

pub struct OracleCommand {
    config: ForgeConfig,
    tier: Option<String>,
    archetype: Option<String>,
    count: u32,
    json: bool,
}

impl OracleCommand {
    pub fn new(config: ForgeConfig, archetype: Option<String>, count: u32) -> Self {
        Self {
            config,
            tier: None,
            archetype,
            count,
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

impl Command for OracleCommand {
    async fn execute(&self) -> Result<()> {
        let session = open_session(&self.config, self.tier.as_deref()).await?;

        if let Some(archetype) = &self.archetype {
            let cards = match session.oracle_cards(Some(archetype)).await {
                Ok(cards) => cards,
                Err(e) => return report(e),
            };
            if self.json {
                return print_json(&cards);
            }
            if cards.is_empty() {
                println!("🔮 No cards match archetype '{archetype}'");
                return Ok(());
            }
            println!("🔮 {} card(s) for '{archetype}':", cards.len());
            for card in &cards {
                show_card(card);
            }
            return Ok(());
        }

        if !self.json {
            println!("🔮 Consulting the Offer Oracle...");
        }
        let mut drawn = Vec::new();
        for _ in 0..self.count.max(1) {
            match session.draw_oracle_card().await {
                Ok(card) => drawn.push(card),
                Err(e) => return report(e),
            }
        }

        if self.json {
            return print_json(&drawn);
        }
        for card in &drawn {
            show_card(card);
        }
        Ok(())
    }
}

fn show_card(card: &OracleCard) {
    println!();
    println!("🃏 {}", card.title);
    println!("   🧙 {}", card.archetype);
    println!("   📝 {}", card.description);
    println!("   👥 {}", card.target_audience());
    println!("   🛠️  {}", card.implementation_hint());
}
