use anyhow::Result;
use serde_json::json;

use crate::cli::commands::{print_json, Command};
use crate::generators::offer::name_templates;
use crate::generators::{Format, NICHES};

pub struct NichesCommand {
    json: bool,
}

impl NichesCommand {
    pub fn new() -> Self {
        Self { json: false }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for NichesCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for NichesCommand {
    async fn execute(&self) -> Result<()> {
        if self.json {
            let formats: Vec<&str> = Format::KNOWN.iter().map(|format| format.as_str()).collect();
            return print_json(&json!({ "niches": NICHES, "formats": formats }));
        }

        println!("🗂️  NICHES");
        println!("─────────");
        let generic = name_templates("");
        for niche in NICHES {
            if name_templates(niche) == generic {
                println!("   • {niche}");
            } else {
                println!("   ⭐ {niche} (dedicated name ideas)");
            }
        }
        println!();
        println!("📦 FORMATS");
        println!("──────────");
        for format in Format::KNOWN.iter() {
            println!("   • {} - {}", format.as_str(), format.label());
        }
        println!();
        println!("💡 Any other niche or format works too, with generic templates.");
        Ok(())
    }
}
