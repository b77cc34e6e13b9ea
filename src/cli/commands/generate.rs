use anyhow::{bail, Result};

use crate::cli::commands::{open_session, print_json, report, Command};
use crate::clipboard::ClipboardChain;
use crate::config::ForgeConfig;
use crate::errors::ForgeError;
use crate::generators::{Checklist, Offer, OfferInput, PromoKit, SalesCopy, Structure};
use crate::session::Session;
use crate::tier::Stage;

pub struct GenerateCommand {
    config: ForgeConfig,
    input: OfferInput,
    tier: Option<String>,
    copy: bool,
    json: bool,
}

impl GenerateCommand {
    pub fn new(config: ForgeConfig, input: OfferInput) -> Self {
        Self {
            config,
            input,
            tier: None,
            copy: false,
            json: false,
        }
    }

    pub fn with_tier(mut self, tier: Option<String>) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_copy(mut self, copy: bool) -> Self {
        self.copy = copy;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    fn say(&self, line: impl AsRef<str>) {
        if !self.json {
            println!("{}", line.as_ref());
        }
    }

    /// Prints a locked stage as a teaser; any other error is a notice.
    fn skip(&self, stage: Stage, error: ForgeError) -> Result<()> {
        match error {
            ForgeError::StageLocked { tier, .. } => {
                self.say(format!("🔒 {} - not included in the {} plan", stage.label(), tier));
                self.say("");
                Ok(())
            }
            other if self.json => {
                eprintln!("{}", other.notice());
                Ok(())
            }
            other => report(other),
        }
    }
}

impl Command for GenerateCommand {
    async fn execute(&self) -> Result<()> {
        let session = open_session(&self.config, self.tier.as_deref()).await?;

        self.say("⚗️  Forging your offer...");
        let outcome = match session.generate_offer(&self.input).await {
            Ok(outcome) => outcome,
            Err(e) => bail!("{}", e.notice()),
        };
        if !self.json {
            show_offer(&outcome.offer);
        }

        run_stages(self, &session).await?;

        if let Some(notice) = &outcome.notice {
            self.say(notice);
        }

        if self.json {
            print_json(&session.snapshot().await)?;
        }

        if self.copy {
            let copied = ClipboardChain::from_config(&self.config.clipboard)
                .copy_text(&outcome.offer.summary());
            match (copied.success, copied.message) {
                (true, Some(message)) => self.say(format!("📋 {message}")),
                (true, None) => self.say("📋 Offer copied to clipboard"),
                (false, message) => eprintln!(
                    "⚠️  {}",
                    message.unwrap_or_else(|| "Copy failed".to_string())
                ),
            }
        }

        Ok(())
    }
}

async fn run_stages(cmd: &GenerateCommand, session: &Session) -> Result<()> {
    match session.generate_structure().await {
        Ok(structure) if !cmd.json => show_structure(&structure),
        Ok(_) => {}
        Err(e) => cmd.skip(Stage::Structure, e)?,
    }
    match session.generate_sales_copy().await {
        Ok(copy) if !cmd.json => show_sales_copy(&copy),
        Ok(_) => {}
        Err(e) => cmd.skip(Stage::Copy, e)?,
    }
    match session.generate_checklist().await {
        Ok(checklist) if !cmd.json => show_checklist_outline(&checklist),
        Ok(_) => {}
        Err(e) => cmd.skip(Stage::Checklist, e)?,
    }
    match session.generate_promo_kit().await {
        Ok(kit) if !cmd.json => show_promo_kit(&kit),
        Ok(_) => {}
        Err(e) => cmd.skip(Stage::Promo, e)?,
    }
    Ok(())
}

fn show_offer(offer: &Offer) {
    println!("✨ YOUR OFFER");
    println!("─────────────");
    println!("   📦 {}", offer.name);
    println!("   🎯 {}", offer.promise);
    println!("   📄 {}", offer.deliverable);
    println!("   🏷️  {} · {} · {}", offer.niche, offer.pain_point, offer.format.label());
    println!();
}

fn show_structure(structure: &Structure) {
    let pricing = &structure.pricing;
    println!("💰 PRICING");
    println!("──────────");
    println!(
        "   Main ${} · Suggested ${} · Premium ${}",
        pricing.main, pricing.suggested, pricing.premium
    );
    println!("   💡 {}", pricing.strategy);
    println!();
    println!("🎁 Bonuses:");
    for bonus in &structure.bonuses {
        println!("   • {bonus}");
    }
    println!("📈 Upsells:");
    for upsell in &structure.upsells {
        println!("   • {} (${}) - {}", upsell.title, upsell.price, upsell.description);
    }
    let stack = &structure.offer_stack;
    println!("🧱 Offer stack:");
    for component in &stack.components {
        println!("   • {} - ${}", component.item, component.value);
    }
    println!(
        "   Total value ${} · Your price ${} · You save ${}",
        stack.total_value, stack.your_price, stack.savings
    );
    println!();
}

fn show_sales_copy(copy: &SalesCopy) {
    println!("✍️  SALES COPY");
    println!("─────────────");
    println!("📣 Social post:");
    println!("{}", copy.social_post);
    println!();
    println!("👉 {}", copy.cta_one_liner);
    println!();
    println!("📰 Mini sales page:");
    println!("{}", copy.mini_sales_page);
    println!();
}

fn show_checklist_outline(checklist: &Checklist) {
    println!("📋 48-HOUR LAUNCH PLAN ({} tasks)", checklist.total_tasks());
    println!("─────────────────────────────");
    for phase in &checklist.phases {
        println!("   {} - {} tasks", phase.phase, phase.tasks.len());
    }
    println!("   💡 Track progress with 'offer-forge checklist --done <id>'");
    println!();
}

fn show_promo_kit(kit: &PromoKit) {
    println!("🎬 PROMO KIT");
    println!("────────────");
    for script in &kit.video_scripts {
        println!("   🎥 {} ({})", script.title, script.duration);
    }
    for post in &kit.social_posts {
        println!("   📱 {} · {}", post.platform, post.kind);
    }
    println!();
}
