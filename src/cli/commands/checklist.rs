use anyhow::Result;

use crate::cli::commands::{open_session, print_json, report, Command};
use crate::config::ForgeConfig;
use crate::errors::ForgeResult;
use crate::session::Session;
use crate::tier::Stage;
use crate::generators::{Checklist, ChecklistProgress, OfferInput, ProgressStats};

// The launch plan does not depend on the offer, but the stage still needs one.
const PLACEHOLDER_NICHE: &str = "Productivity & Time Management";
const PLACEHOLDER_PAIN: &str = "launching a first product";

pub struct ChecklistCommand {
    config: ForgeConfig,
    tier: Option<String>,
    done: Vec<u32>,
    json: bool,
}

impl ChecklistCommand {
    pub fn new(config: ForgeConfig, done: Vec<u32>) -> Self {
        Self {
            config,
            tier: None,
            done,
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

impl Command for ChecklistCommand {
    async fn execute(&self) -> Result<()> {
        let session = open_session(&self.config, self.tier.as_deref()).await?;

        let checklist = match prepare_checklist(&session).await {
            Ok(checklist) => checklist,
            Err(e) => return report(e),
        };

        for id in &self.done {
            if let Err(e) = session.toggle_task(*id).await {
                report(e)?;
            }
        }

        let snapshot = session.snapshot().await;
        if self.json {
            return print_json(&snapshot);
        }

        let progress = session.checklist_progress().await;
        show_checklist(&checklist, &progress);
        if let Some(stats) = snapshot.checklist_stats {
            show_stats(&stats);
        }
        Ok(())
    }
}

/// Checks the tier before creating the placeholder offer so a locked tier
/// never spends quota.
async fn prepare_checklist(session: &Session) -> ForgeResult<Checklist> {
    session.check_stage(Stage::Checklist).await?;
    let input = OfferInput::new(PLACEHOLDER_NICHE, PLACEHOLDER_PAIN, "checklist");
    session.generate_offer(&input).await?;
    session.generate_checklist().await
}

fn show_checklist(checklist: &Checklist, progress: &ChecklistProgress) {
    println!("📋 48-HOUR LAUNCH CHECKLIST");
    println!("──────────────────────────");
    for phase in &checklist.phases {
        println!();
        println!("{}", phase.phase);
        for task in &phase.tasks {
            let mark = if progress.is_completed(task.id) { "✅" } else { "⬜" };
            println!(
                "  {mark} {:>2}. {} ({}, {:?} priority)",
                task.id, task.task, task.time_estimate, task.priority
            );
        }
    }
    println!();
}

fn show_stats(stats: &ProgressStats) {
    println!(
        "📊 Progress: {}/{} tasks complete ({}%)",
        stats.completed, stats.total, stats.percentage
    );
    if stats.completed == stats.total {
        println!("🎉 Launch plan complete - time to ship!");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ForgeError;
    use crate::pipeline::Progress;

    async fn session_as(user_id: u64) -> Session {
        let mut config = ForgeConfig::default();
        config.generation.simulate_latency = false;
        config.session.seed = Some(1);
        config.session.user_id = Some(user_id);
        open_session(&config, None).await.unwrap()
    }

    #[tokio::test]
    async fn locked_tier_spends_no_quota() {
        let session = session_as(1).await;
        let result = prepare_checklist(&session).await;
        assert!(matches!(result, Err(ForgeError::StageLocked { .. })));
        assert_eq!(session.user().await.products_created, 0);
        assert_eq!(session.progress().await, Progress::Empty);
    }

    #[tokio::test]
    async fn paid_tier_gets_full_plan() {
        let session = session_as(2).await;
        let checklist = prepare_checklist(&session).await.unwrap();
        assert_eq!(checklist.total_tasks(), 20);
        assert_eq!(session.user().await.products_created, 4);
    }
}
