// 48-hour launch checklist and per-session progress tracking

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::types::{Checklist, ChecklistPhase, ChecklistTask, Offer, Priority};
use crate::errors::{ForgeError, ForgeResult};

const PHASES: [(&str, [(&str, &str, Priority); 5]); 4] = [
    (
        "Day 1 - Creation (Hours 1-8)",
        [
            ("Create the main product content", "3-4 hours", Priority::High),
            ("Design or source cover/thumbnail image", "1 hour", Priority::Medium),
            ("Write product description and benefits", "1 hour", Priority::High),
            ("Set up payment processing (Stripe/PayPal)", "2 hours", Priority::High),
            ("Create simple landing page", "2-3 hours", Priority::High),
        ],
    ),
    (
        "Day 1 - Setup (Hours 9-16)",
        [
            ("Test purchase and download process", "30 mins", Priority::High),
            ("Create social media graphics", "1-2 hours", Priority::Medium),
            ("Write email sequence (3-5 emails)", "2 hours", Priority::Medium),
            ("Set up basic analytics tracking", "30 mins", Priority::Low),
            ("Prepare launch announcement", "1 hour", Priority::High),
        ],
    ),
    (
        "Day 2 - Launch (Hours 17-24)",
        [
            ("Send launch email to your list", "15 mins", Priority::High),
            ("Post on all social media platforms", "30 mins", Priority::High),
            ("Share in relevant communities/groups", "1 hour", Priority::Medium),
            ("Reach out to potential affiliate partners", "1 hour", Priority::Low),
            ("Monitor and respond to feedback", "Ongoing", Priority::High),
        ],
    ),
    (
        "Day 2 - Optimization",
        [
            ("A/B test pricing if needed", "30 mins", Priority::Low),
            ("Gather first customer testimonials", "1 hour", Priority::Medium),
            ("Create urgency/scarcity if appropriate", "30 mins", Priority::Low),
            ("Plan first upsell or bonus", "1 hour", Priority::Low),
            ("Celebrate your first sale! 🎉", "Priceless", Priority::High),
        ],
    ),
];

/// The plan is the same for every offer; the offer only has to exist.
pub fn generate_checklist(_offer: &Offer) -> Checklist {
    let mut next_task_id = 1;
    let phases = PHASES
        .iter()
        .zip(1..)
        .map(|((phase, tasks), phase_id)| ChecklistPhase {
            id: phase_id,
            phase: phase.to_string(),
            tasks: tasks
                .iter()
                .map(|(task, time_estimate, priority)| {
                    let id = next_task_id;
                    next_task_id += 1;
                    ChecklistTask {
                        id,
                        task: task.to_string(),
                        time_estimate: time_estimate.to_string(),
                        priority: *priority,
                    }
                })
                .collect(),
        })
        .collect();
    Checklist { phases }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

/// Completed task ids for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistProgress {
    completed: BTreeSet<u32>,
}

impl ChecklistProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips a task and returns whether it is now complete.
    pub fn toggle(&mut self, checklist: &Checklist, task_id: u32) -> ForgeResult<bool> {
        if !checklist.contains_task(task_id) {
            return Err(ForgeError::UnknownTask { id: task_id });
        }
        if self.completed.remove(&task_id) {
            Ok(false)
        } else {
            self.completed.insert(task_id);
            Ok(true)
        }
    }

    pub fn is_completed(&self, task_id: u32) -> bool {
        self.completed.contains(&task_id)
    }

    pub fn completed_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.completed.iter().copied()
    }

    pub fn stats(&self, checklist: &Checklist) -> ProgressStats {
        let total = checklist.total_tasks();
        let completed = self.completed.len();
        let percentage = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        ProgressStats {
            completed,
            total,
            percentage,
        }
    }
}
