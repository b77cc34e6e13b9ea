use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{info, warn};

use crate::tier::Stage;

/// Generation counters for the lifetime of the process
#[derive(Debug, Default)]
pub struct GenerationMetrics {
    generated: [AtomicU64; 6],
    pub validation_failures: AtomicU64,
    pub precondition_failures: AtomicU64,
    pub locked_rejections: AtomicU64,
    pub quota_rejections: AtomicU64,
    pub in_flight_rejections: AtomicU64,
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_generated(&self, stage: Stage) {
        self.generated[stage.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_precondition_failure(&self) {
        self.precondition_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_locked(&self, stage: Stage) {
        self.locked_rejections.fetch_add(1, Ordering::Relaxed);
        warn!(stage = stage.id(), "Stage locked for current tier");
    }

    pub fn record_quota_rejection(&self) {
        self.quota_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_in_flight_rejection(&self, stage: Stage) {
        self.in_flight_rejections.fetch_add(1, Ordering::Relaxed);
        warn!(stage = stage.id(), "Rejected re-entrant generation");
    }

    pub fn generated(&self, stage: Stage) -> u64 {
        self.generated[stage.index()].load(Ordering::Relaxed)
    }

    pub fn get_stats(&self) -> GenerationStats {
        GenerationStats {
            generated: Stage::ALL
                .iter()
                .map(|stage| (*stage, self.generated(*stage)))
                .collect(),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            precondition_failures: self.precondition_failures.load(Ordering::Relaxed),
            locked_rejections: self.locked_rejections.load(Ordering::Relaxed),
            quota_rejections: self.quota_rejections.load(Ordering::Relaxed),
            in_flight_rejections: self.in_flight_rejections.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Generation metrics: generated={}, validation_failures={}, precondition_failures={}, locked={}, quota={}, in_flight={}",
            stats.total_generated(),
            stats.validation_failures,
            stats.precondition_failures,
            stats.locked_rejections,
            stats.quota_rejections,
            stats.in_flight_rejections
        );
    }
}

#[derive(Debug, Clone)]
pub struct GenerationStats {
    pub generated: Vec<(Stage, u64)>,
    pub validation_failures: u64,
    pub precondition_failures: u64,
    pub locked_rejections: u64,
    pub quota_rejections: u64,
    pub in_flight_rejections: u64,
}

impl GenerationStats {
    pub fn total_generated(&self) -> u64 {
        self.generated.iter().map(|(_, count)| count).sum()
    }
}

/// Global metrics instance
static GENERATION_METRICS: std::sync::LazyLock<GenerationMetrics> =
    std::sync::LazyLock::new(GenerationMetrics::new);

pub fn generation_metrics() -> &'static GenerationMetrics {
    &GENERATION_METRICS
}

/// Logs how long a stage took once finished
pub struct StageTimer {
    stage: Stage,
    start: Instant,
}

impl StageTimer {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            stage = self.stage.id(),
            duration_ms = duration.as_millis() as u64,
            "Stage completed"
        );
    }
}
