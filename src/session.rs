// Session - one signed-in user driving one offer pipeline
//
// Every stage runs the same gauntlet: tier gate, precondition, single
// in-flight token, simulated latency, generate, commit. The pipeline mutex is
// held only to read inputs and to commit results, never across the sleep.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

use crate::config::{ForgeConfig, GenerationConfig};
use crate::errors::{ForgeError, ForgeResult};
use crate::generators::{
    self, Checklist, ChecklistProgress, Offer, OfferInput, ProgressStats, PromoKit, SalesCopy,
    Structure,
};
use crate::observability::{generation_metrics, StageTimer};
use crate::pipeline::{validate_input, Derived, OfferPipeline, Progress};
use crate::store::{draw_card, OracleCard, OracleStore, User, UserPatch, UserStore};
use crate::telemetry::{create_stage_span, generate_correlation_id};
use crate::tier::{enabled_stages, is_stage_enabled, usage_limit, Stage, Tier, UsageLimit};
use crate::usage::{upgrade_prompt, UsageCounter};

const FREE_UPGRADE_NOTICE: &str = "🚀 Ready to create more? Upgrade to unlock unlimited products!";

/// Result of a successful offer generation.
#[derive(Debug, Clone, Serialize)]
pub struct OfferOutcome {
    pub offer: Offer,
    /// User after the usage counter ran
    pub user: User,
    /// Upgrade nudge for free users who have used their quota
    pub notice: Option<String>,
}

/// Everything the dashboard would render, in one serializable value.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub user: User,
    pub usage_limit: UsageLimit,
    pub enabled_stages: Vec<Stage>,
    pub upgrade_prompt: Option<String>,
    pub progress: Progress,
    pub offer_revision: u64,
    pub offer: Option<Offer>,
    pub structure: Option<Derived<Structure>>,
    pub sales_copy: Option<Derived<SalesCopy>>,
    pub checklist: Option<Derived<Checklist>>,
    pub checklist_stats: Option<ProgressStats>,
    pub completed_tasks: Vec<u32>,
    pub promo_kit: Option<Derived<PromoKit>>,
    pub stale_stages: Vec<Stage>,
    pub last_card: Option<OracleCard>,
}

/// Held while a stage generation is pending. Dropping it frees the stage.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct Session {
    id: String,
    users: Arc<dyn UserStore>,
    oracle: Arc<dyn OracleStore>,
    usage: UsageCounter,
    generation: GenerationConfig,
    user: Mutex<User>,
    pipeline: Mutex<OfferPipeline>,
    rng: Mutex<StdRng>,
    last_card: Mutex<Option<OracleCard>>,
    in_flight: [AtomicBool; 6],
}

impl Session {
    /// Loads the current user once and prepares an empty pipeline.
    pub async fn start(
        config: &ForgeConfig,
        users: Arc<dyn UserStore>,
        oracle: Arc<dyn OracleStore>,
    ) -> ForgeResult<Self> {
        let user = users.get_current_user().await?;
        let rng = match config.session.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let id = Uuid::new_v4().to_string();

        info!(
            session_id = %id,
            user_id = user.id,
            tier = %user.tier,
            seeded = config.session.seed.is_some(),
            "Session started"
        );

        Ok(Self {
            id,
            usage: UsageCounter::new(users.clone(), config.usage.enforce_quota),
            users,
            oracle,
            generation: config.generation.clone(),
            user: Mutex::new(user),
            pipeline: Mutex::new(OfferPipeline::new()),
            rng: Mutex::new(rng),
            last_card: Mutex::new(None),
            in_flight: Default::default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn user(&self) -> User {
        self.user.lock().await.clone()
    }

    pub async fn enabled_stages(&self) -> Vec<Stage> {
        enabled_stages(self.user.lock().await.tier)
    }

    pub async fn upgrade_prompt(&self) -> Option<&'static str> {
        upgrade_prompt(&*self.user.lock().await)
    }

    pub async fn progress(&self) -> Progress {
        self.pipeline.lock().await.progress()
    }

    pub fn is_generating(&self, stage: Stage) -> bool {
        self.in_flight[stage.index()].load(Ordering::Acquire)
    }

    /// Tier gate alone, for callers that must not do any work on a locked stage.
    pub async fn check_stage(&self, stage: Stage) -> ForgeResult<()> {
        self.ensure_enabled(stage)
            .await
            .map(|_| ())
            .inspect_err(|e| record_failure(stage, e))
    }

    /// Switches the signed-in user's tier. Takes effect for the next stage call.
    pub async fn change_tier(&self, tier: Tier) -> ForgeResult<User> {
        let id = self.user.lock().await.id;
        let updated = self.users.update_user(id, UserPatch::tier(tier)).await?;
        info!(user_id = id, tier = %tier, "Tier changed");
        *self.user.lock().await = updated.clone();
        Ok(updated)
    }

    pub async fn generate_offer(&self, input: &OfferInput) -> ForgeResult<OfferOutcome> {
        self.run_stage(Stage::Generate, async {
            let user = self.ensure_enabled(Stage::Generate).await?;
            let valid = validate_input(input)?;
            self.usage.check_quota(&user)?;
            let _guard = self.begin(Stage::Generate)?;
            self.simulate_latency(Stage::Generate).await;

            let offer = {
                let mut rng = self.rng.lock().await;
                generators::generate_offer(&valid.niche, &valid.pain_point, valid.format, &mut *rng)
            };
            self.pipeline.lock().await.commit_offer(offer.clone());

            // The offer stays even if the counter cannot be updated.
            let user = match self.usage.record_product_created(&user).await {
                Ok(updated) => {
                    *self.user.lock().await = updated.clone();
                    updated
                }
                Err(_) => user,
            };

            let notice = (user.tier == Tier::Free && user.products_created >= 1)
                .then(|| FREE_UPGRADE_NOTICE.to_string());
            Ok(OfferOutcome {
                offer,
                user,
                notice,
            })
        })
        .await
    }

    pub async fn generate_structure(&self) -> ForgeResult<Structure> {
        self.run_stage(Stage::Structure, async {
            self.ensure_enabled(Stage::Structure).await?;
            let (offer, revision) = self.pipeline.lock().await.require_offer(Stage::Structure)?;
            let _guard = self.begin(Stage::Structure)?;
            self.simulate_latency(Stage::Structure).await;

            let structure = generators::generate_structure(&offer);
            Ok(self
                .pipeline
                .lock()
                .await
                .commit_structure(structure, revision)
                .clone())
        })
        .await
    }

    /// Prices the copy from whatever structure exists when the call starts.
    pub async fn generate_sales_copy(&self) -> ForgeResult<SalesCopy> {
        self.run_stage(Stage::Copy, async {
            self.ensure_enabled(Stage::Copy).await?;
            let (offer, revision, structure) = {
                let pipeline = self.pipeline.lock().await;
                let (offer, revision) = pipeline.require_offer(Stage::Copy)?;
                let structure = pipeline.structure().map(|derived| derived.value.clone());
                (offer, revision, structure)
            };
            let _guard = self.begin(Stage::Copy)?;
            self.simulate_latency(Stage::Copy).await;

            let copy = {
                let mut rng = self.rng.lock().await;
                generators::generate_sales_copy(&offer, structure.as_ref(), &mut *rng)
            };
            Ok(self
                .pipeline
                .lock()
                .await
                .commit_sales_copy(copy, revision)
                .clone())
        })
        .await
    }

    pub async fn generate_checklist(&self) -> ForgeResult<Checklist> {
        self.run_stage(Stage::Checklist, async {
            self.ensure_enabled(Stage::Checklist).await?;
            let (offer, revision) = self.pipeline.lock().await.require_offer(Stage::Checklist)?;
            let _guard = self.begin(Stage::Checklist)?;
            self.simulate_latency(Stage::Checklist).await;

            let checklist = generators::generate_checklist(&offer);
            Ok(self
                .pipeline
                .lock()
                .await
                .commit_checklist(checklist, revision)
                .clone())
        })
        .await
    }

    pub async fn generate_promo_kit(&self) -> ForgeResult<PromoKit> {
        self.run_stage(Stage::Promo, async {
            self.ensure_enabled(Stage::Promo).await?;
            let (offer, revision) = self.pipeline.lock().await.require_offer(Stage::Promo)?;
            let _guard = self.begin(Stage::Promo)?;
            self.simulate_latency(Stage::Promo).await;

            let kit = generators::generate_promo_kit(&offer);
            Ok(self
                .pipeline
                .lock()
                .await
                .commit_promo_kit(kit, revision)
                .clone())
        })
        .await
    }

    /// Uniform draw with replacement from the oracle catalog.
    pub async fn draw_oracle_card(&self) -> ForgeResult<OracleCard> {
        self.run_stage(Stage::Oracle, async {
            self.ensure_enabled(Stage::Oracle).await?;
            let _guard = self.begin(Stage::Oracle)?;
            self.simulate_latency(Stage::Oracle).await;

            let card = {
                let mut rng = self.rng.lock().await;
                draw_card(&*self.oracle, &mut *rng)
            }
            .ok_or(ForgeError::OracleUnavailable)?;
            *self.last_card.lock().await = Some(card.clone());
            Ok(card)
        })
        .await
    }

    /// Browse the catalog. An empty filter returns every card.
    pub async fn oracle_cards(&self, archetype: Option<&str>) -> ForgeResult<Vec<OracleCard>> {
        self.ensure_enabled(Stage::Oracle)
            .await
            .inspect_err(|e| record_failure(Stage::Oracle, e))?;
        Ok(match archetype {
            Some(filter) => self.oracle.cards_by_archetype(filter),
            None => self.oracle.all_cards(),
        })
    }

    pub async fn toggle_task(&self, task_id: u32) -> ForgeResult<bool> {
        self.ensure_enabled(Stage::Checklist)
            .await
            .inspect_err(|e| record_failure(Stage::Checklist, e))?;
        let done = self.pipeline.lock().await.toggle_task(task_id)?;
        debug!(task_id, done, "Toggled checklist task");
        Ok(done)
    }

    pub async fn checklist_progress(&self) -> ChecklistProgress {
        self.pipeline.lock().await.checklist_progress().clone()
    }

    pub async fn checklist_stats(&self) -> Option<ProgressStats> {
        self.pipeline.lock().await.checklist_stats()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let user = self.user().await;
        let last_card = self.last_card.lock().await.clone();
        let pipeline = self.pipeline.lock().await;

        let stale_stages = [
            (Stage::Structure, pipeline.structure().map(|d| pipeline.is_stale(d))),
            (Stage::Copy, pipeline.sales_copy().map(|d| pipeline.is_stale(d))),
            (Stage::Checklist, pipeline.checklist().map(|d| pipeline.is_stale(d))),
            (Stage::Promo, pipeline.promo_kit().map(|d| pipeline.is_stale(d))),
        ]
        .into_iter()
        .filter_map(|(stage, stale)| (stale == Some(true)).then_some(stage))
        .collect();

        SessionSnapshot {
            session_id: self.id.clone(),
            usage_limit: usage_limit(user.tier),
            enabled_stages: enabled_stages(user.tier),
            upgrade_prompt: upgrade_prompt(&user).map(str::to_string),
            user,
            progress: pipeline.progress(),
            offer_revision: pipeline.revision(),
            offer: pipeline.offer().cloned(),
            structure: pipeline.structure().cloned(),
            sales_copy: pipeline.sales_copy().cloned(),
            checklist: pipeline.checklist().cloned(),
            checklist_stats: pipeline.checklist_stats(),
            completed_tasks: pipeline.checklist_progress().completed_ids().collect(),
            promo_kit: pipeline.promo_kit().cloned(),
            stale_stages,
            last_card,
        }
    }

    async fn ensure_enabled(&self, stage: Stage) -> ForgeResult<User> {
        let user = self.user.lock().await.clone();
        if !is_stage_enabled(user.tier, stage) {
            return Err(ForgeError::StageLocked {
                stage,
                tier: user.tier,
            });
        }
        Ok(user)
    }

    fn begin(&self, stage: Stage) -> ForgeResult<InFlightGuard<'_>> {
        let flag = &self.in_flight[stage.index()];
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ForgeError::GenerationInProgress { stage })?;
        Ok(InFlightGuard { flag })
    }

    async fn simulate_latency(&self, stage: Stage) {
        let latency = self.generation.latency_for(stage);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    async fn run_stage<T, F>(&self, stage: Stage, work: F) -> ForgeResult<T>
    where
        F: Future<Output = ForgeResult<T>>,
    {
        let span = create_stage_span(stage, &self.id, &generate_correlation_id());
        let timer = StageTimer::new(stage);
        let result = work.instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok(_) => {
                generation_metrics().record_generated(stage);
                timer.finish();
            }
            Err(e) => record_failure(stage, e),
        });
        result
    }
}

fn record_failure(stage: Stage, error: &ForgeError) {
    let metrics = generation_metrics();
    match error {
        ForgeError::Validation { .. } => metrics.record_validation_failure(),
        ForgeError::Precondition { .. } => metrics.record_precondition_failure(),
        ForgeError::StageLocked { .. } => metrics.record_locked(stage),
        ForgeError::QuotaExceeded { .. } => metrics.record_quota_rejection(),
        ForgeError::GenerationInProgress { .. } => metrics.record_in_flight_rejection(stage),
        _ => {}
    }
    debug!(stage = stage.id(), error = %error, "Stage rejected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryOracleStore, InMemoryUserStore, MockUserStore};
    use std::time::Duration;

    fn user(tier: Tier, products_created: u32) -> User {
        User {
            id: 7,
            name: "Tester".to_string(),
            email: "tester@example.com".to_string(),
            tier,
            products_created,
        }
    }

    fn config(latency: bool) -> ForgeConfig {
        let mut config = ForgeConfig::default();
        config.generation.simulate_latency = latency;
        config.session.seed = Some(42);
        config
    }

    async fn session_for(tier: Tier, products_created: u32, latency: bool) -> Session {
        let users = Arc::new(InMemoryUserStore::new(vec![user(tier, products_created)]));
        let oracle = Arc::new(InMemoryOracleStore::from_fixture().unwrap());
        Session::start(&config(latency), users, oracle).await.unwrap()
    }

    fn input() -> OfferInput {
        OfferInput::new("Productivity & Time Management", "procrastination", "checklist")
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_offer_is_rejected_while_pending() {
        let session = session_for(Tier::Paid, 0, true).await;
        let input = input();

        let (first, second) = tokio::join!(
            session.generate_offer(&input),
            session.generate_offer(&input)
        );

        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(ForgeError::GenerationInProgress { stage: Stage::Generate })
        ));
        assert_eq!(session.user().await.products_created, 1);
        assert!(!session.is_generating(Stage::Generate));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_follows_config() {
        let session = session_for(Tier::Paid, 0, true).await;
        let started = tokio::time::Instant::now();
        session.generate_offer(&input()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn different_stages_run_together() {
        let session = session_for(Tier::Paid, 0, true).await;
        session.generate_offer(&input()).await.unwrap();

        let (structure, checklist) =
            tokio::join!(session.generate_structure(), session.generate_checklist());
        assert!(structure.is_ok());
        assert!(checklist.is_ok());
    }

    #[tokio::test]
    async fn free_tier_is_locked_out_of_leaf_stages() {
        let session = session_for(Tier::Free, 0, false).await;
        session.generate_offer(&input()).await.unwrap();

        for result in [
            session.generate_checklist().await.map(|_| ()),
            session.generate_promo_kit().await.map(|_| ()),
            session.draw_oracle_card().await.map(|_| ()),
        ] {
            assert!(matches!(
                result,
                Err(ForgeError::StageLocked { tier: Tier::Free, .. })
            ));
        }
        assert!(session.oracle_cards(None).await.is_err());
        assert!(session.generate_structure().await.is_ok());
    }

    #[tokio::test]
    async fn structure_before_offer_needs_guidance() {
        let session = session_for(Tier::Paid, 0, false).await;
        let err = session.generate_structure().await.unwrap_err();
        assert!(matches!(err, ForgeError::Precondition { stage: Stage::Structure }));
        assert_eq!(err.notice(), "Please generate an offer first");
        assert_eq!(session.progress().await, Progress::Empty);
    }

    #[tokio::test]
    async fn missing_fields_block_generation() {
        let session = session_for(Tier::Paid, 0, false).await;
        let err = session
            .generate_offer(&OfferInput::new("Health & Fitness", "  ", ""))
            .await
            .unwrap_err();
        match err {
            ForgeError::Validation { missing } => assert_eq!(missing, vec!["painPoint", "format"]),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(session.user().await.products_created, 0);
    }

    #[tokio::test]
    async fn each_offer_counts_once() {
        let session = session_for(Tier::Paid, 0, false).await;
        session.generate_offer(&input()).await.unwrap();
        let outcome = session.generate_offer(&input()).await.unwrap();
        assert_eq!(outcome.user.products_created, 2);
        assert_eq!(outcome.notice, None);
    }

    #[tokio::test]
    async fn free_quota_is_enforced() {
        let session = session_for(Tier::Free, 0, false).await;
        let outcome = session.generate_offer(&input()).await.unwrap();
        assert_eq!(outcome.notice.as_deref(), Some(FREE_UPGRADE_NOTICE));

        let err = session.generate_offer(&input()).await.unwrap_err();
        assert!(matches!(err, ForgeError::QuotaExceeded { used: 1, .. }));
        assert_eq!(session.snapshot().await.offer_revision, 1);
    }

    #[tokio::test]
    async fn upgrade_unlocks_stages() {
        let session = session_for(Tier::Free, 0, false).await;
        session.generate_offer(&input()).await.unwrap();
        session.change_tier(Tier::Lifetime).await.unwrap();

        assert_eq!(session.enabled_stages().await.len(), 6);
        assert!(session.generate_checklist().await.is_ok());
        assert!(session.toggle_task(3).await.unwrap());
        assert_eq!(session.checklist_stats().await.unwrap().percentage, 5);
        assert!(session.draw_oracle_card().await.is_ok());
        let snapshot = session.snapshot().await;
        assert!(snapshot.last_card.is_some());
        assert_eq!(snapshot.completed_tasks, vec![3]);
    }

    #[tokio::test]
    async fn stage_check_does_no_work() {
        let session = session_for(Tier::Free, 0, false).await;
        assert!(matches!(
            session.check_stage(Stage::Checklist).await,
            Err(ForgeError::StageLocked { stage: Stage::Checklist, .. })
        ));
        assert!(session.check_stage(Stage::Generate).await.is_ok());
        assert_eq!(session.user().await.products_created, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn structure_from_older_offer_stays_stale() {
        let session = session_for(Tier::Lifetime, 0, true).await;
        session.generate_offer(&input()).await.unwrap();
        let video = OfferInput::new("Health & Fitness", "low energy", "video");

        // Offer commits at +2000ms; the structure snapshots revision 1 at
        // +600ms and commits at +2100ms.
        let (offer, structure) = tokio::join!(session.generate_offer(&video), async {
            tokio::time::sleep(Duration::from_millis(600)).await;
            session.generate_structure().await
        });
        assert!(offer.is_ok());
        assert_eq!(structure.unwrap().pricing.main, 9);

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.offer_revision, 2);
        assert_eq!(snapshot.progress, Progress::OfferReady);
        assert_eq!(snapshot.stale_stages, vec![Stage::Structure]);

        session.generate_structure().await.unwrap();
        assert_eq!(session.progress().await, Progress::StructureReady);
        assert!(session.snapshot().await.stale_stages.is_empty());
    }

    #[tokio::test]
    async fn empty_catalog_reports_unavailable() {
        let users = Arc::new(InMemoryUserStore::new(vec![user(Tier::Paid, 0)]));
        let session = Session::start(&config(false), users, Arc::new(InMemoryOracleStore::default()))
            .await
            .unwrap();
        let err = session.draw_oracle_card().await.unwrap_err();
        assert!(matches!(err, ForgeError::OracleUnavailable));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn lost_user_keeps_offer() {
        let mut store = MockUserStore::new();
        store
            .expect_get_current_user()
            .returning(|| Ok(user(Tier::Paid, 0)));
        store
            .expect_increment_product_count()
            .times(1)
            .returning(|id| Err(ForgeError::UserNotFound { id }));

        let session = Session::start(
            &config(false),
            Arc::new(store),
            Arc::new(InMemoryOracleStore::from_fixture().unwrap()),
        )
        .await
        .unwrap();

        let outcome = session.generate_offer(&input()).await.unwrap();
        assert_eq!(outcome.user.products_created, 0);
        assert_eq!(session.progress().await, Progress::OfferReady);
    }

    #[tokio::test]
    async fn snapshot_marks_stale_artifacts() {
        let session = session_for(Tier::Lifetime, 0, false).await;
        session.generate_offer(&input()).await.unwrap();
        session.generate_structure().await.unwrap();
        session.generate_promo_kit().await.unwrap();
        session
            .generate_offer(&OfferInput::new("Health & Fitness", "low energy", "video"))
            .await
            .unwrap();

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.offer_revision, 2);
        assert_eq!(snapshot.stale_stages, vec![Stage::Structure, Stage::Promo]);
        assert_eq!(snapshot.progress, Progress::OfferReady);
    }
}
