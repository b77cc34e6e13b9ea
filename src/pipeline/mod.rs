// Offer pipeline - current artifacts plus the stage progression between them
//
// Every artifact below the offer remembers which offer revision it was built
// from. Regenerating the offer leaves those artifacts in place; callers can
// see they are stale and decide whether to regenerate.

pub mod state_machine;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use statig::prelude::*;
use std::fmt;

use crate::errors::{ForgeError, ForgeResult};
use crate::generators::{
    self, Checklist, ChecklistProgress, Format, Offer, OfferInput, ProgressStats, PromoKit,
    SalesCopy, Structure,
};
use crate::tier::Stage;

pub use state_machine::{PipelineEvent, PipelineFlow, Progress};

/// A generated artifact tagged with the offer revision it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derived<T> {
    pub value: T,
    pub offer_revision: u64,
    pub generated_at: DateTime<Utc>,
}

impl<T> Derived<T> {
    fn new(value: T, offer_revision: u64) -> Self {
        Self {
            value,
            offer_revision,
            generated_at: Utc::now(),
        }
    }
}

/// Validated first-stage input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidOfferInput {
    pub niche: String,
    pub pain_point: String,
    pub format: Format,
}

/// Whitespace only matters for the emptiness check. Niche and pain point are
/// kept verbatim since the niche is an exact template key.
pub fn validate_input(input: &OfferInput) -> ForgeResult<ValidOfferInput> {
    let missing = input.missing_fields();
    if !missing.is_empty() {
        return Err(ForgeError::Validation { missing });
    }
    Ok(ValidOfferInput {
        niche: input.niche.clone(),
        pain_point: input.pain_point.clone(),
        format: Format::parse(&input.format),
    })
}

pub struct OfferPipeline {
    flow: StateMachine<PipelineFlow>,
    revision: u64,
    offer: Option<Derived<Offer>>,
    structure: Option<Derived<Structure>>,
    sales_copy: Option<Derived<SalesCopy>>,
    checklist: Option<Derived<Checklist>>,
    promo_kit: Option<Derived<PromoKit>>,
    checklist_progress: ChecklistProgress,
}

impl Default for OfferPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OfferPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfferPipeline")
            .field("progress", &self.progress())
            .field("revision", &self.revision)
            .field("offer", &self.offer.as_ref().map(|o| &o.value.name))
            .finish_non_exhaustive()
    }
}

impl OfferPipeline {
    pub fn new() -> Self {
        Self {
            flow: PipelineFlow.state_machine(),
            revision: 0,
            offer: None,
            structure: None,
            sales_copy: None,
            checklist: None,
            promo_kit: None,
            checklist_progress: ChecklistProgress::new(),
        }
    }

    pub fn progress(&self) -> Progress {
        state_machine::progress_of(self.flow.state())
    }

    /// Revision of the current offer; 0 before the first one.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn offer(&self) -> Option<&Offer> {
        self.offer.as_ref().map(|derived| &derived.value)
    }

    pub fn structure(&self) -> Option<&Derived<Structure>> {
        self.structure.as_ref()
    }

    pub fn sales_copy(&self) -> Option<&Derived<SalesCopy>> {
        self.sales_copy.as_ref()
    }

    pub fn checklist(&self) -> Option<&Derived<Checklist>> {
        self.checklist.as_ref()
    }

    pub fn promo_kit(&self) -> Option<&Derived<PromoKit>> {
        self.promo_kit.as_ref()
    }

    pub fn is_stale<T>(&self, artifact: &Derived<T>) -> bool {
        artifact.offer_revision != self.revision
    }

    /// The current offer plus its revision, or `Precondition` for `stage`.
    pub fn require_offer(&self, stage: Stage) -> ForgeResult<(Offer, u64)> {
        self.offer
            .as_ref()
            .map(|derived| (derived.value.clone(), derived.offer_revision))
            .ok_or(ForgeError::Precondition { stage })
    }

    pub fn commit_offer(&mut self, offer: Offer) -> &Offer {
        self.revision += 1;
        self.flow.handle(&PipelineEvent::OfferGenerated);
        &self.offer.insert(Derived::new(offer, self.revision)).value
    }

    /// Stores the structure. Progress only advances when it matches the
    /// current offer; a late result for an older offer is kept but stale.
    pub fn commit_structure(&mut self, structure: Structure, offer_revision: u64) -> &Structure {
        if offer_revision == self.revision {
            self.flow.handle(&PipelineEvent::StructureGenerated);
        }
        &self
            .structure
            .insert(Derived::new(structure, offer_revision))
            .value
    }

    pub fn commit_sales_copy(&mut self, copy: SalesCopy, offer_revision: u64) -> &SalesCopy {
        if offer_revision == self.revision {
            self.flow.handle(&PipelineEvent::CopyGenerated);
        }
        &self.sales_copy.insert(Derived::new(copy, offer_revision)).value
    }

    pub fn commit_checklist(&mut self, checklist: Checklist, offer_revision: u64) -> &Checklist {
        &self
            .checklist
            .insert(Derived::new(checklist, offer_revision))
            .value
    }

    pub fn commit_promo_kit(&mut self, kit: PromoKit, offer_revision: u64) -> &PromoKit {
        &self.promo_kit.insert(Derived::new(kit, offer_revision)).value
    }

    pub fn generate_offer<R: Rng>(&mut self, input: &OfferInput, rng: &mut R) -> ForgeResult<&Offer> {
        let valid = validate_input(input)?;
        let offer = generators::generate_offer(&valid.niche, &valid.pain_point, valid.format, rng);
        Ok(self.commit_offer(offer))
    }

    pub fn generate_structure(&mut self) -> ForgeResult<&Structure> {
        let (offer, revision) = self.require_offer(Stage::Structure)?;
        let structure = generators::generate_structure(&offer);
        Ok(self.commit_structure(structure, revision))
    }

    /// Uses the current structure's price when one exists, stale or not.
    pub fn generate_sales_copy<R: Rng>(&mut self, rng: &mut R) -> ForgeResult<&SalesCopy> {
        let (offer, revision) = self.require_offer(Stage::Copy)?;
        let copy = generators::generate_sales_copy(
            &offer,
            self.structure.as_ref().map(|derived| &derived.value),
            rng,
        );
        Ok(self.commit_sales_copy(copy, revision))
    }

    pub fn generate_checklist(&mut self) -> ForgeResult<&Checklist> {
        let (offer, revision) = self.require_offer(Stage::Checklist)?;
        let checklist = generators::generate_checklist(&offer);
        Ok(self.commit_checklist(checklist, revision))
    }

    pub fn generate_promo_kit(&mut self) -> ForgeResult<&PromoKit> {
        let (offer, revision) = self.require_offer(Stage::Promo)?;
        let kit = generators::generate_promo_kit(&offer);
        Ok(self.commit_promo_kit(kit, revision))
    }

    /// Flips a checklist task; returns whether it is now complete.
    pub fn toggle_task(&mut self, task_id: u32) -> ForgeResult<bool> {
        let checklist = self
            .checklist
            .as_ref()
            .ok_or(ForgeError::Precondition {
                stage: Stage::Checklist,
            })?;
        self.checklist_progress.toggle(&checklist.value, task_id)
    }

    pub fn checklist_progress(&self) -> &ChecklistProgress {
        &self.checklist_progress
    }

    pub fn checklist_stats(&self) -> Option<ProgressStats> {
        self.checklist
            .as_ref()
            .map(|derived| self.checklist_progress.stats(&derived.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn input() -> OfferInput {
        OfferInput::new("Health & Fitness", "low energy", "pdf")
    }

    #[test]
    fn empty_niche_is_a_validation_error() {
        let mut pipeline = OfferPipeline::new();
        let result = pipeline.generate_offer(
            &OfferInput::new("", "x", "pdf"),
            &mut StdRng::seed_from_u64(0),
        );
        match result {
            Err(ForgeError::Validation { missing }) => assert_eq!(missing, vec!["niche"]),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(pipeline.progress(), Progress::Empty);
        assert_eq!(pipeline.revision(), 0);
    }

    #[test]
    fn offer_from_dedicated_niche() {
        let mut pipeline = OfferPipeline::new();
        let offer = pipeline
            .generate_offer(&input(), &mut StdRng::seed_from_u64(5))
            .unwrap()
            .clone();
        assert!(generators::offer::name_templates("Health & Fitness").contains(&offer.name.as_str()));
        assert_eq!(offer.format, Format::Pdf);
        assert_eq!(pipeline.progress(), Progress::OfferReady);
    }

    #[test]
    fn downstream_stages_need_an_offer() {
        let mut pipeline = OfferPipeline::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            pipeline.generate_structure(),
            Err(ForgeError::Precondition { stage: Stage::Structure })
        ));
        assert!(matches!(
            pipeline.generate_sales_copy(&mut rng),
            Err(ForgeError::Precondition { stage: Stage::Copy })
        ));
        assert!(matches!(
            pipeline.generate_checklist(),
            Err(ForgeError::Precondition { stage: Stage::Checklist })
        ));
        assert!(matches!(
            pipeline.generate_promo_kit(),
            Err(ForgeError::Precondition { stage: Stage::Promo })
        ));
        assert!(pipeline.toggle_task(1).is_err());
    }

    #[test]
    fn full_chain_reaches_copy_ready() {
        let mut pipeline = OfferPipeline::new();
        let mut rng = StdRng::seed_from_u64(1);
        pipeline.generate_offer(&input(), &mut rng).unwrap();
        pipeline.generate_structure().unwrap();
        assert_eq!(pipeline.progress(), Progress::StructureReady);
        let copy = pipeline.generate_sales_copy(&mut rng).unwrap();
        assert!(copy.mini_sales_page.contains("**Your Price Today: $19**"));
        assert_eq!(pipeline.progress(), Progress::CopyReady);
    }

    #[test]
    fn structure_regeneration_replaces_wholesale() {
        let mut pipeline = OfferPipeline::new();
        pipeline
            .generate_offer(&input(), &mut StdRng::seed_from_u64(1))
            .unwrap();
        let first = pipeline.generate_structure().unwrap().clone();
        let second = pipeline.generate_structure().unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn new_offer_leaves_downstream_stale() {
        let mut pipeline = OfferPipeline::new();
        let mut rng = StdRng::seed_from_u64(1);
        pipeline.generate_offer(&input(), &mut rng).unwrap();
        pipeline.generate_structure().unwrap();
        pipeline.generate_sales_copy(&mut rng).unwrap();

        pipeline
            .generate_offer(&OfferInput::new("Finance & Investing", "debt", "video"), &mut rng)
            .unwrap();

        assert_eq!(pipeline.progress(), Progress::OfferReady);
        let structure = pipeline.structure().unwrap();
        assert!(pipeline.is_stale(structure));
        assert_eq!(structure.value.pricing.main, 19);
        assert!(pipeline.is_stale(pipeline.sales_copy().unwrap()));

        pipeline.generate_structure().unwrap();
        let structure = pipeline.structure().unwrap();
        assert!(!pipeline.is_stale(structure));
        assert_eq!(structure.value.pricing.main, 49);
    }

    #[test]
    fn checklist_progress_tracks_toggles() {
        let mut pipeline = OfferPipeline::new();
        pipeline
            .generate_offer(&input(), &mut StdRng::seed_from_u64(1))
            .unwrap();
        pipeline.generate_checklist().unwrap();
        assert!(pipeline.toggle_task(1).unwrap());
        assert!(pipeline.toggle_task(20).unwrap());
        let stats = pipeline.checklist_stats().unwrap();
        assert_eq!((stats.completed, stats.total, stats.percentage), (2, 20, 10));
        assert!(!pipeline.toggle_task(1).unwrap());
    }

    #[test]
    fn niche_is_an_exact_key() {
        let valid = validate_input(&OfferInput::new("  Health & Fitness ", " tired ", " audio ")).unwrap();
        assert_eq!(valid.niche, "  Health & Fitness ");
        assert_eq!(valid.pain_point, " tired ");
        assert_eq!(valid.format, Format::Audio);

        let mut pipeline = OfferPipeline::new();
        let offer = pipeline
            .generate_offer(
                &OfferInput::new(" Health & Fitness ", "low energy", "pdf"),
                &mut StdRng::seed_from_u64(5),
            )
            .unwrap();
        assert!(generators::offer::name_templates("Some Other Niche").contains(&offer.name.as_str()));
    }

    #[test]
    fn late_structure_for_old_offer_does_not_advance() {
        let mut pipeline = OfferPipeline::new();
        let mut rng = StdRng::seed_from_u64(1);
        pipeline.generate_offer(&input(), &mut rng).unwrap();
        let (old_offer, old_revision) = pipeline.require_offer(Stage::Structure).unwrap();

        pipeline
            .generate_offer(&OfferInput::new("Finance & Investing", "debt", "video"), &mut rng)
            .unwrap();
        pipeline.commit_structure(generators::generate_structure(&old_offer), old_revision);
        assert_eq!(pipeline.progress(), Progress::OfferReady);
        assert!(pipeline.is_stale(pipeline.structure().unwrap()));

        let copy = generators::generate_sales_copy(&old_offer, None, &mut rng);
        pipeline.commit_sales_copy(copy, old_revision);
        assert_eq!(pipeline.progress(), Progress::OfferReady);
    }
}
