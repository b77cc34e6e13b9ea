// Template generators
//
// Pure functions from an input artifact plus static tables to a generated
// artifact. Any randomness comes from the caller-supplied `Rng` so output
// is reproducible under a seeded generator.

pub mod types;
pub mod offer;
pub mod structure;
pub mod copy;
pub mod checklist;
pub mod promo;

use rand::Rng;

pub use types::{
    Checklist, ChecklistPhase, ChecklistTask, Format, Offer, OfferInput, OfferStack, Pricing,
    Priority, PromoKit, PromoPost, SalesCopy, StackComponent, Structure, Upsell, VideoScript,
};
pub use offer::{generate_offer, NICHES};
pub use structure::generate_structure;
pub use copy::generate_sales_copy;
pub use checklist::{generate_checklist, ChecklistProgress, ProgressStats};
pub use promo::generate_promo_kit;

/// Uniform choice from a non-empty template list.
pub(crate) fn pick<'a, R: Rng>(templates: &[&'a str], rng: &mut R) -> &'a str {
    templates[rng.random_range(0..templates.len())]
}
