// Repository interfaces - injectable so tests can swap backends

use async_trait::async_trait;
use rand::Rng;

use super::oracle::OracleCard;
use super::users::{User, UserPatch};
use crate::errors::ForgeResult;

/// User repository. Every id-based call fails with `UserNotFound` when the id
/// is unknown.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// The single signed-in user of this session.
    async fn get_current_user(&self) -> ForgeResult<User>;

    /// Bumps `products_created` by exactly one and returns the updated user.
    async fn increment_product_count(&self, id: u64) -> ForgeResult<User>;

    async fn update_user(&self, id: u64, patch: UserPatch) -> ForgeResult<User>;
}

/// Read-only oracle card catalog.
pub trait OracleStore: Send + Sync {
    fn all_cards(&self) -> Vec<OracleCard>;

    /// Case-insensitive substring match on the archetype.
    fn cards_by_archetype(&self, archetype: &str) -> Vec<OracleCard>;

    fn card_count(&self) -> usize;

    fn card_at(&self, index: usize) -> Option<OracleCard>;

    /// Uniform draw with replacement. `None` only for an empty catalog.
    fn random_card<R: Rng>(&self, rng: &mut R) -> Option<OracleCard>
    where
        Self: Sized,
    {
        draw_card(self, rng)
    }
}

/// Same as [`OracleStore::random_card`], usable through a trait object.
pub fn draw_card<S, R>(store: &S, rng: &mut R) -> Option<OracleCard>
where
    S: OracleStore + ?Sized,
    R: Rng,
{
    match store.card_count() {
        0 => None,
        count => store.card_at(rng.random_range(0..count)),
    }
}
