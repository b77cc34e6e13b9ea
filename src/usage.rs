// Usage counter - per-user product quota

use std::sync::Arc;
use tracing::{error, info};

use crate::errors::{ForgeError, ForgeResult};
use crate::store::{User, UserStore};
use crate::tier::{usage_limit, Tier, UsageLimit};

pub struct UsageCounter {
    store: Arc<dyn UserStore>,
    enforce_quota: bool,
}

impl UsageCounter {
    pub fn new(store: Arc<dyn UserStore>, enforce_quota: bool) -> Self {
        Self {
            store,
            enforce_quota,
        }
    }

    /// Fails with `QuotaExceeded` once the user has used up their tier's limit.
    pub fn check_quota(&self, user: &User) -> ForgeResult<()> {
        let limit = usage_limit(user.tier);
        if self.enforce_quota && !limit.allows(user.products_created) {
            return Err(ForgeError::QuotaExceeded {
                tier: user.tier,
                limit,
                used: user.products_created,
            });
        }
        Ok(())
    }

    /// Increments the user's product count by exactly one.
    ///
    /// A missing user means the session lost track of who is signed in; that
    /// is logged as an invariant violation and returned to the caller.
    pub async fn record_product_created(&self, user: &User) -> ForgeResult<User> {
        match self.store.increment_product_count(user.id).await {
            Ok(updated) => {
                info!(
                    user_id = updated.id,
                    products_created = updated.products_created,
                    tier = %updated.tier,
                    "Recorded product creation"
                );
                Ok(updated)
            }
            Err(e) => {
                error!(user_id = user.id, error = %e, "Failed to update product count");
                Err(e)
            }
        }
    }
}

/// Nudge shown next to the usage meter, if any.
pub fn upgrade_prompt(user: &User) -> Option<&'static str> {
    match (user.tier, usage_limit(user.tier)) {
        (Tier::Free, _) if user.products_created >= 1 => Some("Upgrade to create more products"),
        (Tier::Paid, UsageLimit::Limited(limit))
            if u64::from(user.products_created) * 10 >= u64::from(limit) * 8 =>
        {
            Some("Consider upgrading to unlimited")
        }
        _ => None,
    }
}

/// Fraction of the quota used, capped at 100. `None` for unlimited tiers.
pub fn usage_percentage(user: &User) -> Option<u32> {
    usage_limit(user.tier).as_option().map(|limit| {
        let percentage = f64::from(user.products_created) / f64::from(limit) * 100.0;
        percentage.min(100.0) as u32
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryUserStore, MockUserStore};

    fn user(tier: Tier, products_created: u32) -> User {
        User {
            id: 1,
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            tier,
            products_created,
        }
    }

    #[tokio::test]
    async fn records_exactly_one_per_call() {
        let store = Arc::new(InMemoryUserStore::new(vec![user(Tier::Paid, 0)]));
        let counter = UsageCounter::new(store.clone(), true);
        let start = store.get_current_user().await.unwrap();

        let after_one = counter.record_product_created(&start).await.unwrap();
        let after_two = counter.record_product_created(&after_one).await.unwrap();
        assert_eq!(after_two.products_created, start.products_created + 2);
    }

    #[tokio::test]
    async fn not_found_is_propagated() {
        let mut store = MockUserStore::new();
        store
            .expect_increment_product_count()
            .times(1)
            .returning(|id| Err(ForgeError::UserNotFound { id }));
        let counter = UsageCounter::new(Arc::new(store), true);

        let result = counter.record_product_created(&user(Tier::Free, 0)).await;
        assert!(matches!(result, Err(ForgeError::UserNotFound { id: 1 })));
    }

    #[test]
    fn quota_follows_tier_limit() {
        let counter = UsageCounter::new(Arc::new(InMemoryUserStore::new(vec![])), true);
        assert!(counter.check_quota(&user(Tier::Free, 0)).is_ok());
        assert!(matches!(
            counter.check_quota(&user(Tier::Free, 1)),
            Err(ForgeError::QuotaExceeded { used: 1, .. })
        ));
        assert!(counter.check_quota(&user(Tier::Paid, 9)).is_ok());
        assert!(counter.check_quota(&user(Tier::Paid, 10)).is_err());
        assert!(counter.check_quota(&user(Tier::Lifetime, 10_000)).is_ok());
    }

    #[test]
    fn quota_can_be_disabled() {
        let counter = UsageCounter::new(Arc::new(InMemoryUserStore::new(vec![])), false);
        assert!(counter.check_quota(&user(Tier::Free, 5)).is_ok());
    }

    #[test]
    fn upgrade_prompts() {
        assert_eq!(upgrade_prompt(&user(Tier::Free, 0)), None);
        assert_eq!(
            upgrade_prompt(&user(Tier::Free, 1)),
            Some("Upgrade to create more products")
        );
        assert_eq!(upgrade_prompt(&user(Tier::Paid, 7)), None);
        assert_eq!(
            upgrade_prompt(&user(Tier::Paid, 8)),
            Some("Consider upgrading to unlimited")
        );
        assert_eq!(upgrade_prompt(&user(Tier::Lifetime, 500)), None);
    }

    #[test]
    fn percentage_is_capped() {
        assert_eq!(usage_percentage(&user(Tier::Paid, 5)), Some(50));
        assert_eq!(usage_percentage(&user(Tier::Free, 3)), Some(100));
        assert_eq!(usage_percentage(&user(Tier::Lifetime, 3)), None);
    }
}
