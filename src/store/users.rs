use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::traits::UserStore;
use crate::errors::{ForgeError, ForgeResult};
use crate::tier::Tier;

const USERS_FIXTURE: &str = include_str!("../../fixtures/users.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub products_created: u32,
}

/// Fields a caller may change. The product counter is deliberately absent;
/// it only moves through `increment_product_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub tier: Option<Tier>,
}

impl UserPatch {
    pub fn tier(tier: Tier) -> Self {
        Self {
            tier: Some(tier),
            ..Default::default()
        }
    }
}

/// Map-backed user store. The current user is the lowest id unless set.
#[derive(Debug)]
pub struct InMemoryUserStore {
    users: RwLock<BTreeMap<u64, User>>,
    current_id: u64,
}

impl InMemoryUserStore {
    pub fn new(users: Vec<User>) -> Self {
        let current_id = users.iter().map(|user| user.id).min().unwrap_or(1);
        Self {
            users: RwLock::new(users.into_iter().map(|user| (user.id, user)).collect()),
            current_id,
        }
    }

    /// Seeded from the bundled `users.json` fixture.
    pub fn from_fixture() -> ForgeResult<Self> {
        let users: Vec<User> = serde_json::from_str(USERS_FIXTURE)?;
        Ok(Self::new(users))
    }

    pub fn with_current_user(mut self, id: u64) -> Self {
        self.current_id = id;
        self
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_current_user(&self) -> ForgeResult<User> {
        self.users
            .read()
            .await
            .get(&self.current_id)
            .cloned()
            .ok_or(ForgeError::UserNotFound {
                id: self.current_id,
            })
    }

    async fn increment_product_count(&self, id: u64) -> ForgeResult<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(ForgeError::UserNotFound { id })?;
        user.products_created = user.products_created.saturating_add(1);
        Ok(user.clone())
    }

    async fn update_user(&self, id: u64, patch: UserPatch) -> ForgeResult<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(ForgeError::UserNotFound { id })?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(tier) = patch.tier {
            user.tier = tier;
        }
        Ok(user.clone())
    }
}
