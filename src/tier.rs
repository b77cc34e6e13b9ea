// Tier policy: which stages a subscription tier may reach and how many
// products it may create.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription tier. Unknown or missing values collapse to `Free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tier {
    #[default]
    Free,
    Paid,
    Lifetime,
}

impl Tier {
    /// Lenient parse used for fixtures, config and CLI input.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => Tier::Paid,
            "lifetime" => Tier::Lifetime,
            _ => Tier::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Paid => "paid",
            Tier::Lifetime => "lifetime",
        }
    }
}

impl From<String> for Tier {
    fn from(value: String) -> Self {
        Tier::parse(&value)
    }
}

impl From<Tier> for String {
    fn from(tier: Tier) -> Self {
        tier.as_str().to_string()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tab of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Generate,
    Structure,
    Copy,
    Checklist,
    Promo,
    Oracle,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Generate,
        Stage::Structure,
        Stage::Copy,
        Stage::Checklist,
        Stage::Promo,
        Stage::Oracle,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Stage::Generate => "generate",
            Stage::Structure => "structure",
            Stage::Copy => "copy",
            Stage::Checklist => "checklist",
            Stage::Promo => "promo",
            Stage::Oracle => "oracle",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Generate => "Generate Offer",
            Stage::Structure => "Structure Offer",
            Stage::Copy => "Sales Copy",
            Stage::Checklist => "MVP Checklist",
            Stage::Promo => "Promo Kit",
            Stage::Oracle => "Offer Oracle",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Stage::ALL.into_iter().find(|stage| stage.id() == id)
    }

    /// Position used to index per-stage bookkeeping arrays.
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Product quota. `Unlimited` orders above every `Limited` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UsageLimit {
    Limited(u32),
    Unlimited,
}

impl UsageLimit {
    /// Whether a user who already created `used` products may create another.
    pub fn allows(&self, used: u32) -> bool {
        match self {
            UsageLimit::Limited(limit) => used < *limit,
            UsageLimit::Unlimited => true,
        }
    }

    pub fn as_option(&self) -> Option<u32> {
        match self {
            UsageLimit::Limited(limit) => Some(*limit),
            UsageLimit::Unlimited => None,
        }
    }
}

impl fmt::Display for UsageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageLimit::Limited(limit) => write!(f, "{limit}"),
            UsageLimit::Unlimited => f.write_str("unlimited"),
        }
    }
}

const FREE_LOCKED_STAGES: [Stage; 3] = [Stage::Checklist, Stage::Promo, Stage::Oracle];

pub fn is_stage_enabled(tier: Tier, stage: Stage) -> bool {
    match tier {
        Tier::Free => !FREE_LOCKED_STAGES.contains(&stage),
        Tier::Paid | Tier::Lifetime => true,
    }
}

pub fn usage_limit(tier: Tier) -> UsageLimit {
    match tier {
        Tier::Free => UsageLimit::Limited(1),
        Tier::Paid => UsageLimit::Limited(10),
        Tier::Lifetime => UsageLimit::Unlimited,
    }
}

pub fn enabled_stages(tier: Tier) -> Vec<Stage> {
    Stage::ALL
        .into_iter()
        .filter(|stage| is_stage_enabled(tier, *stage))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_strictly_increasing() {
        assert_eq!(usage_limit(Tier::Free), UsageLimit::Limited(1));
        assert_eq!(usage_limit(Tier::Paid), UsageLimit::Limited(10));
        assert_eq!(usage_limit(Tier::Lifetime), UsageLimit::Unlimited);
        assert!(usage_limit(Tier::Free) < usage_limit(Tier::Paid));
        assert!(usage_limit(Tier::Paid) < usage_limit(Tier::Lifetime));
    }

    #[test]
    fn free_tier_locks_leaf_stages() {
        for stage in [Stage::Checklist, Stage::Promo, Stage::Oracle] {
            assert!(!is_stage_enabled(Tier::Free, stage));
        }
        for stage in [Stage::Generate, Stage::Structure, Stage::Copy] {
            assert!(is_stage_enabled(Tier::Free, stage));
        }
    }

    #[test]
    fn enabled_sets_are_monotonic() {
        let free = enabled_stages(Tier::Free);
        let paid = enabled_stages(Tier::Paid);
        let lifetime = enabled_stages(Tier::Lifetime);
        assert!(free.iter().all(|stage| paid.contains(stage)));
        assert!(free.len() < paid.len());
        assert_eq!(paid, lifetime);
    }

    #[test]
    fn unknown_tier_fails_closed() {
        assert_eq!(Tier::parse("platinum"), Tier::Free);
        assert_eq!(Tier::parse(""), Tier::Free);
        assert_eq!(Tier::parse(" Paid "), Tier::Paid);

        let tier: Tier = serde_json::from_str("\"enterprise\"").unwrap();
        assert_eq!(tier, Tier::Free);
    }

    #[test]
    fn limit_allows() {
        assert!(UsageLimit::Limited(1).allows(0));
        assert!(!UsageLimit::Limited(1).allows(1));
        assert!(UsageLimit::Unlimited.allows(u32::MAX));
        assert_eq!(UsageLimit::Unlimited.to_string(), "unlimited");
    }

    #[test]
    fn stage_ids_round_trip() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_id(stage.id()), Some(stage));
        }
        assert_eq!(Stage::from_id("billing"), None);
    }
}
