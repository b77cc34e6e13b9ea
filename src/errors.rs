use thiserror::Error;

use crate::tier::{Stage, Tier, UsageLimit};

/// Errors surfaced by the offer pipeline and its collaborators.
///
/// Everything except `UserNotFound` and `Fixture` is a transient notice:
/// the session stays usable and the caller can retry after fixing input
/// or going back a stage.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("Missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("Stage '{stage}' needs an offer: generate an offer first")]
    Precondition { stage: Stage },

    #[error("Stage '{stage}' is not available on the {tier} tier")]
    StageLocked { stage: Stage, tier: Tier },

    #[error("Usage limit reached on the {tier} tier ({used} of {limit} products)")]
    QuotaExceeded {
        tier: Tier,
        limit: UsageLimit,
        used: u32,
    },

    #[error("A '{stage}' generation is already in progress")]
    GenerationInProgress { stage: Stage },

    #[error("User {id} not found")]
    UserNotFound { id: u64 },

    #[error("The oracle catalog is empty")]
    OracleUnavailable,

    #[error("Checklist task {id} does not exist")]
    UnknownTask { id: u32 },

    #[error("Invalid fixture data: {0}")]
    Fixture(#[from] serde_json::Error),
}

impl ForgeError {
    /// `false` for errors that indicate a broken invariant rather than bad input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ForgeError::UserNotFound { .. } | ForgeError::Fixture(_)
        )
    }

    /// Short message suitable for an inline notice.
    pub fn notice(&self) -> String {
        match self {
            ForgeError::Validation { .. } => "Please fill in all fields".to_string(),
            ForgeError::Precondition { .. } => "Please generate an offer first".to_string(),
            ForgeError::StageLocked { stage, .. } => {
                format!("Upgrade to unlock the {} stage", stage.label())
            }
            ForgeError::QuotaExceeded { .. } => {
                "Ready to create more? Upgrade to unlock unlimited products!".to_string()
            }
            ForgeError::GenerationInProgress { .. } => {
                "Hang tight, the forge is still working on that".to_string()
            }
            ForgeError::OracleUnavailable => {
                "The Oracle is temporarily unavailable".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type ForgeResult<T> = Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_lists_missing_fields() {
        let err = ForgeError::Validation {
            missing: vec!["niche", "format"],
        };
        assert_eq!(err.to_string(), "Missing required fields: niche, format");
        assert_eq!(err.notice(), "Please fill in all fields");
        assert!(err.is_recoverable());
    }

    #[test]
    fn not_found_is_fatal() {
        let err = ForgeError::UserNotFound { id: 42 };
        assert!(!err.is_recoverable());
        assert_eq!(err.notice(), "User 42 not found");
    }

    #[test]
    fn precondition_gives_guidance() {
        let err = ForgeError::Precondition {
            stage: Stage::Structure,
        };
        assert!(err.to_string().contains("generate an offer first"));
        assert_eq!(err.notice(), "Please generate an offer first");
    }
}
