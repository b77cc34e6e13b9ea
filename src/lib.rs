// Offer Forge Library - micro-product offer generation
// This exposes the core components for the CLI and for integration tests

pub mod tier;
pub mod errors;
pub mod generators;
pub mod pipeline;
pub mod store;
pub mod usage;
pub mod session;
pub mod clipboard;
pub mod telemetry;
pub mod observability;
pub mod config;
pub mod cli;

// Re-export key types for easy access
pub use tier::{enabled_stages, is_stage_enabled, usage_limit, Stage, Tier, UsageLimit};
pub use errors::{ForgeError, ForgeResult};
pub use generators::{
    Checklist, Format, Offer, OfferInput, PromoKit, SalesCopy, Structure, NICHES,
};
pub use pipeline::{Derived, OfferPipeline, PipelineEvent, Progress};
pub use store::{
    InMemoryOracleStore, InMemoryUserStore, OracleCard, OracleStore, User, UserPatch, UserStore,
};
pub use usage::{upgrade_prompt, UsageCounter};
pub use session::{OfferOutcome, Session, SessionSnapshot};
pub use clipboard::{ClipboardChain, CopyMethod, CopyOutcome};
pub use telemetry::{init_telemetry, shutdown_telemetry, generate_correlation_id, create_stage_span};
pub use observability::{generation_metrics, GenerationMetrics, StageTimer};
pub use config::{ForgeConfig, config};
