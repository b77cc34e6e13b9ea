use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::tier::Stage;

const CONFIG_FILE: &str = "offer-forge.toml";

/// Main configuration structure for Offer Forge
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Simulated generation latency
    pub generation: GenerationConfig,
    /// Quota enforcement
    pub usage: UsageConfig,
    /// Session bootstrap settings
    pub session: SessionConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Copy-to-clipboard fallbacks
    pub clipboard: ClipboardConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Sleep before each generation to mimic a slow backend
    pub simulate_latency: bool,
    pub offer_latency_ms: u64,
    pub structure_latency_ms: u64,
    pub copy_latency_ms: u64,
    pub checklist_latency_ms: u64,
    pub promo_latency_ms: u64,
    pub oracle_latency_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            simulate_latency: true,
            offer_latency_ms: 2000,
            structure_latency_ms: 1500,
            copy_latency_ms: 2000,
            checklist_latency_ms: 1500,
            promo_latency_ms: 1800,
            oracle_latency_ms: 500,
        }
    }
}

impl GenerationConfig {
    /// No simulated delay at all; used by tests and `--fast`.
    pub fn instant() -> Self {
        Self {
            simulate_latency: false,
            ..Self::default()
        }
    }

    pub fn latency_for(&self, stage: Stage) -> Duration {
        if !self.simulate_latency {
            return Duration::ZERO;
        }
        let millis = match stage {
            Stage::Generate => self.offer_latency_ms,
            Stage::Structure => self.structure_latency_ms,
            Stage::Copy => self.copy_latency_ms,
            Stage::Checklist => self.checklist_latency_ms,
            Stage::Promo => self.promo_latency_ms,
            Stage::Oracle => self.oracle_latency_ms,
        };
        Duration::from_millis(millis)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Reject offer generation once the tier's product limit is reached
    pub enforce_quota: bool,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            enforce_quota: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed RNG seed for reproducible output (random when unset)
    pub seed: Option<u64>,
    /// Fixture user to sign in as (lowest id when unset)
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
    /// Log generation counters on exit
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Try the terminal clipboard escape sequence first
    pub terminal_escape: bool,
    /// File the legacy fallback writes copied text to
    pub fallback_path: String,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            terminal_escape: true,
            fallback_path: ".offer-forge/clipboard.txt".to_string(),
        }
    }
}

impl ForgeConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (offer-forge.toml)
    /// 3. Environment variables (OFFER_FORGE__SECTION__KEY)
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        Self::load_from(path.exists().then_some(path))
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("OFFER_FORGE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<ForgeConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = ForgeConfig::load_env_file();
        ForgeConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static ForgeConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}
