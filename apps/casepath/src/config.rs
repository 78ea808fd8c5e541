//! # Configuration Module
//!
//! Optional TOML configuration for the Casepath binary.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [storage]
//! backend = "redb"        # or "file"
//! path = "casepath.db"
//!
//! [coaching]
//! practice_targets = 3
//! tip_seed = 42           # omit for first-tip fallback
//! stages = ["personal_experience", "case_1", "case_2", "case_3", "final_round"]
//! ```
//!
//! Every key is optional. CLI flags override file values; security knobs
//! (API key, rate limit, CORS) stay in environment variables.

use casepath_core::primitives::{DEFAULT_PRACTICE_TARGETS, MAX_PRACTICE_TARGETS};
use casepath_core::{
    CasepathError, FirstTip, FocusedImprovement, JourneyEvaluator, RotatingTip, Stage,
    StageCatalog, StageResult, focused_improvement,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum config file size (64 KB).
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// =============================================================================
// STORAGE BACKEND SELECTION
// =============================================================================

/// Where session records live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// ACID redb database
    #[default]
    Redb,
    /// Single snapshot file rewritten on every change
    File,
}

impl Backend {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Redb => "redb",
            Backend::File => "file",
        }
    }
}

// =============================================================================
// FILE SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: Backend,
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Redb,
            path: PathBuf::from("casepath.db"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoachingConfig {
    /// How many weak skills to surface per result.
    pub practice_targets: usize,
    /// Seed for rotating fallback tips. `None` always uses the first tip.
    pub tip_seed: Option<u64>,
    /// Stage sequence. Must be non-empty and free of duplicates.
    pub stages: Vec<Stage>,
}

impl Default for CoachingConfig {
    fn default() -> Self {
        Self {
            practice_targets: DEFAULT_PRACTICE_TARGETS,
            tip_seed: None,
            stages: Stage::ALL.to_vec(),
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CasepathConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub coaching: CoachingConfig,
}

impl CasepathConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, CasepathError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let metadata = std::fs::metadata(path).map_err(|e| {
            CasepathError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(CasepathError::InvalidInput(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| CasepathError::IoError(format!("Read config: {}", e)))?;
        let config = Self::parse(&text)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn parse(text: &str) -> Result<Self, CasepathError> {
        let config: Self = toml::from_str(text)
            .map_err(|e| CasepathError::InvalidInput(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CasepathError> {
        Coach::from_config(&self.coaching).map(|_| ())
    }
}

// =============================================================================
// COACH
// =============================================================================

/// Evaluator plus coaching preferences, shared by the CLI and the API.
#[derive(Debug, Clone)]
pub struct Coach {
    evaluator: JourneyEvaluator,
    practice_targets: usize,
    tip_seed: Option<u64>,
}

impl Default for Coach {
    fn default() -> Self {
        Self {
            evaluator: JourneyEvaluator::default(),
            practice_targets: DEFAULT_PRACTICE_TARGETS,
            tip_seed: None,
        }
    }
}

impl Coach {
    pub fn from_config(config: &CoachingConfig) -> Result<Self, CasepathError> {
        let practice_targets = validate_practice_targets(config.practice_targets)?;
        let catalog = StageCatalog::from_stages(config.stages.clone())?;
        Ok(Self {
            evaluator: JourneyEvaluator::new(catalog),
            practice_targets,
            tip_seed: config.tip_seed,
        })
    }

    #[must_use]
    pub fn evaluator(&self) -> &JourneyEvaluator {
        &self.evaluator
    }

    #[must_use]
    pub fn catalog(&self) -> &StageCatalog {
        self.evaluator.catalog()
    }

    #[must_use]
    pub fn practice_targets(&self) -> usize {
        self.practice_targets
    }

    /// Practice plan for `result`, with `k` overriding the configured count.
    pub fn focus(
        &self,
        result: &StageResult,
        k: Option<usize>,
    ) -> Result<FocusedImprovement, CasepathError> {
        let k = match k {
            Some(k) => validate_practice_targets(k)?,
            None => self.practice_targets,
        };
        Ok(match self.tip_seed {
            Some(seed) => focused_improvement(result, k, &RotatingTip::new(seed)),
            None => focused_improvement(result, k, &FirstTip),
        })
    }
}

fn validate_practice_targets(k: usize) -> Result<usize, CasepathError> {
    if k == 0 || k > MAX_PRACTICE_TARGETS {
        return Err(CasepathError::InvalidInput(format!(
            "practice target count must be between 1 and {}, got {}",
            MAX_PRACTICE_TARGETS, k
        )));
    }
    Ok(k)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = CasepathConfig::parse("").expect("parse");
        assert_eq!(config, CasepathConfig::default());
        assert_eq!(config.storage.backend, Backend::Redb);
        assert_eq!(config.coaching.stages.len(), 5);
    }

    #[test]
    fn sections_override_defaults() {
        let config = CasepathConfig::parse(
            r#"
            [server]
            port = 9090

            [storage]
            backend = "file"

            [coaching]
            practice_targets = 2
            tip_seed = 7
            stages = ["personal_experience", "case_1"]
            "#,
        )
        .expect("parse");

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.storage.backend, Backend::File);
        let coach = Coach::from_config(&config.coaching).expect("coach");
        assert_eq!(coach.catalog().len(), 2);
        assert_eq!(coach.practice_targets(), 2);
    }

    #[test]
    fn unknown_stage_rejected() {
        assert!(CasepathConfig::parse("[coaching]\nstages = [\"case_9\"]").is_err());
    }

    #[test]
    fn duplicate_stage_rejected() {
        assert!(CasepathConfig::parse("[coaching]\nstages = [\"case_1\", \"case_1\"]").is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(CasepathConfig::parse("[server]\nhots = \"0.0.0.0\"").is_err());
    }

    #[test]
    fn practice_target_bounds() {
        assert!(CasepathConfig::parse("[coaching]\npractice_targets = 0").is_err());
        assert!(CasepathConfig::parse("[coaching]\npractice_targets = 99").is_err());
    }

    #[test]
    fn focus_override_validated() {
        let coach = Coach::default();
        let result = StageResult::outcome(Stage::Case1, false);
        assert!(coach.focus(&result, Some(0)).is_err());
        assert!(coach.focus(&result, Some(2)).expect("focus").targets.is_empty());
    }
}
