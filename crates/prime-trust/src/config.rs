//! Prime Trust Configuration
//!
//! Configuration options for the trust service, loadable from a JSON file
//! or built programmatically.

use crate::error::{Error, Result};
use crate::models::TrustRequirements;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Trust service configuration
///
/// # Configuration file
///
/// ```json
/// {
///   "databasePath": "/var/lib/prime-trust/trust.db",
///   "logFilter": "prime_trust=debug",
///   "zeroFillMissing": true,
///   "defaultRequirements": { "minTotal": 26, "requiredLevel": "Silver" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustConfig {
    /// Path of the SQLite metric store. `:memory:` keeps it in memory.
    ///
    /// Default: `prime-trust.db`
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// `tracing` filter used when `RUST_LOG` is not set.
    ///
    /// Default: `prime_trust=info`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Enable debug logging.
    ///
    /// Default: `false`
    #[serde(default)]
    pub debug: bool,

    /// Score members without any record as all-zero metrics. When disabled,
    /// unknown members are reported as not found.
    ///
    /// Default: `true`
    #[serde(default = "default_true")]
    pub zero_fill_missing: bool,

    /// Persist a snapshot for every score computed from the store.
    ///
    /// Default: `true`
    #[serde(default = "default_true")]
    pub snapshot_scores: bool,

    /// Requirements used by `verify_member` when none are passed.
    ///
    /// Default: [`TrustRequirements::for_member_access`]
    #[serde(default)]
    pub default_requirements: TrustRequirements,
}

fn default_database_path() -> String {
    "prime-trust.db".to_string()
}

fn default_log_filter() -> String {
    "prime_trust=info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_filter: default_log_filter(),
            debug: false,
            zero_fill_missing: true,
            snapshot_scores: true,
            default_requirements: TrustRequirements::default(),
        }
    }
}

impl TrustConfig {
    /// Create a configuration for development/testing.
    ///
    /// In-memory store, debug logging, no requirements.
    pub fn development() -> Self {
        Self {
            database_path: ":memory:".to_string(),
            log_filter: "prime_trust=debug".to_string(),
            debug: true,
            default_requirements: TrustRequirements::none(),
            ..Default::default()
        }
    }

    /// Create a configuration for production.
    ///
    /// Unknown members are errors rather than silent zeros.
    pub fn production() -> Self {
        Self {
            database_path: "/var/lib/prime-trust/trust.db".to_string(),
            zero_fill_missing: false,
            ..Default::default()
        }
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: TrustConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_path.trim().is_empty() {
            return Err(Error::config("databasePath must not be empty"));
        }
        self.default_requirements
            .validate()
            .map_err(|e| Error::config(format!("defaultRequirements: {}", e)))
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == ":memory:"
    }
}
