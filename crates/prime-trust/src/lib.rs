//! # Prime Trust
//!
//! **Member trust scoring for the Prime Trust community**
//!
//! Wraps the pure calculator in [`prime_trust_core`] with everything needed
//! to run it against real members: metric sources, a SQLite store, score
//! snapshots, requirement checks and configuration.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prime_trust::{commands, TrustConfig, TrustState};
//!
//! # async fn run() -> prime_trust::Result<()> {
//! let state = TrustState::from_config(TrustConfig::default())?;
//! let score = commands::get_trust_score(&state, "member-42").await?;
//! println!("{} {}", score.level.emoji(), score.total);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ MetricSource │────►│  TrustState  │────►│ prime-trust-core │
//! │ (injected)   │     │  + commands  │     │ (calculator)     │
//! └──────────────┘     └──────┬───────┘     └──────────────────┘
//!                             │
//!                             ▼
//!                     ┌──────────────┐
//!                     │ StorageManager│
//!                     │ (snapshots)  │
//!                     └──────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;

pub use config::TrustConfig;
pub use error::{Error, Result};
pub use models::*;

pub use crate::core::{MetricSource, RecordMetricSource, StaticMetricSource, StorageManager};

pub use prime_trust_core::{
    calculate_trust_score, evaluate_badges, Badge, MetricKind, TrustComponents, TrustLevel,
    TrustMetrics, TrustScore,
};

use std::sync::Arc;

/// State shared by all commands
#[derive(Clone)]
pub struct TrustState {
    /// Where raw metrics come from
    pub source: Arc<dyn MetricSource>,

    /// Where computed scores are snapshotted, if anywhere
    pub snapshots: Option<Arc<StorageManager>>,

    /// Service configuration
    pub config: TrustConfig,
}

impl TrustState {
    /// State over an arbitrary source, without snapshots.
    pub fn new(source: Arc<dyn MetricSource>, config: TrustConfig) -> Self {
        Self {
            source,
            snapshots: None,
            config,
        }
    }

    /// Snapshot computed scores into `storage`.
    pub fn with_snapshots(mut self, storage: Arc<StorageManager>) -> Self {
        self.snapshots = Some(storage);
        self
    }

    /// Open the configured store and use it as both source and snapshot sink.
    pub fn from_config(config: TrustConfig) -> Result<Self> {
        config.validate()?;
        let storage = Arc::new(StorageManager::open(&config.database_path)?);
        tracing::info!(
            database = %config.database_path,
            snapshots = config.snapshot_scores,
            "trust store ready"
        );
        Ok(Self::new(storage.clone(), config).with_snapshots(storage))
    }

    /// The backing store, when the state was built over one.
    pub fn storage(&self) -> Option<&Arc<StorageManager>> {
        self.snapshots.as_ref()
    }
}
