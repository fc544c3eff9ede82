//! Prime Trust Core Modules
//!
//! Metric sources and the SQLite store behind them.

pub mod source;
pub mod storage;

pub use source::{MetricSource, RecordMetricSource, StaticMetricSource};
pub use storage::StorageManager;
