//! Metric Sources
//!
//! Where raw metrics come from. The service is handed a source at
//! construction time; it never builds one itself.

use crate::error::Result;
use crate::models::MemberRecord;
use prime_trust_core::TrustMetrics;
use std::collections::HashMap;

/// Supplies raw metrics for members.
pub trait MetricSource: Send + Sync {
    /// Metrics for `member_id`, or `None` when the source has no record.
    fn fetch_metrics(&self, member_id: &str) -> Result<Option<TrustMetrics>>;

    /// Short name for logs
    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// Fixed metrics held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticMetricSource {
    metrics: HashMap<String, TrustMetrics>,
}

impl StaticMetricSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, member_id: impl Into<String>, metrics: TrustMetrics) -> Self {
        self.insert(member_id, metrics);
        self
    }

    pub fn insert(&mut self, member_id: impl Into<String>, metrics: TrustMetrics) {
        self.metrics.insert(member_id.into(), metrics);
    }

    /// Parse a JSON object mapping member ids to metrics.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self {
            metrics: serde_json::from_str(json)?,
        })
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl MetricSource for StaticMetricSource {
    fn fetch_metrics(&self, member_id: &str) -> Result<Option<TrustMetrics>> {
        Ok(self.metrics.get(member_id).copied())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Backend member records, projected on demand
#[derive(Debug, Clone, Default)]
pub struct RecordMetricSource {
    records: HashMap<String, MemberRecord>,
}

impl RecordMetricSource {
    pub fn new(records: impl IntoIterator<Item = MemberRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect(),
        }
    }

    /// Parse a JSON array of member records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<MemberRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl MetricSource for RecordMetricSource {
    fn fetch_metrics(&self, member_id: &str) -> Result<Option<TrustMetrics>> {
        Ok(self.records.get(member_id).map(MemberRecord::to_metrics))
    }

    fn name(&self) -> &'static str {
        "records"
    }
}
