//! Raw Trust Metrics
//!
//! The five unnormalized inputs the calculator reads for one member.

use serde::{Deserialize, Serialize};

/// Raw metrics for a single member.
///
/// Counts are signed so that bad upstream data (a negative counter) can be
/// represented and clamped instead of failing to deserialize. The all-zero
/// [`Default`] is what callers substitute when a member has no record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustMetrics {
    /// Prime Law quiz score (nominally 0-100)
    #[serde(default)]
    pub prime_law_score: f64,

    /// Number of members who vouched for this member
    #[serde(default)]
    pub verification_count: i64,

    /// Distinct days with recorded activity
    #[serde(default)]
    pub active_days: i64,

    /// Linked external identities
    #[serde(default)]
    pub connected_accounts: i64,

    /// Externally computed reputation (nominally 0-100)
    #[serde(default)]
    pub community_reputation: f64,
}

/// Names one of the five raw metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    PrimeLawScore,
    VerificationCount,
    ActiveDays,
    ConnectedAccounts,
    CommunityReputation,
}

impl MetricKind {
    /// All metrics, in component order.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::PrimeLawScore,
        MetricKind::VerificationCount,
        MetricKind::ActiveDays,
        MetricKind::ConnectedAccounts,
        MetricKind::CommunityReputation,
    ];

    /// Read this metric's raw value as a float.
    pub fn raw_value(&self, metrics: &TrustMetrics) -> f64 {
        match self {
            MetricKind::PrimeLawScore => metrics.prime_law_score,
            MetricKind::VerificationCount => metrics.verification_count as f64,
            MetricKind::ActiveDays => metrics.active_days as f64,
            MetricKind::ConnectedAccounts => metrics.connected_accounts as f64,
            MetricKind::CommunityReputation => metrics.community_reputation,
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKind::PrimeLawScore => "Prime Law Score",
            MetricKind::VerificationCount => "Verifications",
            MetricKind::ActiveDays => "Active Days",
            MetricKind::ConnectedAccounts => "Connected Accounts",
            MetricKind::CommunityReputation => "Community Reputation",
        }
    }
}
