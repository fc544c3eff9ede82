//! Trust Score Calculation
//!
//! Normalizes the raw metrics into five 0-100 components, averages them into
//! a total, bands the total into a level and evaluates badges.

use crate::badge::{evaluate_badges, Badge};
use crate::level::TrustLevel;
use crate::metrics::TrustMetrics;
use serde::{Deserialize, Serialize};

/// Upper bound of every component score.
pub const MAX_COMPONENT: f64 = 100.0;

/// Points per vouch (5 vouches reach the cap)
const POINTS_PER_VERIFICATION: f64 = 20.0;

/// Points per linked account (5 accounts reach the cap)
const POINTS_PER_CONNECTION: f64 = 20.0;

/// Trust score component breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustComponents {
    /// Prime Law quiz score, capped
    pub prime_law: f64,

    /// 20 points per verification
    pub verification: f64,

    /// One point per active day
    pub activity: f64,

    /// 20 points per connected account
    pub connections: f64,

    /// Community reputation, capped
    pub reputation: f64,
}

impl TrustComponents {
    /// Normalize raw metrics. Every component lands in [0, 100].
    pub fn from_metrics(metrics: &TrustMetrics) -> Self {
        Self {
            prime_law: clamp_component(metrics.prime_law_score),
            verification: clamp_component(
                metrics.verification_count as f64 * POINTS_PER_VERIFICATION,
            ),
            activity: clamp_component(metrics.active_days as f64),
            connections: clamp_component(metrics.connected_accounts as f64 * POINTS_PER_CONNECTION),
            reputation: clamp_component(metrics.community_reputation),
        }
    }

    /// Components in declaration order.
    pub fn values(&self) -> [f64; 5] {
        [
            self.prime_law,
            self.verification,
            self.activity,
            self.connections,
            self.reputation,
        ]
    }

    /// Arithmetic mean of the five components.
    pub fn mean(&self) -> f64 {
        let values = self.values();
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Trust score for one member
///
/// Built fresh on every calculation; two calculations over the same metrics
/// compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScore {
    /// Mean of the components (0-100)
    pub total: f64,

    /// Component scores
    pub components: TrustComponents,

    /// Level banded from `total`
    pub level: TrustLevel,

    /// Badges earned from the raw metrics, in evaluation order
    pub badges: Vec<Badge>,
}

impl TrustScore {
    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }

    /// Points still needed to reach the next level, `None` at Platinum.
    pub fn points_to_next_level(&self) -> Option<f64> {
        self.level
            .next()
            .map(|next| (next.min_total() - self.total).max(0.0))
    }
}

/// Calculate the trust score for a member's raw metrics.
///
/// Total over every numeric input: negative and over-range values are
/// clamped during normalization, never rejected.
pub fn calculate_trust_score(metrics: &TrustMetrics) -> TrustScore {
    let components = TrustComponents::from_metrics(metrics);
    let total = components.mean();

    TrustScore {
        total,
        components,
        level: TrustLevel::from_total(total),
        badges: evaluate_badges(metrics),
    }
}

fn clamp_component(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, MAX_COMPONENT)
}
