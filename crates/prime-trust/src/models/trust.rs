//! Trust Models
//!
//! Requirement checks and persisted score snapshots built on top of the
//! calculator's [`TrustScore`].

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use prime_trust_core::{Badge, TrustLevel, TrustScore};
use serde::{Deserialize, Serialize};

/// Trust verification result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustVerification {
    /// The member that was verified
    pub member_id: String,

    /// Whether the member meets every requirement
    pub is_verified: bool,

    /// Current trust score
    pub trust_score: TrustScore,

    /// Verification checks performed
    pub checks: Vec<TrustCheck>,

    /// When verification was performed
    pub verified_at: DateTime<Utc>,
}

impl TrustVerification {
    /// Checks that did not pass
    pub fn failed_checks(&self) -> impl Iterator<Item = &TrustCheck> {
        self.checks.iter().filter(|check| !check.passed)
    }
}

/// Individual trust verification check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustCheck {
    /// Check name
    pub name: String,

    /// Whether check passed
    pub passed: bool,

    /// Check details
    pub details: String,

    /// Required value (if applicable)
    pub required: Option<String>,

    /// Actual value (if applicable)
    pub actual: Option<String>,
}

/// Requirements for different operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustRequirements {
    /// Minimum total score
    #[serde(default)]
    pub min_total: f64,

    /// Required level
    #[serde(default)]
    pub required_level: Option<TrustLevel>,

    /// Badges the member must hold
    #[serde(default)]
    pub required_badges: Vec<Badge>,
}

impl Default for TrustRequirements {
    fn default() -> Self {
        Self::for_member_access()
    }
}

impl TrustRequirements {
    /// Requirements for full member access
    pub fn for_member_access() -> Self {
        Self {
            min_total: TrustLevel::Silver.min_total(),
            required_level: Some(TrustLevel::Silver),
            required_badges: Vec::new(),
        }
    }

    /// Requirements for issuing invite codes
    pub fn for_inviting() -> Self {
        Self {
            min_total: TrustLevel::Silver.min_total(),
            required_level: Some(TrustLevel::Silver),
            required_badges: vec![Badge::VerifiedHuman],
        }
    }

    /// Requirements for admin dashboard access
    pub fn for_admin() -> Self {
        Self {
            min_total: TrustLevel::Gold.min_total(),
            required_level: Some(TrustLevel::Gold),
            required_badges: vec![Badge::LawAdherent, Badge::VerifiedHuman],
        }
    }

    /// No requirements
    pub fn none() -> Self {
        Self {
            min_total: 0.0,
            required_level: None,
            required_badges: Vec::new(),
        }
    }

    /// Reject a minimum total outside 0-100 (NaN included).
    pub fn validate(&self) -> Result<()> {
        if (0.0..=100.0).contains(&self.min_total) {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!(
                "minTotal must be within 0-100, got {}",
                self.min_total
            )))
        }
    }
}

/// A persisted trust score for one member at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub member_id: String,
    pub total: f64,
    pub level: TrustLevel,
    pub badges: Vec<Badge>,
    pub calculated_at: DateTime<Utc>,
}

impl ScoreSnapshot {
    pub fn from_score(member_id: impl Into<String>, score: &TrustScore) -> Self {
        Self {
            member_id: member_id.into(),
            total: score.total,
            level: score.level,
            badges: score.badges.clone(),
            calculated_at: Utc::now(),
        }
    }
}
