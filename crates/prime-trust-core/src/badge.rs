//! Badges
//!
//! Each badge is earned when one raw metric crosses a threshold. Badges are
//! evaluated independently of the normalized components and of each other,
//! so a member holding Law Guardian also holds Law Adherent.

use crate::error::ParseLabelError;
use crate::metrics::{MetricKind, TrustMetrics};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An achievement unlocked by a raw metric threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "Law Adherent")]
    LawAdherent,
    #[serde(rename = "Law Guardian")]
    LawGuardian,
    #[serde(rename = "Verified Human")]
    VerifiedHuman,
    #[serde(rename = "Trusted Member")]
    TrustedMember,
    #[serde(rename = "Active Participant")]
    ActiveParticipant,
    #[serde(rename = "Community Pillar")]
    CommunityPillar,
    #[serde(rename = "Connected")]
    Connected,
    #[serde(rename = "Well Connected")]
    WellConnected,
}

impl Badge {
    /// All badges in evaluation order.
    pub const ALL: [Badge; 8] = [
        Badge::LawAdherent,
        Badge::LawGuardian,
        Badge::VerifiedHuman,
        Badge::TrustedMember,
        Badge::ActiveParticipant,
        Badge::CommunityPillar,
        Badge::Connected,
        Badge::WellConnected,
    ];

    /// Display label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Badge::LawAdherent => "Law Adherent",
            Badge::LawGuardian => "Law Guardian",
            Badge::VerifiedHuman => "Verified Human",
            Badge::TrustedMember => "Trusted Member",
            Badge::ActiveParticipant => "Active Participant",
            Badge::CommunityPillar => "Community Pillar",
            Badge::Connected => "Connected",
            Badge::WellConnected => "Well Connected",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Badge::LawAdherent => "Scored at least 80 on the Prime Law quiz",
            Badge::LawGuardian => "Scored at least 90 on the Prime Law quiz",
            Badge::VerifiedHuman => "Vouched for by at least 2 members",
            Badge::TrustedMember => "Vouched for by at least 5 members",
            Badge::ActiveParticipant => "Active on at least 30 days",
            Badge::CommunityPillar => "Active on at least 90 days",
            Badge::Connected => "Linked at least 3 external accounts",
            Badge::WellConnected => "Linked at least 5 external accounts",
        }
    }

    /// The raw metric this badge is tested against.
    pub fn metric(&self) -> MetricKind {
        match self {
            Badge::LawAdherent | Badge::LawGuardian => MetricKind::PrimeLawScore,
            Badge::VerifiedHuman | Badge::TrustedMember => MetricKind::VerificationCount,
            Badge::ActiveParticipant | Badge::CommunityPillar => MetricKind::ActiveDays,
            Badge::Connected | Badge::WellConnected => MetricKind::ConnectedAccounts,
        }
    }

    /// Inclusive threshold on the raw metric.
    pub fn threshold(&self) -> f64 {
        match self {
            Badge::LawAdherent => 80.0,
            Badge::LawGuardian => 90.0,
            Badge::VerifiedHuman => 2.0,
            Badge::TrustedMember => 5.0,
            Badge::ActiveParticipant => 30.0,
            Badge::CommunityPillar => 90.0,
            Badge::Connected => 3.0,
            Badge::WellConnected => 5.0,
        }
    }

    /// Whether the raw metrics earn this badge.
    pub fn is_earned(&self, metrics: &TrustMetrics) -> bool {
        self.metric().raw_value(metrics) >= self.threshold()
    }
}

/// Evaluate every badge against the raw metrics.
///
/// Only the raw metrics are consulted; the result is in [`Badge::ALL`]
/// order and never contains duplicates.
pub fn evaluate_badges(metrics: &TrustMetrics) -> Vec<Badge> {
    Badge::ALL
        .into_iter()
        .filter(|badge| badge.is_earned(metrics))
        .collect()
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Badge {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Badge::ALL
            .into_iter()
            .find(|badge| badge.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLabelError::UnknownBadge(s.to_string()))
    }
}
