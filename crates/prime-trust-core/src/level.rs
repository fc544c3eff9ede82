//! Trust Levels
//!
//! Coarse classification of a member's total trust score.

use crate::error::ParseLabelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trust levels banded on the total score.
///
/// Variants are declared lowest first, so the derived ordering can be used
/// to compare a member's level against a required one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrustLevel {
    /// 0-25
    Bronze,
    /// 26-50
    Silver,
    /// 51-75
    Gold,
    /// 76-100
    Platinum,
}

impl TrustLevel {
    /// All levels, lowest first.
    pub const ALL: [TrustLevel; 4] = [
        TrustLevel::Bronze,
        TrustLevel::Silver,
        TrustLevel::Gold,
        TrustLevel::Platinum,
    ];

    /// Get the level for a total score.
    ///
    /// The total is truncated toward zero before it is matched against the
    /// inclusive integer bands, so 25.9 is still Bronze and the bands cover
    /// every value in [0, 100] exactly once. Anything outside the bands
    /// (NaN, negative, above 100) falls back to Bronze.
    pub fn from_total(total: f64) -> Self {
        match total as i64 {
            0..=25 => TrustLevel::Bronze,
            26..=50 => TrustLevel::Silver,
            51..=75 => TrustLevel::Gold,
            76..=100 => TrustLevel::Platinum,
            _ => TrustLevel::Bronze,
        }
    }

    /// Get the display name
    pub fn display_name(&self) -> &'static str {
        match self {
            TrustLevel::Bronze => "Bronze",
            TrustLevel::Silver => "Silver",
            TrustLevel::Gold => "Gold",
            TrustLevel::Platinum => "Platinum",
        }
    }

    /// Get the level color (for UI)
    pub fn color(&self) -> &'static str {
        match self {
            TrustLevel::Bronze => "#b45309",
            TrustLevel::Silver => "#94a3b8",
            TrustLevel::Gold => "#eab308",
            TrustLevel::Platinum => "#8b5cf6",
        }
    }

    /// Get the emoji for the level
    pub fn emoji(&self) -> &'static str {
        match self {
            TrustLevel::Bronze => "🥉",
            TrustLevel::Silver => "🥈",
            TrustLevel::Gold => "🥇",
            TrustLevel::Platinum => "💎",
        }
    }

    /// Minimum total for this level
    pub fn min_total(&self) -> f64 {
        match self {
            TrustLevel::Bronze => 0.0,
            TrustLevel::Silver => 26.0,
            TrustLevel::Gold => 51.0,
            TrustLevel::Platinum => 76.0,
        }
    }

    /// Maximum total for this level (inclusive)
    pub fn max_total(&self) -> f64 {
        match self {
            TrustLevel::Bronze => 25.0,
            TrustLevel::Silver => 50.0,
            TrustLevel::Gold => 75.0,
            TrustLevel::Platinum => 100.0,
        }
    }

    /// The next level up, if any.
    pub fn next(&self) -> Option<TrustLevel> {
        match self {
            TrustLevel::Bronze => Some(TrustLevel::Silver),
            TrustLevel::Silver => Some(TrustLevel::Gold),
            TrustLevel::Gold => Some(TrustLevel::Platinum),
            TrustLevel::Platinum => None,
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TrustLevel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrustLevel::ALL
            .into_iter()
            .find(|level| level.display_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLabelError::UnknownLevel(s.to_string()))
    }
}
