//! Member Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A community member as stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Stable member id (the auth provider's user id)
    pub id: String,

    /// Display name
    pub display_name: String,

    /// When the member joined
    pub joined_at: DateTime<Utc>,
}

/// Lightweight member listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub id: String,
    pub display_name: String,
    pub active_days: i64,
    pub verification_count: i64,
}
