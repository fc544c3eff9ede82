//! Label parsing errors
//!
//! Scoring itself never fails. The only error in this crate comes from
//! turning stored or user-supplied labels back into levels and badges.

use thiserror::Error;

/// A level or badge label did not match any known value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseLabelError {
    #[error("Unknown trust level: {0}")]
    UnknownLevel(String),

    #[error("Unknown badge: {0}")]
    UnknownBadge(String),
}
