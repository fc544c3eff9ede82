//! # Prime Trust Core
//!
//! The trust score calculator for Prime Trust members.
//!
//! A member's trust is derived from five raw metrics:
//!
//! | Metric | Source |
//! |--------|--------|
//! | Prime Law score | comprehension quiz on the constitutional rules |
//! | Verifications | members who vouched for this member |
//! | Active days | distinct days with recorded activity |
//! | Connected accounts | linked external identities |
//! | Community reputation | externally computed reputation |
//!
//! Each metric is normalized into a 0-100 component, the components are
//! averaged into a total, the total is banded into a [`TrustLevel`], and the
//! raw metrics unlock [`Badge`]s.
//!
//! ```rust
//! use prime_trust_core::{calculate_trust_score, Badge, TrustLevel, TrustMetrics};
//!
//! let score = calculate_trust_score(&TrustMetrics {
//!     prime_law_score: 90.0,
//!     verification_count: 0,
//!     active_days: 45,
//!     connected_accounts: 0,
//!     community_reputation: 85.0,
//! });
//!
//! assert_eq!(score.total, 44.0);
//! assert_eq!(score.level, TrustLevel::Silver);
//! assert_eq!(
//!     score.badges,
//!     vec![Badge::LawAdherent, Badge::LawGuardian, Badge::ActiveParticipant]
//! );
//! ```
//!
//! The calculator is pure: no I/O, no logging, no shared state. It cannot
//! fail, out-of-range input is clamped rather than rejected.

pub mod badge;
pub mod error;
pub mod level;
pub mod metrics;
pub mod score;

pub use badge::{evaluate_badges, Badge};
pub use error::ParseLabelError;
pub use level::TrustLevel;
pub use metrics::{MetricKind, TrustMetrics};
pub use score::{calculate_trust_score, TrustComponents, TrustScore, MAX_COMPONENT};
