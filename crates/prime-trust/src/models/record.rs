//! Member Records
//!
//! The shape a hosted backend returns for a member joined with its related
//! rows, and the projection of that shape into [`TrustMetrics`].
//!
//! Joined relations come back as `null`, a single object or an array
//! depending on the relationship and the query. [`Joined`] captures the
//! three cases once at the boundary so nothing downstream has to re-check.

use chrono::{DateTime, NaiveDate, Utc};
use prime_trust_core::TrustMetrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A joined relation: absent, a single row, or many rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Joined<T> {
    None,
    // Many before One: derived structs also accept sequences.
    Many(Vec<T>),
    One(T),
}

impl<T> Default for Joined<T> {
    fn default() -> Self {
        Joined::None
    }
}

impl<T> Joined<T> {
    /// View the relation as a slice regardless of its shape.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Joined::None => &[],
            Joined::One(row) => std::slice::from_ref(row),
            Joined::Many(rows) => rows,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Joined::None => Vec::new(),
            Joined::One(row) => vec![row],
            Joined::Many(rows) => rows,
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T> From<Option<T>> for Joined<T> {
    fn from(row: Option<T>) -> Self {
        row.map_or(Joined::None, Joined::One)
    }
}

impl<T> From<Vec<T>> for Joined<T> {
    fn from(rows: Vec<T>) -> Self {
        Joined::Many(rows)
    }
}

/// One Prime Law quiz attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub score: f64,
    #[serde(default)]
    pub taken_at: Option<DateTime<Utc>>,
}

/// Another member vouching for this one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vouch {
    pub voucher_id: String,
}

/// A day with recorded activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDay {
    pub day: NaiveDate,
}

/// A linked external account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub provider: String,
    pub external_id: String,
}

/// Externally computed reputation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationRow {
    pub score: f64,
}

/// A member row with its related rows joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub quiz_attempts: Joined<QuizAttempt>,

    #[serde(default)]
    pub vouches: Joined<Vouch>,

    #[serde(default)]
    pub activity: Joined<ActivityDay>,

    #[serde(default)]
    pub linked_accounts: Joined<LinkedAccount>,

    #[serde(default)]
    pub reputation: Joined<ReputationRow>,
}

impl MemberRecord {
    /// An empty record for a member with no related rows.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            quiz_attempts: Joined::None,
            vouches: Joined::None,
            activity: Joined::None,
            linked_accounts: Joined::None,
            reputation: Joined::None,
        }
    }

    /// Project the record into raw metrics.
    ///
    /// - Prime Law: best finite quiz score, 0 without attempts
    /// - Verifications: distinct vouchers, self-vouches ignored
    /// - Activity: distinct days
    /// - Connections: distinct (provider, external id) pairs
    /// - Reputation: first reputation row, 0 without one
    pub fn to_metrics(&self) -> TrustMetrics {
        let prime_law_score = self
            .quiz_attempts
            .as_slice()
            .iter()
            .map(|attempt| attempt.score)
            .filter(|score| score.is_finite())
            .fold(None, |best: Option<f64>, score| {
                Some(best.map_or(score, |b| b.max(score)))
            })
            .unwrap_or(0.0);

        let vouchers: BTreeSet<&str> = self
            .vouches
            .as_slice()
            .iter()
            .map(|vouch| vouch.voucher_id.as_str())
            .filter(|voucher| *voucher != self.id)
            .collect();

        let days: BTreeSet<NaiveDate> = self.activity.as_slice().iter().map(|a| a.day).collect();

        let accounts: BTreeSet<(&str, &str)> = self
            .linked_accounts
            .as_slice()
            .iter()
            .map(|a| (a.provider.as_str(), a.external_id.as_str()))
            .collect();

        TrustMetrics {
            prime_law_score,
            verification_count: vouchers.len() as i64,
            active_days: days.len() as i64,
            connected_accounts: accounts.len() as i64,
            community_reputation: self.reputation.first().map_or(0.0, |r| r.score),
        }
    }
}
