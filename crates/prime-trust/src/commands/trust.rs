//! Trust Score Commands
//!
//! Score members from the injected metric source, check them against
//! requirements and rank them.

use crate::{
    error::{Error, Result},
    core::StorageManager,
    models::{ScoreSnapshot, TrustCheck, TrustRequirements, TrustVerification},
    TrustState,
};
use chrono::Utc;
use prime_trust_core::{calculate_trust_score, TrustMetrics, TrustScore};
use std::cmp::Ordering;
use std::sync::Arc;

/// Get the trust score for a member.
///
/// A member the source knows nothing about is scored as all-zero metrics,
/// unless `zeroFillMissing` is off, in which case it is `MemberNotFound`.
pub async fn get_trust_score(state: &TrustState, member_id: &str) -> Result<TrustScore> {
    let (metrics, known) = resolve_metrics(state, member_id).await?;
    let score = calculate_trust_score(&metrics);

    tracing::info!(
        member_id,
        total = score.total,
        level = %score.level,
        badges = score.badges.len(),
        "calculated trust score"
    );

    if known && state.config.snapshot_scores {
        if let Some(storage) = &state.snapshots {
            record_snapshot(Arc::clone(storage), ScoreSnapshot::from_score(member_id, &score))
                .await?;
        }
    }

    Ok(score)
}

/// Score metrics supplied directly by the caller.
pub fn score_metrics(metrics: &TrustMetrics) -> TrustScore {
    calculate_trust_score(metrics)
}

/// Score several members, one calculation each, in input order.
pub async fn score_members(
    state: &TrustState,
    member_ids: &[String],
) -> Result<Vec<(String, TrustScore)>> {
    let mut scores = Vec::with_capacity(member_ids.len());
    for member_id in member_ids {
        let score = get_trust_score(state, member_id).await?;
        scores.push((member_id.clone(), score));
    }
    Ok(scores)
}

/// Rank members by total, highest first. Ties are broken by member id.
pub async fn leaderboard(
    state: &TrustState,
    member_ids: &[String],
    limit: usize,
) -> Result<Vec<(String, TrustScore)>> {
    let mut scores = score_members(state, member_ids).await?;
    scores.sort_by(|(a_id, a), (b_id, b)| match b.total.total_cmp(&a.total) {
        Ordering::Equal => a_id.cmp(b_id),
        other => other,
    });
    scores.truncate(limit);
    Ok(scores)
}

/// Verify a member meets the given (or configured default) requirements.
pub async fn verify_member(
    state: &TrustState,
    member_id: &str,
    requirements: Option<TrustRequirements>,
) -> Result<TrustVerification> {
    let reqs = requirements.unwrap_or_else(|| state.config.default_requirements.clone());
    let trust_score = get_trust_score(state, member_id).await?;
    let verification = check_requirements(member_id, trust_score, &reqs);

    if !verification.is_verified {
        tracing::debug!(
            member_id,
            failed = verification.failed_checks().count(),
            "member does not meet trust requirements"
        );
    }

    Ok(verification)
}

/// Fail with `InsufficientTrust` unless the member meets `requirements`.
pub async fn require(
    state: &TrustState,
    member_id: &str,
    requirements: &TrustRequirements,
) -> Result<TrustScore> {
    let verification = verify_member(state, member_id, Some(requirements.clone())).await?;
    if verification.is_verified {
        return Ok(verification.trust_score);
    }

    let failed: Vec<&str> = verification
        .failed_checks()
        .map(|check| check.name.as_str())
        .collect();
    tracing::warn!(member_id, ?failed, "trust requirement not met");
    Err(Error::InsufficientTrust(format!(
        "{} failed: {}",
        member_id,
        failed.join(", ")
    )))
}

/// Run every requirement check against an already computed score.
pub fn check_requirements(
    member_id: &str,
    trust_score: TrustScore,
    reqs: &TrustRequirements,
) -> TrustVerification {
    let mut checks = Vec::new();

    if reqs.min_total > 0.0 {
        let passed = trust_score.total >= reqs.min_total;
        checks.push(TrustCheck {
            name: "Minimum Trust Score".to_string(),
            passed,
            details: format!(
                "Required: {}, Actual: {:.1}",
                reqs.min_total, trust_score.total
            ),
            required: Some(reqs.min_total.to_string()),
            actual: Some(trust_score.total.to_string()),
        });
    }

    if let Some(required_level) = reqs.required_level {
        let passed = trust_score.level >= required_level;
        checks.push(TrustCheck {
            name: "Trust Level".to_string(),
            passed,
            details: format!(
                "Required: {} {}, Actual: {} {}",
                required_level.emoji(),
                required_level.display_name(),
                trust_score.level.emoji(),
                trust_score.level.display_name()
            ),
            required: Some(required_level.to_string()),
            actual: Some(trust_score.level.to_string()),
        });
    }

    for badge in &reqs.required_badges {
        let passed = trust_score.has_badge(*badge);
        checks.push(TrustCheck {
            name: format!("Badge: {}", badge),
            passed,
            details: badge.description().to_string(),
            required: Some(format!("{} >= {}", badge.metric().display_name(), badge.threshold())),
            actual: Some(if passed { "earned" } else { "missing" }.to_string()),
        });
    }

    TrustVerification {
        member_id: member_id.to_string(),
        is_verified: checks.iter().all(|check| check.passed),
        trust_score,
        checks,
        verified_at: Utc::now(),
    }
}

/// Fetch metrics off the async runtime; the source may block on SQLite.
///
/// Returns the metrics and whether the source actually knew the member.
async fn resolve_metrics(state: &TrustState, member_id: &str) -> Result<(TrustMetrics, bool)> {
    let source = Arc::clone(&state.source);
    let id = member_id.to_string();
    let fetched = tokio::task::spawn_blocking(move || source.fetch_metrics(&id))
        .await
        .map_err(|e| Error::Internal(format!("Metric fetch task failed: {}", e)))??;

    match fetched {
        Some(metrics) => Ok((metrics, true)),
        None if state.config.zero_fill_missing => {
            tracing::warn!(
                member_id,
                source = state.source.name(),
                "no metrics recorded, scoring as zero"
            );
            Ok((TrustMetrics::default(), false))
        }
        None => Err(Error::MemberNotFound(member_id.to_string())),
    }
}

/// Write a snapshot off the async runtime. The store skips members it does
/// not hold and scores that match the latest snapshot.
async fn record_snapshot(storage: Arc<StorageManager>, snapshot: ScoreSnapshot) -> Result<()> {
    let member_id = snapshot.member_id.clone();
    let saved = tokio::task::spawn_blocking(move || storage.save_snapshot(&snapshot))
        .await
        .map_err(|e| Error::Internal(format!("Snapshot task failed: {}", e)))??;

    if saved {
        tracing::debug!(member_id = %member_id, "saved score snapshot");
    }
    Ok(())
}
