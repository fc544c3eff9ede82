//! Integration Tests: Scoring Flow
//!
//! Stored member rows → commands → calculator → snapshots.

use chrono::{Duration, NaiveDate, Utc};
use pretty_assertions::assert_eq;
use prime_trust::{
    commands, Badge, Error, Member, StorageManager, TrustConfig, TrustLevel, TrustRequirements,
    TrustState,
};
use std::sync::Arc;

fn seeded_state(config: TrustConfig) -> (TrustState, Arc<StorageManager>) {
    let storage = Arc::new(StorageManager::in_memory().expect("Open failed"));

    for id in ["ada", "bob", "cy", "di", "eve", "fay", "gus"] {
        storage
            .add_member(&Member {
                id: id.to_string(),
                display_name: id.to_uppercase(),
                joined_at: Utc::now(),
            })
            .expect("Save member failed");
    }

    // ada: 90 on the quiz, 45 active days, reputation 85
    storage.record_quiz_attempt("ada", 90.0, Utc::now()).expect("Quiz failed");
    let start = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");
    for offset in 0..45 {
        storage
            .record_activity("ada", start + Duration::days(offset))
            .expect("Activity failed");
    }
    storage.set_reputation("ada", 85.0).expect("Reputation failed");

    // bob: vouched by everyone else, heavily linked, long-standing
    for voucher in ["ada", "cy", "di", "eve", "fay", "gus"] {
        storage.add_vouch(voucher, "bob").expect("Vouch failed");
    }
    for provider in ["github", "gitlab", "mastodon", "matrix", "keybase", "nostr"] {
        storage.link_account("bob", provider, "bob").expect("Link failed");
    }
    for offset in 0..120 {
        storage
            .record_activity("bob", start + Duration::days(offset))
            .expect("Activity failed");
    }
    storage.record_quiz_attempt("bob", 95.0, Utc::now()).expect("Quiz failed");
    storage.set_reputation("bob", 95.0).expect("Reputation failed");

    let state = TrustState::new(storage.clone(), config).with_snapshots(storage.clone());
    (state, storage)
}

/// Test: a partially established member lands in Silver
#[tokio::test]
async fn test_partial_member_score() {
    let (state, _storage) = seeded_state(TrustConfig::development());

    let score = commands::get_trust_score(&state, "ada").await.expect("Score failed");
    assert_eq!(score.total, 44.0);
    assert_eq!(score.level, TrustLevel::Silver);
    assert_eq!(
        score.badges,
        vec![Badge::LawAdherent, Badge::LawGuardian, Badge::ActiveParticipant]
    );
}

/// Test: a fully established member holds every badge
#[tokio::test]
async fn test_established_member_score() {
    let (state, _storage) = seeded_state(TrustConfig::development());

    let score = commands::get_trust_score(&state, "bob").await.expect("Score failed");
    assert_eq!(score.total, 98.0);
    assert_eq!(score.level, TrustLevel::Platinum);
    assert_eq!(score.badges, Badge::ALL.to_vec());
}

/// Test: scoring a stored member snapshots it once per distinct score
#[tokio::test]
async fn test_scores_are_snapshotted() {
    let (state, storage) = seeded_state(TrustConfig::development());

    commands::get_trust_score(&state, "ada").await.expect("Score failed");
    commands::get_trust_score(&state, "ada").await.expect("Score failed");
    commands::get_trust_score(&state, "stranger").await.expect("Zero fill failed");

    assert_eq!(storage.snapshot_history("ada", 10).expect("History failed").len(), 1);
    assert!(storage.latest_snapshot("stranger").expect("Query failed").is_none());

    // 46 active days moves the total from 44.0 to 44.2
    storage
        .record_activity("ada", NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date"))
        .expect("Activity failed");
    let score = commands::get_trust_score(&state, "ada").await.expect("Score failed");

    let history = storage.snapshot_history("ada", 10).expect("History failed");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].total, score.total);
}

/// Test: snapshots can be switched off
#[tokio::test]
async fn test_snapshots_disabled() {
    let mut config = TrustConfig::development();
    config.snapshot_scores = false;
    let (state, storage) = seeded_state(config);

    commands::get_trust_score(&state, "bob").await.expect("Score failed");
    assert!(storage.latest_snapshot("bob").expect("Query failed").is_none());
}

/// Test: production config refuses to invent zeros for unknown members
#[tokio::test]
async fn test_unknown_member_in_strict_mode() {
    let mut config = TrustConfig::production();
    config.database_path = ":memory:".into();
    let (state, _storage) = seeded_state(config);

    let err = commands::get_trust_score(&state, "stranger")
        .await
        .expect_err("Should not zero fill");
    assert!(matches!(err, Error::MemberNotFound(_)));

    // Known members with no rows are still scored as zero
    let score = commands::get_trust_score(&state, "gus").await.expect("Score failed");
    assert_eq!(score.total, 0.0);
}

/// Test: requirement gates for inviting and admin access
#[tokio::test]
async fn test_requirement_gates() {
    let (state, _storage) = seeded_state(TrustConfig::development());

    let bob = commands::verify_member(&state, "bob", Some(TrustRequirements::for_admin()))
        .await
        .expect("Verify failed");
    assert!(bob.is_verified);

    let ada = commands::verify_member(&state, "ada", Some(TrustRequirements::for_inviting()))
        .await
        .expect("Verify failed");
    assert!(!ada.is_verified);
    let failed: Vec<&str> = ada.failed_checks().map(|c| c.name.as_str()).collect();
    assert_eq!(failed, vec!["Badge: Verified Human"]);

    let err = commands::require(&state, "ada", &TrustRequirements::for_admin())
        .await
        .expect_err("Ada is not an admin");
    assert_eq!(err.code(), "TRUST_INSUFFICIENT");
}

/// Test: the configured default requirements apply when none are passed
#[tokio::test]
async fn test_default_requirements() {
    let mut config = TrustConfig::development();
    config.default_requirements = TrustRequirements::for_member_access();
    let (state, _storage) = seeded_state(config);

    let ada = commands::verify_member(&state, "ada", None).await.expect("Verify failed");
    assert!(ada.is_verified);

    let gus = commands::verify_member(&state, "gus", None).await.expect("Verify failed");
    assert!(!gus.is_verified);
}

/// Test: leaderboard over stored members
#[tokio::test]
async fn test_leaderboard() {
    let (state, storage) = seeded_state(TrustConfig::development());
    let ids: Vec<String> = storage
        .list_members()
        .expect("List failed")
        .into_iter()
        .map(|m| m.id)
        .collect();

    let board = commands::leaderboard(&state, &ids, 3).await.expect("Leaderboard failed");
    let order: Vec<&str> = board.iter().map(|(id, _)| id.as_str()).collect();
    // cy, di, eve, fay and gus each vouched for bob but have no rows of
    // their own, so they tie at zero and sort by id.
    assert_eq!(order, vec!["bob", "ada", "cy"]);
}

/// Test: repeated leaderboards do not grow the snapshot history
#[tokio::test]
async fn test_repeated_leaderboard_keeps_history_flat() {
    let (state, storage) = seeded_state(TrustConfig::development());
    let ids: Vec<String> = storage
        .list_members()
        .expect("List failed")
        .into_iter()
        .map(|m| m.id)
        .collect();

    commands::leaderboard(&state, &ids, 3).await.expect("Leaderboard failed");
    commands::leaderboard(&state, &ids, 3).await.expect("Leaderboard failed");
    commands::verify_member(&state, "bob", None).await.expect("Verify failed");

    for id in &ids {
        let history = storage.snapshot_history(id, 10).expect("History failed");
        assert_eq!(history.len(), 1, "history for {}", id);
    }
}
