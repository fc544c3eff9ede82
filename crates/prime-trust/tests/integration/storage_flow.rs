//! Integration Tests: Storage Operations Flow
//!
//! - Member CRUD
//! - Metric row recording and derivation
//! - Snapshot history

use chrono::{Duration, NaiveDate, Utc};
use pretty_assertions::assert_eq;
use prime_trust::{
    calculate_trust_score, Error, Member, ScoreSnapshot, StorageManager, TrustLevel, TrustMetrics,
};
use tempfile::TempDir;

/// Helper to create a test storage manager
fn create_test_storage() -> (StorageManager, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test_trust.db");
    let storage = StorageManager::new(&db_path).expect("Failed to create storage manager");
    (storage, temp_dir)
}

fn member(id: &str, name: &str) -> Member {
    Member {
        id: id.to_string(),
        display_name: name.to_string(),
        joined_at: Utc::now(),
    }
}

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date") + Duration::days(offset)
}

/// Test: metric rows are derived into the five raw metrics
#[test]
fn test_metric_derivation() {
    let (storage, _temp_dir) = create_test_storage();

    for (id, name) in [("ada", "Ada"), ("bob", "Bob"), ("cy", "Cy"), ("di", "Di")] {
        storage.add_member(&member(id, name)).expect("Save member failed");
    }

    storage.record_quiz_attempt("ada", 64.0, Utc::now()).expect("Quiz 1 failed");
    storage.record_quiz_attempt("ada", 91.0, Utc::now()).expect("Quiz 2 failed");
    storage.record_quiz_attempt("ada", 87.0, Utc::now()).expect("Quiz 3 failed");

    assert!(storage.add_vouch("bob", "ada").expect("Vouch failed"));
    assert!(storage.add_vouch("cy", "ada").expect("Vouch failed"));
    assert!(!storage.add_vouch("bob", "ada").expect("Repeat vouch failed"));

    for offset in 0..40 {
        storage.record_activity("ada", day(offset)).expect("Activity failed");
    }
    assert!(!storage.record_activity("ada", day(0)).expect("Repeat activity failed"));

    assert!(storage.link_account("ada", "github", "ada").expect("Link failed"));
    assert!(storage.link_account("ada", "mastodon", "@ada").expect("Link failed"));
    assert!(storage.link_account("ada", "keybase", "ada").expect("Link failed"));
    assert!(!storage.link_account("ada", "github", "ada").expect("Repeat link failed"));

    storage.set_reputation("ada", 40.0).expect("Reputation failed");
    storage.set_reputation("ada", 70.0).expect("Reputation update failed");

    let metrics = storage
        .load_metrics("ada")
        .expect("Load failed")
        .expect("Member should exist");

    assert_eq!(
        metrics,
        TrustMetrics {
            prime_law_score: 91.0,
            verification_count: 2,
            active_days: 40,
            connected_accounts: 3,
            community_reputation: 70.0,
        }
    );

    let summaries = storage.list_members().expect("List failed");
    let ada = summaries.iter().find(|m| m.id == "ada").expect("Ada listed");
    assert_eq!(ada.active_days, 40);
    assert_eq!(ada.verification_count, 2);
}

/// Test: deleting a member removes vouches it gave as well as received
#[test]
fn test_delete_member_cascades() {
    let (storage, _temp_dir) = create_test_storage();

    storage.add_member(&member("ada", "Ada")).expect("Save failed");
    storage.add_member(&member("bob", "Bob")).expect("Save failed");
    storage.add_vouch("bob", "ada").expect("Vouch failed");
    storage.add_vouch("ada", "bob").expect("Vouch failed");
    storage.record_activity("bob", day(3)).expect("Activity failed");

    assert!(storage.delete_member("bob").expect("Delete failed"));

    let ada = storage.load_metrics("ada").expect("Load failed").expect("Ada exists");
    assert_eq!(ada.verification_count, 0);
    assert_eq!(storage.load_metrics("bob").expect("Load failed"), None);
}

/// Test: writes against unknown members are rejected
#[test]
fn test_unknown_member_writes() {
    let (storage, _temp_dir) = create_test_storage();

    let err = storage
        .record_activity("ghost", day(0))
        .expect_err("Should reject unknown member");
    assert!(matches!(err, Error::MemberNotFound(ref id) if id == "ghost"));

    let err = storage
        .set_reputation("ghost", 10.0)
        .expect_err("Should reject unknown member");
    assert_eq!(err.code(), "TRUST_MEMBER_NOT_FOUND");
}

/// Test: snapshots come back newest first and survive reopening
#[test]
fn test_snapshot_history_persists() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("history.db");

    {
        let storage = StorageManager::new(&db_path).expect("Open failed");
        storage.add_member(&member("ada", "Ada")).expect("Save failed");

        for active_days in [10, 60, 100] {
            let score = calculate_trust_score(&TrustMetrics {
                prime_law_score: 100.0,
                verification_count: 5,
                active_days,
                connected_accounts: 5,
                community_reputation: 100.0,
            });
            storage
                .save_snapshot(&ScoreSnapshot::from_score("ada", &score))
                .expect("Snapshot failed");
        }
    }

    let storage = StorageManager::new(&db_path).expect("Reopen failed");
    let history = storage.snapshot_history("ada", 10).expect("History failed");
    let totals: Vec<f64> = history.iter().map(|s| s.total).collect();
    assert_eq!(totals, vec![100.0, 92.0, 82.0]);
    assert!(history.iter().all(|s| s.level == TrustLevel::Platinum));

    let latest = storage.latest_snapshot("ada").expect("Latest failed").expect("Has latest");
    assert_eq!(latest.total, 100.0);
    assert_eq!(storage.snapshot_history("ada", 2).expect("History failed").len(), 2);
}
