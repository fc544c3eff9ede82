//! Storage Manager
//!
//! SQLite store for members and the raw rows trust metrics are derived from:
//! quiz attempts, vouches, activity days, linked accounts and reputation.
//! Computed scores can be snapshotted for history.
//!
//! # Notes
//!
//! - All SQL queries use parameterized statements
//! - Foreign keys are enforced; deleting a member removes its rows first
//! - Timestamps are stored as RFC 3339 text, days as `YYYY-MM-DD`

use crate::core::source::MetricSource;
use crate::error::{Error, Result};
use crate::models::*;
use chrono::{DateTime, NaiveDate, Utc};
use prime_trust_core::{Badge, TrustLevel, TrustMetrics};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Storage manager for member trust data
pub struct StorageManager {
    conn: Mutex<Connection>,
}

impl StorageManager {
    /// Open (or create) the store at `path`.
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create directory: {}", e)))?;
        }

        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened trust store");
        Self::with_connection(conn)
    }

    /// In-memory store (tests, one-shot CLI runs)
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Open the store named by a config path, honouring `:memory:`.
    pub fn open(database_path: &str) -> Result<Self> {
        if database_path == ":memory:" {
            Self::in_memory()
        } else {
            Self::new(Path::new(database_path))
        }
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::Internal(format!("Storage lock poisoned: {}", e)))
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS members (
                id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                joined_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS quiz_attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                member_id TEXT NOT NULL,
                score REAL NOT NULL,
                taken_at TEXT NOT NULL,
                FOREIGN KEY (member_id) REFERENCES members(id)
            );
            CREATE INDEX IF NOT EXISTS idx_quiz_member ON quiz_attempts(member_id);

            CREATE TABLE IF NOT EXISTS vouches (
                voucher_id TEXT NOT NULL,
                vouchee_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (voucher_id, vouchee_id),
                CHECK (voucher_id <> vouchee_id),
                FOREIGN KEY (voucher_id) REFERENCES members(id),
                FOREIGN KEY (vouchee_id) REFERENCES members(id)
            );
            CREATE INDEX IF NOT EXISTS idx_vouches_vouchee ON vouches(vouchee_id);

            CREATE TABLE IF NOT EXISTS activity_days (
                member_id TEXT NOT NULL,
                day TEXT NOT NULL,
                PRIMARY KEY (member_id, day),
                FOREIGN KEY (member_id) REFERENCES members(id)
            );

            CREATE TABLE IF NOT EXISTS linked_accounts (
                member_id TEXT NOT NULL,
                provider TEXT NOT NULL,
                external_id TEXT NOT NULL,
                linked_at TEXT NOT NULL,
                PRIMARY KEY (member_id, provider, external_id),
                FOREIGN KEY (member_id) REFERENCES members(id)
            );

            CREATE TABLE IF NOT EXISTS reputation (
                member_id TEXT PRIMARY KEY,
                score REAL NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (member_id) REFERENCES members(id)
            );

            CREATE TABLE IF NOT EXISTS score_snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                member_id TEXT NOT NULL,
                total REAL NOT NULL,
                level TEXT NOT NULL,
                badges TEXT NOT NULL,
                calculated_at TEXT NOT NULL,
                FOREIGN KEY (member_id) REFERENCES members(id)
            );
            CREATE INDEX IF NOT EXISTS idx_snapshots_member ON score_snapshots(member_id, id);
            "#,
        )?;

        Ok(())
    }

    // ==================== Member Operations ====================

    /// Insert a member, or update the display name of an existing one
    pub fn add_member(&self, member: &Member) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO members (id, display_name, joined_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET display_name = excluded.display_name
            "#,
            params![member.id, member.display_name, member.joined_at.to_rfc3339()],
        )?;

        tracing::info!(member_id = %member.id, "STORAGE: member saved");
        Ok(())
    }

    /// Get a member by id
    pub fn get_member(&self, member_id: &str) -> Result<Option<Member>> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT id, display_name, joined_at FROM members WHERE id = ?1",
                params![member_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, display_name, joined_at)| -> Result<Member> {
            Ok(Member {
                id,
                display_name,
                joined_at: parse_timestamp(&joined_at)?,
            })
        })
        .transpose()
    }

    /// List all members with their headline counts
    pub fn list_members(&self) -> Result<Vec<MemberSummary>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT m.id, m.display_name,
                   (SELECT COUNT(*) FROM activity_days a WHERE a.member_id = m.id),
                   (SELECT COUNT(*) FROM vouches v WHERE v.vouchee_id = m.id)
            FROM members m ORDER BY m.joined_at ASC, m.id ASC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(MemberSummary {
                id: row.get(0)?,
                display_name: row.get(1)?,
                active_days: row.get(2)?,
                verification_count: row.get(3)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Storage(e.to_string()))
    }

    /// Delete a member and every row that references it.
    ///
    /// Returns `false` if the member did not exist.
    pub fn delete_member(&self, member_id: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM quiz_attempts WHERE member_id = ?1", params![member_id])?;
        tx.execute(
            "DELETE FROM vouches WHERE voucher_id = ?1 OR vouchee_id = ?1",
            params![member_id],
        )?;
        tx.execute("DELETE FROM activity_days WHERE member_id = ?1", params![member_id])?;
        tx.execute("DELETE FROM linked_accounts WHERE member_id = ?1", params![member_id])?;
        tx.execute("DELETE FROM reputation WHERE member_id = ?1", params![member_id])?;
        tx.execute("DELETE FROM score_snapshots WHERE member_id = ?1", params![member_id])?;
        let rows = tx.execute("DELETE FROM members WHERE id = ?1", params![member_id])?;
        tx.commit()?;

        tracing::info!(member_id, deleted = rows > 0, "STORAGE: member deleted");
        Ok(rows > 0)
    }

    // ==================== Metric Rows ====================

    /// Record a Prime Law quiz attempt
    pub fn record_quiz_attempt(
        &self,
        member_id: &str,
        score: f64,
        taken_at: DateTime<Utc>,
    ) -> Result<()> {
        if !score.is_finite() {
            return Err(Error::InvalidInput(format!("Quiz score must be finite, got {}", score)));
        }
        let conn = self.conn()?;
        ensure_member(&conn, member_id)?;

        conn.execute(
            "INSERT INTO quiz_attempts (member_id, score, taken_at) VALUES (?1, ?2, ?3)",
            params![member_id, score, taken_at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Record that `voucher_id` vouches for `vouchee_id`.
    ///
    /// Returns `false` if the vouch already existed.
    pub fn add_vouch(&self, voucher_id: &str, vouchee_id: &str) -> Result<bool> {
        if voucher_id == vouchee_id {
            return Err(Error::InvalidInput("Members cannot vouch for themselves".into()));
        }
        let conn = self.conn()?;
        ensure_member(&conn, voucher_id)?;
        ensure_member(&conn, vouchee_id)?;

        let rows = conn.execute(
            r#"
            INSERT OR IGNORE INTO vouches (voucher_id, vouchee_id, created_at)
            VALUES (?1, ?2, ?3)
            "#,
            params![voucher_id, vouchee_id, Utc::now().to_rfc3339()],
        )?;

        tracing::debug!(voucher_id, vouchee_id, new = rows > 0, "vouch recorded");
        Ok(rows > 0)
    }

    /// Mark a member active on `day`. Idempotent per day.
    pub fn record_activity(&self, member_id: &str, day: NaiveDate) -> Result<bool> {
        let conn = self.conn()?;
        ensure_member(&conn, member_id)?;

        let rows = conn.execute(
            "INSERT OR IGNORE INTO activity_days (member_id, day) VALUES (?1, ?2)",
            params![member_id, day.format(DAY_FORMAT).to_string()],
        )?;
        Ok(rows > 0)
    }

    /// Link an external account. Idempotent per (provider, external id).
    pub fn link_account(&self, member_id: &str, provider: &str, external_id: &str) -> Result<bool> {
        if provider.trim().is_empty() || external_id.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Provider and external id must not be empty".into(),
            ));
        }
        let conn = self.conn()?;
        ensure_member(&conn, member_id)?;

        let rows = conn.execute(
            r#"
            INSERT OR IGNORE INTO linked_accounts (member_id, provider, external_id, linked_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![member_id, provider, external_id, Utc::now().to_rfc3339()],
        )?;
        Ok(rows > 0)
    }

    /// Set (or replace) a member's community reputation
    pub fn set_reputation(&self, member_id: &str, score: f64) -> Result<()> {
        if !score.is_finite() {
            return Err(Error::InvalidInput(format!("Reputation must be finite, got {}", score)));
        }
        let conn = self.conn()?;
        ensure_member(&conn, member_id)?;

        conn.execute(
            r#"
            INSERT INTO reputation (member_id, score, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(member_id) DO UPDATE SET score = excluded.score, updated_at = excluded.updated_at
            "#,
            params![member_id, score, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Derive raw metrics for a member, `None` if the member is unknown.
    pub fn load_metrics(&self, member_id: &str) -> Result<Option<TrustMetrics>> {
        let conn = self.conn()?;
        if !member_exists(&conn, member_id)? {
            return Ok(None);
        }

        let prime_law_score: Option<f64> = conn.query_row(
            "SELECT MAX(score) FROM quiz_attempts WHERE member_id = ?1",
            params![member_id],
            |row| row.get(0),
        )?;
        let verification_count: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT voucher_id) FROM vouches WHERE vouchee_id = ?1",
            params![member_id],
            |row| row.get(0),
        )?;
        let active_days: i64 = conn.query_row(
            "SELECT COUNT(*) FROM activity_days WHERE member_id = ?1",
            params![member_id],
            |row| row.get(0),
        )?;
        let connected_accounts: i64 = conn.query_row(
            "SELECT COUNT(*) FROM linked_accounts WHERE member_id = ?1",
            params![member_id],
            |row| row.get(0),
        )?;
        let community_reputation: Option<f64> = conn
            .query_row(
                "SELECT score FROM reputation WHERE member_id = ?1",
                params![member_id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(Some(TrustMetrics {
            prime_law_score: prime_law_score.unwrap_or(0.0),
            verification_count,
            active_days,
            connected_accounts,
            community_reputation: community_reputation.unwrap_or(0.0),
        }))
    }

    /// Export a member with its joined rows in backend record shape.
    pub fn export_record(&self, member_id: &str) -> Result<Option<MemberRecord>> {
        let member = match self.get_member(member_id)? {
            Some(member) => member,
            None => return Ok(None),
        };
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT score, taken_at FROM quiz_attempts WHERE member_id = ?1 ORDER BY id",
        )?;
        let attempts = stmt
            .query_map(params![member_id], |row| {
                Ok((row.get::<_, f64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(score, taken_at)| -> Result<QuizAttempt> {
                Ok(QuizAttempt {
                    score,
                    taken_at: Some(parse_timestamp(&taken_at)?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut stmt = conn.prepare("SELECT voucher_id FROM vouches WHERE vouchee_id = ?1")?;
        let vouches = stmt
            .query_map(params![member_id], |row| Ok(Vouch { voucher_id: row.get(0)? }))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare("SELECT day FROM activity_days WHERE member_id = ?1 ORDER BY day")?;
        let activity = stmt
            .query_map(params![member_id], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?
            .into_iter()
            .map(|day| {
                NaiveDate::parse_from_str(&day, DAY_FORMAT)
                    .map(|day| ActivityDay { day })
                    .map_err(|e| Error::Internal(format!("Corrupt activity day '{}': {}", day, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
            "SELECT provider, external_id FROM linked_accounts WHERE member_id = ?1",
        )?;
        let linked_accounts = stmt
            .query_map(params![member_id], |row| {
                Ok(LinkedAccount {
                    provider: row.get(0)?,
                    external_id: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let reputation = conn
            .query_row(
                "SELECT score FROM reputation WHERE member_id = ?1",
                params![member_id],
                |row| Ok(ReputationRow { score: row.get(0)? }),
            )
            .optional()?;

        Ok(Some(MemberRecord {
            id: member.id,
            display_name: Some(member.display_name),
            quiz_attempts: attempts.into(),
            vouches: vouches.into(),
            activity: activity.into(),
            linked_accounts: linked_accounts.into(),
            reputation: reputation.into(),
        }))
    }

    // ==================== Score Snapshots ====================

    /// Persist a computed score.
    ///
    /// Returns `false` without writing when the member is not stored here or
    /// when the score is unchanged since the member's latest snapshot.
    pub fn save_snapshot(&self, snapshot: &ScoreSnapshot) -> Result<bool> {
        let badges = serde_json::to_string(&snapshot.badges)?;
        let level = snapshot.level.display_name();
        let conn = self.conn()?;

        if !member_exists(&conn, &snapshot.member_id)? {
            tracing::debug!(member_id = %snapshot.member_id, "member not stored, snapshot skipped");
            return Ok(false);
        }

        let latest = conn
            .query_row(
                r#"
                SELECT total, level, badges FROM score_snapshots
                WHERE member_id = ?1 ORDER BY id DESC LIMIT 1
                "#,
                params![snapshot.member_id],
                |row| {
                    Ok((
                        row.get::<_, f64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        if let Some((total, latest_level, latest_badges)) = latest {
            if total == snapshot.total && latest_level == level && latest_badges == badges {
                return Ok(false);
            }
        }

        conn.execute(
            r#"
            INSERT INTO score_snapshots (member_id, total, level, badges, calculated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                snapshot.member_id,
                snapshot.total,
                level,
                badges,
                snapshot.calculated_at.to_rfc3339(),
            ],
        )?;
        Ok(true)
    }

    /// Most recent snapshot for a member
    pub fn latest_snapshot(&self, member_id: &str) -> Result<Option<ScoreSnapshot>> {
        Ok(self.snapshot_history(member_id, 1)?.into_iter().next())
    }

    /// Snapshots for a member, newest first
    pub fn snapshot_history(&self, member_id: &str, limit: u32) -> Result<Vec<ScoreSnapshot>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT member_id, total, level, badges, calculated_at
            FROM score_snapshots WHERE member_id = ?1
            ORDER BY id DESC LIMIT ?2
            "#,
        )?;

        let rows = stmt
            .query_map(params![member_id, limit], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(member_id, total, level, badges, calculated_at)| -> Result<ScoreSnapshot> {
                Ok(ScoreSnapshot {
                    member_id,
                    total,
                    level: level.parse::<TrustLevel>()?,
                    badges: serde_json::from_str::<Vec<Badge>>(&badges)?,
                    calculated_at: parse_timestamp(&calculated_at)?,
                })
            })
            .collect()
    }
}

impl MetricSource for StorageManager {
    fn fetch_metrics(&self, member_id: &str) -> Result<Option<TrustMetrics>> {
        self.load_metrics(member_id)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

fn member_exists(conn: &Connection, member_id: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM members WHERE id = ?1",
            params![member_id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn ensure_member(conn: &Connection, member_id: &str) -> Result<()> {
    if member_exists(conn, member_id)? {
        Ok(())
    } else {
        Err(Error::MemberNotFound(member_id.to_string()))
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Corrupt timestamp '{}': {}", raw, e)))
}
