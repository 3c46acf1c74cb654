//! Run-metadata store — one cost record per run.
//!
//! Writes upsert on the `(user_id, assistant_id, run_id)` primary key:
//! a record is write-once per run in the happy path, and an accidental
//! second settlement overwrites rather than accumulates.

use rusqlite::{OptionalExtension, params};
use tracing::debug;

use vox_core::cost::CostRecord;
use vox_core::ids::RunKey;

use crate::connection::ConnectionPool;
use crate::errors::{Result, StoreError};

/// Maximum retries when `SQLite` reports BUSY/LOCKED.
const SQLITE_BUSY_MAX_RETRIES: u32 = 8;

/// Persistence for per-run cost records.
pub trait RunStore: Send + Sync {
    /// Persist `record` under `key`, overwriting any existing record.
    fn store_run(&self, key: &RunKey, record: &CostRecord) -> Result<()>;

    /// Fetch the record stored under `key`, if any.
    fn get_run(&self, key: &RunKey) -> Result<Option<CostRecord>>;
}

/// `SQLite`-backed [`RunStore`].
pub struct SqliteRunStore {
    pool: ConnectionPool,
}

impl SqliteRunStore {
    /// Create a store over an existing pool and run migrations.
    pub fn new(pool: ConnectionPool) -> Result<Self> {
        {
            let conn = pool.get()?;
            crate::migrations::run_migrations(&conn)?;
        }
        Ok(Self { pool })
    }

    /// Retry an operation on `SQLite` BUSY/LOCKED with linear backoff + jitter.
    ///
    /// Backoff: base = min(attempts * 10, 200) ms, jitter ±25% to prevent
    /// thundering herd when multiple writers contend on the same database.
    fn retry_on_sqlite_busy<T>(mut f: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempts = 0;

        loop {
            match f() {
                Ok(value) => return Ok(value),
                Err(err)
                    if Self::is_sqlite_busy_or_locked(&err)
                        && attempts < SQLITE_BUSY_MAX_RETRIES =>
                {
                    attempts += 1;
                    let base_ms = u64::from(attempts).saturating_mul(10).min(200);
                    let jitter_range = base_ms / 4;
                    let jitter = if jitter_range > 0 {
                        rand::random::<u64>() % (jitter_range * 2 + 1)
                    } else {
                        0
                    };
                    let sleep_ms = base_ms - jitter_range + jitter;
                    debug!(attempts, sleep_ms, "sqlite busy, retrying");
                    std::thread::sleep(std::time::Duration::from_millis(sleep_ms));
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn is_sqlite_busy_or_locked(err: &StoreError) -> bool {
        matches!(
            err,
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
        )
    }
}

impl RunStore for SqliteRunStore {
    fn store_run(&self, key: &RunKey, record: &CostRecord) -> Result<()> {
        Self::retry_on_sqlite_busy(|| {
            let conn = self.pool.get()?;
            let _ = conn.execute(
                "INSERT INTO runs (
                    user_id, assistant_id, run_id,
                    telephony_cost, transcription_cost, llm_cost, tts_cost,
                    duration_secs, to_number, recording_url
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT (user_id, assistant_id, run_id) DO UPDATE SET
                    telephony_cost = excluded.telephony_cost,
                    transcription_cost = excluded.transcription_cost,
                    llm_cost = excluded.llm_cost,
                    tts_cost = excluded.tts_cost,
                    duration_secs = excluded.duration_secs,
                    to_number = excluded.to_number,
                    recording_url = excluded.recording_url,
                    updated_at = datetime('now')",
                params![
                    key.user_id.as_str(),
                    key.assistant_id.as_str(),
                    key.run_id.as_str(),
                    record.telephony_cost,
                    record.transcription_cost,
                    record.llm_cost,
                    record.tts_cost,
                    record.duration_secs,
                    record.to_number,
                    record.recording_url,
                ],
            )?;
            Ok(())
        })
    }

    fn get_run(&self, key: &RunKey) -> Result<Option<CostRecord>> {
        let conn = self.pool.get()?;
        let record = conn
            .query_row(
                "SELECT telephony_cost, transcription_cost, llm_cost, tts_cost,
                        duration_secs, to_number, recording_url
                 FROM runs
                 WHERE user_id = ?1 AND assistant_id = ?2 AND run_id = ?3",
                params![
                    key.user_id.as_str(),
                    key.assistant_id.as_str(),
                    key.run_id.as_str(),
                ],
                |row| {
                    Ok(CostRecord {
                        telephony_cost: row.get(0)?,
                        transcription_cost: row.get(1)?,
                        llm_cost: row.get(2)?,
                        tts_cost: row.get(3)?,
                        duration_secs: row.get(4)?,
                        to_number: row.get(5)?,
                        recording_url: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ConnectionConfig, new_in_memory};
    use vox_core::ids::{AssistantId, RunId, UserId};

    fn store() -> SqliteRunStore {
        let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
        SqliteRunStore::new(pool).unwrap()
    }

    fn key(run: &str) -> RunKey {
        RunKey::new(
            UserId::from("u1"),
            AssistantId::from("a1"),
            RunId::from(run.to_string()),
        )
    }

    fn record(llm_cost: f64) -> CostRecord {
        CostRecord {
            telephony_cost: Some(0.01),
            transcription_cost: 0.0043,
            llm_cost,
            tts_cost: 0.0,
            duration_secs: 60,
            to_number: "+15550001111".into(),
            recording_url: "https://api.example.com/rec/RE1".into(),
        }
    }

    #[test]
    fn stored_record_roundtrips() {
        let store = store();
        let key = key("a1#1000");
        store.store_run(&key, &record(0.1)).unwrap();

        let back = store.get_run(&key).unwrap().unwrap();
        assert_eq!(back, record(0.1));
    }

    #[test]
    fn missing_record_is_none() {
        let store = store();
        assert!(store.get_run(&key("a1#9999")).unwrap().is_none());
    }

    #[test]
    fn second_store_overwrites_not_accumulates() {
        let store = store();
        let key = key("a1#1000");
        store.store_run(&key, &record(0.1)).unwrap();
        store.store_run(&key, &record(0.2)).unwrap();

        let back = store.get_run(&key).unwrap().unwrap();
        assert!((back.llm_cost - 0.2).abs() < 1e-9);

        let pool = &store.pool;
        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn records_are_isolated_per_run_key() {
        let store = store();
        store.store_run(&key("a1#1"), &record(0.1)).unwrap();
        store.store_run(&key("a1#2"), &record(0.2)).unwrap();

        assert!((store.get_run(&key("a1#1")).unwrap().unwrap().llm_cost - 0.1).abs() < 1e-9);
        assert!((store.get_run(&key("a1#2")).unwrap().unwrap().llm_cost - 0.2).abs() < 1e-9);
    }

    #[test]
    fn null_telephony_cost_roundtrips() {
        let store = store();
        let key = key("a1#1000");
        let mut rec = record(0.1);
        rec.telephony_cost = None;
        store.store_run(&key, &rec).unwrap();
        assert_eq!(store.get_run(&key).unwrap().unwrap().telephony_cost, None);
    }
}
