//! SQL DDL for the run-metadata tables.
//!
//! One row per run, keyed by `(user_id, assistant_id, run_id)`. The cost
//! columns mirror the [`CostRecord`] fields; `created_at`/`updated_at`
//! track upsert history.
//!
//! [`CostRecord`]: vox_core::cost::CostRecord

use rusqlite::Connection;

use crate::errors::Result;

/// Run all run-metadata migrations.
///
/// Idempotent — safe to call multiple times (uses `IF NOT EXISTS`).
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(RUNS_SCHEMA)?;
    Ok(())
}

/// Combined DDL for the run-metadata tables.
const RUNS_SCHEMA: &str = r"
-- Per-run cost records
CREATE TABLE IF NOT EXISTS runs (
    user_id TEXT NOT NULL,
    assistant_id TEXT NOT NULL,
    run_id TEXT NOT NULL,
    telephony_cost REAL,
    transcription_cost REAL NOT NULL,
    llm_cost REAL NOT NULL,
    tts_cost REAL NOT NULL,
    duration_secs INTEGER NOT NULL,
    to_number TEXT NOT NULL,
    recording_url TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (user_id, assistant_id, run_id)
);

CREATE INDEX IF NOT EXISTS idx_runs_assistant_created
    ON runs(assistant_id, created_at);
";

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
