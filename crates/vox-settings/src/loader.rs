//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`VoxSettings::default()`]
//! 2. If `~/.vox/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::VoxSettings;

/// Resolve the path to the settings file (`~/.vox/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".vox").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<VoxSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<VoxSettings> {
    let defaults = serde_json::to_value(VoxSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: VoxSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Each env var has strict parsing rules:
/// - Numbers must be valid and within the specified range
/// - Invalid values are silently ignored (fall back to file/default)
pub fn apply_env_overrides(settings: &mut VoxSettings) {
    // ── Telephony ───────────────────────────────────────────────────
    if let Some(v) = read_env_string("VOX_TELEPHONY_BASE_URL") {
        settings.telephony.base_url = v;
    }
    if let Some(v) = read_env_string("VOX_TELEPHONY_ACCOUNT_SID") {
        settings.telephony.account_sid = v;
    }
    if let Some(v) = read_env_string("VOX_TELEPHONY_AUTH_TOKEN") {
        settings.telephony.auth_token = v;
    }

    // ── Storage ─────────────────────────────────────────────────────
    if let Some(v) = read_env_string("VOX_RUNS_DB") {
        settings.storage.runs_db_path = v;
    }
    if let Some(v) = read_env_string("VOX_RECORDINGS_DIR") {
        settings.storage.recordings_dir = v;
    }
    if let Some(v) = read_env_string("VOX_RECORDINGS_BUCKET") {
        settings.storage.recordings_bucket = v;
    }

    // ── Billing ─────────────────────────────────────────────────────
    if let Some(v) = read_env_f64("VOX_LLM_INPUT_PER_TOKEN", 0.0, 1.0) {
        settings.billing.llm_input_per_token = v;
    }
    if let Some(v) = read_env_f64("VOX_LLM_OUTPUT_PER_TOKEN", 0.0, 1.0) {
        settings.billing.llm_output_per_token = v;
    }
    if let Some(v) = read_env_f64("VOX_TRANSCRIPTION_PER_MINUTE", 0.0, 10.0) {
        settings.billing.transcription_per_minute = v;
    }
    if let Some(v) = read_env_f64("VOX_TTS_PER_MILLION_CHARS", 0.0, 10_000.0) {
        settings.billing.character_synthesis_per_million_chars = v;
    }

    // ── Runtime ─────────────────────────────────────────────────────
    if let Some(v) = read_env_usize("VOX_MAX_CONCURRENT_RUNS", 1, 10_000) {
        settings.runtime.max_concurrent_runs = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as an `f64` within an inclusive range.
pub fn parse_f64_range(val: &str, min: f64, max: f64) -> Option<f64> {
    let n: f64 = val.parse().ok()?;
    (n.is_finite() && n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within an inclusive range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_f64(name: &str, min: f64, max: f64) -> Option<f64> {
    let val = std::env::var(name).ok()?;
    let result = parse_f64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid f64 env var, ignoring");
    }
    result
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // ── deep_merge ───────────────────────────────────────────────────────

    #[test]
    fn merge_disjoint_keys() {
        let merged = deep_merge(
            serde_json::json!({"a": 1}),
            serde_json::json!({"b": 2}),
        );
        assert_eq!(merged, serde_json::json!({"a": 1, "b": 2}));
    }

    #[test]
    fn merge_nested_objects_recursively() {
        let merged = deep_merge(
            serde_json::json!({"telephony": {"base_url": "x", "account_sid": ""}}),
            serde_json::json!({"telephony": {"account_sid": "AC1"}}),
        );
        assert_eq!(merged["telephony"]["base_url"], "x");
        assert_eq!(merged["telephony"]["account_sid"], "AC1");
    }

    #[test]
    fn merge_skips_null_source_values() {
        let merged = deep_merge(
            serde_json::json!({"a": 1}),
            serde_json::json!({"a": null}),
        );
        assert_eq!(merged["a"], 1);
    }

    #[test]
    fn merge_replaces_arrays_entirely() {
        let merged = deep_merge(
            serde_json::json!({"a": [1, 2, 3]}),
            serde_json::json!({"a": [9]}),
        );
        assert_eq!(merged["a"], serde_json::json!([9]));
    }

    // ── parsers ──────────────────────────────────────────────────────────

    #[test]
    fn parse_f64_accepts_in_range() {
        assert_eq!(parse_f64_range("0.002", 0.0, 1.0), Some(0.002));
    }

    #[test]
    fn parse_f64_rejects_out_of_range_and_garbage() {
        assert_eq!(parse_f64_range("2.0", 0.0, 1.0), None);
        assert_eq!(parse_f64_range("NaN", 0.0, 1.0), None);
        assert_eq!(parse_f64_range("abc", 0.0, 1.0), None);
    }

    #[test]
    fn parse_usize_range_bounds_inclusive() {
        assert_eq!(parse_usize_range("1", 1, 10), Some(1));
        assert_eq!(parse_usize_range("10", 1, 10), Some(10));
        assert_eq!(parse_usize_range("11", 1, 10), None);
        assert_eq!(parse_usize_range("-1", 1, 10), None);
    }

    // ── file loading ─────────────────────────────────────────────────────

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from_path(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, VoxSettings::default());
    }

    #[test]
    fn user_file_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"billing": {{"llm_output_per_token": 0.004}}, "storage": {{"recordings_bucket": "prod"}}}}"#
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert!((settings.billing.llm_output_per_token - 0.004).abs() < 1e-12);
        assert!((settings.billing.llm_input_per_token - 0.0010).abs() < 1e-12);
        assert_eq!(settings.storage.recordings_bucket, "prod");
        assert_eq!(settings.storage.recordings_dir, "recordings");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(load_settings_from_path(&path).is_err());
    }
}
