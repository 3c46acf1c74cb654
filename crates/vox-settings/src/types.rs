//! Settings type definitions with compiled defaults.
//!
//! Every field carries `#[serde(default)]` so partial user files merge
//! cleanly over the defaults.

use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxSettings {
    /// Telephony provider access.
    pub telephony: TelephonySettings,
    /// Durable storage locations.
    pub storage: StorageSettings,
    /// Billing rate overrides.
    pub billing: BillingSettings,
    /// Runtime limits.
    pub runtime: RuntimeSettings,
}

/// Telephony provider credentials and endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelephonySettings {
    /// Provider REST base URL.
    pub base_url: String,
    /// Account SID used for both routing and basic auth.
    pub account_sid: String,
    /// Auth token paired with the account SID.
    pub auth_token: String,
}

impl Default for TelephonySettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.twilio.com".to_string(),
            account_sid: String::new(),
            auth_token: String::new(),
        }
    }
}

/// Durable storage locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Path to the SQLite run-metadata database.
    pub runs_db_path: String,
    /// Root directory for the filesystem object store.
    pub recordings_dir: String,
    /// Bucket name recordings are archived under.
    pub recordings_bucket: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            runs_db_path: "vox-runs.db".to_string(),
            recordings_dir: "recordings".to_string(),
            recordings_bucket: "vox".to_string(),
        }
    }
}

/// Billing unit rates, all USD.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingSettings {
    /// Language-model input price per token.
    pub llm_input_per_token: f64,
    /// Language-model output price per token.
    pub llm_output_per_token: f64,
    /// Speech-to-text price per minute of call audio.
    pub transcription_per_minute: f64,
    /// Character-billed synthesis price per million characters.
    pub character_synthesis_per_million_chars: f64,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            llm_input_per_token: 0.0010,
            llm_output_per_token: 0.0020,
            transcription_per_minute: 0.0043,
            character_synthesis_per_million_chars: 16.0,
        }
    }
}

/// Runtime limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Maximum number of runs executing concurrently in this process.
    pub max_concurrent_runs: usize,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            max_concurrent_runs: 64,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
