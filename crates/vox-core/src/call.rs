//! Telephony call metadata.
//!
//! Read-only data fetched from the telephony provider after a call ends.
//! The provider owns these values; this crate only carries them.

use serde::{Deserialize, Serialize};

use crate::ids::CallId;

/// Metadata for one completed telephony call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallMetadata {
    /// Provider-assigned call identifier.
    pub call_id: CallId,
    /// Call duration in seconds.
    pub duration_secs: u32,
    /// Provider-reported price in USD. `None` until the provider rates
    /// the call.
    pub price: Option<f64>,
    /// Formatted destination number.
    pub to_number: String,
}

/// Reference to one recording of a call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingRef {
    /// Provider-assigned recording identifier.
    pub recording_id: String,
    /// URL the recording media can be downloaded from.
    pub media_url: String,
}
