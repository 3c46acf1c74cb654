//! Provider wire types.
//!
//! The provider's REST dialect encodes numerics as strings (`"duration":
//! "93"`, `"price": "-0.01300"`) and omits them while a call is still in
//! progress or unrated. These types capture the wire shape verbatim and
//! convert into the domain types from `vox-core`.

use serde::Deserialize;

use vox_core::call::{CallMetadata, RecordingRef};
use vox_core::ids::CallId;

use crate::errors::{Result, TelephonyError};

/// One call resource as returned by `GET .../Calls/{sid}.json`.
#[derive(Debug, Deserialize)]
pub struct CallResource {
    /// Call SID.
    pub sid: String,
    /// Duration in seconds, string-encoded; absent while in progress.
    pub duration: Option<String>,
    /// Price in USD, string-encoded; absent until the call is rated.
    pub price: Option<String>,
    /// Formatted destination number.
    pub to_formatted: Option<String>,
}

impl CallResource {
    /// Convert into domain metadata.
    ///
    /// A missing duration means the call has not ended — settlement must
    /// not proceed, so that is a decode failure here rather than a zero.
    pub fn into_metadata(self) -> Result<CallMetadata> {
        let duration = self
            .duration
            .ok_or_else(|| TelephonyError::Decode(format!("call {} has no duration", self.sid)))?;
        let duration_secs = duration.parse::<u32>().map_err(|_| {
            TelephonyError::Decode(format!("call {}: bad duration {duration:?}", self.sid))
        })?;

        let price = match &self.price {
            None => None,
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
                TelephonyError::Decode(format!("call {}: bad price {raw:?}", self.sid))
            })?),
        };

        Ok(CallMetadata {
            call_id: CallId::from(self.sid.as_str()),
            duration_secs,
            price,
            to_number: self.to_formatted.unwrap_or_default(),
        })
    }
}

/// Envelope for `GET .../Recordings.json?CallSid=...`.
#[derive(Debug, Deserialize)]
pub struct RecordingPage {
    /// Recordings for the requested call.
    pub recordings: Vec<RecordingResource>,
}

/// One recording resource.
#[derive(Debug, Deserialize)]
pub struct RecordingResource {
    /// Recording SID.
    pub sid: String,
    /// Resource URI, relative to the API host, ending in `.json`.
    pub uri: String,
}

impl RecordingResource {
    /// Convert into a domain reference with an absolute media URL.
    ///
    /// The provider serves media at the resource URI with the `.json`
    /// suffix swapped for the media format.
    pub fn into_ref(self, base_url: &str) -> RecordingRef {
        let path = self.uri.trim_end_matches(".json");
        RecordingRef {
            recording_id: self.sid,
            media_url: format!("{}{}.mp3", base_url.trim_end_matches('/'), path),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
