//! Branded ID newtypes for type safety.
//!
//! Every entity in the Vox system has a distinct ID type implemented as a
//! newtype wrapper around `String`. This prevents accidentally passing an
//! assistant ID where a call SID is expected.
//!
//! Generated IDs ([`UserId`], [`AssistantId`]) are UUID v7 (time-ordered) via
//! [`uuid::Uuid::now_v7`]. [`RunId`] is different: it is *derived* from the
//! assistant ID plus a millisecond wall-clock timestamp, exactly once per run.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generate a new UUID v7 string (time-ordered).
fn new_v7() -> String {
    Uuid::now_v7().to_string()
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID (UUID v7, time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(new_v7())
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

branded_id! {
    /// Unique identifier for an end user (account owner).
    UserId
}

branded_id! {
    /// Unique identifier for a configured assistant.
    AssistantId
}

branded_id! {
    /// Provider-assigned identifier for a telephony call.
    CallId
}

/// Identifier for one end-to-end run of an assistant's task list.
///
/// Rendered as `"<assistant_id>#<created_at_ms>"`. The millisecond timestamp
/// keeps simultaneously triggered runs of the same assistant apart with high
/// probability; two runs started within the same millisecond collide. That is
/// a documented limitation, not a correctness guarantee this type enforces.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Derive a run ID for `assistant_id` at the current wall-clock time.
    ///
    /// Computed exactly once per run, at orchestrator construction.
    #[must_use]
    pub fn derive(assistant_id: &AssistantId) -> Self {
        Self::derive_at(assistant_id, now_ms())
    }

    /// Derive a run ID at an explicit millisecond timestamp.
    #[must_use]
    pub fn derive_at(assistant_id: &AssistantId, created_at_ms: i64) -> Self {
        Self(format!("{assistant_id}#{created_at_ms}"))
    }

    /// Return the inner string as a slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The assistant portion of the ID (everything before the `#`).
    #[must_use]
    pub fn assistant_part(&self) -> &str {
        self.0.split_once('#').map_or(self.0.as_str(), |(a, _)| a)
    }

    /// The creation timestamp in milliseconds, if the ID is well-formed.
    #[must_use]
    pub fn timestamp_ms(&self) -> Option<i64> {
        self.0.split_once('#').and_then(|(_, ts)| ts.parse().ok())
    }
}

impl AsRef<str> for RunId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RunId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<RunId> for String {
    fn from(id: RunId) -> Self {
        id.0
    }
}

/// Composite persistence key for a run: `(user_id, assistant_id, run_id)`.
///
/// Cost records and archived recordings are keyed by this triple.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunKey {
    /// Owning user.
    pub user_id: UserId,
    /// Assistant the run executed.
    pub assistant_id: AssistantId,
    /// The run itself.
    pub run_id: RunId,
}

impl RunKey {
    /// Create a new run key.
    #[must_use]
    pub fn new(user_id: UserId, assistant_id: AssistantId, run_id: RunId) -> Self {
        Self {
            user_id,
            assistant_id,
            run_id,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
