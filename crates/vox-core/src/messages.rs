//! Chat transcript types.
//!
//! A run accumulates a conversation transcript as stages execute. The cost
//! engine walks this transcript to reconstruct language-model input billing,
//! so the shape is deliberately minimal: a role plus flat text content.

use serde::{Deserialize, Serialize};

/// Speaker role for one transcript turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// Prompt scaffolding injected by the platform.
    System,
    /// The human caller.
    User,
    /// The language model.
    Assistant,
}

/// One turn of a run's conversation transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who produced this turn.
    pub role: ChatRole,
    /// Flat text content of the turn.
    pub content: String,
}

impl ChatMessage {
    /// Build a `system` turn.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Build a `user` turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Build an `assistant` turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
