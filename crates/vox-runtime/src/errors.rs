//! Runtime error types.

/// Errors that can occur during run execution and settlement.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// A stage executor failed. Halts the pipeline at that index; results
    /// already yielded stand.
    #[error("stage {index} failed: {message}")]
    Stage {
        /// Index of the failed stage.
        index: usize,
        /// Error description from the executor.
        message: String,
    },

    /// Call or recording lookup returned nothing. Cost accounting must not
    /// proceed with incomplete data.
    #[error("call metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// Recording download or object-store write failed. Independent of cost
    /// accounting; reported to the caller, not merely logged.
    #[error("recording archive failed: {0}")]
    ArchiveUpload(String),

    /// Cost record could not be written to the run-metadata store.
    #[error("cost persistence failed: {0}")]
    Persistence(String),

    /// Operation was cancelled via abort/cancellation token.
    #[error("operation cancelled")]
    Cancelled,

    /// The run is already being tracked by the coordinator.
    #[error("run already active: {0}")]
    RunAlreadyActive(String),

    /// The coordinator is at its concurrent-run limit.
    #[error("at capacity: {current}/{max} runs active")]
    AtCapacity {
        /// Currently active runs.
        current: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Internal / unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RuntimeError {
    /// Whether the error is recoverable (caller can retry).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Cancelled | Self::AtCapacity { .. } | Self::RunAlreadyActive(_) => true,
            // Archival can be retried against the same recording URL.
            Self::ArchiveUpload(_) => true,
            Self::Stage { .. }
            | Self::MetadataUnavailable(_)
            | Self::Persistence(_)
            | Self::Internal(_) => false,
        }
    }

    /// Error category string for event emission and logs.
    pub fn category(&self) -> &str {
        match self {
            Self::Stage { .. } => "stage",
            Self::MetadataUnavailable(_) => "metadata_unavailable",
            Self::ArchiveUpload(_) => "archive_upload",
            Self::Persistence(_) => "persistence",
            Self::Cancelled => "cancelled",
            Self::RunAlreadyActive(_) => "run_already_active",
            Self::AtCapacity { .. } => "at_capacity",
            Self::Internal(_) => "internal",
        }
    }
}

/// Boxed error type stage executors are free to return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
