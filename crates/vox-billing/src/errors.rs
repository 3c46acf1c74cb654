//! Error types for cost accounting.

use thiserror::Error;

/// Errors that can occur during cost accounting.
#[derive(Debug, Error)]
pub enum BillingError {
    /// The byte-pair encoder could not be constructed.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// The cost record could not be written to the run-metadata store.
    ///
    /// Never swallowed: a run with unrecorded cost is a silent billing gap.
    #[error("persistence error: {0}")]
    Persistence(#[from] vox_store::errors::StoreError),
}

/// Convenience type alias for billing results.
pub type Result<T> = std::result::Result<T, BillingError>;
