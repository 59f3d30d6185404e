use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by model construction, training, data loading, and the
/// hyperparameter sweep. None of these are retried; every one propagates.
#[derive(Debug, Error)]
pub enum Error {
    /// Unsupported activation name or malformed hyperparameter value.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Batch dimensions inconsistent with the stored parameter shapes.
    #[error("shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Dataset file missing, unreadable, or malformed.
    #[error("data source error at {}: {reason}", .path.display())]
    DataSource { path: PathBuf, reason: String },

    /// Failure writing the persisted parameter record.
    #[error("failed to persist parameters to {}: {reason}", .path.display())]
    Persist { path: PathBuf, reason: String },

    /// A sweep configuration failed; identifies the configuration and the
    /// stage (construction, training, evaluation) so the diagnostic names
    /// exactly where the run aborted.
    #[error(
        "hidden size {hidden_size}, activation {activation}, regularization strength \
         {regularization_strength}: {stage} failed: {source}"
    )]
    Sweep {
        hidden_size: usize,
        activation: String,
        regularization_strength: f32,
        stage: &'static str,
        source: Box<Error>,
    },
}
