//! Errors in the library.
use std::path::PathBuf;
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum RolloutError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The checkpoint file does not exist.
    #[error("Checkpoint not found: {0:?}")]
    CheckpointNotFound(PathBuf),

    /// The companion configuration file was found neither next to the checkpoint
    /// nor in its parent directory.
    #[error("Could not find {file_name} in either the checkpoint dir or its parent directory: {checkpoint:?}")]
    ConfigNotFound {
        /// Checkpoint given by the caller.
        checkpoint: PathBuf,
        /// Name of the configuration file looked up.
        file_name: String,
    },

    /// The checkpoint does not fit the runtime reconstructed from the configuration.
    #[error("Failed to restore checkpoint: {0}")]
    CheckpointRestore(String),

    /// Unknown algorithm identifier.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Option accepted by the configuration but not supported.
    #[error("{0} not implemented yet")]
    NotImplemented(String),

    /// An observation did not contain a declared key.
    #[error("Observation key missing: {0}")]
    MissingObsKey(String),

    /// The number of per-slot values does not match the batch size.
    #[error("Batch size mismatch: expected {expected}, got {got}")]
    BatchSizeMismatch {
        /// Batch size.
        expected: usize,
        /// Length of the given values.
        got: usize,
    },

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The environment construction lock was poisoned by a panicking thread.
    #[error("Environment construction lock poisoned")]
    GuardPoisoned,
}
