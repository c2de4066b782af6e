//! Error types shared by all constructs in this crate.

use thiserror::Error;

/// Errors produced while building bases and Hamiltonians, evaluating
/// observables, or propagating states.
#[derive(Debug, Error)]
pub enum IsingError {
    /// A model parameter (chain length, field strength, time) is out of its
    /// valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An argument violates a caller-side precondition (length mismatch,
    /// unnormalized state, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested basis or matrix would exceed the configured size guard.
    #[error("resource limit exceeded: {what} requires {required} bytes, limit is {limit} bytes")]
    ResourceExceeded {
        what: &'static str,
        required: u128,
        limit: usize,
    },

    /// An internal numerical invariant failed to hold.
    #[error("numeric invariant violated: {0}")]
    NumericInvariantViolation(String),

    /// The external eigensolver reported an error.
    #[error("solver failure: {0}")]
    SolverFailure(#[from] ndarray_linalg::error::LinalgError),

    /// Filesystem error while writing output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while writing an `.npz` archive.
    #[error("output error: {0}")]
    Output(#[from] ndarray_npy::WriteNpzError),
}

/// Result type for everything in this crate.
pub type IsingResult<T> = Result<T, IsingError>;
