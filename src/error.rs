//! Error types in BASWE
//!

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    /// The two oversampled class lists must have the same length to be interleaved. This
    /// happens in particular while one of the class windows is still empty.
    #[error("cannot merge class windows of different lengths ({first} and {second})")]
    ImbalancedWindows { first: usize, second: usize },
    #[error("only binary targets are supported, but got label {0}")]
    InvalidLabel(usize),
    #[error("expected {expected} features, but instance has {found}")]
    FeatureCount { expected: usize, found: usize },
    #[error("mismatched shapes: {0} predictions for {1} targets")]
    MismatchedShapes(usize, usize),
}
