use thiserror::Error;

/// Errors returned by the density clustering pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Paired arrays (scores and weights, or rows of a 2-D array) disagree in length.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// The estimation strategy was handed an input of the wrong dimensionality.
    #[error("{method} estimation requires {expected} input")]
    ShapeMismatch {
        /// Strategy name as it appears in the configuration.
        method: &'static str,
        /// Required shape, e.g. "1-D" or "2-D weighted".
        expected: &'static str,
    },

    /// A score is NaN or infinite.
    #[error("non-finite value at index {index}")]
    NonFinite {
        /// Index into the flattened input.
        index: usize,
    },

    /// The density estimate cannot be formed from this input.
    #[error("degenerate input: {0}")]
    Degenerate(&'static str),

    /// The debug figure could not be written.
    #[error("figure export failed: {0}")]
    Figure(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
