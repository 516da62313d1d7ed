//! Error types with actionable diagnostics.
//!
//! All errors carry enough context to resolve the problem without consulting
//! external documentation, and are raised synchronously at the call that first
//! detects the violated precondition. No partial results are returned on error.

use thiserror::Error;

/// Result type alias for explicar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while explaining a latent representation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Latent or input dimensionality disagreement.
    #[error("shape mismatch in {context}: expected {expected:?}, got {actual:?}\n  → check that corpus, queries and baseline all match the encoder's input and latent widths")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Decomposition requested against an empty corpus.
    #[error("corpus is empty\n  → provide at least one reference example before fitting a decomposition")]
    EmptyCorpus,

    /// The optimization loss went non-finite.
    #[error("non-finite loss {loss} at optimization step {step}\n  → lower the learning rate or rescale the encoder's latents")]
    NumericalInstability { step: usize, loss: f32 },

    /// A query or corpus index outside the fitted decomposition.
    #[error("{what} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Configuration value is invalid.
    #[error("invalid configuration value for '{field}': {message}")]
    Config { field: String, message: String },
}

impl Error {
    /// Shape-mismatch constructor; keeps call sites terse.
    pub fn shape_mismatch(
        context: impl Into<String>,
        expected: Vec<usize>,
        actual: Vec<usize>,
    ) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ShapeMismatch { .. } => "E010",
            Self::EmptyCorpus => "E011",
            Self::IndexOutOfBounds { .. } => "E012",
            Self::NumericalInstability { .. } => "E020",
            Self::Config { .. } => "E001",
        }
    }
}
