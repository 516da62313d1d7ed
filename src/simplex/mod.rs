//! Label-free example importance (SimplEx)
//!
//! Reconstructs each query latent as a convex mixture of corpus latents:
//! - `projection` - exact Euclidean projection onto the probability simplex
//! - `decomposer` - projected gradient descent over the weight matrix
//! - `jacobian` - feature-level attribution of a converged decomposition

mod decomposer;
mod jacobian;
mod projection;

#[cfg(test)]
mod tests;

pub use decomposer::{CorpusDecomposer, Decomposition};
pub use jacobian::{project_features, project_top_features};
pub use projection::project_to_simplex;
