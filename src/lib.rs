//! explicar — label-free explainability for latent representations
//!
//! Supervised attribution methods explain a scalar prediction. An unsupervised
//! encoder produces a whole latent vector with no privileged scalar to attribute,
//! so those methods do not apply directly. This crate provides the two adapters
//! that close the gap:
//!
//! - [`AuxiliaryAttributor`] - wraps any scalar-attribution primitive so it can
//!   attribute an entire latent representation: one scalar surrogate per latent
//!   dimension, aggregated into a single feature-importance map per input.
//! - [`CorpusDecomposer`] - learns non-negative, sum-to-one weights that
//!   reconstruct each query latent as a convex mixture of corpus latents
//!   (SimplEx), then optionally projects the converged decomposition back to
//!   input-feature space through the encoder jacobian.
//!
//! Encoders and attribution primitives are injected capabilities (the
//! [`Encoder`], [`DifferentiableEncoder`] and [`ScalarAttributor`] traits);
//! this crate trains nothing and owns no model architecture.
//!
//! # Example
//!
//! ```
//! use explicar::{CorpusDecomposer, LinearEncoder, SimplexConfig};
//! use ndarray::array;
//!
//! let encoder = LinearEncoder::identity(2);
//! let corpus = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
//! let queries = array![[1.0, 1.0]];
//!
//! let decomposer = CorpusDecomposer::new(&encoder, SimplexConfig::default())?;
//! let decomposition = decomposer.fit(corpus.view(), queries.view())?;
//!
//! // The third corpus point reconstructs the query exactly.
//! assert!(decomposition.final_loss() < 1e-3);
//! assert!(decomposition.weight_row(0)[2] > 0.9);
//! # Ok::<(), explicar::Error>(())
//! ```

pub mod attribution;
pub mod config;
pub mod error;
pub mod model;
pub mod simplex;

pub use attribution::{Aggregation, AuxiliaryAttributor};
pub use config::{Device, SimplexConfig};
pub use error::{Error, Result};
pub use model::{DifferentiableEncoder, Encoder, LinearEncoder, ScalarAttributor, ScalarFn};
pub use simplex::{
    project_features, project_to_simplex, project_top_features, CorpusDecomposer, Decomposition,
};
