//! Label-free feature importance
//!
//! Turns a vector-valued representation-attribution problem into `d` scalar
//! attribution problems, one per latent dimension, and recombines the results.

mod auxiliary;

pub use auxiliary::{Aggregation, AuxiliaryAttributor};
