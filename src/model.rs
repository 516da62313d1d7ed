//! Injected model capabilities
//!
//! The crate owns no architectures and trains nothing. Everything it needs
//! from the outside world is expressed as three small traits:
//!
//! - [`Encoder`] - maps a batch of inputs to a batch of latent vectors
//! - [`DifferentiableEncoder`] - adds a vector-jacobian product, needed only
//!   by the feature-projection step of the corpus decomposition
//! - [`ScalarAttributor`] - an external scalar-attribution primitive
//!   (integrated gradients, gradient SHAP, saliency, ...)
//!
//! [`LinearEncoder`] is a concrete reference encoder with a closed-form VJP,
//! mainly for tests and examples.

use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// A scalar surrogate objective: maps a batch of inputs to one real number
/// per input. Scalar-attribution primitives receive these, never the raw
/// vector-valued encoder.
pub type ScalarFn<'a> = dyn Fn(ArrayView2<f32>) -> Result<Array1<f32>> + 'a;

/// A label-free encoder producing fixed-width latent vectors.
///
/// `encode` must be deterministic for fixed model parameters and produce the
/// same latent width (`latent_dim`) on every call within a session. Inputs
/// are flattened feature vectors, one row per example.
pub trait Encoder {
    /// Width `d` of the latent vectors this encoder produces.
    fn latent_dim(&self) -> usize;

    /// Encode a `(batch, features)` input batch into a `(batch, d)` latent batch.
    fn encode(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>>;
}

/// An encoder that can pull cotangents back through itself.
///
/// Required only by the jacobian feature projection. Given inputs `x` (one
/// row per example) and cotangents `u` of shape `(batch, d)`, `encode_vjp`
/// returns `u · J_encode(x)` row by row, i.e. the gradient of `<u_i, encode(x_i)>`
/// with respect to `x_i`. How the product is computed (tape, adjoint code,
/// finite differences) is the implementor's business.
pub trait DifferentiableEncoder: Encoder {
    /// Vector-jacobian product of the encoder at `inputs`, shape `(batch, features)`.
    fn encode_vjp(
        &self,
        inputs: ArrayView2<f32>,
        cotangents: ArrayView2<f32>,
    ) -> Result<Array2<f32>>;
}

/// An external scalar-attribution primitive.
///
/// `scalar_fn` maps one input to one real number (batched across inputs);
/// `baseline` is a single reference input required by gradient-integration
/// style methods. The returned feature maps have the same shape as `inputs`.
/// The primitive is treated as a pure function: same arguments, same maps.
pub trait ScalarAttributor {
    /// Attribute `scalar_fn` over a batch of inputs against one baseline.
    fn attribute(
        &self,
        scalar_fn: &ScalarFn<'_>,
        inputs: ArrayView2<f32>,
        baseline: ArrayView1<f32>,
    ) -> Result<Array2<f32>>;
}

/// Reference encoder: `encode(x) = x · Wᵀ` for a fixed `(d, features)` matrix.
///
/// Exists so the crate is exercisable end to end without an external model;
/// real deployments wrap their own trained encoder instead.
#[derive(Debug, Clone)]
pub struct LinearEncoder {
    weights: Array2<f32>,
}

impl LinearEncoder {
    /// Create an encoder from a `(d, features)` weight matrix.
    pub fn new(weights: Array2<f32>) -> Self {
        Self { weights }
    }

    /// Identity encoder of the given width: latents equal inputs.
    pub fn identity(dim: usize) -> Self {
        Self {
            weights: Array2::eye(dim),
        }
    }

    /// The weight matrix.
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    fn check_input_width(&self, inputs: &ArrayView2<f32>) -> Result<()> {
        if inputs.ncols() != self.weights.ncols() {
            return Err(Error::shape_mismatch(
                "encoder input features",
                vec![self.weights.ncols()],
                vec![inputs.ncols()],
            ));
        }
        Ok(())
    }
}

impl Encoder for LinearEncoder {
    fn latent_dim(&self) -> usize {
        self.weights.nrows()
    }

    fn encode(&self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.check_input_width(&inputs)?;
        Ok(inputs.dot(&self.weights.t()))
    }
}

impl DifferentiableEncoder for LinearEncoder {
    fn encode_vjp(
        &self,
        inputs: ArrayView2<f32>,
        cotangents: ArrayView2<f32>,
    ) -> Result<Array2<f32>> {
        self.check_input_width(&inputs)?;
        if cotangents.ncols() != self.latent_dim() || cotangents.nrows() != inputs.nrows() {
            return Err(Error::shape_mismatch(
                "VJP cotangents",
                vec![inputs.nrows(), self.latent_dim()],
                vec![cotangents.nrows(), cotangents.ncols()],
            ));
        }
        // d(x·Wᵀ)/dx is W, so the pullback of u is u·W.
        Ok(cotangents.dot(&self.weights))
    }
}
