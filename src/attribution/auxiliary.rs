//! Auxiliary-target attribution wrapper

use crate::error::{Error, Result};
use crate::model::{Encoder, ScalarAttributor};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// How the `d` per-dimension feature maps are combined into one map per input.
///
/// The default is plain summation with no normalisation: every latent
/// dimension contributes additively and is treated as equally important.
/// Callers needing scale-invariant importance can use [`Aggregation::Mean`]
/// or fold the per-dimension maps themselves through
/// [`AuxiliaryAttributor::attribute_folded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// Sum the per-dimension maps (the documented default).
    #[default]
    Sum,
    /// Sum, then divide by the latent dimension `d`.
    Mean,
}

/// Feature importance for a label-free encoder.
///
/// For each latent dimension `k`, the encoder output `encode(x)[k]` becomes a
/// scalar surrogate objective that is handed to the injected
/// [`ScalarAttributor`]; the per-dimension feature maps are then aggregated
/// into one importance map per input. The wrapper holds no state across
/// batches, so calls are independent and data-parallel.
///
/// Cost is dominated by the `d` invocations of the primitive; each invocation
/// is batched across all inputs for a fixed dimension.
pub struct AuxiliaryAttributor<E, A> {
    encoder: E,
    method: A,
    aggregation: Aggregation,
}

impl<E: Encoder, A: ScalarAttributor> AuxiliaryAttributor<E, A> {
    /// Wrap an encoder and a scalar-attribution primitive.
    pub fn new(encoder: E, method: A) -> Self {
        Self {
            encoder,
            method,
            aggregation: Aggregation::Sum,
        }
    }

    /// Select the aggregation applied by [`attribute`](Self::attribute).
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// The wrapped encoder.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// One aggregated feature map per input, same shape as `inputs`.
    ///
    /// # Arguments
    /// * `inputs` - `(batch, features)` input batch
    /// * `baseline` - single reference input of width `features`, required by
    ///   gradient-integration style primitives
    pub fn attribute(
        &self,
        inputs: ArrayView2<f32>,
        baseline: ArrayView1<f32>,
    ) -> Result<Array2<f32>> {
        let d = self.encoder.latent_dim();
        let summed = self.attribute_folded(
            inputs,
            baseline,
            Array2::zeros(inputs.raw_dim()),
            |mut acc, _k, map| {
                acc += &map;
                acc
            },
        )?;
        match self.aggregation {
            Aggregation::Sum => Ok(summed),
            Aggregation::Mean if d == 0 => Ok(summed),
            Aggregation::Mean => Ok(summed / d as f32),
        }
    }

    /// Fold over the lazy `(dimension, feature map)` sequence.
    ///
    /// Maps are produced one latent dimension at a time and handed to `fold`,
    /// so all `d` intermediates never live simultaneously. This is also the
    /// extension point for custom aggregations. Any failure aborts the fold;
    /// no partial aggregate is returned.
    pub fn attribute_folded<T, F>(
        &self,
        inputs: ArrayView2<f32>,
        baseline: ArrayView1<f32>,
        init: T,
        mut fold: F,
    ) -> Result<T>
    where
        F: FnMut(T, usize, Array2<f32>) -> T,
    {
        if baseline.len() != inputs.ncols() {
            return Err(Error::shape_mismatch(
                "attribution baseline",
                vec![inputs.ncols()],
                vec![baseline.len()],
            ));
        }

        let d = self.encoder.latent_dim();
        let mut acc = init;
        for k in 0..d {
            let encoder = &self.encoder;
            let scalar_fn = move |batch: ArrayView2<f32>| {
                let latents = encoder.encode(batch)?;
                if latents.ncols() != d {
                    return Err(Error::shape_mismatch(
                        "encoder latents",
                        vec![d],
                        vec![latents.ncols()],
                    ));
                }
                Ok(latents.column(k).to_owned())
            };
            let map = self.method.attribute(&scalar_fn, inputs, baseline)?;
            if map.shape() != inputs.shape() {
                return Err(Error::shape_mismatch(
                    "feature map",
                    inputs.shape().to_vec(),
                    map.shape().to_vec(),
                ));
            }
            acc = fold(acc, k, map);
        }
        Ok(acc)
    }
}
