//! Jacobian projection of a converged decomposition
//!
//! Once the weight matrix is frozen, a highly-weighted corpus example can be
//! explained further: which of *its* input features drove the reconstruction?
//! The answer is the gradient of the per-query reconstruction error with
//! respect to that corpus example's inputs, pulled back through the encoder.

use super::decomposer::Decomposition;
use crate::error::{Error, Result};
use crate::model::DifferentiableEncoder;
use ndarray::{s, Array1, ArrayView2, Axis};

/// Feature-level attribution of corpus example `corpus_idx` for query
/// `query_idx`, holding the converged weights fixed.
///
/// For reconstruction `R_i = Σ_j W[i,j]·encode(c_j)` and residual
/// `r_i = R_i − H_{Q,i}`, the gradient of `‖r_i‖²` with respect to the inputs
/// of corpus example `j` is `2·W[i,j] · J_encode(c_j)ᵀ·r_i` — a single
/// vector-jacobian product with cotangent `2·W[i,j]·r_i`.
///
/// The returned map has the shape of one corpus input; its magnitude scales
/// with the example's weight, so examples the decomposition ignores get
/// near-zero maps.
pub fn project_features<E: DifferentiableEncoder>(
    encoder: &E,
    decomposition: &Decomposition,
    corpus: ArrayView2<f32>,
    query_idx: usize,
    corpus_idx: usize,
) -> Result<Array1<f32>> {
    if query_idx >= decomposition.n_queries() {
        return Err(Error::IndexOutOfBounds {
            what: "query",
            index: query_idx,
            len: decomposition.n_queries(),
        });
    }
    if corpus_idx >= decomposition.corpus_size() {
        return Err(Error::IndexOutOfBounds {
            what: "corpus",
            index: corpus_idx,
            len: decomposition.corpus_size(),
        });
    }
    if corpus.nrows() != decomposition.corpus_size() {
        return Err(Error::shape_mismatch(
            "corpus inputs",
            vec![decomposition.corpus_size()],
            vec![corpus.nrows()],
        ));
    }

    let weight = decomposition.weights()[[query_idx, corpus_idx]];
    let residual = decomposition.residual(query_idx);
    let cotangent = residual.mapv(|r| 2.0 * weight * r);

    let input_row = corpus.slice(s![corpus_idx..corpus_idx + 1, ..]);
    let cotangent_row = cotangent.insert_axis(Axis(0));
    let grads = encoder.encode_vjp(input_row, cotangent_row.view())?;
    Ok(grads.row(0).to_owned())
}

/// Feature maps for the `k` top-weighted corpus examples of one query, as
/// `(corpus index, weight, feature map)` triples in descending weight order.
pub fn project_top_features<E: DifferentiableEncoder>(
    encoder: &E,
    decomposition: &Decomposition,
    corpus: ArrayView2<f32>,
    query_idx: usize,
    k: usize,
) -> Result<Vec<(usize, f32, Array1<f32>)>> {
    let top = decomposition.top_examples(query_idx, k)?;
    let mut maps = Vec::with_capacity(top.len());
    for (corpus_idx, weight) in top {
        let map = project_features(encoder, decomposition, corpus, query_idx, corpus_idx)?;
        maps.push((corpus_idx, weight, map));
    }
    Ok(maps)
}
