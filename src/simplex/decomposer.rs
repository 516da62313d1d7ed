//! Corpus decomposition by projected gradient descent

use super::projection::project_to_simplex;
use crate::config::SimplexConfig;
use crate::error::{Error, Result};
use crate::model::Encoder;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Learns the best convex reconstruction of each query latent in terms of
/// corpus latents (SimplEx).
///
/// Given a corpus `C` of `n` reference inputs and `m` query inputs, `fit`
/// optimizes an `m × n` weight matrix `W` so that `W · encode(C)` matches
/// `encode(Q)` under squared error, with every row of `W` constrained to the
/// probability simplex. Optimizing inside the convex hull of the corpus
/// latents keeps the reconstruction interpretable as "query ≈ mixture of
/// these corpus points".
///
/// The corpus and query latents are treated as constants: no gradient flows
/// into the encoder, only the mixture weights move.
pub struct CorpusDecomposer<'a, E: Encoder> {
    encoder: &'a E,
    config: SimplexConfig,
}

impl<'a, E: Encoder> CorpusDecomposer<'a, E> {
    /// Create a decomposer over a fixed encoder, validating the config.
    pub fn new(encoder: &'a E, config: SimplexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { encoder, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &SimplexConfig {
        &self.config
    }

    /// Fit the weight matrix for a `(n, features)` corpus and a
    /// `(m, features)` query batch.
    ///
    /// The weight matrix starts at the uniform distribution (`1/n`
    /// everywhere), which satisfies the simplex constraint from step zero and
    /// makes the run deterministic. Each step:
    /// 1. reconstruction `R = W · H_C`
    /// 2. loss `L = Σ ‖R − H_Q‖² / m`
    /// 3. analytic gradient `∂L/∂W = 2/m · (R − H_Q) · H_Cᵀ`
    /// 4. descent step with the configured learning rate
    /// 5. per-row projection back onto the simplex
    ///
    /// All rows iterate together for the full budget (or until the global
    /// loss improvement drops below `tol`, when enabled); there is no per-row
    /// early stopping. Non-convergence within the budget is not an error: the
    /// best matrix observed is returned, with its loss exposed so the caller
    /// can decide whether to re-run with a larger budget.
    ///
    /// An empty query batch yields an empty decomposition with zero loss.
    pub fn fit(
        &self,
        corpus: ArrayView2<f32>,
        queries: ArrayView2<f32>,
    ) -> Result<Decomposition> {
        let n = corpus.nrows();
        if n == 0 {
            return Err(Error::EmptyCorpus);
        }
        if corpus.ncols() != queries.ncols() {
            return Err(Error::shape_mismatch(
                "query input features",
                vec![corpus.ncols()],
                vec![queries.ncols()],
            ));
        }

        let corpus_latents = self.encoder.encode(corpus)?;
        let query_latents = self.encoder.encode(queries)?;
        if corpus_latents.ncols() != query_latents.ncols() {
            return Err(Error::shape_mismatch(
                "query latents",
                vec![corpus_latents.ncols()],
                vec![query_latents.ncols()],
            ));
        }

        let m = queries.nrows();
        if m == 0 {
            return Ok(Decomposition {
                weights: Array2::zeros((0, n)),
                final_loss: 0.0,
                loss_history: Vec::new(),
                corpus_latents,
                query_latents,
            });
        }
        let m_f = m as f32;

        let mut weights = Array2::from_elem((m, n), 1.0 / n as f32);
        let mut best_weights = weights.clone();
        let mut best_loss = f32::INFINITY;
        let mut prev_loss = f32::INFINITY;
        let mut loss_history = Vec::new();

        for step in 0..self.config.n_steps {
            let residual = weights.dot(&corpus_latents) - &query_latents;
            let loss = residual.mapv(|r| r * r).sum() / m_f;
            if !loss.is_finite() {
                return Err(Error::NumericalInstability { step, loss });
            }
            if loss < best_loss {
                best_loss = loss;
                best_weights.assign(&weights);
            }
            if step % self.config.record_every == 0 {
                loss_history.push(loss);
            }
            if self.config.tol > 0.0 && step > 0 && prev_loss - loss < self.config.tol {
                break;
            }
            prev_loss = loss;

            let grad = residual.dot(&corpus_latents.t()) * (2.0 / m_f);
            weights.scaled_add(-self.config.lr, &grad);
            for mut row in weights.rows_mut() {
                let projected = project_to_simplex(row.view());
                row.assign(&projected);
            }
        }

        // The loop measures the loss before each step; score the final
        // iterate too so the last projection is never discarded unseen.
        let residual = weights.dot(&corpus_latents) - &query_latents;
        let loss = residual.mapv(|r| r * r).sum() / m_f;
        if loss.is_finite() && loss < best_loss {
            best_loss = loss;
            best_weights.assign(&weights);
        }
        loss_history.push(best_loss);

        Ok(Decomposition {
            weights: best_weights,
            final_loss: best_loss,
            loss_history,
            corpus_latents,
            query_latents,
        })
    }
}

/// The frozen result of a corpus decomposition.
///
/// `weights[i, j]` is query `i`'s importance score for corpus example `j`;
/// higher means more influential. Rows are non-negative and sum to 1.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub(crate) weights: Array2<f32>,
    pub(crate) final_loss: f32,
    pub(crate) loss_history: Vec<f32>,
    pub(crate) corpus_latents: Array2<f32>,
    pub(crate) query_latents: Array2<f32>,
}

impl Decomposition {
    /// The `(queries, corpus)` weight matrix.
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// The weight row owned by query `i`.
    pub fn weight_row(&self, query: usize) -> ArrayView1<f32> {
        self.weights.row(query)
    }

    /// Reconstruction loss of the returned weight matrix.
    pub fn final_loss(&self) -> f32 {
        self.final_loss
    }

    /// Losses recorded during optimization (every `record_every` steps, plus
    /// the final loss).
    pub fn loss_history(&self) -> &[f32] {
        &self.loss_history
    }

    /// Number of queries decomposed.
    pub fn n_queries(&self) -> usize {
        self.weights.nrows()
    }

    /// Corpus size the decomposition was fitted against.
    pub fn corpus_size(&self) -> usize {
        self.weights.ncols()
    }

    /// The `k` most influential corpus examples for query `i`, as
    /// `(corpus index, weight)` pairs sorted by descending weight.
    pub fn top_examples(&self, query: usize, k: usize) -> Result<Vec<(usize, f32)>> {
        if query >= self.n_queries() {
            return Err(Error::IndexOutOfBounds {
                what: "query",
                index: query,
                len: self.n_queries(),
            });
        }
        let mut ranked: Vec<(usize, f32)> = self
            .weight_row(query)
            .iter()
            .copied()
            .enumerate()
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);
        Ok(ranked)
    }

    /// Residual `R_i − H_{Q,i}` of query `i`'s reconstruction.
    pub(crate) fn residual(&self, query: usize) -> Array1<f32> {
        let reconstruction = self.weight_row(query).dot(&self.corpus_latents);
        reconstruction - self.query_latents.row(query)
    }
}
