//! End-to-end tests driving both explainers through a seeded linear encoder

use approx::assert_abs_diff_eq;
use explicar::{
    project_top_features, Aggregation, AuxiliaryAttributor, CorpusDecomposer, LinearEncoder,
    Result, ScalarAttributor, ScalarFn, SimplexConfig,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Array2<f32> {
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-1.0..1.0))
}

/// Gradient × (input − baseline) by central differences; exact for the
/// linear surrogates produced by a linear encoder.
struct FiniteDiffAttributor {
    eps: f32,
}

impl ScalarAttributor for FiniteDiffAttributor {
    fn attribute(
        &self,
        scalar_fn: &ScalarFn<'_>,
        inputs: ArrayView2<f32>,
        baseline: ArrayView1<f32>,
    ) -> Result<Array2<f32>> {
        let mut maps = Array2::zeros(inputs.raw_dim());
        for j in 0..inputs.ncols() {
            let mut plus = inputs.to_owned();
            let mut minus = inputs.to_owned();
            for i in 0..inputs.nrows() {
                plus[[i, j]] += self.eps;
                minus[[i, j]] -= self.eps;
            }
            let f_plus = scalar_fn(plus.view())?;
            let f_minus = scalar_fn(minus.view())?;
            for i in 0..inputs.nrows() {
                let grad = (f_plus[i] - f_minus[i]) / (2.0 * self.eps);
                maps[[i, j]] = grad * (inputs[[i, j]] - baseline[j]);
            }
        }
        Ok(maps)
    }
}

#[test]
fn decomposition_of_corpus_members_reaches_zero_loss() {
    let mut rng = StdRng::seed_from_u64(7);
    let encoder = LinearEncoder::new(random_matrix(&mut rng, 4, 8));
    let corpus = random_matrix(&mut rng, 20, 8);
    // Queries drawn from the corpus itself: exact reconstructions exist.
    let queries = corpus.slice(ndarray::s![3..6, ..]).to_owned();

    let config = SimplexConfig::new().with_n_steps(2000).with_lr(0.01);
    let decomposer = CorpusDecomposer::new(&encoder, config).unwrap();
    let dec = decomposer.fit(corpus.view(), queries.view()).unwrap();

    assert!(dec.final_loss() < 1e-3, "loss = {}", dec.final_loss());
    for row in dec.weights().rows() {
        assert!(row.iter().all(|&w| w >= -1e-6));
        assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-4);
    }
}

#[test]
fn decomposition_is_reproducible_across_runs() {
    let mut rng = StdRng::seed_from_u64(21);
    let encoder = LinearEncoder::new(random_matrix(&mut rng, 3, 6));
    let corpus = random_matrix(&mut rng, 12, 6);
    let queries = random_matrix(&mut rng, 4, 6);

    let fit = || {
        let config = SimplexConfig::new().with_n_steps(300).with_lr(0.02);
        CorpusDecomposer::new(&encoder, config)
            .unwrap()
            .fit(corpus.view(), queries.view())
            .unwrap()
    };
    let first = fit();
    let second = fit();
    assert_eq!(first.weights(), second.weights());
    assert_eq!(first.loss_history(), second.loss_history());
}

#[test]
fn feature_projection_of_top_examples_has_input_shape() {
    let mut rng = StdRng::seed_from_u64(3);
    let encoder = LinearEncoder::new(random_matrix(&mut rng, 3, 5));
    let corpus = random_matrix(&mut rng, 10, 5);
    let queries = random_matrix(&mut rng, 2, 5);

    let config = SimplexConfig::new().with_n_steps(500).with_lr(0.02);
    let decomposer = CorpusDecomposer::new(&encoder, config).unwrap();
    let dec = decomposer.fit(corpus.view(), queries.view()).unwrap();

    let maps = project_top_features(&encoder, &dec, corpus.view(), 1, 3).unwrap();
    assert_eq!(maps.len(), 3);
    for (idx, weight, map) in &maps {
        assert!(*idx < corpus.nrows());
        assert!(*weight >= 0.0);
        assert_eq!(map.len(), corpus.ncols());
        assert!(map.iter().all(|g| g.is_finite()));
    }
    // Ranking is by descending weight.
    assert!(maps[0].1 >= maps[1].1 && maps[1].1 >= maps[2].1);
}

#[test]
fn auxiliary_attribution_matches_linear_closed_form() {
    let mut rng = StdRng::seed_from_u64(11);
    let w = random_matrix(&mut rng, 4, 6);
    let encoder = LinearEncoder::new(w.clone());
    let inputs = random_matrix(&mut rng, 3, 6);
    let baseline = Array1::zeros(6);

    let attributor = AuxiliaryAttributor::new(encoder, FiniteDiffAttributor { eps: 1e-2 });
    let maps = attributor.attribute(inputs.view(), baseline.view()).unwrap();

    // For encode(x) = x·Wᵀ and grad×(x−b) per dimension, the sum over
    // dimensions is (Σ_k W_k) ⊙ (x − b).
    let column_sums = w.sum_axis(Axis(0));
    for i in 0..inputs.nrows() {
        for j in 0..inputs.ncols() {
            let expected = column_sums[j] * inputs[[i, j]];
            assert_abs_diff_eq!(maps[[i, j]], expected, epsilon = 1e-2);
        }
    }
}

#[test]
fn mean_aggregation_rescales_sum() {
    let mut rng = StdRng::seed_from_u64(5);
    let w = random_matrix(&mut rng, 4, 3);
    let inputs = random_matrix(&mut rng, 2, 3);
    let baseline = Array1::zeros(3);

    let sum_maps = AuxiliaryAttributor::new(
        LinearEncoder::new(w.clone()),
        FiniteDiffAttributor { eps: 1e-2 },
    )
    .attribute(inputs.view(), baseline.view())
    .unwrap();

    let mean_maps =
        AuxiliaryAttributor::new(LinearEncoder::new(w), FiniteDiffAttributor { eps: 1e-2 })
            .with_aggregation(Aggregation::Mean)
            .attribute(inputs.view(), baseline.view())
            .unwrap();

    for (s, m) in sum_maps.iter().zip(mean_maps.iter()) {
        assert_abs_diff_eq!(*m, *s / 4.0, epsilon = 1e-4);
    }
}
