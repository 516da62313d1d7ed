//! Property-based tests for the Euclidean simplex projection

use crate::simplex::project_to_simplex;
use ndarray::Array1;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn prop_projection_lands_on_simplex(
        v in prop::collection::vec(-100.0f32..100.0, 1..40)
    ) {
        let p = project_to_simplex(Array1::from(v).view());

        prop_assert!(p.iter().all(|&x| x >= 0.0), "negative entry in {p}");
        // Tolerance sized for f32 cumulative sums over large-magnitude input.
        let sum: f32 = p.sum();
        prop_assert!((sum - 1.0).abs() < 1e-3, "sum = {sum}");
    }

    #[test]
    fn prop_projection_is_idempotent(
        v in prop::collection::vec(-100.0f32..100.0, 1..40)
    ) {
        let once = project_to_simplex(Array1::from(v).view());
        let twice = project_to_simplex(once.view());

        for (a, b) in once.iter().zip(twice.iter()) {
            prop_assert!((a - b).abs() < 1e-5, "{once} reprojects to {twice}");
        }
    }

    #[test]
    fn prop_valid_points_are_fixed_points(
        v in prop::collection::vec(1e-3f32..1.0, 1..40)
    ) {
        // Normalise to a valid simplex point, then project.
        let arr = Array1::from(v);
        let total = arr.sum();
        let point = arr.mapv(|x| x / total);

        let projected = project_to_simplex(point.view());
        for (a, b) in point.iter().zip(projected.iter()) {
            prop_assert!((a - b).abs() < 1e-4, "{point} moved to {projected}");
        }
    }

    #[test]
    fn prop_projection_preserves_order(
        v in prop::collection::vec(-10.0f32..10.0, 2..20)
    ) {
        // Shift-and-clip cannot reorder entries.
        let input = Array1::from(v);
        let p = project_to_simplex(input.view());
        for i in 0..input.len() {
            for j in 0..input.len() {
                if input[i] > input[j] {
                    prop_assert!(p[i] >= p[j] - 1e-6);
                }
            }
        }
    }
}
