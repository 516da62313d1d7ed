//! Euclidean projection onto the probability simplex

use ndarray::{Array1, ArrayView1};
use std::cmp::Ordering;

/// Project a vector onto the probability simplex.
///
/// Returns the closest point (in Euclidean distance) whose entries are
/// non-negative and sum to 1.
///
/// Algorithm (Held/Wolfe/Crowder, as popularised by Duchi et al.):
/// 1. Sort the entries in descending order: u_1 ≥ u_2 ≥ ... ≥ u_n
/// 2. Find the largest k with u_k > (Σ_{i≤k} u_i − 1) / k and take that
///    threshold θ
/// 3. Return max(v_i − θ, 0) elementwise
///
/// The projection is exact and idempotent: a vector already on the simplex
/// comes back unchanged (θ = 0).
pub fn project_to_simplex(v: ArrayView1<f32>) -> Array1<f32> {
    let mut sorted: Vec<f32> = v.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    // At k = 1 the condition u_1 > u_1 - 1 always holds, so θ is always set.
    let mut cumulative = 0.0_f32;
    let mut theta = 0.0_f32;
    for (k, &u_k) in sorted.iter().enumerate() {
        cumulative += u_k;
        let candidate = (cumulative - 1.0) / (k as f32 + 1.0);
        if u_k - candidate > 0.0 {
            theta = candidate;
        }
    }

    v.mapv(|x| (x - theta).max(0.0))
}
