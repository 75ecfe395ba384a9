//! Cosine similarity over interaction-weight vectors.
//!
//! The pairwise computation is O(n^2) in the number of entities and O(n^2 * m)
//! in total, which holds up to mid-sized catalogs. Larger deployments would
//! shard or approximate before this becomes the bottleneck.

use ndarray::{Array2, ArrayView1, ArrayView2};

/// Cosine similarity between two weight vectors.
///
/// Formula: sim(a, b) = (a . b) / (||a|| * ||b||)
///
/// Returns 0.0 when either vector has zero magnitude, so entities without
/// any recorded signal compare as dissimilar to everything instead of
/// producing NaN.
pub fn cosine_similarity(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    a.dot(&b) / (norm_a * norm_b)
}

/// Full pairwise cosine similarity matrix over the rows of `vectors`.
///
/// The result is symmetric. Diagonal entries are pinned to exactly 1.0 for
/// non-zero rows rather than recomputed, so self-similarity never drifts
/// below a cross-similarity through rounding.
pub fn pairwise_cosine(vectors: &ArrayView2<f64>) -> Array2<f64> {
    let n = vectors.nrows();
    let mut similarity = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        let row_i = vectors.row(i);
        similarity[[i, i]] = if row_i.dot(&row_i) > 0.0 { 1.0 } else { 0.0 };
        for j in (i + 1)..n {
            let value = cosine_similarity(row_i, vectors.row(j));
            similarity[[i, j]] = value;
            similarity[[j, i]] = value;
        }
    }

    similarity
}
