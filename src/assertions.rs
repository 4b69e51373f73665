use crate::error::{ClusteringError, Result};
use crate::initializer::Initialization;
use crate::types::PointCount;
use crate::ClusteringProblem;

/// Checks the parameters of a clustering problem that do not depend on the data.
///
/// # Errors
/// * k must be at least 1 ([ClusteringError::InvalidClusterCount]);
/// * max_iterations must be at least 1 ([ClusteringError::InvalidIterationCount]).
pub fn assert_problem_parameters(prob: &ClusteringProblem) -> Result<()> {
    if prob.k < 1 {
        return Err(ClusteringError::InvalidClusterCount { k: prob.k, n: 0 });
    }
    if prob.max_iterations < 1 {
        return Err(ClusteringError::InvalidIterationCount);
    }
    Ok(())
}

/// Checks a clustering problem against n points.
/// If this runs through, the Lloyd iteration cannot fail on the problem itself (only a custom
/// distance function can still make it fail).
///
/// # Errors
/// * n must be positive ([ClusteringError::EmptyInput]);
/// * k must satisfy 1 <= k <= n ([ClusteringError::InvalidClusterCount]);
/// * max_iterations must be at least 1;
/// * seed centroids (if given) must be exactly k indices in [0, n)
///   ([ClusteringError::InvalidCentroidIndices]).
pub fn assert_clustering_problem(n: PointCount, prob: &ClusteringProblem, init: &Initialization) -> Result<()> {
    if n == 0 {
        return Err(ClusteringError::EmptyInput);
    }
    if prob.k < 1 || prob.k > n {
        return Err(ClusteringError::InvalidClusterCount { k: prob.k, n });
    }
    assert_problem_parameters(prob)?;

    if let Initialization::Centroids(indices) = init {
        if indices.len() != prob.k {
            return Err(ClusteringError::InvalidCentroidIndices(format!(
                "We have {} initial centroids but k = {}! There must be exactly one per cluster.",
                indices.len(),
                prob.k
            )));
        }
        if let Some(&out_of_range) = indices.iter().find(|&&i| i >= n) {
            return Err(ClusteringError::InvalidCentroidIndices(format!(
                "Initial centroid {} is not a point index; we only have n = {} points.",
                out_of_range, n
            )));
        }
    }
    Ok(())
}
