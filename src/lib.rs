//! Lloyd's k-means clustering.
//!
//! Items of any type are turned into feature vectors by a [FeatureExtractor], put into k clusters by the
//! Lloyd iteration and handed back arranged per cluster in a [ClusterResult].
//!
//! Unlike textbook k-means, the reassignment step compares every point with the *centroid* of
//! each cluster, i.e., the real data point closest to the cluster mean, not with the mean itself.
//!
//! # Example
//! ```rust
//! use lloyd_kmeans::{cluster, Point2};
//! let points = vec![Point2::new(0.0, 0.0), Point2::new(0.0, 1.0), Point2::new(10.0, 10.0), Point2::new(10.0, 11.0)];
//! let result = cluster(&points, 2, 10, 0, None, None).unwrap();
//! assert!(result.is_converged());
//! assert_eq!(result.cluster_sizes(), vec![2, 2]);
//! ```

/// Default bound on the number of Lloyd iterations.
pub const DEFAULT_MAX_ITERATIONS: IterationCount = 100;

/// The required parameters of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringProblem {
    /// number of clusters
    pub k: ClusterCount,
    /// upper bound on the number of iterations; the run ends earlier on convergence
    pub max_iterations: IterationCount,
    /// seed of the random initial assignment (ignored if initial centroids are given)
    pub seed: Seed,
}

impl ClusteringProblem {
    /// Creates a problem with k clusters, [DEFAULT_MAX_ITERATIONS] and seed 0.
    pub fn new(k: ClusterCount) -> ClusteringProblem {
        ClusteringProblem {
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: 0,
        }
    }
}

/// Optional parameters of a run. None means default.
#[derive(Default)]
pub struct OptionalParameters<'a> {
    /// 0: silent, 1: brief (default), 2: one event per iteration, 3: full assignments
    pub verbose: Option<u8>,
    /// number of threads for centroid selection and reassignment; default 1, 0 means one per core
    pub thread_count: Option<usize>,
    /// distance function; default [Euclidean]
    pub distance: Option<&'a dyn DistanceFunction>,
    /// k point indices used as first centroids instead of the random initial assignment
    pub initial_centroids: Option<Vec<PointIdx>>,
}

pub mod types;
pub use types::{
    Assignment, ClusterCount, ClusterIdx, Coordinate, Distance, DurationInSec, FeatureVector, IterationCount,
    PointCount, PointIdx, Seed,
};

pub mod error;
pub use error::{ClusteringError, Result};

pub mod distance;
pub use distance::{checked_dist, DistanceFunction, Euclidean, Manhattan, SquaredEuclidean};

pub mod features;
pub use features::{Aabb, Builtin, CoordinateGetter, FeatureExtractor, FeatureSpace, HasFeatures, Point2, Point3};

pub mod samples;
pub use samples::Sample;

mod initializer;
pub use initializer::{random_assignment, Initialization};

pub mod lloyd;
pub use lloyd::{ClusterMeans, LloydState};
use lloyd::{lloyd_iterations, LloydParameters};

mod clustering;
pub use clustering::ClusterResult;

pub mod assertions;
use assertions::assert_clustering_problem;

mod utilities;

#[cfg(feature = "python")]
mod python_interface;

use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;

/// Clusters the items into prob.k clusters.
///
/// The items are converted by the extractor; afterwards the Lloyd iteration runs until no point
/// changes its cluster or until prob.max_iterations iterations are done.
///
/// Returns the clustering and the running time in seconds.
///
/// # Errors
/// * [ClusteringError::EmptyInput] if items is empty;
/// * [ClusteringError::InvalidClusterCount] unless 1 <= k <= items.len();
/// * [ClusteringError::InvalidIterationCount] if max_iterations is 0;
/// * [ClusteringError::UnsupportedItemType] and [ClusteringError::DimensionMismatch] from the
///   feature extraction;
/// * [ClusteringError::InvalidCentroidIndices] for bad initial centroids;
/// * [ClusteringError::InvalidDistance] if a custom distance function returns a negative or NaN
///   value.
pub fn compute_kmeans_clustering<T: Clone>(
    items: &[T],
    prob: &ClusteringProblem,
    extractor: &dyn FeatureExtractor<T>,
    optional: Option<OptionalParameters>,
) -> Result<(ClusterResult<T>, DurationInSec)> {
    let mut optional = optional.unwrap_or_default();
    let init = initialization(prob, &mut optional);
    assert_clustering_problem(items.len(), prob, &init)?;
    let space = FeatureSpace::from_items(items, extractor)?;
    run(items, &space, prob, &init, optional)
}

/// Clusters the points of a [FeatureSpace]. The clusters of the result contain point indices.
pub fn cluster_space(
    space: &FeatureSpace,
    prob: &ClusteringProblem,
    optional: Option<OptionalParameters>,
) -> Result<(ClusterResult<PointIdx>, DurationInSec)> {
    let mut optional = optional.unwrap_or_default();
    let init = initialization(prob, &mut optional);
    assert_clustering_problem(space.n(), prob, &init)?;
    let indices: Vec<PointIdx> = (0..space.n()).collect();
    run(&indices, space, prob, &init, optional)
}

/// Clusters items with a built-in feature extraction rule.
///
/// * cluster_count: number of clusters k (1 <= k <= items.len());
/// * max_iterations: upper bound on the number of iterations (at least 1);
/// * seed: seed of the random initial assignment; the same seed gives the same result;
/// * distance: custom distance function, [Euclidean] if None;
/// * initial_centroid_indices: k item indices used as first centroids; seed has no effect then.
pub fn cluster<T: HasFeatures + Clone>(
    items: &[T],
    cluster_count: ClusterCount,
    max_iterations: IterationCount,
    seed: Seed,
    distance: Option<&dyn DistanceFunction>,
    initial_centroid_indices: Option<&[PointIdx]>,
) -> Result<ClusterResult<T>> {
    let prob = ClusteringProblem {
        k: cluster_count,
        max_iterations,
        seed,
    };
    let optional = OptionalParameters {
        verbose: Some(0),
        thread_count: None,
        distance,
        initial_centroids: initial_centroid_indices.map(|indices| indices.to_vec()),
    };
    let (result, _) = compute_kmeans_clustering(items, &prob, &Builtin, Some(optional))?;
    Ok(result)
}

fn build_thread_pool(thread_count: Option<usize>) -> Result<Option<ThreadPool>> {
    let threads = match thread_count {
        None | Some(1) => return Ok(None),
        Some(0) => num_cpus::get(),
        Some(t) => t,
    };
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map(Some)
        .map_err(|e| ClusteringError::ThreadPool(e.to_string()))
}

fn initialization(prob: &ClusteringProblem, optional: &mut OptionalParameters) -> Initialization {
    match optional.initial_centroids.take() {
        Some(indices) => Initialization::Centroids(indices),
        None => Initialization::Random { seed: prob.seed },
    }
}

// expects a problem that passed assert_clustering_problem
fn run<T: Clone>(
    items: &[T],
    space: &FeatureSpace,
    prob: &ClusteringProblem,
    init: &Initialization,
    optional: OptionalParameters,
) -> Result<(ClusterResult<T>, DurationInSec)> {
    let start = Instant::now();

    let verbose = optional.verbose.unwrap_or(1);
    let distance: &dyn DistanceFunction = optional.distance.unwrap_or(&Euclidean);

    let pool = build_thread_pool(optional.thread_count)?;
    if verbose >= 1 {
        tracing::info!(
            n = space.n(),
            dim = space.dim(),
            k = prob.k,
            max_iterations = prob.max_iterations,
            threads = pool.as_ref().map_or(1, |p| p.current_num_threads()),
            "starting lloyd iteration"
        );
    }

    let params = LloydParameters {
        k: prob.k,
        max_iterations: prob.max_iterations,
        distance,
        pool: pool.as_ref(),
        verbose,
    };
    let outcome = lloyd_iterations(space, init, &params)?;

    let result = ClusterResult::new(
        items,
        outcome.assignment,
        outcome.means,
        outcome.centroids,
        outcome.total_distance,
        outcome.iterations,
        outcome.state,
    );
    let total_time = start.elapsed().as_secs_f64();

    if verbose >= 1 {
        tracing::info!(
            iterations = result.iterations(),
            state = ?result.state(),
            total_distance = result.total_distance(),
            sizes = ?result.cluster_sizes(),
            running_time = total_time,
            "finished lloyd iteration"
        );
    }
    Ok((result, total_time))
}

#[cfg(feature = "python")]
use pyo3::prelude::{pymodule, PyModule, PyResult, Python};

/// A Python module implemented in Rust. The name of this function must match
/// the `lib.name` setting in the `Cargo.toml`, else Python will not be able to
/// import the module.
#[cfg(feature = "python")]
#[pymodule]
fn lloyd_kmeans(py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<python_interface::KMeans>()?;
    python_interface::add_exceptions(py, m)?;
    Ok(())
}
