//////////////////////////////////////////////////////////////
//////////////////// module: lloyd ///////////////////////////
//////////////////////////////////////////////////////////////

/// The Lloyd iteration. Each iteration consists of
/// 1. mean update: the coordinate-wise average of every cluster ([compute_means]);
/// 2. centroid selection: the data point closest to each mean, and the total distance of all
///    points to their cluster mean ([select_centroids]);
/// 3. reassignment: every point moves to the cluster of the closest centroid ([reassign]).
///
/// Reassignment compares against the centroid data points, never against the means.
/// The loop stops as soon as a reassignment changes nothing or after max_iterations iterations.
use rayon::ThreadPool;

use crate::distance::{validate_distance, DistanceFunction};
use crate::error::Result;
use crate::features::FeatureSpace;
use crate::initializer::{random_assignment, Initialization};
use crate::types::{Assignment, ClusterCount, Distance, FeatureVector, IterationCount, PointCount, PointIdx};
use crate::utilities::{first_min, map_items};

/// One mean vector per cluster.
pub type ClusterMeans = Vec<FeatureVector>;

/// State of the Lloyd iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LloydState {
    Running,
    /// A full reassignment pass did not move any point.
    Converged,
    /// The iteration bound was hit before convergence; the result is a best effort.
    IterationLimitReached,
}

/// Everything the iteration leaves behind when it stops.
#[derive(Debug, Clone)]
pub(crate) struct LloydOutcome {
    pub assignment: Assignment,
    pub means: ClusterMeans,
    pub centroids: Vec<PointIdx>,
    pub total_distance: Distance,
    pub iterations: IterationCount,
    pub state: LloydState,
}

/// Parameters of a single run of the iteration.
pub(crate) struct LloydParameters<'a> {
    pub k: ClusterCount,
    pub max_iterations: IterationCount,
    pub distance: &'a dyn DistanceFunction,
    pub pool: Option<&'a ThreadPool>,
    pub verbose: u8,
}

/// Computes the mean of every cluster together with the cluster sizes.
/// Empty clusters get the zero vector (the sum is divided by 1 instead of 0).
pub fn compute_means(space: &FeatureSpace, assignment: &[usize], k: ClusterCount) -> (ClusterMeans, Vec<PointCount>) {
    let mut means: ClusterMeans = vec![vec![0.0; space.dim()]; k];
    let mut counts: Vec<PointCount> = vec![0; k];

    for (x, &c) in space.iter().zip(assignment.iter()) {
        counts[c] += 1;
        for (m, v) in means[c].iter_mut().zip(x.iter()) {
            *m += v;
        }
    }

    for (mean, &count) in means.iter_mut().zip(counts.iter()) {
        let denominator = count.max(1) as f64;
        for m in mean.iter_mut() {
            *m /= denominator;
        }
    }
    (means, counts)
}

/// For every cluster, picks the point with the smallest distance to the cluster mean (the first
/// such point in item order). Empty clusters keep their previous centroid.
///
/// Also returns the sum of the distances of all points to the mean of their cluster, added up in
/// item order.
pub fn select_centroids(
    space: &FeatureSpace,
    assignment: &[usize],
    means: &ClusterMeans,
    previous: &[PointIdx],
    distance: &dyn DistanceFunction,
    pool: Option<&ThreadPool>,
) -> Result<(Vec<PointIdx>, Distance)> {
    let distances = map_items(space.n(), pool, |i| {
        validate_distance(distance.dist(space.get(i), &means[assignment[i]]))
    })?;

    let mut centroids: Vec<PointIdx> = previous.to_vec();
    let mut min_distances: Vec<Distance> = vec![Distance::MAX; means.len()];
    let mut total_distance: Distance = 0.0;
    for (i, &d) in distances.iter().enumerate() {
        let c = assignment[i];
        total_distance += d;
        if d < min_distances[c] {
            min_distances[c] = d;
            centroids[c] = i;
        }
    }
    Ok((centroids, total_distance))
}

/// Moves every point into the cluster of its closest centroid; equal distances resolve to the
/// lowest cluster index. Returns the new assignment and whether any point changed its cluster.
pub fn reassign(
    space: &FeatureSpace,
    assignment: &[usize],
    centroids: &[PointIdx],
    distance: &dyn DistanceFunction,
    pool: Option<&ThreadPool>,
) -> Result<(Assignment, bool)> {
    let nearest = map_items(space.n(), pool, |i| {
        let x = space.get(i);
        let distances = centroids
            .iter()
            .map(|&c| validate_distance(distance.dist(x, space.get(c))))
            .collect::<Result<Vec<Distance>>>()?;
        Ok(first_min(distances).map(|(c, _)| c))
    })?;

    let mut changed = false;
    let new_assignment: Assignment = nearest
        .iter()
        .zip(assignment.iter())
        .map(|(nearest_cluster, &current)| match nearest_cluster {
            Some(c) if *c != current => {
                changed = true;
                *c
            }
            _ => current,
        })
        .collect();
    Ok((new_assignment, changed))
}

/// Runs the iteration from the given initialization until convergence or until the iteration bound
/// is hit.
pub(crate) fn lloyd_iterations(space: &FeatureSpace, init: &Initialization, params: &LloydParameters) -> Result<LloydOutcome> {
    let n = space.n();
    let k = params.k;

    let (mut assignment, mut centroids) = match init {
        Initialization::Random { seed } => (random_assignment(n, k, *seed), vec![0; k]),
        Initialization::Centroids(indices) => {
            // the seed points act as centroids right away; one reassignment pass gives the start
            let (assignment, _) = reassign(space, &vec![0; n], indices, params.distance, params.pool)?;
            if params.verbose >= 2 {
                tracing::debug!(?indices, "initial assignment from seed centroids");
            }
            (assignment, indices.clone())
        }
    };
    if params.verbose >= 3 {
        tracing::trace!(?assignment, "initial assignment");
    }

    let mut state = LloydState::Running;
    let mut iterations: IterationCount = 0;
    let mut means: ClusterMeans;
    let mut total_distance: Distance;

    loop {
        let (new_means, counts) = compute_means(space, &assignment, k);
        let (new_centroids, new_total) =
            select_centroids(space, &assignment, &new_means, &centroids, params.distance, params.pool)?;
        let (new_assignment, changed) = reassign(space, &assignment, &new_centroids, params.distance, params.pool)?;

        #[cfg(debug_assertions)]
        assert_eq!(counts.iter().sum::<PointCount>(), n, "cluster sizes do not add up to the number of points");

        means = new_means;
        centroids = new_centroids;
        total_distance = new_total;
        assignment = new_assignment;
        iterations += 1;

        if params.verbose >= 2 {
            tracing::debug!(iteration = iterations, total_distance, ?counts, ?centroids, changed, "lloyd iteration");
        }
        if params.verbose >= 3 {
            tracing::trace!(?assignment, ?means, "state after iteration {}", iterations);
        }

        if !changed {
            state = LloydState::Converged;
        } else if iterations >= params.max_iterations {
            state = LloydState::IterationLimitReached;
        }
        if state != LloydState::Running {
            break;
        }
    }

    Ok(LloydOutcome {
        assignment,
        means,
        centroids,
        total_distance,
        iterations,
        state,
    })
}
