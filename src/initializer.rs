use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Assignment, ClusterCount, PointCount, PointIdx, Seed};

/// How the first assignment of a run is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initialization {
    /// Every item is put into a uniformly random cluster; reproducible for a fixed seed.
    Random { seed: Seed },
    /// The given items (one per cluster) act as the first centroids.
    Centroids(Vec<PointIdx>),
}

/// Assigns each of the n items independently and uniformly at random to one of k clusters.
///
/// Cluster sizes are not balanced, some clusters may start empty. The same (n, k, seed) always
/// yields the same assignment.
///
/// # Example
/// ```rust
/// use lloyd_kmeans::random_assignment;
/// let a = random_assignment(20, 3, 7);
/// assert_eq!(a, random_assignment(20, 3, 7));
/// assert!(a.iter().all(|&c| c < 3));
/// ```
pub fn random_assignment(n: PointCount, k: ClusterCount, seed: Seed) -> Assignment {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..k)).collect()
}
