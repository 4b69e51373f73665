/// Type of the number of items (points) in a run.
pub type PointCount = usize;
/// Type of the number of clusters k.
pub type ClusterCount = usize;
/// Type of the iteration counter and of the iteration bound.
pub type IterationCount = usize;
/// Seed of the pseudo random generator that creates the initial assignment.
pub type Seed = u64;
/// Running time of a computation in seconds.
pub type DurationInSec = f64;

/// Index of an item (and of its feature vector).
pub type PointIdx = usize;
/// Index of a cluster; always in [0, k).
pub type ClusterIdx = usize;
/// A single coordinate of a feature vector.
pub type Coordinate = f64;
/// Value returned by a distance function.
pub type Distance = f64;

/// Fixed-length numeric representation of an item.
pub type FeatureVector = Vec<Coordinate>;
/// Maps every item index to the cluster it is currently assigned to.
pub type Assignment = Vec<ClusterIdx>;
