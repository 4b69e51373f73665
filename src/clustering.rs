//////////////////////////////////////////////////////////////
//////////////////// module: clustering //////////////////////
//////////////////////////////////////////////////////////////

/// The final result of a run: the original items arranged into k clusters together with the
/// means, the centroids (as item indices), the total distance and how the iteration ended.
use std::fmt;

use crate::lloyd::{ClusterMeans, LloydState};
use crate::types::{Assignment, ClusterCount, ClusterIdx, Distance, IterationCount, PointCount, PointIdx};

/// A clustering of items of type T. It is created once at the end of a run and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterResult<T> {
    clusters: Vec<Vec<T>>,
    means: ClusterMeans,
    centroids: Vec<PointIdx>,
    total_distance: Distance,
    labels: Assignment,
    iterations: IterationCount,
    state: LloydState,
}

impl<T: Clone> ClusterResult<T> {
    /// Buckets the items by their label in a single pass. Within each cluster the items keep their
    /// original order.
    ///
    /// # Panics
    ///
    /// Panics if labels and items have different lengths or if a label is not smaller than
    /// means.len().
    pub fn new(
        items: &[T],
        labels: Assignment,
        means: ClusterMeans,
        centroids: Vec<PointIdx>,
        total_distance: Distance,
        iterations: IterationCount,
        state: LloydState,
    ) -> ClusterResult<T> {
        assert_eq!(items.len(), labels.len(), "Number of items: {} do not match number of labels: {}", items.len(), labels.len());
        let mut clusters: Vec<Vec<T>> = vec![Vec::new(); means.len()];
        for (item, &c) in items.iter().zip(labels.iter()) {
            clusters[c].push(item.clone());
        }
        ClusterResult {
            clusters,
            means,
            centroids,
            total_distance,
            labels,
            iterations,
            state,
        }
    }
}

impl<T> ClusterResult<T> {
    /// Returns the number of clusters k.
    pub fn k(&self) -> ClusterCount {
        self.clusters.len()
    }

    /// The items arranged into clusters; cluster c is clusters()\[c\].
    pub fn clusters(&self) -> &[Vec<T>] {
        &self.clusters
    }

    /// The items of cluster c.
    pub fn cluster_of(&self, c: ClusterIdx) -> &[T] {
        &self.clusters[c]
    }

    /// The means of the last iteration. The mean of an empty cluster is the zero vector.
    pub fn means(&self) -> &ClusterMeans {
        &self.means
    }

    /// The centroid of each cluster as index into the item slice.
    pub fn centroids(&self) -> &[PointIdx] {
        &self.centroids
    }

    /// Sum of the distances of all items to the mean of their cluster, measured in the last
    /// iteration. Lower is usually better when comparing runs with different seeds.
    pub fn total_distance(&self) -> Distance {
        self.total_distance
    }

    /// The final cluster index of every item.
    pub fn labels(&self) -> &Assignment {
        &self.labels
    }

    /// Number of executed iterations.
    pub fn iterations(&self) -> IterationCount {
        self.iterations
    }

    /// Either [LloydState::Converged] or [LloydState::IterationLimitReached].
    pub fn state(&self) -> LloydState {
        self.state
    }

    pub fn is_converged(&self) -> bool {
        self.state == LloydState::Converged
    }

    pub fn cluster_sizes(&self) -> Vec<PointCount> {
        self.clusters.iter().map(|c| c.len()).collect()
    }

    /// Hue in [0, 1) for displaying cluster c; hues are evenly spaced over the clusters.
    pub fn hue(&self, c: ClusterIdx) -> f64 {
        c as f64 / self.k() as f64
    }
}

impl<T> fmt::Display for ClusterResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = match self.state {
            LloydState::Converged => "converged",
            LloydState::IterationLimitReached => "iteration limit reached",
            LloydState::Running => "running",
        };
        writeln!(
            f,
            "{} clusters after {} iterations ({}); total distance: {}",
            self.k(),
            self.iterations,
            state,
            self.total_distance
        )?;
        for (c, cluster) in self.clusters.iter().enumerate() {
            write!(f, "{}: {} items, centroid {}, mean (", c, cluster.len(), self.centroids[c])?;
            let mut iter = self.means[c].iter();
            if let Some(x) = iter.next() {
                write!(f, "{}", x)?;
            }
            for x in iter {
                write!(f, ", {}", x)?;
            }
            writeln!(f, ")")?;
        }
        Ok(())
    }
}
