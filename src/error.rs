use std::path::PathBuf;
use thiserror::Error;

use crate::types::{ClusterCount, Distance, PointCount, PointIdx};

/// Everything that can go wrong before or during a clustering run.
///
/// Empty clusters and hitting the iteration bound are not errors; both are reported through
/// [crate::ClusterResult].
#[derive(Debug, Error)]
pub enum ClusteringError {
    #[error("No items given! There should be at least one point to cluster.")]
    EmptyInput,

    #[error("We have k = {k} and n = {n}! k must satisfy 1 <= k <= n.")]
    InvalidClusterCount { k: ClusterCount, n: PointCount },

    #[error("max_iterations is 0! At least one iteration is required.")]
    InvalidIterationCount,

    #[error("{0}")]
    InvalidCentroidIndices(String),

    #[error("Feature vector {index} has dimension {found}, but dimension {expected} was expected.")]
    DimensionMismatch {
        expected: usize,
        found: usize,
        index: PointIdx,
    },

    #[error("No feature extraction rule for item type '{0}'.")]
    UnsupportedItemType(String),

    #[error("The distance function returned {value}; distances must be non-negative numbers.")]
    InvalidDistance { value: Distance },

    #[error("Cannot read points from '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Cannot build thread pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, ClusteringError>;
