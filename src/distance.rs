///////////////////////////////////////////////////////////////
///////////////////// module: distance ////////////////////////
///////////////////////////////////////////////////////////////

/// Distance functions between two feature vectors.
///
/// The engine only needs a symmetric, non-negative function; the triangle inequality is never
/// used. All comparisons in the Lloyd iteration are strict (`<`), so equal distances always
/// resolve to the first candidate.
///
/// Any closure `Fn(&[f64], &[f64]) -> f64 + Sync` is a [DistanceFunction] as well.
use crate::error::{ClusteringError, Result};
use crate::types::{Coordinate, Distance};

/// Trait for a distance between two feature vectors of equal length.
pub trait DistanceFunction: Sync {
    /// Returns the distance between a and b. Both slices have the same length.
    fn dist(&self, a: &[Coordinate], b: &[Coordinate]) -> Distance;
}

impl<F> DistanceFunction for F
where
    F: Fn(&[Coordinate], &[Coordinate]) -> Distance + Sync,
{
    fn dist(&self, a: &[Coordinate], b: &[Coordinate]) -> Distance {
        self(a, b)
    }
}

/// The Euclidean metric: square root of the sum of squared coordinate differences.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl DistanceFunction for Euclidean {
    fn dist(&self, a: &[Coordinate], b: &[Coordinate]) -> Distance {
        SquaredEuclidean.dist(a, b).sqrt()
    }
}

/// Sum of squared coordinate differences. Not a metric, but induces the same order as [Euclidean].
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl DistanceFunction for SquaredEuclidean {
    fn dist(&self, a: &[Coordinate], b: &[Coordinate]) -> Distance {
        a.iter().zip(b.iter()).map(|(x, y)| (y - x) * (y - x)).sum()
    }
}

/// The l1 (taxicab) metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl DistanceFunction for Manhattan {
    fn dist(&self, a: &[Coordinate], b: &[Coordinate]) -> Distance {
        a.iter().zip(b.iter()).map(|(x, y)| (y - x).abs()).sum()
    }
}

/// Computes dist(a, b) after checking that both vectors have the same length and that the
/// returned value is a non-negative number.
pub fn checked_dist(distance: &dyn DistanceFunction, a: &[Coordinate], b: &[Coordinate]) -> Result<Distance> {
    if a.len() != b.len() {
        return Err(ClusteringError::DimensionMismatch {
            expected: a.len(),
            found: b.len(),
            index: 1,
        });
    }
    let d = distance.dist(a, b);
    validate_distance(d)
}

/// Passes d through if it is a non-negative number.
pub(crate) fn validate_distance(d: Distance) -> Result<Distance> {
    if d.is_nan() || d < 0.0 {
        Err(ClusteringError::InvalidDistance { value: d })
    } else {
        Ok(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_in_the_plane() {
        let d = Euclidean.dist(&[1.5, 1.1], &[1.0, 0.5]);
        assert!((d - <f64>::sqrt(0.25 + 0.36)).abs() < 1e-12);
        assert_eq!(Euclidean.dist(&[0.0, 0.0, 0.0], &[0.0, 3.0, 4.0]), 5.0);
    }

    #[test]
    fn euclidean_is_symmetric() {
        let a = [0.3, -2.0, 7.25];
        let b = [-1.0, 4.5, 0.0];
        assert_eq!(Euclidean.dist(&a, &b), Euclidean.dist(&b, &a));
        assert_eq!(Euclidean.dist(&a, &a), 0.0);
    }

    #[test]
    fn other_metrics() {
        assert_eq!(SquaredEuclidean.dist(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(Manhattan.dist(&[0.0, 0.0], &[3.0, -4.0]), 7.0);
    }

    #[test]
    fn closures_are_distance_functions() {
        let chebyshev = |a: &[f64], b: &[f64]| {
            a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
        };
        assert_eq!(chebyshev.dist(&[0.0, 0.0], &[3.0, -4.0]), 4.0);
    }

    #[test]
    fn checked_dist_rejects_mismatched_lengths() {
        match checked_dist(&Euclidean, &[0.0, 1.0], &[0.0, 1.0, 2.0]) {
            Err(ClusteringError::DimensionMismatch { expected: 2, found: 3, .. }) => {}
            other => panic!("expected DimensionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn checked_dist_rejects_negative_values() {
        let broken = |_: &[f64], _: &[f64]| -1.0;
        assert!(matches!(
            checked_dist(&broken, &[0.0], &[1.0]),
            Err(ClusteringError::InvalidDistance { .. })
        ));
        assert_eq!(checked_dist(&Euclidean, &[0.0], &[2.0]).unwrap(), 2.0);
    }
}
