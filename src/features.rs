///////////////////////////////////////////////////////////////
///////////////////// module: features ////////////////////////
///////////////////////////////////////////////////////////////

/// Module features turns caller items into feature vectors of uniform dimension.
///
/// Items are converted by a [FeatureExtractor]:
/// - [Builtin] for every type implementing [HasFeatures] (points, boxes, numeric tuples);
/// - [CoordinateGetter] built from one getter closure per coordinate;
/// - any closure `Fn(&T) -> FeatureVector`.
///
/// The result is a [FeatureSpace]: n feature vectors of the same dimension, where vector i
/// belongs to item i. Builder functions are [FeatureSpace::from_items],
/// [FeatureSpace::by_vectors], [FeatureSpace::by_2dpoints], [FeatureSpace::by_file] and
/// [FeatureSpace::new_random].
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ClusteringError, Result};
use crate::samples::Sample;
use crate::types::{Coordinate, FeatureVector, PointCount, PointIdx, Seed};

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: Coordinate,
    pub y: Coordinate,
}

/// A point in 3d space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: Coordinate,
    pub y: Coordinate,
    pub z: Coordinate,
}

/// An axis-aligned box given by its center and its extents.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub center: Point3,
    pub size: Point3,
}

impl Point2 {
    pub fn new(x: Coordinate, y: Coordinate) -> Point2 {
        Point2 { x, y }
    }
}

impl Point3 {
    pub fn new(x: Coordinate, y: Coordinate, z: Coordinate) -> Point3 {
        Point3 { x, y, z }
    }
}

impl Aabb {
    pub fn new(center: Point3, size: Point3) -> Aabb {
        Aabb { center, size }
    }
}

/// Types with a built-in feature extraction rule.
pub trait HasFeatures {
    /// Returns the feature vector of this item.
    fn features(&self) -> FeatureVector;
}

impl HasFeatures for Point2 {
    fn features(&self) -> FeatureVector {
        vec![self.x, self.y]
    }
}

impl HasFeatures for Point3 {
    fn features(&self) -> FeatureVector {
        vec![self.x, self.y, self.z]
    }
}

// boxes are clustered by position only; the size is ignored.
impl HasFeatures for Aabb {
    fn features(&self) -> FeatureVector {
        self.center.features()
    }
}

impl<const N: usize> HasFeatures for [Coordinate; N] {
    fn features(&self) -> FeatureVector {
        self.to_vec()
    }
}

impl HasFeatures for Vec<Coordinate> {
    fn features(&self) -> FeatureVector {
        self.clone()
    }
}

impl HasFeatures for (Coordinate, Coordinate) {
    fn features(&self) -> FeatureVector {
        vec![self.0, self.1]
    }
}

impl HasFeatures for (Coordinate, Coordinate, Coordinate) {
    fn features(&self) -> FeatureVector {
        vec![self.0, self.1, self.2]
    }
}

/// Strategy that converts a single item into its feature vector.
pub trait FeatureExtractor<T> {
    fn extract(&self, item: &T) -> Result<FeatureVector>;
}

/// Extractor for all types implementing [HasFeatures].
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtin;

impl<T: HasFeatures> FeatureExtractor<T> for Builtin {
    fn extract(&self, item: &T) -> Result<FeatureVector> {
        Ok(item.features())
    }
}

impl<T, F> FeatureExtractor<T> for F
where
    F: Fn(&T) -> FeatureVector,
{
    fn extract(&self, item: &T) -> Result<FeatureVector> {
        Ok(self(item))
    }
}

/// Builds feature vectors from one getter per coordinate: coordinate j of item t is getters\[j\](t).
///
/// # Example
/// ```rust
/// use lloyd_kmeans::{CoordinateGetter, FeatureExtractor};
/// struct City { lat: f64, lon: f64, name: &'static str }
///
/// let getter = CoordinateGetter::new().with(|c: &City| c.lat).with(|c: &City| c.lon);
/// let berlin = City { lat: 52.5, lon: 13.4, name: "Berlin" };
/// assert_eq!(getter.extract(&berlin).unwrap(), vec![52.5, 13.4]);
/// assert_eq!(berlin.name, "Berlin");
/// ```
pub struct CoordinateGetter<T> {
    getters: Vec<Box<dyn Fn(&T) -> Coordinate>>,
}

impl<T> CoordinateGetter<T> {
    /// Creates a getter without any coordinates. Add them with [CoordinateGetter::with].
    pub fn new() -> CoordinateGetter<T> {
        CoordinateGetter { getters: Vec::new() }
    }

    /// Appends the getter of the next coordinate.
    pub fn with<G>(mut self, getter: G) -> CoordinateGetter<T>
    where
        G: Fn(&T) -> Coordinate + 'static,
    {
        self.getters.push(Box::new(getter));
        self
    }

    /// Number of coordinates produced for each item.
    pub fn dim(&self) -> usize {
        self.getters.len()
    }
}

impl<T> Default for CoordinateGetter<T> {
    fn default() -> Self {
        CoordinateGetter::new()
    }
}

impl<T> FeatureExtractor<T> for CoordinateGetter<T> {
    fn extract(&self, item: &T) -> Result<FeatureVector> {
        if self.getters.is_empty() {
            return Err(ClusteringError::UnsupportedItemType(std::any::type_name::<T>().to_string()));
        }
        Ok(self.getters.iter().map(|get| get(item)).collect())
    }
}

//////////////////// FeatureSpace /////////////////////////

/// n feature vectors of the same (non-zero) dimension. Vector i belongs to item i.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSpace {
    positions: Vec<FeatureVector>,
    dim: usize,
}

impl FeatureSpace {
    /// Creates a new [FeatureSpace] from a list of feature vectors.
    ///
    /// Fails with [ClusteringError::EmptyInput] if positions is empty and with
    /// [ClusteringError::DimensionMismatch] at the first vector whose length differs from the
    /// first one (or if the first one is empty).
    ///
    /// # Example
    /// ```rust
    /// use lloyd_kmeans::FeatureSpace;
    /// let space = FeatureSpace::by_vectors(vec![vec![0.0, 0.0], vec![1.5, 1.1]]).unwrap();
    /// assert_eq!(space.n(), 2);
    /// assert_eq!(space.dim(), 2);
    /// assert_eq!(space.get(1), &[1.5, 1.1]);
    /// assert!(FeatureSpace::by_vectors(vec![vec![0.0], vec![1.0, 2.0]]).is_err());
    /// ```
    pub fn by_vectors(positions: Vec<FeatureVector>) -> Result<FeatureSpace> {
        let dim = match positions.first() {
            None => return Err(ClusteringError::EmptyInput),
            Some(first) => first.len(),
        };
        if dim == 0 {
            return Err(ClusteringError::DimensionMismatch { expected: 1, found: 0, index: 0 });
        }
        for (index, p) in positions.iter().enumerate() {
            if p.len() != dim {
                return Err(ClusteringError::DimensionMismatch { expected: dim, found: p.len(), index });
            }
        }
        Ok(FeatureSpace { positions, dim })
    }

    /// Extracts the feature vectors of all items with the given extractor.
    pub fn from_items<T>(items: &[T], extractor: &dyn FeatureExtractor<T>) -> Result<FeatureSpace> {
        let positions = items
            .iter()
            .map(|item| extractor.extract(item))
            .collect::<Result<Vec<FeatureVector>>>()?;
        FeatureSpace::by_vectors(positions)
    }

    /// Creates a 2d feature space from a list of (x, y) positions.
    pub fn by_2dpoints(positions: Vec<(Coordinate, Coordinate)>) -> Result<FeatureSpace> {
        FeatureSpace::by_vectors(positions.iter().map(|p| p.features()).collect())
    }

    /// Creates n random points, uniformly distributed in the box [-extent, extent]^dim.
    /// The same seed always yields the same points.
    pub fn new_random(n: PointCount, dim: usize, extent: Coordinate, seed: Seed) -> Result<FeatureSpace> {
        let mut rng = StdRng::seed_from_u64(seed);
        let positions = (0..n)
            .map(|_| (0..dim).map(|_| rng.gen_range(-1.0f64..1.0) * extent).collect())
            .collect();
        FeatureSpace::by_vectors(positions)
    }

    /// Loads a feature space from a text file with one item per line.
    ///
    /// Each line is either a comma separated list of coordinates or a tagged sample
    /// (see [Sample]); blank lines and lines starting with '#' are skipped.
    ///
    /// Example:
    /// ```txt
    /// # two groups
    /// -8.19,-7.88
    /// -8.06,-6.58
    /// point2:7.3,6.9
    /// ```
    pub fn by_file<P: AsRef<Path>>(file_path: P) -> Result<FeatureSpace> {
        let path = file_path.as_ref();
        let f = File::open(path).map_err(|source| ClusteringError::Io { path: path.to_path_buf(), source })?;
        let f = BufReader::new(f);

        let mut positions: Vec<FeatureVector> = Vec::new();
        for (l, line) in f.lines().enumerate() {
            let content = line.map_err(|source| ClusteringError::Io { path: path.to_path_buf(), source })?;
            let content = content.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }
            let sample = Sample::parse_line(content, l + 1)?;
            positions.push(sample.features());
        }
        tracing::info!(points = positions.len(), path = %path.display(), "loaded points");
        FeatureSpace::by_vectors(positions)
    }

    /// Returns the number of feature vectors.
    pub fn n(&self) -> PointCount {
        self.positions.len()
    }

    /// Returns the common dimension of all feature vectors.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the feature vector of item i.
    pub fn get(&self, i: PointIdx) -> &[Coordinate] {
        &self.positions[i]
    }

    /// Provides an iterator over all feature vectors in item order.
    pub fn iter(&self) -> std::slice::Iter<FeatureVector> {
        self.positions.iter()
    }

    pub fn get_positions(&self) -> Vec<FeatureVector> {
        self.positions.clone()
    }
}
