use pyo3::create_exception;
use pyo3::prelude::{pyclass, pymethods, PyAny, PyErr, PyModule, PyResult, Python};

use crate::assertions::assert_problem_parameters;
use crate::clustering::ClusterResult;
use crate::error::ClusteringError;
use crate::features::FeatureSpace;
use crate::types::{ClusterCount, ClusterIdx, Coordinate, Distance, DurationInSec, FeatureVector, IterationCount, PointIdx, Seed};
use crate::{cluster_space, ClusteringProblem, OptionalParameters};

create_exception!(lloyd_kmeans, InvalidClusteringProblemError, pyo3::exceptions::PyException);
create_exception!(lloyd_kmeans, ClusteringMissingError, pyo3::exceptions::PyException);
create_exception!(lloyd_kmeans, DimensionMismatchError, pyo3::exceptions::PyException);
create_exception!(lloyd_kmeans, UnsupportedItemTypeError, pyo3::exceptions::PyException);

const NOCLUSTERING: &str = "No clustering computed yet. Run fit(data).";

impl From<ClusteringError> for PyErr {
    fn from(error: ClusteringError) -> PyErr {
        let msg = error.to_string();
        match error {
            ClusteringError::DimensionMismatch { .. } => DimensionMismatchError::new_err(msg),
            ClusteringError::UnsupportedItemType(_) => UnsupportedItemTypeError::new_err(msg),
            _ => InvalidClusteringProblemError::new_err(msg),
        }
    }
}

pub(crate) fn add_exceptions(py: Python, m: &PyModule) -> PyResult<()> {
    m.add("InvalidClusteringProblemError", py.get_type::<InvalidClusteringProblemError>())?;
    m.add("ClusteringMissingError", py.get_type::<ClusteringMissingError>())?;
    m.add("DimensionMismatchError", py.get_type::<DimensionMismatchError>())?;
    m.add("UnsupportedItemTypeError", py.get_type::<UnsupportedItemTypeError>())?;
    Ok(())
}

#[pyclass]
pub(crate) struct KMeans {
    // parameters
    prob: ClusteringProblem,

    // data
    space: Option<FeatureSpace>,

    // attributes
    clustering: Option<ClusterResult<PointIdx>>,

    // information
    running_time: Option<DurationInSec>,
}

impl KMeans {
    fn get_clustering(&self) -> PyResult<&ClusterResult<PointIdx>> {
        self.clustering.as_ref().ok_or_else(|| ClusteringMissingError::new_err(NOCLUSTERING))
    }
}

#[pymethods]
impl KMeans {
    #[new]
    #[args(k, max_iterations = "100", seed = "0")]
    fn new(k: ClusterCount, max_iterations: IterationCount, seed: Seed) -> PyResult<KMeans> {
        let prob = ClusteringProblem { k, max_iterations, seed };
        assert_problem_parameters(&prob)?;
        Ok(KMeans { prob, space: None, clustering: None, running_time: None })
    }

    #[getter]
    fn get_k(&self) -> ClusterCount {
        self.prob.k
    }

    #[getter]
    fn get_max_iterations(&self) -> IterationCount {
        self.prob.max_iterations
    }

    #[getter]
    fn get_seed(&self) -> Seed {
        self.prob.seed
    }

    /// Executes the algorithm.
    ///
    /// # Input:
    /// * 2d-Array. An array of datapoints, each an array of dimension-many floats.
    ///
    /// # Optional input as keyword-arguments:
    /// * centroids = None (list of k point indices used as initial centroids; seed has no effect then)
    /// * verbose = 1 (0: silent, 1: brief, 2: verbose)
    /// * thread_count = #cores (number of threads for centroid selection and reassignment)
    ///
    /// The output can be accessed via model.labels, model.means, model.centroids, ...
    #[args(data, "*", centroids = "None", verbose = "1", thread_count = "0")]
    fn fit(&mut self, data: &PyAny, centroids: Option<Vec<PointIdx>>, verbose: u8, thread_count: usize) -> PyResult<()> {
        let positions: Vec<FeatureVector> = match data.extract() {
            Ok(positions) => positions,
            Err(_) => {
                let type_name = data.get_type().name()?.to_string();
                return Err(ClusteringError::UnsupportedItemType(type_name).into());
            }
        };
        self.clustering = None;
        self.running_time = None;
        let space = FeatureSpace::by_vectors(positions)?;

        let optional = OptionalParameters {
            verbose: Some(verbose),
            thread_count: Some(thread_count),
            distance: None,
            initial_centroids: centroids,
        };
        let (clustering, total_time) = cluster_space(&space, &self.prob, Some(optional))?;
        self.space = Some(space);
        self.clustering = Some(clustering);
        self.running_time = Some(total_time);
        Ok(())
    }

    #[getter]
    fn get_data(&self) -> Option<Vec<FeatureVector>> {
        self.space.as_ref().map(|space| space.get_positions())
    }

    /// Returns the cluster index (0, 1, ..., k-1) for each point.
    #[getter]
    fn get_labels(&self) -> PyResult<Vec<ClusterIdx>> {
        Ok(self.get_clustering()?.labels().clone())
    }

    /// Returns for each cluster the list of point indices in this cluster.
    #[getter]
    fn get_clusters(&self) -> PyResult<Vec<Vec<PointIdx>>> {
        Ok(self.get_clustering()?.clusters().to_vec())
    }

    #[getter]
    fn get_means(&self) -> PyResult<Vec<Vec<Coordinate>>> {
        Ok(self.get_clustering()?.means().clone())
    }

    /// Returns for each cluster the index of the data point closest to its mean.
    #[getter]
    fn get_centroids(&self) -> PyResult<Vec<PointIdx>> {
        Ok(self.get_clustering()?.centroids().to_vec())
    }

    #[getter]
    fn get_total_distance(&self) -> PyResult<Distance> {
        Ok(self.get_clustering()?.total_distance())
    }

    #[getter]
    fn get_iterations(&self) -> PyResult<IterationCount> {
        Ok(self.get_clustering()?.iterations())
    }

    /// False if the iteration stopped because max_iterations was reached.
    #[getter]
    fn get_converged(&self) -> PyResult<bool> {
        Ok(self.get_clustering()?.is_converged())
    }

    /// Return as float specifying the running time of the computation in sec.
    #[getter]
    fn get_running_time(&self) -> PyResult<DurationInSec> {
        self.running_time.ok_or_else(|| ClusteringMissingError::new_err(NOCLUSTERING))
    }
}
