use rayon::prelude::*;
use rayon::ThreadPool;

use crate::error::Result;
use crate::types::{Distance, PointCount};

/// Evaluates f(0), ..., f(n-1) and returns the values in index order.
///
/// With a thread pool the evaluations are spread over its threads, otherwise they run on the
/// calling thread. The output (and which error is reported) does not depend on the pool.
pub(crate) fn map_items<R, F>(n: PointCount, pool: Option<&ThreadPool>, f: F) -> Result<Vec<R>>
where
    R: Send,
    F: Fn(usize) -> Result<R> + Sync + Send,
{
    match pool {
        Some(thread_pool) => thread_pool.install(|| {
            let values: Vec<Result<R>> = (0..n).into_par_iter().map(&f).collect();
            values.into_iter().collect()
        }),
        None => (0..n).map(f).collect(),
    }
}

/// Returns the position and value of the first strict minimum of distances.
/// Candidates that are not smaller than Distance::MAX are never chosen.
pub(crate) fn first_min<I: IntoIterator<Item = Distance>>(distances: I) -> Option<(usize, Distance)> {
    let mut current: Option<(usize, Distance)> = None;
    let mut current_distance = Distance::MAX;
    for (i, d) in distances.into_iter().enumerate() {
        if d < current_distance {
            current_distance = d;
            current = Some((i, d));
        }
    }
    current
}
