extern crate lloyd_kmeans;

use std::env;
use std::process::ExitCode;

use lloyd_kmeans::{cluster_space, ClusteringError, ClusteringProblem, FeatureSpace, OptionalParameters};
use tracing_subscriber::EnvFilter;

// usage: lloyd_kmeans_bin [points-file] [k] [max_iterations] [seed]
// without a points file, 50 random points in [-5, 5]^3 are clustered.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), ClusteringError> {
    let space = match args.first().map(String::as_str) {
        Some(path) if path != "-" => FeatureSpace::by_file(path)?,
        _ => FeatureSpace::new_random(50, 3, 5.0, 0)?,
    };

    let prob = ClusteringProblem {
        k: parse_arg(&args, 1, 3)?,
        max_iterations: parse_arg(&args, 2, 100)?,
        seed: parse_arg(&args, 3, 0)?,
    };

    let optional = OptionalParameters {
        verbose: Some(2),
        thread_count: Some(0),
        ..Default::default()
    };
    let (clustering, total_time) = cluster_space(&space, &prob, Some(optional))?;

    for (c, members) in clustering.clusters().iter().enumerate() {
        tracing::info!(
            cluster = c,
            hue = clustering.hue(c),
            size = members.len(),
            centroid = clustering.centroids()[c],
            mean = ?clustering.means()[c],
            "cluster"
        );
    }
    println!("{}", clustering);
    println!("running time: {:.6}s", total_time);
    Ok(())
}

fn parse_arg<V: std::str::FromStr>(args: &[String], i: usize, default: V) -> Result<V, ClusteringError> {
    match args.get(i) {
        None => Ok(default),
        Some(value) => value.parse::<V>().map_err(|_| ClusteringError::Parse {
            line: 0,
            reason: format!("argument {} ('{}') is not a valid number", i + 1, value),
        }),
    }
}
