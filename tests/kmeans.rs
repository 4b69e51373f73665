use lloyd_kmeans::{
    cluster, cluster_space, compute_kmeans_clustering, Aabb, ClusteringError, ClusteringProblem, CoordinateGetter,
    DistanceFunction, Euclidean, FeatureSpace, LloydState, Manhattan, OptionalParameters, Point2, Point3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

fn separated_points() -> Vec<Point2> {
    vec![Point2::new(0.0, 0.0), Point2::new(0.0, 1.0), Point2::new(10.0, 10.0), Point2::new(10.0, 11.0)]
}

fn random_points(n: usize, seed: u64) -> Vec<Point3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point3::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0)))
        .collect()
}

#[rstest]
fn separated_groups_for_every_seed(#[values(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 1234)] seed: u64) {
    let points = separated_points();
    let result = cluster(&points, 2, 10, seed, None, None).unwrap();

    assert!(result.is_converged());
    assert!(result.iterations() <= 3, "seed {} needed {} iterations", seed, result.iterations());

    let low = result.labels()[0];
    let high = 1 - low;
    assert_eq!(result.cluster_of(low), &[Point2::new(0.0, 0.0), Point2::new(0.0, 1.0)]);
    assert_eq!(result.cluster_of(high), &[Point2::new(10.0, 10.0), Point2::new(10.0, 11.0)]);
    assert_eq!(result.means()[low], vec![0.0, 0.5]);
    assert_eq!(result.means()[high], vec![10.0, 10.5]);
    assert_eq!(result.total_distance(), 2.0);
}

#[rstest]
#[case(20, 1)]
#[case(50, 3)]
#[case(200, 7)]
#[case(13, 13)]
fn every_item_in_exactly_one_cluster(#[case] n: usize, #[case] k: usize) {
    for seed in 0..5 {
        let points = random_points(n, seed);
        let result = cluster(&points, k, 100, seed, None, None).unwrap();
        assert_eq!(result.k(), k);
        assert_eq!(result.cluster_sizes().iter().sum::<usize>(), n);
        assert_eq!(result.labels().len(), n);
        for (c, members) in result.clusters().iter().enumerate() {
            let expected: Vec<Point3> =
                points.iter().zip(result.labels()).filter(|(_, l)| **l == c).map(|(p, _)| *p).collect();
            assert_eq!(members, &expected);
        }
    }
}

#[test]
fn identical_arguments_give_identical_results() {
    let points = random_points(300, 11);
    let a = cluster(&points, 5, 100, 42, None, None).unwrap();
    let b = cluster(&points, 5, 100, 42, None, None).unwrap();
    assert_eq!(a.labels(), b.labels());
    assert_eq!(a.means(), b.means());
    assert_eq!(a.centroids(), b.centroids());
    assert_eq!(a.total_distance().to_bits(), b.total_distance().to_bits());
}

#[test]
fn thread_count_does_not_change_the_result() {
    let points = random_points(400, 3);
    let prob = ClusteringProblem { k: 6, max_iterations: 100, seed: 8 };
    let run = |threads: Option<usize>| {
        let optional = OptionalParameters { verbose: Some(0), thread_count: threads, ..Default::default() };
        compute_kmeans_clustering(&points, &prob, &lloyd_kmeans::Builtin, Some(optional)).unwrap().0
    };
    let sequential = run(None);
    for threads in [Some(2), Some(4), Some(0)] {
        let parallel = run(threads);
        assert_eq!(sequential.labels(), parallel.labels());
        assert_eq!(sequential.means(), parallel.means());
        assert_eq!(sequential.total_distance().to_bits(), parallel.total_distance().to_bits());
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
fn never_exceeds_the_iteration_bound(#[case] max_iterations: usize) {
    for seed in 0..10 {
        let points = random_points(120, seed);
        let result = cluster(&points, 8, max_iterations, seed, None, None).unwrap();
        assert!(result.iterations() >= 1);
        assert!(result.iterations() <= max_iterations);
        if result.iterations() < max_iterations {
            assert_eq!(result.state(), LloydState::Converged);
        }
    }
}

#[test]
fn iteration_limit_is_reported() {
    // (0,1) and (0,0) as first centroids put both far points next to (0,1); the first iteration
    // moves (0,1) over to (0,0)
    let points = separated_points();
    let result = cluster(&points, 2, 1, 0, None, Some(&[1, 0])).unwrap();
    assert_eq!(result.iterations(), 1);
    assert_eq!(result.state(), LloydState::IterationLimitReached);
    assert!(!result.is_converged());
    assert_eq!(result.cluster_sizes().iter().sum::<usize>(), 4);
}

#[test]
fn single_cluster() {
    let points = random_points(40, 5);
    let result = cluster(&points, 1, 10, 5, None, None).unwrap();
    assert_eq!(result.iterations(), 1);
    assert!(result.is_converged());
    assert_eq!(result.cluster_of(0), points.as_slice());

    let n = points.len() as f64;
    let average = [
        points.iter().map(|p| p.x).sum::<f64>() / n,
        points.iter().map(|p| p.y).sum::<f64>() / n,
        points.iter().map(|p| p.z).sum::<f64>() / n,
    ];
    for (m, a) in result.means()[0].iter().zip(average.iter()) {
        assert!((m - a).abs() < 1e-9);
    }

    let distances: Vec<f64> =
        points.iter().map(|p| Euclidean.dist(&[p.x, p.y, p.z], &result.means()[0])).collect();
    let closest = (0..distances.len()).fold(0, |best, i| if distances[i] < distances[best] { i } else { best });
    assert_eq!(result.centroids(), &[closest]);
}

#[test]
fn one_cluster_per_item() {
    let points = random_points(12, 9);
    let seeds: Vec<usize> = (0..points.len()).collect();
    let result = cluster(&points, points.len(), 10, 0, None, Some(seeds.as_slice())).unwrap();
    assert!(result.is_converged());
    assert_eq!(result.total_distance(), 0.0);
    assert!(result.cluster_sizes().iter().all(|&s| s == 1));
    assert_eq!(result.labels(), &seeds);
}

#[test]
fn seed_centroids_ignore_the_random_seed() {
    let points = random_points(80, 2);
    let first = cluster(&points, 4, 1, 0, None, Some(&[3, 17, 42, 77])).unwrap();
    for seed in 1..10 {
        let other = cluster(&points, 4, 1, seed, None, Some(&[3, 17, 42, 77])).unwrap();
        assert_eq!(first.labels(), other.labels());
        assert_eq!(first.means(), other.means());
    }
}

#[test]
fn boxes_cluster_by_center_only() {
    let boxes = vec![
        Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(100.0, 100.0, 100.0)),
        Aabb::new(Point3::new(0.5, 0.0, 0.0), Point3::new(0.1, 0.1, 0.1)),
        Aabb::new(Point3::new(20.0, 20.0, 20.0), Point3::new(0.1, 0.1, 0.1)),
        Aabb::new(Point3::new(20.0, 20.5, 20.0), Point3::new(50.0, 50.0, 50.0)),
    ];
    let result = cluster(&boxes, 2, 10, 0, None, Some(&[0, 2])).unwrap();
    assert_eq!(result.labels(), &vec![0, 0, 1, 1]);
    assert_eq!(result.means()[0], vec![0.25, 0.0, 0.0]);
}

#[test]
fn custom_distance_functions() {
    let points = separated_points();
    let with_manhattan = cluster(&points, 2, 10, 0, Some(&Manhattan), Some(&[0, 3])).unwrap();
    assert_eq!(with_manhattan.labels(), &vec![0, 0, 1, 1]);
    assert_eq!(with_manhattan.total_distance(), 2.0);

    let max_norm = |a: &[f64], b: &[f64]| a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max);
    let with_closure = cluster(&points, 2, 10, 0, Some(&max_norm), Some(&[0, 3])).unwrap();
    assert_eq!(with_closure.labels(), &vec![0, 0, 1, 1]);
}

#[test]
fn coordinate_getter_for_foreign_types() {
    #[derive(Clone, Debug, PartialEq)]
    struct Star {
        name: &'static str,
        ra: f64,
        dec: f64,
    }
    let stars = vec![
        Star { name: "a", ra: 1.0, dec: 1.0 },
        Star { name: "b", ra: 1.2, dec: 0.9 },
        Star { name: "c", ra: 50.0, dec: 40.0 },
    ];
    let getter = CoordinateGetter::new().with(|s: &Star| s.ra).with(|s: &Star| s.dec);
    let prob = ClusteringProblem { k: 2, max_iterations: 10, seed: 0 };
    let optional = OptionalParameters { initial_centroids: Some(vec![0, 2]), ..Default::default() };
    let (result, running_time) = compute_kmeans_clustering(&stars, &prob, &getter, Some(optional)).unwrap();
    assert!(running_time >= 0.0);
    let names: Vec<&str> = result.cluster_of(0).iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn cluster_feature_space_directly() {
    let space = FeatureSpace::by_2dpoints(vec![(0.0, 0.0), (0.0, 1.0), (10.0, 10.0), (10.0, 11.0)]).unwrap();
    let prob = ClusteringProblem::new(2);
    let (result, _) = cluster_space(&space, &prob, None).unwrap();
    let low = result.labels()[0];
    assert_eq!(result.cluster_of(low), &[0, 1]);
    assert_eq!(result.cluster_of(1 - low), &[2, 3]);
}

#[test]
fn empty_input() {
    let points: Vec<Point2> = Vec::new();
    assert!(matches!(cluster(&points, 1, 10, 0, None, None), Err(ClusteringError::EmptyInput)));
}

#[rstest]
#[case(0)]
#[case(5)]
fn invalid_cluster_count(#[case] k: usize) {
    match cluster(&separated_points(), k, 10, 0, None, None) {
        Err(ClusteringError::InvalidClusterCount { k: found, n: 4 }) => assert_eq!(found, k),
        other => panic!("expected InvalidClusterCount, got {:?}", other.map(|r| r.labels().clone())),
    }
}

#[test]
fn invalid_iteration_count() {
    assert!(matches!(
        cluster(&separated_points(), 2, 0, 0, None, None),
        Err(ClusteringError::InvalidIterationCount)
    ));
}

#[test]
fn invalid_centroid_indices() {
    assert!(matches!(
        cluster(&separated_points(), 2, 10, 0, None, Some(&[0])),
        Err(ClusteringError::InvalidCentroidIndices(_))
    ));
    assert!(matches!(
        cluster(&separated_points(), 2, 10, 0, None, Some(&[0, 4])),
        Err(ClusteringError::InvalidCentroidIndices(_))
    ));
}

#[test]
fn mismatched_dimensions() {
    let tuples: Vec<Vec<f64>> = vec![vec![0.0, 0.0], vec![1.0, 1.0, 1.0], vec![2.0, 2.0]];
    match cluster(&tuples, 2, 10, 0, None, None) {
        Err(ClusteringError::DimensionMismatch { expected: 2, found: 3, index: 1 }) => {}
        other => panic!("expected DimensionMismatch, got {:?}", other.map(|r| r.labels().clone())),
    }
}

#[test]
fn missing_extraction_rule() {
    let items = vec!["a".to_string(), "b".to_string()];
    let getter: CoordinateGetter<String> = CoordinateGetter::new();
    let prob = ClusteringProblem::new(1);
    assert!(matches!(
        compute_kmeans_clustering(&items, &prob, &getter, None),
        Err(ClusteringError::UnsupportedItemType(_))
    ));
}
