use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use genotree_itree::{BuildOptions, HighDescending, Interval, IntervalTree, LowAscending, Overlapper};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rstest::*;

type Feature = Interval<u32, usize>;

/// Random intervals tagged with their position in the input, biased towards
/// shared endpoints so ties at the median come up often.
fn random_features(seed: u64, n: usize, span: u32, max_len: u32) -> Vec<Feature> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|id| {
            let low = rng.gen_range(0..span) / 4 * 4;
            let high = low + rng.gen_range(0..=max_len);
            Interval::new(low, high, id).unwrap()
        })
        .collect()
}

fn ids<'a>(hits: impl IntoIterator<Item = &'a Feature>) -> Vec<usize> {
    let mut ids: Vec<usize> = hits.into_iter().map(|i| *i.val()).collect();
    ids.sort();
    ids
}

fn brute_point(features: &[Feature], x: u32) -> Vec<usize> {
    ids(features.iter().filter(|f| f.contains(x)))
}

fn brute_range(features: &[Feature], low: u32, high: u32) -> Vec<usize> {
    ids(features.iter().filter(|f| f.overlaps(low, high)))
}

#[fixture]
fn features() -> Vec<Feature> {
    random_features(7, 500, 2_000, 120)
}

#[rstest]
#[case(1, 1, 10, 3)]
#[case(2, 50, 100, 10)]
#[case(3, 1_000, 5_000, 300)]
#[case(4, 300, 50, 50)]
#[case(5, 200, 1_000, 0)]
fn test_stabbing_matches_brute_force(
    #[case] seed: u64,
    #[case] n: usize,
    #[case] span: u32,
    #[case] max_len: u32,
) {
    let features = random_features(seed, n, span, max_len);
    let tree = IntervalTree::build(features.clone());

    for x in 0..(span + max_len + 2) {
        assert_eq!(ids(tree.find_point(x)), brute_point(&features, x), "point {x}");
    }
}

#[rstest]
fn test_range_matches_brute_force(features: Vec<Feature>) {
    let tree = IntervalTree::build(features.clone());
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..2_000 {
        let low = rng.gen_range(0..2_200);
        let high = low + rng.gen_range(0..400);
        let expected = brute_range(&features, low, high);
        assert_eq!(ids(tree.find_range(low, high)), expected, "range [{low}, {high}]");
        assert_eq!(ids(tree.find_iter(low, high)), expected, "iter [{low}, {high}]");
        assert_eq!(tree.count(low, high), expected.len());
    }
}

#[rstest]
fn test_insertion_order_does_not_matter(features: Vec<Feature>) {
    let tree = IntervalTree::build(features.clone());

    let mut shuffled = features.clone();
    shuffled.shuffle(&mut StdRng::seed_from_u64(3));
    let shuffled_tree = IntervalTree::build(shuffled);

    for x in (0..2_200).step_by(7) {
        assert_eq!(ids(tree.find_point(x)), ids(shuffled_tree.find_point(x)));
        assert_eq!(
            ids(tree.find_range(x, x + 40)),
            ids(shuffled_tree.find_range(x, x + 40))
        );
    }
}

#[rstest]
fn test_repeated_queries_are_identical(features: Vec<Feature>) {
    let tree = IntervalTree::build(features);
    for x in [0, 17, 512, 1_999] {
        let first: HashSet<usize> = tree.find_point(x).iter().map(|i| *i.val()).collect();
        let second: HashSet<usize> = tree.find_point(x).iter().map(|i| *i.val()).collect();
        assert_eq!(first, second);
    }
}

#[rstest]
fn test_parallel_and_sequential_builds_agree(features: Vec<Feature>) {
    let seq = IntervalTree::build_with(
        features.clone(),
        &LowAscending,
        &HighDescending,
        &BuildOptions::sequential(),
    );
    let par = IntervalTree::build_with(
        features,
        &LowAscending,
        &HighDescending,
        &BuildOptions::parallel(8),
    );

    assert_eq!(seq.depth(), par.depth());
    for x in (0..2_200).step_by(3) {
        assert_eq!(ids(seq.find_point(x)), ids(par.find_point(x)));
    }
}

#[rstest]
fn test_all_intervals_cross_a_common_point() {
    let features: Vec<Feature> = (0..100)
        .map(|i| Interval::new(500 - i, 500 + 2 * i, i as usize).unwrap())
        .collect();
    let tree = IntervalTree::build(features.clone());

    assert_eq!(tree.find_point(500).len(), 100);
    assert_eq!(ids(tree.find_point(450)), brute_point(&features, 450));
    assert_eq!(ids(tree.find_point(650)), brute_point(&features, 650));
    assert_eq!(ids(tree.find_range(0, 400)), brute_range(&features, 0, 400));
}

#[rstest]
fn test_all_intervals_identical() {
    let features: Vec<Feature> = (0..64).map(|id| Interval::new(10, 20, id).unwrap()).collect();
    let tree = IntervalTree::build(features);

    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.find_point(15).len(), 64);
    assert_eq!(tree.find_range(20, 30).len(), 64);
    assert!(tree.find_point(21).is_empty());
}

#[rstest]
fn test_depth_is_logarithmic() {
    let features: Vec<Feature> = (0..4_096)
        .map(|id| Interval::new(id as u32 * 10, id as u32 * 10 + 5, id).unwrap())
        .collect();
    let tree = IntervalTree::build(features);

    // disjoint intervals: every split at least halves the partition
    assert!(tree.depth() <= 13, "depth {}", tree.depth());
}

#[rstest]
fn test_nearest_matches_brute_force(features: Vec<Feature>) {
    let tree = IntervalTree::build(features.clone());

    for x in (0..2_300).step_by(11) {
        let best_left = features.iter().filter(|f| f.high() < x).map(|f| f.high()).max();
        let best_right = features.iter().filter(|f| f.low() > x).map(|f| f.low()).min();
        assert_eq!(tree.nearest_left(x).map(|f| f.high()), best_left, "left of {x}");
        assert_eq!(tree.nearest_right(x).map(|f| f.low()), best_right, "right of {x}");
    }
}

#[rstest]
fn test_concurrent_queries(features: Vec<Feature>) {
    let tree = Arc::new(IntervalTree::build(features.clone()));
    let features = Arc::new(features);

    let handles: Vec<_> = (0..4u32)
        .map(|t| {
            let tree = Arc::clone(&tree);
            let features = Arc::clone(&features);
            thread::spawn(move || {
                for x in (t..2_100).step_by(4) {
                    assert_eq!(ids(tree.find_point(x)), brute_point(&features, x));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[rstest]
fn test_wide_coordinates() {
    let features = vec![
        Interval::new(0u64, u64::MAX, "all").unwrap(),
        Interval::new(u64::MAX - 1, u64::MAX, "tail").unwrap(),
        Interval::new(0, 0, "head").unwrap(),
    ];
    let tree = IntervalTree::build(features);

    let mut tail: Vec<&str> = tree.query_point(u64::MAX).into_iter().copied().collect();
    tail.sort();
    assert_eq!(tail, vec!["all", "tail"]);
    assert_eq!(tree.query_point(0).len(), 2);
    assert_eq!(tree.query_range(1, 2), vec![&"all"]);
}
