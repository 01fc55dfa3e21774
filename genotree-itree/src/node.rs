//! Median-partitioned nodes of the centered interval tree.
//!
//! Nodes never own intervals. The tree keeps every interval once in an arena
//! (`&[Interval<I, T>]`) and nodes refer to them by arena index, so the two
//! crossing lists of a node are two orderings of the same index set.

use genotree_core::models::Interval;
use num_traits::{PrimInt, Unsigned};

use crate::config::BuildOptions;
use crate::ordering::IntervalOrder;

/// Everything the recursive build needs besides the intervals of the current
/// partition. Shared read-only by both branches of a fork.
pub(crate) struct BuildContext<'a, I, T, L, H>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    pub arena: &'a [Interval<I, T>],
    pub low_order: &'a L,
    pub high_order: &'a H,
    pub options: &'a BuildOptions,
}

#[derive(Debug, Clone)]
pub(crate) struct Node<I> {
    /// Partition point of this node.
    pub median: I,
    /// Intervals with `high < median`.
    pub left: Option<Box<Node<I>>>,
    /// Intervals with `low > median`.
    pub right: Option<Box<Node<I>>>,
    /// Intervals with `low <= median <= high`, ascending by low.
    pub by_low: Vec<usize>,
    /// The same intervals as `by_low`, descending by high.
    pub by_high: Vec<usize>,
    /// Interval with the smallest `low` anywhere in this subtree.
    pub min_low: usize,
    /// Interval with the greatest `high` anywhere in this subtree.
    pub max_high: usize,
}

///
/// Median of a set of endpoints.
///
/// For an even count this is the truncated mean of the two central values,
/// computed as `a + (b - a) / 2` so it cannot overflow.
///
/// # Returns
/// - `None` if there are no endpoints
pub(crate) fn median_endpoint<I>(mut endpoints: Vec<I>) -> Option<I>
where
    I: PrimInt + Unsigned,
{
    if endpoints.is_empty() {
        return None;
    }
    endpoints.sort_unstable();

    let mid = endpoints.len() / 2;
    let upper = endpoints[mid];
    if endpoints.len() % 2 == 0 {
        let lower = endpoints[mid - 1];
        Some(lower + (upper - lower) / (I::one() + I::one()))
    } else {
        Some(upper)
    }
}

impl<I> Node<I>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    ///
    /// Build the subtree indexing `members` (arena indices).
    ///
    /// # Returns
    /// - `None` for an empty partition, so empty children are never allocated
    pub(crate) fn build<T, L, H>(
        ctx: &BuildContext<'_, I, T, L, H>,
        members: Vec<usize>,
    ) -> Option<Self>
    where
        T: Send + Sync,
        L: IntervalOrder<I, T>,
        H: IntervalOrder<I, T>,
    {
        let arena = ctx.arena;
        let endpoints = members
            .iter()
            .flat_map(|&i| [arena[i].low(), arena[i].high()])
            .collect();
        let median = median_endpoint(endpoints)?;

        let mut lefts = Vec::new();
        let mut rights = Vec::new();
        let mut crossing = Vec::new();
        for idx in members {
            let interval = &arena[idx];
            if interval.high() < median {
                lefts.push(idx);
            } else if interval.low() > median {
                rights.push(idx);
            } else {
                crossing.push(idx);
            }
        }

        // stable sorts: equal keys keep input order
        let mut by_low = crossing.clone();
        by_low.sort_by(|&a, &b| ctx.low_order.compare(&arena[a], &arena[b]));
        let mut by_high = crossing;
        by_high.sort_by(|&a, &b| ctx.high_order.compare(&arena[a], &arena[b]));

        let (left, right) = if ctx.options.should_fork(lefts.len() + rights.len()) {
            rayon::join(|| Self::build(ctx, lefts), || Self::build(ctx, rights))
        } else {
            (Self::build(ctx, lefts), Self::build(ctx, rights))
        };

        let min_low = by_low
            .first()
            .copied()
            .into_iter()
            .chain(left.as_ref().map(|n| n.min_low))
            .chain(right.as_ref().map(|n| n.min_low))
            .min_by_key(|&i| arena[i].low())?;
        let max_high = by_high
            .first()
            .copied()
            .into_iter()
            .chain(left.as_ref().map(|n| n.max_high))
            .chain(right.as_ref().map(|n| n.max_high))
            .max_by_key(|&i| arena[i].high())?;

        Some(Node {
            median,
            left: left.map(Box::new),
            right: right.map(Box::new),
            by_low,
            by_high,
            min_low,
            max_high,
        })
    }

    /// Collect every interval containing `x`.
    pub(crate) fn stab<T>(&self, arena: &[Interval<I, T>], x: I, hits: &mut Vec<usize>) {
        if x < self.median {
            hits.extend(
                self.by_low
                    .iter()
                    .take_while(|&&i| arena[i].low() <= x),
            );
            if let Some(left) = &self.left {
                left.stab(arena, x, hits);
            }
        } else if x > self.median {
            hits.extend(
                self.by_high
                    .iter()
                    .take_while(|&&i| arena[i].high() >= x),
            );
            if let Some(right) = &self.right {
                right.stab(arena, x, hits);
            }
        } else {
            // children never reach the median
            hits.extend_from_slice(&self.by_low);
        }
    }

    /// Collect every interval sharing a position with `[low, high]`.
    ///
    /// Expects `low <= high`.
    pub(crate) fn overlap<T>(
        &self,
        arena: &[Interval<I, T>],
        low: I,
        high: I,
        hits: &mut Vec<usize>,
    ) {
        if high < self.median {
            hits.extend(
                self.by_low
                    .iter()
                    .take_while(|&&i| arena[i].low() <= high),
            );
            if let Some(left) = &self.left {
                left.overlap(arena, low, high, hits);
            }
        } else if low > self.median {
            hits.extend(
                self.by_high
                    .iter()
                    .take_while(|&&i| arena[i].high() >= low),
            );
            if let Some(right) = &self.right {
                right.overlap(arena, low, high, hits);
            }
        } else {
            // the median is inside the query: every crossing interval hits,
            // and either tail of the query may reach into a child
            hits.extend_from_slice(&self.by_low);
            if let Some(left) = &self.left {
                left.overlap(arena, low, high, hits);
            }
            if let Some(right) = &self.right {
                right.overlap(arena, low, high, hits);
            }
        }
    }

    /// Interval with the greatest `high` strictly below `x`.
    pub(crate) fn nearest_left<T>(&self, arena: &[Interval<I, T>], x: I) -> Option<usize> {
        if x <= self.median {
            return self
                .left
                .as_ref()
                .and_then(|left| left.nearest_left(arena, x));
        }

        let crossing = self
            .by_high
            .iter()
            .copied()
            .find(|&i| arena[i].high() < x);
        let right = self
            .right
            .as_ref()
            .and_then(|right| right.nearest_left(arena, x));

        match (crossing, right) {
            (Some(c), Some(r)) if arena[r].high() > arena[c].high() => Some(r),
            (Some(c), _) => Some(c),
            (None, Some(r)) => Some(r),
            // everything on the left ends before the median, hence before x
            (None, None) => self.left.as_ref().map(|left| left.max_high),
        }
    }

    /// Interval with the smallest `low` strictly above `x`.
    pub(crate) fn nearest_right<T>(&self, arena: &[Interval<I, T>], x: I) -> Option<usize> {
        if x >= self.median {
            return self
                .right
                .as_ref()
                .and_then(|right| right.nearest_right(arena, x));
        }

        let crossing = self
            .by_low
            .iter()
            .copied()
            .find(|&i| arena[i].low() > x);
        let left = self
            .left
            .as_ref()
            .and_then(|left| left.nearest_right(arena, x));

        match (crossing, left) {
            (Some(c), Some(l)) if arena[l].low() < arena[c].low() => Some(l),
            (Some(c), _) => Some(c),
            (None, Some(l)) => Some(l),
            (None, None) => self.right.as_ref().map(|right| right.min_low),
        }
    }

    /// Number of nodes in this subtree.
    pub(crate) fn node_count(&self) -> usize {
        1 + self.left.as_ref().map_or(0, |n| n.node_count())
            + self.right.as_ref().map_or(0, |n| n.node_count())
    }

    /// Number of levels in this subtree, counting this node.
    pub(crate) fn depth(&self) -> usize {
        1 + std::cmp::max(
            self.left.as_ref().map_or(0, |n| n.depth()),
            self.right.as_ref().map_or(0, |n| n.depth()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ordering::{HighDescending, LowAscending};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn iv(low: u32, high: u32) -> Interval<u32, usize> {
        Interval::new(low, high, 0).unwrap()
    }

    fn build(arena: &[Interval<u32, usize>], options: &BuildOptions) -> Option<Node<u32>> {
        let ctx = BuildContext {
            arena,
            low_order: &LowAscending,
            high_order: &HighDescending,
            options,
        };
        Node::build(&ctx, (0..arena.len()).collect())
    }

    /// Check the node invariants recursively and return the indices held by
    /// the subtree.
    fn check_subtree(node: &Node<u32>, arena: &[Interval<u32, usize>]) -> Vec<usize> {
        let m = node.median;

        for &i in &node.by_low {
            assert!(arena[i].low() <= m && m <= arena[i].high(), "{i} does not cross {m}");
        }
        let mut low_set = node.by_low.clone();
        let mut high_set = node.by_high.clone();
        low_set.sort();
        high_set.sort();
        assert_eq!(low_set, high_set);

        assert!(node.by_low.windows(2).all(|w| arena[w[0]].low() <= arena[w[1]].low()));
        assert!(node.by_high.windows(2).all(|w| arena[w[0]].high() >= arena[w[1]].high()));

        let mut held = low_set;
        if let Some(left) = &node.left {
            let sub = check_subtree(left, arena);
            assert!(!sub.is_empty());
            assert!(sub.iter().all(|&i| arena[i].high() < m));
            held.extend(sub);
        }
        if let Some(right) = &node.right {
            let sub = check_subtree(right, arena);
            assert!(!sub.is_empty());
            assert!(sub.iter().all(|&i| arena[i].low() > m));
            held.extend(sub);
        }

        let min_low = held.iter().map(|&i| arena[i].low()).min().unwrap();
        let max_high = held.iter().map(|&i| arena[i].high()).max().unwrap();
        assert_eq!(arena[node.min_low].low(), min_low);
        assert_eq!(arena[node.max_high].high(), max_high);

        held
    }

    #[fixture]
    fn arena() -> Vec<Interval<u32, usize>> {
        vec![
            iv(1, 5),
            iv(4, 10),
            iv(12, 12),
            iv(20, 30),
            iv(2, 3),
            iv(25, 26),
            iv(7, 22),
            iv(7, 22),
            iv(40, 41),
            iv(0, 0),
        ]
    }

    #[rstest]
    #[case(vec![7], 7)]
    #[case(vec![1, 5], 3)]
    #[case(vec![1, 4, 5, 10], 4)]
    #[case(vec![10, 1, 5, 4], 4)]
    #[case(vec![3, 4], 3)]
    #[case(vec![u32::MAX - 1, u32::MAX], u32::MAX - 1)]
    #[case(vec![u32::MAX, u32::MAX], u32::MAX)]
    fn test_median_endpoint(#[case] endpoints: Vec<u32>, #[case] expected: u32) {
        assert_eq!(median_endpoint(endpoints), Some(expected));
    }

    #[rstest]
    fn test_median_endpoint_empty() {
        assert_eq!(median_endpoint::<u32>(vec![]), None);
    }

    #[rstest]
    fn test_empty_partition_builds_nothing() {
        assert!(build(&[], &BuildOptions::sequential()).is_none());
    }

    #[rstest]
    fn test_single_interval_is_a_leaf() {
        let arena = vec![iv(3, 9)];
        let node = build(&arena, &BuildOptions::sequential()).unwrap();
        assert_eq!(node.median, 6);
        assert_eq!(node.by_low, vec![0]);
        assert_eq!(node.by_high, vec![0]);
        assert!(node.left.is_none());
        assert!(node.right.is_none());
    }

    #[rstest]
    fn test_partition_invariants(arena: Vec<Interval<u32, usize>>) {
        let node = build(&arena, &BuildOptions::sequential()).unwrap();
        let mut held = check_subtree(&node, &arena);
        held.sort();
        assert_eq!(held, (0..arena.len()).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_disjoint_intervals_leave_root_crossing_empty() {
        // endpoints 1 2 5 6, median 3 falls in the gap
        let arena = vec![iv(1, 2), iv(5, 6)];
        let node = build(&arena, &BuildOptions::sequential()).unwrap();
        assert_eq!(node.median, 3);
        assert!(node.by_low.is_empty());
        assert_eq!(node.left.as_ref().unwrap().by_low, vec![0]);
        assert_eq!(node.right.as_ref().unwrap().by_low, vec![1]);
    }

    #[rstest]
    fn test_duplicates_are_kept() {
        let arena = vec![iv(5, 8), iv(5, 8), iv(5, 8)];
        let node = build(&arena, &BuildOptions::sequential()).unwrap();
        assert_eq!(node.by_low, vec![0, 1, 2]);
        assert_eq!(node.node_count(), 1);
    }

    #[rstest]
    fn test_parallel_build_matches_sequential(arena: Vec<Interval<u32, usize>>) {
        let seq = build(&arena, &BuildOptions::sequential()).unwrap();
        let par = build(&arena, &BuildOptions::parallel(1)).unwrap();

        fn shape(node: &Node<u32>) -> Vec<(u32, Vec<usize>, Vec<usize>)> {
            let mut out = vec![(node.median, node.by_low.clone(), node.by_high.clone())];
            if let Some(left) = &node.left {
                out.extend(shape(left));
            }
            if let Some(right) = &node.right {
                out.extend(shape(right));
            }
            out
        }
        assert_eq!(shape(&seq), shape(&par));
    }

    #[rstest]
    #[case(4, vec![0, 1])]
    #[case(12, vec![2, 6, 7])]
    #[case(11, vec![6, 7])]
    #[case(31, vec![])]
    #[case(7, vec![1, 6, 7])]
    #[case(0, vec![9])]
    #[case(41, vec![8])]
    #[case(100, vec![])]
    fn test_stab(arena: Vec<Interval<u32, usize>>, #[case] x: u32, #[case] expected: Vec<usize>) {
        let node = build(&arena, &BuildOptions::sequential()).unwrap();
        let mut hits = Vec::new();
        node.stab(&arena, x, &mut hits);
        hits.sort();
        assert_eq!(hits, expected);
    }

    #[rstest]
    #[case(5, 11, vec![0, 1, 6, 7])]
    #[case(13, 19, vec![6, 7])]
    #[case(31, 39, vec![])]
    #[case(0, 100, (0..10).collect())]
    #[case(26, 26, vec![3, 5])]
    fn test_overlap(
        arena: Vec<Interval<u32, usize>>,
        #[case] low: u32,
        #[case] high: u32,
        #[case] expected: Vec<usize>,
    ) {
        let node = build(&arena, &BuildOptions::sequential()).unwrap();
        let mut hits = Vec::new();
        node.overlap(&arena, low, high, &mut hits);
        hits.sort();
        assert_eq!(hits, expected);
    }

    #[rstest]
    #[case(35, Some(30))]
    #[case(12, Some(10))]
    #[case(1, Some(0))]
    #[case(0, None)]
    #[case(100, Some(41))]
    fn test_nearest_left(
        arena: Vec<Interval<u32, usize>>,
        #[case] x: u32,
        #[case] expected_high: Option<u32>,
    ) {
        let node = build(&arena, &BuildOptions::sequential()).unwrap();
        let found = node.nearest_left(&arena, x).map(|i| arena[i].high());
        assert_eq!(found, expected_high);
    }

    #[rstest]
    #[case(35, Some(40))]
    #[case(11, Some(12))]
    #[case(0, Some(1))]
    #[case(41, None)]
    #[case(8, Some(12))]
    fn test_nearest_right(
        arena: Vec<Interval<u32, usize>>,
        #[case] x: u32,
        #[case] expected_low: Option<u32>,
    ) {
        let node = build(&arena, &BuildOptions::sequential()).unwrap();
        let found = node.nearest_right(&arena, x).map(|i| arena[i].low());
        assert_eq!(found, expected_low);
    }
}
