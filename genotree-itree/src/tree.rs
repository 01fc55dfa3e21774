use genotree_core::errors::IntervalError;
use genotree_core::models::Interval;
use log::{Level, debug, log_enabled};
use num_traits::{PrimInt, Unsigned};

use super::Overlapper;
use crate::config::BuildOptions;
use crate::node::{BuildContext, Node};
use crate::ordering::{HighDescending, IntervalOrder, LowAscending};

/// A centered interval tree for stabbing and overlap queries over a static set of
/// closed intervals.
///
/// Every node holds a median coordinate, the intervals that cross it (kept twice,
/// ascending by low end and descending by high end) and at most two children
/// holding the intervals entirely left and entirely right of the median.
/// Construction is `O(n log n)` and a query costs `O(log n + k)` for `k` hits.
///
/// The tree is immutable once built and can be queried from many threads at once.
/// An empty input builds an empty tree, and queries on it return nothing.
///
/// # Examples
///
/// ```
/// use genotree_itree::{IntervalTree, Overlapper, Interval};
///
/// let exons = vec![
///     Interval::new(1u32, 5, "a").unwrap(),
///     Interval::new(4, 10, "b").unwrap(),
///     Interval::new(12, 12, "c").unwrap(),
/// ];
/// let tree = IntervalTree::build(exons);
///
/// let mut hits = tree.query_point(4);
/// hits.sort();
/// assert_eq!(hits, vec![&"a", &"b"]);
/// assert!(tree.query_point(11).is_empty());
/// assert_eq!(tree.query_range(5, 11).len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct IntervalTree<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    /// Every indexed interval, in input order. Nodes refer into this list.
    intervals: Vec<Interval<I, T>>,
    root: Option<Node<I>>,
}

impl<I, T> IntervalTree<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Send + Sync,
{
    ///
    /// Build a tree with explicit ordering policies and options.
    ///
    /// # Arguments
    /// - intervals: the intervals to index, in any order
    /// - low_order: order of the crossing lists scanned from the low end
    /// - high_order: order of the crossing lists scanned from the high end
    /// - options: build scheduling
    ///
    pub fn build_with<L, H>(
        intervals: Vec<Interval<I, T>>,
        low_order: &L,
        high_order: &H,
        options: &BuildOptions,
    ) -> Self
    where
        L: IntervalOrder<I, T>,
        H: IntervalOrder<I, T>,
    {
        let ctx = BuildContext {
            arena: &intervals,
            low_order,
            high_order,
            options,
        };
        let root = Node::build(&ctx, (0..intervals.len()).collect());

        if log_enabled!(Level::Debug) {
            match &root {
                Some(node) => debug!(
                    "Built interval tree: {} intervals, {} nodes, depth {}",
                    intervals.len(),
                    node.node_count(),
                    node.depth()
                ),
                None => debug!("Built empty interval tree"),
            }
        }

        IntervalTree { intervals, root }
    }

    ///
    /// Validate `(low, high, value)` triples and build a tree from them with the
    /// default policies.
    ///
    /// The first triple with `low > high` aborts the whole build.
    ///
    pub fn try_build<It>(triples: It) -> Result<Self, IntervalError>
    where
        It: IntoIterator<Item = (I, I, T)>,
    {
        let intervals = triples
            .into_iter()
            .map(|(low, high, val)| Interval::new(low, high, val))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::build_with(
            intervals,
            &LowAscending,
            &HighDescending,
            &BuildOptions::default(),
        ))
    }
}

impl<I, T> IntervalTree<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    /// All intervals containing `x`.
    pub fn find_point(&self, x: I) -> Vec<&Interval<I, T>> {
        let mut hits = Vec::new();
        if let Some(root) = &self.root {
            root.stab(&self.intervals, x, &mut hits);
        }
        self.resolve(hits)
    }

    /// All intervals sharing at least one position with `[low, high]`.
    ///
    /// An inverted range (`low > high`) matches nothing.
    pub fn find_range(&self, low: I, high: I) -> Vec<&Interval<I, T>> {
        let mut hits = Vec::new();
        if low <= high {
            if let Some(root) = &self.root {
                root.overlap(&self.intervals, low, high, &mut hits);
            }
        }
        self.resolve(hits)
    }

    /// Payloads of all intervals containing `x`.
    pub fn query_point(&self, x: I) -> Vec<&T> {
        self.find_point(x).into_iter().map(Interval::val).collect()
    }

    /// Payloads of all intervals overlapping `[low, high]`.
    pub fn query_range(&self, low: I, high: I) -> Vec<&T> {
        self.find_range(low, high)
            .into_iter()
            .map(Interval::val)
            .collect()
    }

    /// Lazily iterate the intervals overlapping `[start, stop]`.
    ///
    /// Yields the same intervals as [`find_range`](Self::find_range), possibly in
    /// another order.
    pub fn find_iter(&self, start: I, stop: I) -> IterFind<'_, I, T> {
        IterFind::new(self, start, stop)
    }

    /// The interval ending closest before `x` (greatest `high < x`).
    ///
    /// Useful for naming the upstream neighbour of a position that hits nothing.
    pub fn nearest_left(&self, x: I) -> Option<&Interval<I, T>> {
        let root = self.root.as_ref()?;
        root.nearest_left(&self.intervals, x)
            .map(|idx| &self.intervals[idx])
    }

    /// The interval starting closest after `x` (smallest `low > x`).
    pub fn nearest_right(&self, x: I) -> Option<&Interval<I, T>> {
        let root = self.root.as_ref()?;
        root.nearest_right(&self.intervals, x)
            .map(|idx| &self.intervals[idx])
    }

    /// Number of indexed intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the tree indexes no intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Number of node levels; `0` for an empty tree.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.depth())
    }

    /// Iterate over every indexed interval in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Interval<I, T>> {
        self.intervals.iter()
    }

    fn resolve(&self, hits: Vec<usize>) -> Vec<&Interval<I, T>> {
        hits.into_iter().map(|idx| &self.intervals[idx]).collect()
    }
}

impl<I, T> Overlapper<I, T> for IntervalTree<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Clone + Send + Sync,
{
    /// Create a new tree with the stock ordering policies and default options.
    /// ```
    /// use genotree_itree::{IntervalTree, Overlapper, Interval};
    ///
    /// let data = (0u32..20)
    ///     .step_by(5)
    ///     .map(|x| Interval::new(x, x + 9, true).unwrap())
    ///     .collect::<Vec<_>>();
    /// let tree = IntervalTree::build(data);
    /// assert_eq!(tree.len(), 4);
    /// ```
    fn build(intervals: Vec<Interval<I, T>>) -> Self {
        IntervalTree::build_with(
            intervals,
            &LowAscending,
            &HighDescending,
            &BuildOptions::default(),
        )
    }

    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>> {
        self.find_range(start, end).into_iter().cloned().collect()
    }

    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        Box::new(IterFind::new(self, start, end))
    }

    fn find_point<'a>(&'a self, x: I) -> Vec<&'a Interval<I, T>> {
        IntervalTree::find_point(self, x)
    }
}

impl<'a, I, T> IntoIterator for &'a IntervalTree<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Interval<I, T>;
    type IntoIter = std::slice::Iter<'a, Interval<I, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

/// How the crossing list of the current node is being walked.
#[derive(Debug, Clone, Copy)]
enum Scan {
    /// The median lies inside the query: every entry hits.
    All,
    /// Ascending by low, hits while `low <= stop`.
    LowUpTo,
    /// Descending by high, hits while `high >= start`.
    HighDownTo,
}

/// An iterator over the intervals of an [`IntervalTree`] that overlap a query range.
///
/// Created by [`IntervalTree::find_iter`] and by
/// [`find_iter`](Overlapper::find_iter). Nodes still to visit are kept on an
/// explicit stack, so no result vector is allocated.
///
/// # Examples
///
/// ```
/// use genotree_itree::{IntervalTree, Overlapper, Interval};
///
/// let tree = IntervalTree::build(vec![
///     Interval::new(10u32, 20, "a").unwrap(),
///     Interval::new(15, 25, "b").unwrap(),
/// ]);
///
/// for interval in tree.find_iter(12, 18) {
///     println!("Found: {}", interval.val());
/// }
/// assert_eq!(tree.find_iter(21, 30).count(), 1);
/// ```
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    inner: &'a IntervalTree<I, T>,
    stack: Vec<&'a Node<I>>,
    current: &'a [usize],
    scan: Scan,
    start: I,
    stop: I,
}

impl<'a, I, T> IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    fn new(tree: &'a IntervalTree<I, T>, start: I, stop: I) -> Self {
        let stack = match &tree.root {
            Some(root) if start <= stop => vec![root],
            _ => Vec::new(),
        };
        Self {
            inner: tree,
            stack,
            current: &[],
            scan: Scan::All,
            start,
            stop,
        }
    }
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    type Item = &'a Interval<I, T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((&idx, rest)) = self.current.split_first() {
                let interval = &self.inner.intervals[idx];
                let hit = match self.scan {
                    Scan::All => true,
                    Scan::LowUpTo => interval.low() <= self.stop,
                    Scan::HighDownTo => interval.high() >= self.start,
                };
                if hit {
                    self.current = rest;
                    return Some(interval);
                }
                // sorted list: nothing after the first miss can hit
                self.current = &[];
                continue;
            }

            let node = self.stack.pop()?;
            if self.stop < node.median {
                self.scan = Scan::LowUpTo;
                self.current = &node.by_low;
                self.stack.extend(node.left.as_deref());
            } else if self.start > node.median {
                self.scan = Scan::HighDownTo;
                self.current = &node.by_high;
                self.stack.extend(node.right.as_deref());
            } else {
                self.scan = Scan::All;
                self.current = &node.by_low;
                self.stack.extend(node.left.as_deref());
                self.stack.extend(node.right.as_deref());
            }
        }
    }
}
