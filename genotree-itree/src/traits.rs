use num_traits::{PrimInt, Unsigned};

pub use genotree_core::models::Interval;

/// A static index answering overlap queries over closed intervals.
///
/// This is the surface annotation code programs against: build once from a
/// collection of features, then look up the features hit by a variant position
/// or range. Implementations are immutable after [`build`](Overlapper::build)
/// and safe to share between threads.
pub trait Overlapper<I, T>: Send + Sync
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<I, T>>) -> Self
    where
        Self: Sized;

    /// Clones of every interval sharing a position with `[start, end]`.
    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>>;

    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a>;

    /// Every interval containing `x`.
    fn find_point<'a>(&'a self, x: I) -> Vec<&'a Interval<I, T>> {
        self.find_iter(x, x).collect()
    }

    /// Number of intervals sharing a position with `[start, end]`.
    fn count(&self, start: I, end: I) -> usize {
        self.find_iter(start, end).count()
    }
}
