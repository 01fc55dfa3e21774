//! Ordering policies for the per-node crossing lists.
//!
//! A node keeps the intervals that cross its median twice: once in ascending
//! order of `low` and once in descending order of `high`. Queries walk these
//! lists from the front and stop at the first miss, so the primary key of each
//! policy is fixed. The tie-break among equal primary keys is up to the
//! policy, but it has to be a deterministic total order.
//!
//! Policies are plain values handed to
//! [`IntervalTree::build_with`](crate::IntervalTree::build_with) and passed down
//! the recursive build. Nothing is stored globally.

use std::cmp::Ordering;

use genotree_core::models::Interval;
use num_traits::{PrimInt, Unsigned};

/// A total order over intervals used while building a node.
///
/// Implementations used for the low list must be non-decreasing in `low`;
/// implementations used for the high list must be non-increasing in `high`.
pub trait IntervalOrder<I, T>: Send + Sync
where
    I: PrimInt + Unsigned + Send + Sync,
{
    fn compare(&self, a: &Interval<I, T>, b: &Interval<I, T>) -> Ordering;
}

/// Ascending by `low`, ties broken by ascending `high`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowAscending;

/// Descending by `high`, ties broken by descending `low`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighDescending;

impl<I, T> IntervalOrder<I, T> for LowAscending
where
    I: PrimInt + Unsigned + Send + Sync,
{
    #[inline]
    fn compare(&self, a: &Interval<I, T>, b: &Interval<I, T>) -> Ordering {
        a.low()
            .cmp(&b.low())
            .then_with(|| a.high().cmp(&b.high()))
    }
}

impl<I, T> IntervalOrder<I, T> for HighDescending
where
    I: PrimInt + Unsigned + Send + Sync,
{
    #[inline]
    fn compare(&self, a: &Interval<I, T>, b: &Interval<I, T>) -> Ordering {
        b.high()
            .cmp(&a.high())
            .then_with(|| b.low().cmp(&a.low()))
    }
}

impl<I, T, F> IntervalOrder<I, T> for F
where
    I: PrimInt + Unsigned + Send + Sync,
    F: Fn(&Interval<I, T>, &Interval<I, T>) -> Ordering + Send + Sync,
{
    #[inline]
    fn compare(&self, a: &Interval<I, T>, b: &Interval<I, T>) -> Ordering {
        self(a, b)
    }
}
