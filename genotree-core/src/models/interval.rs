use num_traits::{PrimInt, Unsigned};

use crate::errors::IntervalError;

/// A closed range `[low, high]` carrying an associated payload.
///
/// Both endpoints are inclusive, so `Interval::new(5, 5, v)` covers exactly one
/// position. The bounds are checked once at construction and cannot change
/// afterwards.
///
/// There is no `PartialEq`/`Ord` on `Interval`. Indexes order intervals through
/// explicit ordering policies, so one interval can sit in a list sorted by low
/// end and in another sorted by high end.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawInterval<I, T>")
)]
pub struct Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    low: I,
    high: I,
    val: T,
}

impl<I, T> Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    ///
    /// Create a new interval, rejecting `low > high`.
    ///
    /// # Arguments
    /// - low: first covered position
    /// - high: last covered position
    /// - val: payload returned by queries
    ///
    pub fn new(low: I, high: I, val: T) -> Result<Self, IntervalError> {
        if low > high {
            return Err(IntervalError::InvalidBounds {
                low: low.to_u128().unwrap_or_default(),
                high: high.to_u128().unwrap_or_default(),
            });
        }
        Ok(Interval { low, high, val })
    }

    /// First covered position.
    #[inline]
    pub fn low(&self) -> I {
        self.low
    }

    /// Last covered position.
    #[inline]
    pub fn high(&self) -> I {
        self.high
    }

    #[inline]
    pub fn val(&self) -> &T {
        &self.val
    }

    pub fn into_val(self) -> T {
        self.val
    }

    /// Number of covered positions, `high - low + 1`.
    ///
    /// Saturates for an interval spanning the whole coordinate type.
    #[inline]
    pub fn width(&self) -> I {
        (self.high - self.low).saturating_add(I::one())
    }

    /// Check if `x` lies inside the interval
    #[inline]
    pub fn contains(&self, x: I) -> bool {
        self.low <= x && x <= self.high
    }

    /// Check if the interval shares at least one position with `[low, high]`
    #[inline]
    pub fn overlaps(&self, low: I, high: I) -> bool {
        self.low <= high && self.high >= low
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawInterval<I, T> {
    low: I,
    high: I,
    val: T,
}

#[cfg(feature = "serde")]
impl<I, T> TryFrom<RawInterval<I, T>> for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
{
    type Error = IntervalError;

    fn try_from(raw: RawInterval<I, T>) -> Result<Self, Self::Error> {
        Interval::new(raw.low, raw.high, raw.val)
    }
}
