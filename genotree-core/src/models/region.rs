use std::fmt::{self, Display};

use crate::errors::IntervalError;
use crate::models::Interval;

///
/// Region struct, one BED-style record: 0-based, half-open `[start, end)`
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,

    pub rest: Option<String>,
}

impl Region {
    ///
    /// Number of positions covered by the region
    ///
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    ///
    /// Get BED line of the Region
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}{}",
            self.chr,
            self.start,
            self.end,
            self.rest
                .as_deref()
                .map_or(String::new(), |s| format!("\t{}", s)),
        )
    }

    /// Midpoint of the region: `start + width / 2`.
    pub fn mid_point(&self) -> u32 {
        self.start + self.width() / 2
    }

    ///
    /// Convert to the closed interval `[start, end - 1]` used by the indexes,
    /// carrying `rest` as the payload.
    ///
    /// Zero-width regions (`start >= end`) cover no position and are rejected.
    ///
    pub fn to_interval(&self) -> Result<Interval<u32, Option<String>>, IntervalError> {
        self.closed_bounds()
            .and_then(|(low, high)| Interval::new(low, high, self.rest.clone()))
    }

    /// Closed `(low, high)` bounds of the region.
    pub fn closed_bounds(&self) -> Result<(u32, u32), IntervalError> {
        if self.start >= self.end {
            return Err(IntervalError::EmptyRegion(self.as_string()));
        }
        Ok((self.start, self.end - 1))
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
