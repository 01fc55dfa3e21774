//! Shared models for the genotree workspace.
//!
//! The index crates work on [`Interval`](models::Interval), a closed `[low, high]`
//! range carrying a payload. Annotation sources usually arrive as BED-style
//! [`Region`](models::Region)s, which are half-open and named by chromosome; those
//! convert into intervals with [`Region::to_interval`](models::Region::to_interval).
//!
//! ```rust
//! use genotree_core::models::{Interval, Region};
//!
//! let exon = Interval::new(1000u32, 1999, "BRCA1-exon2").unwrap();
//! assert!(exon.contains(1999));
//!
//! let region = Region { chr: "chr17".to_string(), start: 1000, end: 2000, rest: None };
//! let interval = region.to_interval().unwrap();
//! assert_eq!((interval.low(), interval.high()), (1000, 1999));
//! ```
pub mod errors;
pub mod models;

pub use self::errors::IntervalError;
