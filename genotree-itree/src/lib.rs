//! Centered interval trees for genomic feature lookup.
//!
//! This crate indexes a static collection of closed intervals (exons, transcripts,
//! regulatory regions...) so that the features hit by a position or a range can be
//! found without scanning the whole collection. It is the indexing layer that
//! variant annotation and inheritance filtering sit on top of.
//!
//! ## Features
//!
//! - **Stabbing and overlap queries** in `O(log n + k)` after an `O(n log n)` build
//! - **Iterator-based API**: lazy iteration over overlapping intervals
//! - **Nearest neighbours**: the features flanking a position that hits nothing
//! - **Thread-safe**: trees are immutable once built and `Send + Sync`
//! - **Fork/join construction** on the rayon pool for large inputs
//!
//! ## Quick Start
//!
//! ```rust
//! use genotree_itree::{IntervalTree, Overlapper, Interval};
//!
//! let features = vec![
//!     Interval::new(1u32, 5, "a").unwrap(),
//!     Interval::new(4, 10, "b").unwrap(),
//!     Interval::new(12, 12, "c").unwrap(),
//! ];
//!
//! let tree = IntervalTree::build(features);
//!
//! // stabbing query
//! let mut hits = tree.query_point(4);
//! hits.sort();
//! assert_eq!(hits, vec![&"a", &"b"]);
//!
//! // overlap query over a closed range
//! assert_eq!(tree.query_range(5, 11).len(), 2);
//!
//! // or iterate lazily
//! for interval in tree.find_iter(5, 11) {
//!     println!("Found overlap: {:?}", interval);
//! }
//! ```
//!
//! ## Ordering policies and build options
//!
//! The two sort orders of each node's crossing lists are passed in explicitly,
//! together with the build options:
//!
//! ```rust
//! use genotree_itree::{BuildOptions, HighDescending, IntervalTree, LowAscending, Interval};
//!
//! let features = (0u32..1000)
//!     .map(|x| Interval::new(x * 10, x * 10 + 25, x).unwrap())
//!     .collect::<Vec<_>>();
//!
//! let tree = IntervalTree::build_with(
//!     features,
//!     &LowAscending,
//!     &HighDescending,
//!     &BuildOptions::parallel(256),
//! );
//! assert_eq!(tree.find_point(5000).len(), 3);
//! ```

/// Build-time settings.
pub mod config;

/// Genome-wide, per-chromosome indexing.
///
/// See [`GenomeIndex`](genome_index::GenomeIndex) for details.
pub mod genome_index;

mod node;

/// Ordering policies for the crossing lists.
pub mod ordering;

/// Core traits for overlap operations.
///
/// See [`Overlapper`] for the main trait.
pub mod traits;

/// The interval tree facade.
///
/// See [`IntervalTree`] for details.
pub mod tree;

// re-exports
pub use self::config::BuildOptions;
pub use self::genome_index::{GenomeIndex, GenomeIndexError, IntoGenomeIndex};
pub use self::ordering::{HighDescending, IntervalOrder, LowAscending};
pub use self::traits::{Interval, Overlapper};
pub use self::tree::{IntervalTree, IterFind};
