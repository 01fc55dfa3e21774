//! Genome-wide feature indexing across chromosomes.
//!
//! [`GenomeIndex`] keeps one [`IntervalTree`] per chromosome so that variant
//! coordinates given as `(chromosome, position)` can be resolved to the features
//! (exons, transcripts, regulatory regions) they fall in.
//!
//! # Examples
//!
//! ```
//! use genotree_itree::BuildOptions;
//! use genotree_itree::genome_index::IntoGenomeIndex;
//! use genotree_core::models::{Region, RegionSet};
//!
//! let genes = RegionSet::from(vec![
//!     Region { chr: "chr1".to_string(), start: 1000, end: 2000, rest: Some("BRCA1".to_string()) },
//!     Region { chr: "chr1".to_string(), start: 5000, end: 6000, rest: Some("TP53".to_string()) },
//!     Region { chr: "chr2".to_string(), start: 1000, end: 3000, rest: Some("EGFR".to_string()) },
//! ]);
//! let index = genes.into_genome_index(&BuildOptions::default()).unwrap();
//!
//! let hits = index.find_position("chr1", 1500);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].val().as_deref(), Some("BRCA1"));
//!
//! // 0-based half-open BED coordinates: 2000 is past the end of BRCA1
//! let (upstream, downstream) = index.nearest("chr1", 2000);
//! assert_eq!(upstream.unwrap().val().as_deref(), Some("BRCA1"));
//! assert_eq!(downstream.unwrap().val().as_deref(), Some("TP53"));
//! ```

use std::collections::HashMap;

use genotree_core::errors::IntervalError;
use genotree_core::models::{Interval, RegionSet};
use log::{info, warn};
use thiserror::Error;

use crate::config::BuildOptions;
use crate::ordering::{HighDescending, LowAscending};
use crate::tree::{IntervalTree, IterFind};

/// Errors that can occur when building a [`GenomeIndex`].
#[derive(Debug, Error)]
pub enum GenomeIndexError {
    /// A source region could not be turned into an interval.
    #[error("Invalid region {region}: {source}")]
    InvalidRegion {
        region: String,
        #[source]
        source: IntervalError,
    },
}

/// Per-chromosome interval trees over closed `u32` coordinates.
///
/// Queries on a chromosome that was never indexed return empty results.
#[derive(Debug, Clone)]
pub struct GenomeIndex<T> {
    index_maps: HashMap<String, IntervalTree<u32, T>>,
}

impl<T> GenomeIndex<T>
where
    T: Send + Sync,
{
    ///
    /// Build an index from `(chromosome, interval)` features.
    ///
    /// # Arguments
    /// - features: features in any order, chromosomes interleaved freely
    /// - options: build options used for every chromosome's tree
    ///
    pub fn from_features<It>(features: It, options: &BuildOptions) -> Self
    where
        It: IntoIterator<Item = (String, Interval<u32, T>)>,
    {
        // STEP 1: group features by chromosome
        let mut grouped: HashMap<String, Vec<Interval<u32, T>>> = HashMap::new();
        for (chr, interval) in features {
            grouped.entry(chr).or_default().push(interval);
        }

        // STEP 2: one tree per chromosome
        let index_maps: HashMap<String, IntervalTree<u32, T>> = grouped
            .into_iter()
            .map(|(chr, intervals)| {
                let tree =
                    IntervalTree::build_with(intervals, &LowAscending, &HighDescending, options);
                (chr, tree)
            })
            .collect();

        let index = GenomeIndex { index_maps };
        info!(
            "Indexed {} features across {} chromosomes",
            index.len(),
            index.index_maps.len()
        );
        index
    }
}

impl<T> GenomeIndex<T> {
    /// The tree for one chromosome, if any feature was indexed on it.
    pub fn get(&self, chr: &str) -> Option<&IntervalTree<u32, T>> {
        self.index_maps.get(chr)
    }

    /// Names of the indexed chromosomes, in no particular order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &String> {
        self.index_maps.keys()
    }

    /// Total number of indexed features.
    pub fn len(&self) -> usize {
        self.index_maps.values().map(IntervalTree::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index_maps.values().all(IntervalTree::is_empty)
    }

    /// Features on `chr` containing `pos`.
    pub fn find_position(&self, chr: &str, pos: u32) -> Vec<&Interval<u32, T>> {
        self.get(chr)
            .map(|tree| tree.find_point(pos))
            .unwrap_or_default()
    }

    /// Features on `chr` overlapping the closed range `[low, high]`.
    pub fn find_range(&self, chr: &str, low: u32, high: u32) -> Vec<&Interval<u32, T>> {
        self.get(chr)
            .map(|tree| tree.find_range(low, high))
            .unwrap_or_default()
    }

    /// The features flanking `pos` on `chr`: the one ending closest before it and
    /// the one starting closest after it.
    pub fn nearest(
        &self,
        chr: &str,
        pos: u32,
    ) -> (Option<&Interval<u32, T>>, Option<&Interval<u32, T>>) {
        match self.get(chr) {
            Some(tree) => (tree.nearest_left(pos), tree.nearest_right(pos)),
            None => (None, None),
        }
    }

    /// Returns an iterator over all features overlapping the query regions.
    ///
    /// Each item is a tuple of (chromosome, feature). Zero-width query regions
    /// are skipped.
    pub fn find_overlaps_iter<'a, 'b>(
        &'a self,
        rs: &'b RegionSet,
    ) -> IterFindOverlaps<'a, 'b, T> {
        IterFindOverlaps {
            inner: &self.index_maps,
            rs,
            region_idx: 0,
            current_chr: None,
            current_iter: None,
        }
    }

    /// Collect all overlaps into a Vec for convenience. You're almost always
    /// better off using the iterator form `find_overlaps_iter`.
    pub fn find_overlaps(&self, rs: &RegionSet) -> Vec<(String, Interval<u32, T>)>
    where
        T: Clone,
    {
        self.find_overlaps_iter(rs)
            .map(|(chr, interval)| (chr.to_string(), interval.clone()))
            .collect()
    }
}

/// An iterator over features that overlap a set of query regions.
///
/// Created by [`GenomeIndex::find_overlaps_iter`]. Query regions are processed
/// in order and features are yielded as they are found.
pub struct IterFindOverlaps<'a, 'b, T> {
    inner: &'a HashMap<String, IntervalTree<u32, T>>,
    rs: &'b RegionSet,
    region_idx: usize,
    current_chr: Option<&'b str>,
    current_iter: Option<IterFind<'a, u32, T>>,
}

impl<'a, 'b, T> Iterator for IterFindOverlaps<'a, 'b, T> {
    type Item = (&'b str, &'a Interval<u32, T>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // first, drain the current region's hits
            if let (Some(chr), Some(iter)) = (self.current_chr, self.current_iter.as_mut()) {
                if let Some(interval) = iter.next() {
                    return Some((chr, interval));
                }
            }

            let region = self.rs.regions.get(self.region_idx)?;
            self.region_idx += 1;
            self.current_chr = None;
            self.current_iter = None;

            let Some(tree) = self.inner.get(&region.chr) else {
                // no features on this chromosome
                continue;
            };

            match region.closed_bounds() {
                Ok((low, high)) => {
                    self.current_chr = Some(region.chr.as_str());
                    self.current_iter = Some(tree.find_iter(low, high));
                }
                Err(err) => warn!("Skipping query region: {err}"),
            }
        }
    }
}

/// A trait for converting region-based data into a [`GenomeIndex`].
///
/// # Examples
///
/// ```
/// use genotree_itree::BuildOptions;
/// use genotree_itree::genome_index::IntoGenomeIndex;
/// use genotree_core::models::{Region, RegionSet};
///
/// let regions = RegionSet::from(vec![
///     Region { chr: "chr1".to_string(), start: 100, end: 200, rest: Some("peak1".to_string()) },
///     Region { chr: "chr2".to_string(), start: 300, end: 400, rest: Some("peak2".to_string()) },
/// ]);
///
/// let index = regions.into_genome_index(&BuildOptions::sequential()).unwrap();
/// assert_eq!(index.len(), 2);
/// ```
pub trait IntoGenomeIndex<T> {
    /// Consumes the input and builds a [`GenomeIndex`] from it.
    fn into_genome_index(self, options: &BuildOptions) -> Result<GenomeIndex<T>, GenomeIndexError>;
}

impl IntoGenomeIndex<Option<String>> for RegionSet {
    fn into_genome_index(
        self,
        options: &BuildOptions,
    ) -> Result<GenomeIndex<Option<String>>, GenomeIndexError> {
        let features = self
            .regions
            .into_iter()
            .map(|region| {
                let (low, high) =
                    region
                        .closed_bounds()
                        .map_err(|source| GenomeIndexError::InvalidRegion {
                            region: region.to_string(),
                            source,
                        })?;
                let interval = Interval::new(low, high, region.rest).map_err(|source| {
                    GenomeIndexError::InvalidRegion {
                        region: format!("{}:{}-{}", region.chr, low, high),
                        source,
                    }
                })?;
                Ok((region.chr, interval))
            })
            .collect::<Result<Vec<_>, GenomeIndexError>>()?;

        Ok(GenomeIndex::from_features(features, options))
    }
}
