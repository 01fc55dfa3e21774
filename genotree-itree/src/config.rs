/// Default partition size at which construction forks onto the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Build-time settings for [`IntervalTree::build_with`](crate::IntervalTree::build_with).
///
/// The tree produced is the same whatever the settings; they only change how
/// construction is scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Fork the left and right partitions of a node with `rayon::join` when
    /// together they hold at least this many intervals. `None` builds on the
    /// calling thread only.
    pub parallel_threshold: Option<usize>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            parallel_threshold: Some(DEFAULT_PARALLEL_THRESHOLD),
        }
    }
}

impl BuildOptions {
    /// Options that never leave the calling thread.
    pub fn sequential() -> Self {
        BuildOptions {
            parallel_threshold: None,
        }
    }

    /// Options that fork at every partition of at least `threshold` intervals.
    pub fn parallel(threshold: usize) -> Self {
        BuildOptions {
            parallel_threshold: Some(threshold),
        }
    }

    #[inline]
    pub(crate) fn should_fork(&self, partition_len: usize) -> bool {
        self.parallel_threshold
            .is_some_and(|threshold| partition_len >= threshold)
    }
}
