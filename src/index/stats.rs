//! Bucket layout statistics.

use serde::Serialize;
use std::fmt;

/// Summary of how ranges are spread across buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IndexStats {
    /// Distinct ranges after deduplication
    pub ranges: usize,
    /// Bucket entries, counting replicas of multi-bucket ranges
    pub entries: usize,
    /// Buckets holding at least one range
    pub populated_buckets: usize,
    /// Ranges spanning more than one leading octet
    pub multi_bucket_ranges: usize,
    /// Leading octet of the fullest bucket (lowest key on ties)
    pub largest_bucket_key: u8,
    /// Number of entries in the fullest bucket
    pub largest_bucket_len: usize,
}

impl fmt::Display for IndexStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ranges, {} entries in {}/256 buckets, {} multi-bucket, largest bucket {} ({} entries)",
            self.ranges,
            self.entries,
            self.populated_buckets,
            self.multi_bucket_ranges,
            self.largest_bucket_key,
            self.largest_bucket_len
        )
    }
}
