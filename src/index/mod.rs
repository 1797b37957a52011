//! Leading-byte bucketed range index.
//!
//! The index splits the IPv4 space into 256 buckets keyed by the first
//! octet. Each bucket holds the ranges that intersect it, so a query only
//! scans the ranges that could possibly cover the address, and a query
//! whose bucket is empty is rejected without touching any range at all.
//!
//! Ranges wider than one octet (prefix length 7 or shorter) are copied into
//! every bucket they touch. Without that replication an address in a later
//! bucket of the range would be missed.
//!
//! # Example
//! ```
//! use cidrbucket::{cidr::parse_cidr, RangeIndex};
//!
//! let index = RangeIndex::build([
//!     parse_cidr("192.168.0.0/16").unwrap(),
//!     parse_cidr("10.0.0.0/8").unwrap(),
//! ]);
//!
//! assert!(index.contains(0xC0A8_0505)); // 192.168.5.5
//! assert!(!index.contains(0x0B00_0001)); // 11.0.0.1
//! ```

mod builder;
mod stats;


pub use builder::RangeIndexBuilder;
pub use stats::IndexStats;

use ahash::AHashSet;
use std::fmt;
use std::net::Ipv4Addr;

use crate::address::{leading_byte, parse_address};
use crate::cidr::Range;
use crate::Result;

/// Number of buckets, one per possible leading octet.
pub const BUCKET_COUNT: usize = 256;

/// Shards smaller than this are not worth a separate task.
#[cfg(feature = "parallel")]
const MIN_SHARD_SIZE: usize = 4096;

/// Immutable membership index over IPv4 ranges.
///
/// Built once, queried many times. Queries take `&self` and touch no
/// interior state, so a `RangeIndex` can be shared across threads by
/// reference or through an `Arc` without any locking.
#[derive(Clone, PartialEq, Eq)]
pub struct RangeIndex {
    /// Bucket `b` holds every range whose interval includes leading octet `b`,
    /// in insertion order.
    buckets: Vec<Box<[Range]>>,
    /// Distinct ranges after deduplication
    range_count: usize,
    /// Ranges replicated into more than one bucket
    multi_bucket_count: usize,
}

impl RangeIndex {
    /// Build an index from a sequence of ranges.
    ///
    /// Duplicate ranges (equal bounds) are collapsed to their first
    /// occurrence, so building twice from the same input always yields
    /// indexes that compare equal bucket for bucket. An empty input is
    /// valid and matches nothing.
    pub fn build<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = Range>,
    {
        let unique = dedup(ranges);
        let buckets = fill_buckets(&unique);
        let index = Self::from_buckets(buckets, &unique);
        log::debug!("Built range index: {}", index.stats());
        index
    }

    /// Build an index by sharding the deduplicated ranges across the rayon
    /// thread pool.
    ///
    /// Each shard fills its own bucket table; the tables are then
    /// concatenated per bucket in shard order. The result is identical to
    /// [`RangeIndex::build`] on the same input.
    #[cfg(feature = "parallel")]
    pub fn build_parallel<I>(ranges: I) -> Self
    where
        I: IntoIterator<Item = Range>,
    {
        use rayon::prelude::*;

        let unique = dedup(ranges);
        let shard_size = unique
            .len()
            .div_ceil(rayon::current_num_threads().max(1))
            .max(MIN_SHARD_SIZE);

        let partials: Vec<Vec<Vec<Range>>> =
            unique.par_chunks(shard_size).map(fill_buckets).collect();

        let mut buckets = empty_buckets();
        for partial in partials {
            for (bucket, shard_bucket) in buckets.iter_mut().zip(partial) {
                bucket.extend(shard_bucket);
            }
        }

        let index = Self::from_buckets(buckets, &unique);
        log::debug!(
            "Built range index in shards of {}: {}",
            shard_size,
            index.stats()
        );
        index
    }

    /// Create a builder for collecting ranges incrementally.
    pub fn builder() -> RangeIndexBuilder {
        RangeIndexBuilder::new()
    }

    fn from_buckets(buckets: Vec<Vec<Range>>, unique: &[Range]) -> Self {
        Self {
            buckets: buckets.into_iter().map(Vec::into_boxed_slice).collect(),
            range_count: unique.len(),
            multi_bucket_count: unique.iter().filter(|r| r.spans_buckets()).count(),
        }
    }

    /// Check whether any range covers `addr`.
    ///
    /// Looks up the bucket for the leading octet and scans it in insertion
    /// order, stopping at the first covering range.
    #[inline]
    pub fn contains(&self, addr: u32) -> bool {
        let bucket = &self.buckets[usize::from(leading_byte(addr))];
        if bucket.is_empty() {
            return false;
        }
        bucket.iter().any(|range| range.contains(addr))
    }

    /// Check whether any range covers `ip`.
    #[inline]
    pub fn contains_ip(&self, ip: Ipv4Addr) -> bool {
        self.contains(u32::from(ip))
    }

    /// Parse a dotted-decimal address and check it.
    ///
    /// Fails only if the text is not a valid address.
    pub fn contains_str(&self, text: &str) -> Result<bool> {
        parse_address(text).map(|addr| self.contains(addr))
    }

    /// Return the first range (in bucket order) that covers `addr`.
    pub fn find(&self, addr: u32) -> Option<Range> {
        self.buckets[usize::from(leading_byte(addr))]
            .iter()
            .find(|range| range.contains(addr))
            .copied()
    }

    /// Ranges stored in the bucket for leading octet `key`.
    pub fn bucket(&self, key: u8) -> &[Range] {
        &self.buckets[usize::from(key)]
    }

    /// Iterate over `(key, ranges)` for every non-empty bucket.
    pub fn populated_buckets(&self) -> impl Iterator<Item = (u8, &[Range])> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(key, bucket)| (key as u8, &bucket[..]))
    }

    /// Number of distinct ranges in the index.
    pub fn len(&self) -> usize {
        self.range_count
    }

    /// Check if the index holds no ranges.
    pub fn is_empty(&self) -> bool {
        self.range_count == 0
    }

    /// Total bucket entries, counting each replica of a multi-bucket range.
    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    /// Summary statistics about the bucket layout.
    pub fn stats(&self) -> IndexStats {
        let (largest_bucket_key, largest_bucket_len) = self
            .buckets
            .iter()
            .enumerate()
            .map(|(key, bucket)| (key as u8, bucket.len()))
            .fold((0u8, 0usize), |best, cur| if cur.1 > best.1 { cur } else { best });

        IndexStats {
            ranges: self.range_count,
            entries: self.entry_count(),
            populated_buckets: self.populated_buckets().count(),
            multi_bucket_ranges: self.multi_bucket_count,
            largest_bucket_key,
            largest_bucket_len,
        }
    }
}

impl Default for RangeIndex {
    fn default() -> Self {
        Self::build(std::iter::empty())
    }
}

impl FromIterator<Range> for RangeIndex {
    fn from_iter<T: IntoIterator<Item = Range>>(iter: T) -> Self {
        Self::build(iter)
    }
}

impl fmt::Debug for RangeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeIndex")
            .field("ranges", &self.range_count)
            .field("entries", &self.entry_count())
            .field("populated_buckets", &self.populated_buckets().count())
            .finish()
    }
}

/// Drop repeated ranges, keeping the first occurrence of each.
fn dedup<I>(ranges: I) -> Vec<Range>
where
    I: IntoIterator<Item = Range>,
{
    let iter = ranges.into_iter();
    let mut seen = AHashSet::with_capacity(iter.size_hint().0);
    iter.filter(|range| seen.insert(*range)).collect()
}

fn empty_buckets() -> Vec<Vec<Range>> {
    vec![Vec::new(); BUCKET_COUNT]
}

/// Append each range to every bucket from its start octet to its end octet.
fn fill_buckets(ranges: &[Range]) -> Vec<Vec<Range>> {
    let mut buckets = empty_buckets();
    for range in ranges {
        for key in range.start_byte()..=range.end_byte() {
            buckets[usize::from(key)].push(*range);
        }
    }
    buckets
}
