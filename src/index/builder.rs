//! Incremental collection of ranges before building an index.

use super::RangeIndex;
use crate::cidr::{parse_cidr, Range};
use crate::Result;

/// Collects ranges ahead of a one-shot [`RangeIndex`] build.
///
/// Duplicates are kept here and collapsed by the build.
///
/// # Examples
/// ```
/// use cidrbucket::RangeIndex;
///
/// let mut builder = RangeIndex::builder();
/// builder.push_cidr("10.0.0.0/8").unwrap();
/// builder.push_prefix(0xC0A8_0000, 16);
/// assert!(builder.push_cidr("not a cidr").is_err());
///
/// let index = builder.build();
/// assert_eq!(index.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RangeIndexBuilder {
    ranges: Vec<Range>,
}

impl RangeIndexBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with room for `capacity` ranges.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ranges: Vec::with_capacity(capacity),
        }
    }

    /// Add a range.
    pub fn push(&mut self, range: Range) {
        self.ranges.push(range);
    }

    /// Add `network/prefix_len`. Returns `false` and adds nothing if the
    /// prefix length is over 32.
    pub fn push_prefix(&mut self, network: u32, prefix_len: u8) -> bool {
        match Range::from_prefix(network, prefix_len) {
            Some(range) => {
                self.ranges.push(range);
                true
            }
            None => false,
        }
    }

    /// Parse and add a CIDR. Nothing is added on error.
    pub fn push_cidr(&mut self, cidr: &str) -> Result<()> {
        let range = parse_cidr(cidr.trim())?;
        self.ranges.push(range);
        Ok(())
    }

    /// Number of ranges collected so far, duplicates included.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Build the index.
    pub fn build(self) -> RangeIndex {
        RangeIndex::build(self.ranges)
    }

    /// Build the index using the sharded parallel build.
    #[cfg(feature = "parallel")]
    pub fn build_parallel(self) -> RangeIndex {
        RangeIndex::build_parallel(self.ranges)
    }
}

impl Extend<Range> for RangeIndexBuilder {
    fn extend<T: IntoIterator<Item = Range>>(&mut self, iter: T) {
        self.ranges.extend(iter);
    }
}
