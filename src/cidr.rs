//! CIDR notation parsing into closed address intervals.

use ipnet::Ipv4Net;
use std::fmt;
use std::net::Ipv4Addr;

use crate::address::{format_address, leading_byte, parse_address};
use crate::{Error, Result};

/// A closed interval `[start, end]` of IPv4 addresses.
///
/// Two ranges are equal iff their bounds are equal, which is also the key
/// used to collapse textually different CIDRs such as `10.0.0.0/8` and
/// `10.1.2.3/8` into one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    start: u32,
    end: u32,
}

impl Range {
    /// Create a range from explicit bounds. Returns `None` if `start > end`.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Create the range covered by `network/prefix_len`.
    ///
    /// Host bits in `network` are masked off. Returns `None` if
    /// `prefix_len > 32`.
    ///
    /// # Examples
    /// ```
    /// use cidrbucket::Range;
    ///
    /// let range = Range::from_prefix(0x0A01_0203, 8).unwrap();
    /// assert_eq!(range.start(), 0x0A00_0000);
    /// assert_eq!(range.end(), 0x0AFF_FFFF);
    /// assert!(Range::from_prefix(0, 33).is_none());
    /// ```
    pub fn from_prefix(network: u32, prefix_len: u8) -> Option<Self> {
        let net = Ipv4Net::new(Ipv4Addr::from(network), prefix_len).ok()?;
        Some(Self::from(net))
    }

    /// First address in the range.
    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last address in the range (inclusive).
    #[inline]
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Leading octet of `start`.
    #[inline]
    pub fn start_byte(&self) -> u8 {
        leading_byte(self.start)
    }

    /// Leading octet of `end`.
    #[inline]
    pub fn end_byte(&self) -> u8 {
        leading_byte(self.end)
    }

    /// Whether the range crosses a leading-octet boundary.
    pub fn spans_buckets(&self) -> bool {
        self.start_byte() != self.end_byte()
    }

    /// Number of addresses covered. `0.0.0.0/0` covers 2^32.
    pub fn size(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }

    /// Check if an address lies inside the range.
    #[inline]
    pub fn contains(&self, addr: u32) -> bool {
        self.start <= addr && addr <= self.end
    }
}

impl From<Ipv4Net> for Range {
    fn from(net: Ipv4Net) -> Self {
        Self {
            start: u32::from(net.network()),
            end: u32::from(net.broadcast()),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_address(self.start), format_address(self.end))
    }
}

impl std::str::FromStr for Range {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_cidr(s)
    }
}

/// Parse `a.b.c.d/n` into the range it covers.
///
/// Fails with [`Error::MalformedCidr`] if the separator is missing, the
/// prefix is not a plain decimal in `0..=32`, or the address part does not
/// parse. Blank and comment lines are not CIDRs; filter them before calling
/// this (see [`crate::loader`]).
///
/// # Examples
/// ```
/// use cidrbucket::cidr::parse_cidr;
///
/// let range = parse_cidr("192.168.0.0/16").unwrap();
/// assert!(range.contains(0xC0A8_0505));
/// assert!(parse_cidr("192.168.0.0").is_err());
/// ```
pub fn parse_cidr(text: &str) -> Result<Range> {
    let malformed = || Error::MalformedCidr(text.to_string());

    let (addr_part, prefix_part) = text.split_once('/').ok_or_else(malformed)?;
    let network = parse_address(addr_part).map_err(|_| malformed())?;
    let prefix_len = parse_prefix_len(prefix_part).ok_or_else(malformed)?;

    Range::from_prefix(network, prefix_len).ok_or_else(malformed)
}

/// Plain decimal digits only: no sign, no whitespace, no leading zeros.
fn parse_prefix_len(text: &str) -> Option<u8> {
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if text.len() > 1 && text.starts_with('0') {
        return None;
    }
    let len: u8 = text.parse().ok()?;
    (len <= 32).then_some(len)
}
