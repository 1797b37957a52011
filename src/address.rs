//! IPv4 address codec.
//!
//! Addresses are plain `u32` values in network byte order, so integer
//! ordering matches dotted-decimal ordering and the leading octet is
//! simply `addr >> 24`.

use std::net::Ipv4Addr;

use crate::{Error, Result};

/// Parse a dotted-decimal IPv4 address into its `u32` form.
///
/// The text must be exactly four dot-separated decimal octets in `0..=255`.
/// Leading zeros, surrounding whitespace and empty octets are rejected so
/// that every address has exactly one textual form.
///
/// # Examples
/// ```
/// use cidrbucket::address::parse_address;
///
/// assert_eq!(parse_address("10.0.0.1").unwrap(), 0x0A00_0001);
/// assert!(parse_address("10.0.0").is_err());
/// assert!(parse_address("10.0.0.256").is_err());
/// ```
pub fn parse_address(text: &str) -> Result<u32> {
    // std's parser is strict about octet count, range and leading zeros
    text.parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| Error::MalformedAddress(text.to_string()))
}

/// Format a `u32` address as dotted decimal. Inverse of [`parse_address`].
pub fn format_address(addr: u32) -> String {
    Ipv4Addr::from(addr).to_string()
}

/// The most significant octet of an address: its bucket key.
#[inline]
pub fn leading_byte(addr: u32) -> u8 {
    (addr >> 24) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_packs_most_significant_first() {
        assert_eq!(parse_address("192.168.1.2").unwrap(), 0xC0A8_0102);
        assert_eq!(parse_address("0.0.0.0").unwrap(), 0);
        assert_eq!(parse_address("255.255.255.255").unwrap(), u32::MAX);
        assert_eq!(parse_address("1.0.0.0").unwrap(), 1 << 24);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "1.2.3",
            "1.2.3.4.5",
            "1.2.3.256",
            "1..3.4",
            "a.b.c.d",
            " 1.2.3.4",
            "1.2.3.4 ",
            "01.2.3.4",
            "-1.2.3.4",
            "1.2.3.4/8",
            "::1",
        ] {
            let err = parse_address(bad).unwrap_err();
            assert!(
                matches!(err, Error::MalformedAddress(ref s) if s == bad),
                "expected MalformedAddress for {:?}, got {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_format_roundtrip() {
        for text in ["0.0.0.0", "10.255.255.255", "192.167.255.255", "255.255.255.255"] {
            assert_eq!(format_address(parse_address(text).unwrap()), text);
        }
        for addr in [0u32, 1, 0x00FF_FFFF, 0x0100_0000, 0x7F00_0001, u32::MAX] {
            assert_eq!(parse_address(&format_address(addr)).unwrap(), addr);
        }
    }

    #[test]
    fn test_leading_byte() {
        assert_eq!(leading_byte(0xC0A8_0505), 192);
        assert_eq!(leading_byte(0x00FF_FFFF), 0);
        assert_eq!(leading_byte(u32::MAX), 255);
    }
}
