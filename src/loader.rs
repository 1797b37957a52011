//! Line-oriented loading of CIDR lists and address lists.
//!
//! Both formats are one entry per line. Surrounding whitespace is trimmed,
//! and blank lines and lines starting with `#` are skipped. A line that
//! fails to parse is logged, recorded in [`Loaded::rejected`] and skipped;
//! the rest of the input is still processed. Only I/O failures abort a load.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::address::parse_address;
use crate::cidr::{parse_cidr, Range};
use crate::{Error, Result};

/// Comment marker at the start of a line.
const COMMENT_MARKER: char = '#';

/// A line that was skipped because it did not parse.
#[derive(Debug)]
pub struct RejectedLine {
    /// 1-based line number
    pub line: usize,
    /// The parse error, carrying the offending text
    pub error: Error,
}

/// Entries parsed from a line-oriented input.
#[derive(Debug)]
pub struct Loaded<T> {
    /// Successfully parsed entries, in input order
    pub entries: Vec<T>,
    /// Lines that failed to parse, in input order
    pub rejected: Vec<RejectedLine>,
}

impl<T> Loaded<T> {
    /// Check if every non-blank, non-comment line parsed.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Load CIDR ranges from a reader.
///
/// # Examples
/// ```
/// use cidrbucket::loader::load_cidrs;
///
/// let text = "# private\n10.0.0.0/8\n\nbogus\n192.168.0.0/16\n";
/// let loaded = load_cidrs(text.as_bytes()).unwrap();
/// assert_eq!(loaded.entries.len(), 2);
/// assert_eq!(loaded.rejected[0].line, 4);
/// ```
pub fn load_cidrs<R: Read>(reader: R) -> Result<Loaded<Range>> {
    load_lines(reader, "CIDR", parse_cidr)
}

/// Load CIDR ranges from a file.
pub fn load_cidrs_from_path(path: &Path) -> Result<Loaded<Range>> {
    let file = File::open(path)?;
    log::info!("Loading CIDRs from {:?}", path);
    load_cidrs(file)
}

/// Load dotted-decimal addresses from a reader.
pub fn load_addresses<R: Read>(reader: R) -> Result<Loaded<u32>> {
    load_lines(reader, "address", parse_address)
}

/// Load dotted-decimal addresses from a file.
pub fn load_addresses_from_path(path: &Path) -> Result<Loaded<u32>> {
    let file = File::open(path)?;
    log::info!("Loading addresses from {:?}", path);
    load_addresses(file)
}

fn load_lines<R, T, F>(reader: R, kind: &str, parse: F) -> Result<Loaded<T>>
where
    R: Read,
    F: Fn(&str) -> Result<T>,
{
    let mut entries = Vec::new();
    let mut rejected = Vec::new();

    // Raw byte lines: a non-UTF-8 line is rejected by itself.
    for (idx, line) in BufReader::new(reader).split(b'\n').enumerate() {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        let line = line.trim();

        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        match parse(line) {
            Ok(entry) => entries.push(entry),
            Err(error) => {
                log::warn!("Skipping malformed {} on line {}: {}", kind, idx + 1, error);
                rejected.push(RejectedLine {
                    line: idx + 1,
                    error,
                });
            }
        }
    }

    log::info!(
        "Loaded {} {} entries ({} rejected)",
        entries.len(),
        kind,
        rejected.len()
    );

    Ok(Loaded { entries, rejected })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let text = r#"
# Comment
   # indented comment
10.0.0.0/8

  192.168.0.0/16
"#;
        let loaded = load_cidrs(text.as_bytes()).unwrap();
        assert!(loaded.is_clean());
        assert_eq!(
            loaded.entries,
            vec![
                parse_cidr("10.0.0.0/8").unwrap(),
                parse_cidr("192.168.0.0/16").unwrap()
            ]
        );
    }

    #[test]
    fn test_bad_line_is_not_fatal() {
        let text = "10.0.0.0/8\n10.0.0.0/33\n172.16.0.0/12\n1.2.3.4\n8.8.8.0/24\n";
        let loaded = load_cidrs(text.as_bytes()).unwrap();

        assert_eq!(loaded.entries.len(), 3);
        assert_eq!(loaded.rejected.len(), 2);
        assert_eq!(loaded.rejected[0].line, 2);
        assert!(matches!(
            loaded.rejected[0].error,
            Error::MalformedCidr(ref s) if s == "10.0.0.0/33"
        ));
        assert_eq!(loaded.rejected[1].line, 4);
    }

    #[test]
    fn test_load_addresses() {
        let text = "192.168.5.5\n# skip\n11.0.0.1\n999.0.0.1\n";
        let loaded = load_addresses(text.as_bytes()).unwrap();
        assert_eq!(loaded.entries, vec![0xC0A8_0505, 0x0B00_0001]);
        assert_eq!(loaded.rejected.len(), 1);
        assert_eq!(loaded.rejected[0].line, 4);
        assert!(matches!(loaded.rejected[0].error, Error::MalformedAddress(_)));
    }

    #[test]
    fn test_invalid_utf8_line_is_not_fatal() {
        let loaded = load_cidrs(&b"10.0.0.0/8\n\xff\xfe/8\n192.168.0.0/16\n"[..]).unwrap();
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.rejected.len(), 1);
        assert_eq!(loaded.rejected[0].line, 2);
        assert!(matches!(loaded.rejected[0].error, Error::MalformedCidr(_)));

        let loaded = load_addresses(&b"\xc0.1.2.3\r\n8.8.8.8\r\n"[..]).unwrap();
        assert_eq!(loaded.entries, vec![0x0808_0808]);
        assert!(matches!(loaded.rejected[0].error, Error::MalformedAddress(_)));
    }

    #[test]
    fn test_trailing_comment_is_not_stripped() {
        // Only whole-line comments are recognised
        let loaded = load_cidrs("10.0.0.0/8 # private".as_bytes()).unwrap();
        assert!(loaded.entries.is_empty());
        assert_eq!(loaded.rejected.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_cidrs_from_path(Path::new("/nonexistent/cidrs.txt")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
