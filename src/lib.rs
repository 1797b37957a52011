//! cidrbucket - fast IPv4 membership checks against large static CIDR sets.
//!
//! This crate answers one question: is this address covered by any range
//! in a list of (typically tens of thousands of) IPv4 CIDRs? The list is
//! indexed once into 256 buckets keyed by the leading octet, after which
//! each query scans only the ranges that share its first octet.
//!
//! # Features
//!
//! - **Strict parsing**: dotted-decimal addresses and `a.b.c.d/n` CIDRs
//! - **Deduplication**: textually different CIDRs covering the same interval
//!   are stored once
//! - **Wide ranges**: prefixes of /7 and shorter are replicated into every
//!   bucket they touch
//! - **Lock-free queries**: the index is immutable and `Send + Sync`
//! - **Parallel build** (`parallel` feature): sharded build on rayon
//! - **Benchmark harness**: per-query latency with top-N slowest report
//!
//! # Quick Start
//!
//! ```
//! use cidrbucket::{loader::load_cidrs, RangeIndex};
//!
//! let list = "# private ranges\n10.0.0.0/8\n192.168.0.0/16\n";
//! let loaded = load_cidrs(list.as_bytes()).unwrap();
//! let index = RangeIndex::build(loaded.entries);
//!
//! assert!(index.contains_str("192.168.5.5").unwrap());
//! assert!(!index.contains_str("11.0.0.1").unwrap());
//! ```
//!
//! # Modules
//!
//! - [`address`]: IPv4 text ⇄ `u32` codec
//! - [`cidr`]: CIDR parsing into [`Range`]
//! - [`index`]: the bucketed [`RangeIndex`]
//! - [`loader`]: line-oriented CIDR and address list loading
//! - [`bench`]: latency harness and reports

mod error;

pub mod address;
pub mod bench;
pub mod cidr;
pub mod config;
pub mod index;
pub mod loader;

// Re-export core types
pub use cidr::Range;
pub use error::{Error, Result};
pub use index::{IndexStats, RangeIndex, RangeIndexBuilder};

// Re-export harness types
pub use bench::{BenchReport, Benchmark};
pub use config::{HarnessConfig, OutputFormat};
