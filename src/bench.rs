//! Query latency harness.
//!
//! Drives a [`RangeIndex`] over a list of addresses, timing each query
//! individually, and summarises the result as a [`BenchReport`].

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::address::{format_address, leading_byte};
use crate::config::{HarnessConfig, OutputFormat};
use crate::index::{IndexStats, RangeIndex};
use crate::Result;

/// One of the slowest queries of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlowQuery {
    /// Queried address in dotted decimal
    pub address: String,
    /// Bucket the query landed in
    pub leading_byte: u8,
    /// Query latency
    pub nanos: u64,
}

/// Latency distribution over all timed queries.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LatencySummary {
    /// Timed queries
    pub count: usize,
    /// Mean latency
    pub average_ns: f64,
    /// Fastest query
    pub min_ns: u64,
    /// Slowest query
    pub max_ns: u64,
    /// Slowest queries, slowest first
    pub slowest: Vec<SlowQuery>,
}

/// Result of a benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    /// Timed queries across all iterations
    pub queries: usize,
    /// Timed queries that hit a range
    pub matches: usize,
    /// Wall time of the timed passes, in seconds
    pub elapsed_secs: f64,
    /// Per-query latency distribution
    pub latency: LatencySummary,
    /// Layout of the queried index
    pub index: IndexStats,
}

impl BenchReport {
    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_string()),
            OutputFormat::Json => self.to_json(),
        }
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Index:    {}", self.index)?;
        writeln!(f, "Queries:  {} ({} matched)", self.queries, self.matches)?;
        writeln!(f, "Elapsed:  {:.3} ms", self.elapsed_secs * 1_000.0)?;
        writeln!(
            f,
            "Latency:  avg {:.1} ns, min {} ns, max {} ns",
            self.latency.average_ns, self.latency.min_ns, self.latency.max_ns
        )?;
        if !self.latency.slowest.is_empty() {
            writeln!(f, "Slowest:")?;
            for (rank, slow) in self.latency.slowest.iter().enumerate() {
                writeln!(
                    f,
                    "  {:>3}. {:<15} bucket {:>3}  {} ns",
                    rank + 1,
                    slow.address,
                    slow.leading_byte,
                    slow.nanos
                )?;
            }
        }
        Ok(())
    }
}

/// Runs timed queries against an index.
pub struct Benchmark<'a> {
    index: &'a RangeIndex,
    config: &'a HarnessConfig,
}

impl<'a> Benchmark<'a> {
    /// Create a harness for `index`.
    pub fn new(index: &'a RangeIndex, config: &'a HarnessConfig) -> Self {
        Self { index, config }
    }

    /// Query every address once, returning the per-query results.
    pub fn check_all(&self, addresses: &[u32]) -> Vec<bool> {
        addresses.iter().map(|addr| self.index.contains(*addr)).collect()
    }

    /// Time every address for the configured number of iterations.
    pub fn run(&self, addresses: &[u32]) -> BenchReport {
        if self.config.warmup {
            let warm = addresses.iter().filter(|a| self.index.contains(**a)).count();
            log::debug!("Warm-up pass: {} of {} matched", warm, addresses.len());
        }

        let mut recorder = LatencyRecorder::new(self.config.top_n);
        let mut matches = 0usize;
        let started = Instant::now();

        for _ in 0..self.config.iterations.max(1) {
            for &addr in addresses {
                let query_start = Instant::now();
                let hit = self.index.contains(addr);
                let nanos = duration_nanos(query_start.elapsed());

                if hit {
                    matches += 1;
                }
                recorder.record(addr, nanos);
            }
        }

        let elapsed = started.elapsed();
        let latency = recorder.finish();
        log::info!(
            "Ran {} queries in {:?} ({} matched)",
            latency.count,
            elapsed,
            matches
        );

        BenchReport {
            queries: latency.count,
            matches,
            elapsed_secs: elapsed.as_secs_f64(),
            latency,
            index: self.index.stats(),
        }
    }
}

fn duration_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Streaming latency aggregate with a bounded top-N of the slowest queries.
struct LatencyRecorder {
    top_n: usize,
    count: usize,
    total_ns: u128,
    min_ns: u64,
    max_ns: u64,
    /// Min-heap of (nanos, addr): the root is the fastest of the kept queries
    slowest: BinaryHeap<Reverse<(u64, u32)>>,
}

impl LatencyRecorder {
    fn new(top_n: usize) -> Self {
        Self {
            top_n,
            count: 0,
            total_ns: 0,
            min_ns: u64::MAX,
            max_ns: 0,
            slowest: BinaryHeap::with_capacity(top_n + 1),
        }
    }

    fn record(&mut self, addr: u32, nanos: u64) {
        self.count += 1;
        self.total_ns += u128::from(nanos);
        self.min_ns = self.min_ns.min(nanos);
        self.max_ns = self.max_ns.max(nanos);

        if self.top_n == 0 {
            return;
        }
        self.slowest.push(Reverse((nanos, addr)));
        if self.slowest.len() > self.top_n {
            self.slowest.pop();
        }
    }

    fn finish(self) -> LatencySummary {
        if self.count == 0 {
            return LatencySummary::default();
        }

        // into_sorted_vec on Reverse yields largest nanos first
        let slowest = self
            .slowest
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse((nanos, addr))| SlowQuery {
                address: format_address(addr),
                leading_byte: leading_byte(addr),
                nanos,
            })
            .collect();

        LatencySummary {
            count: self.count,
            average_ns: self.total_ns as f64 / self.count as f64,
            min_ns: self.min_ns,
            max_ns: self.max_ns,
            slowest,
        }
    }
}
