//! Pattern Scanner
//!
//! Walks every readable region of every candidate process and runs each
//! pattern over the raw bytes. Processes are scanned one at a time and lazily:
//! the iterator only touches the next process once the matches of the current
//! one have been consumed.
//!
//! Failures never abort the scan. A process whose status or maps cannot be
//! read is skipped, and a region that cannot be read is skipped without
//! giving up on the rest of its process. `ScanStats` records what was skipped
//! so callers can tell "no matches" apart from "nothing could be read".

use serde::Serialize;
use std::borrow::Cow;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::vec;

use crate::error::{ProcError, Result};
use crate::maps::MemoryRegion;
use crate::pattern::Pattern;
use crate::process::Process;
use crate::source::ProcessSource;

/// Maximum number of parent hops followed when walking ancestry
pub const MAX_ANCESTRY_DEPTH: usize = 256;

/// Context lines shown above and below a match by default
pub const DEFAULT_DUMP_RADIUS: usize = 2;

/// What to scan and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Restrict the scan to a single process
    pub target: Option<Process>,
    /// Only scan processes whose name contains this substring
    pub name_filter: Option<String>,
    /// Also scan this process and its ancestors
    pub include_self: bool,
    /// Context lines for the evidence dump
    pub dump_radius: usize,
    /// Skip regions mapped from files on disk
    pub fast: bool,
    /// Skip regions larger than this many bytes
    pub max_region_size: Option<u64>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            target: None,
            name_filter: None,
            include_self: false,
            dump_radius: DEFAULT_DUMP_RADIUS,
            fast: false,
            max_region_size: None,
        }
    }
}

/// One pattern match inside one region of one process
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub pattern: Arc<Pattern>,
    pub process: Process,
    /// Shared by every match from the same process
    pub process_name: Arc<str>,
    /// Shared by every match from the same region
    pub region: Arc<MemoryRegion>,
    /// Absolute virtual address of the first matched byte
    pub address: u64,
    /// Matched bytes, cut at the first NUL
    pub bytes: Vec<u8>,
}

impl MatchResult {
    pub fn offset_in_region(&self) -> u64 {
        self.address - self.region.address
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn to_record(&self) -> MatchRecord {
        MatchRecord {
            pattern: self.pattern.to_string(),
            expression: self.pattern.expression().to_string(),
            pid: self.process.pid(),
            process_name: self.process_name.to_string(),
            address: format!("{:#x}", self.address),
            region_start: format!("{:#x}", self.region.address),
            region_permissions: self.region.permissions.to_string(),
            region_path: self.region.path.clone(),
            text: self.text().into_owned(),
            hex: hex::encode(&self.bytes),
        }
    }
}

/// Flat, serializable view of a `MatchResult`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub pattern: String,
    pub expression: String,
    pub pid: u32,
    pub process_name: String,
    pub address: String,
    pub region_start: String,
    pub region_permissions: String,
    pub region_path: String,
    pub text: String,
    pub hex: String,
}

/// Matches are usually C strings; anything after the terminator is noise.
pub fn truncate_at_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Non-overlapping matches of `pattern` in `memory` as (offset, truncated bytes)
pub fn find_matches<'m>(
    pattern: &'m Pattern,
    memory: &'m [u8],
) -> impl Iterator<Item = (usize, &'m [u8])> + 'm {
    pattern
        .regex()
        .find_iter(memory)
        .map(|m| (m.start(), truncate_at_nul(m.as_bytes())))
}

/// Counters describing how a scan went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub processes_scanned: usize,
    pub processes_filtered: usize,
    pub processes_failed: usize,
    pub regions_scanned: usize,
    pub regions_skipped: usize,
    pub regions_failed: usize,
    pub matches: usize,
}

/// Parent chain of a process, the process itself first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestry {
    pub chain: Vec<Process>,
    /// False when the walk hit a cycle, the depth bound, or an unreadable status
    pub complete: bool,
}

impl Ancestry {
    pub fn contains(&self, process: Process) -> bool {
        self.chain.contains(&process)
    }
}

/// Walk parent links upward from `process`.
///
/// The walk stops at the first process without a parent. A parent cycle or a
/// chain longer than `MAX_ANCESTRY_DEPTH` leaves the ancestry incomplete
/// instead of looping.
pub fn ancestry<S: ProcessSource + ?Sized>(source: &S, process: Process) -> Ancestry {
    let mut chain = vec![process];
    let mut current = process;

    loop {
        let parent = match source.status(current) {
            Ok(status) => status.parent,
            Err(e) => {
                tracing::debug!("ancestry walk stopped at {}: {}", current, e);
                return Ancestry {
                    chain,
                    complete: false,
                };
            }
        };

        if parent.is_none() {
            return Ancestry {
                chain,
                complete: true,
            };
        }
        if chain.contains(&parent) {
            tracing::warn!("parent cycle detected at {} while walking ancestry of {}", parent, process);
            return Ancestry {
                chain,
                complete: false,
            };
        }
        if chain.len() >= MAX_ANCESTRY_DEPTH {
            tracing::warn!(
                "ancestry of {} exceeds {} levels, treating as unknown",
                process,
                MAX_ANCESTRY_DEPTH
            );
            return Ancestry {
                chain,
                complete: false,
            };
        }

        chain.push(parent);
        current = parent;
    }
}

/// True if `candidate` is `process` or one of its ancestors
pub fn is_ancestor<S: ProcessSource + ?Sized>(source: &S, candidate: Process, process: Process) -> bool {
    ancestry(source, process).contains(candidate)
}

/// Multi-pattern memory scanner
pub struct Scanner<'s, S: ProcessSource + ?Sized> {
    source: &'s S,
    patterns: Vec<Arc<Pattern>>,
    options: ScanOptions,
    self_process: Process,
}

impl<'s, S: ProcessSource + ?Sized> Scanner<'s, S> {
    pub fn new(source: &'s S, patterns: Vec<Pattern>, options: ScanOptions) -> Self {
        Scanner {
            source,
            patterns: patterns.into_iter().map(Arc::new).collect(),
            options,
            self_process: Process::current(),
        }
    }

    /// Treat `process` as the scanner's own process for self-exclusion
    pub fn with_self(mut self, process: Process) -> Self {
        self.self_process = process;
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn patterns(&self) -> &[Arc<Pattern>] {
        &self.patterns
    }

    /// Start a scan. Only enumerating the candidate processes can fail here;
    /// everything after that is contained per process.
    pub fn scan(&self) -> Result<ScanIter<'_, S>> {
        let candidates = match self.options.target {
            Some(process) => vec![process],
            None => self.source.processes()?,
        };

        let excluded = if self.options.include_self {
            HashSet::new()
        } else {
            let own = ancestry(self.source, self.self_process);
            if !own.complete {
                tracing::debug!(
                    "ancestry of {} is incomplete, excluding {} known processes",
                    self.self_process,
                    own.chain.len()
                );
            }
            own.chain.into_iter().collect()
        };

        tracing::debug!(
            "scanning {} processes with {} patterns",
            candidates.len(),
            self.patterns.len()
        );

        Ok(ScanIter {
            source: self.source,
            patterns: &self.patterns,
            options: &self.options,
            excluded,
            candidates: candidates.into_iter(),
            pending: VecDeque::new(),
            stats: ScanStats::default(),
        })
    }
}

/// Lazy stream of matches, one process at a time
pub struct ScanIter<'a, S: ProcessSource + ?Sized> {
    source: &'a S,
    patterns: &'a [Arc<Pattern>],
    options: &'a ScanOptions,
    excluded: HashSet<Process>,
    candidates: vec::IntoIter<Process>,
    pending: VecDeque<MatchResult>,
    stats: ScanStats,
}

impl<S: ProcessSource + ?Sized> ScanIter<'_, S> {
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    fn should_scan(&self, region: &MemoryRegion) -> bool {
        if !region.is_readable() {
            return false;
        }
        if self.options.fast && region.is_file_backed() {
            return false;
        }
        match self.options.max_region_size {
            Some(max) if region.size > max => {
                tracing::debug!(
                    "skipping region {:#x} of {:#x} bytes (limit {:#x})",
                    region.address,
                    region.size,
                    max
                );
                false
            }
            _ => true,
        }
    }

    /// Scan one process. `Ok(None)` means it was filtered out.
    fn scan_process(&mut self, process: Process) -> Result<Option<Vec<MatchResult>>> {
        let status = self.source.status(process)?;

        if let Some(filter) = &self.options.name_filter {
            if !status.name.contains(filter.as_str()) {
                return Ok(None);
            }
        }
        if self.excluded.contains(&process) {
            tracing::debug!("skipping {} ({}): part of own ancestry", process, status.name);
            return Ok(None);
        }

        let regions = self.source.maps(process)?;
        let process_name: Arc<str> = Arc::from(status.name.as_str());
        let mut matches = Vec::new();

        for region in regions {
            if !self.should_scan(&region) {
                self.stats.regions_skipped += 1;
                continue;
            }

            let memory = match self.source.read_memory(process, &region, 0, 0) {
                Ok(memory) => memory,
                Err(e) => {
                    self.stats.regions_failed += 1;
                    tracing::trace!(
                        "failed to read region {:#x}-{:#x} of {}: {}",
                        region.address,
                        region.end(),
                        process,
                        e
                    );
                    continue;
                }
            };
            self.stats.regions_scanned += 1;

            let region = Arc::new(region);
            for pattern in self.patterns {
                for (offset, bytes) in find_matches(pattern, &memory) {
                    matches.push(MatchResult {
                        pattern: Arc::clone(pattern),
                        process,
                        process_name: Arc::clone(&process_name),
                        region: Arc::clone(&region),
                        address: region.address + offset as u64,
                        bytes: bytes.to_vec(),
                    });
                }
            }
        }

        Ok(Some(matches))
    }

    fn record_failure(&mut self, process: Process, err: &ProcError) {
        self.stats.processes_failed += 1;
        if err.is_expected() {
            tracing::debug!("skipping process {}: {}", process, err);
        } else {
            tracing::warn!("failed to scan process {}: {}", process, err);
        }
    }
}

impl<S: ProcessSource + ?Sized> Iterator for ScanIter<'_, S> {
    type Item = MatchResult;

    fn next(&mut self) -> Option<MatchResult> {
        loop {
            if let Some(found) = self.pending.pop_front() {
                return Some(found);
            }

            let process = self.candidates.next()?;
            match self.scan_process(process) {
                Ok(Some(matches)) => {
                    self.stats.processes_scanned += 1;
                    self.stats.matches += matches.len();
                    self.pending.extend(matches);
                }
                Ok(None) => self.stats.processes_filtered += 1,
                Err(e) => self.record_failure(process, &e),
            }
        }
    }
}
