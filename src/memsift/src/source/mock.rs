//! Mock Process Source
//!
//! An in-memory process table for testing the scanner and renderer.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use super::ProcessSource;
use crate::error::{ProcError, Result};
use crate::maps::{MemoryRegion, Permissions};
use crate::process::{Ownership, Process};
use crate::status::Status;

/// One fake process
#[derive(Debug, Clone, Default)]
pub struct MockProcess {
    /// `None` behaves like a process that vanished
    pub status: Option<Status>,
    /// `None` behaves like an unreadable maps file
    pub regions: Option<Vec<MemoryRegion>>,
    /// Backing bytes keyed by start address
    pub memory: BTreeMap<u64, Vec<u8>>,
    pub files: Vec<PathBuf>,
}

/// A mock process table
#[derive(Debug, Clone, Default)]
pub struct MockProcessSource {
    pub processes: BTreeMap<Process, MockProcess>,
}

/// Build a region with the given permissions and path
pub fn region(address: u64, size: u64, perms: &str, path: &str) -> MemoryRegion {
    MemoryRegion {
        address,
        size,
        permissions: Permissions::parse(perms).unwrap_or_default(),
        path: path.to_string(),
        ..MemoryRegion::default()
    }
}

impl MockProcessSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a process with a name and parent
    pub fn with_process(mut self, pid: u32, name: &str, parent: u32) -> Self {
        self.processes.insert(
            Process(pid),
            MockProcess {
                status: Some(Status {
                    name: name.to_string(),
                    parent: Process(parent),
                    tgid: pid,
                    ..Status::default()
                }),
                regions: Some(Vec::new()),
                ..MockProcess::default()
            },
        );
        self
    }

    /// Add a region to `pid` backed by `data`. Regions are kept in insertion
    /// order, matching how the kernel lists them.
    pub fn with_region(mut self, pid: u32, region: MemoryRegion, data: Vec<u8>) -> Self {
        let process = self.processes.entry(Process(pid)).or_default();
        process.memory.insert(region.address, data);
        process.regions.get_or_insert_with(Vec::new).push(region);
        self
    }

    /// Add a region whose memory cannot be read
    pub fn with_unreadable_region(mut self, pid: u32, region: MemoryRegion) -> Self {
        let process = self.processes.entry(Process(pid)).or_default();
        process.regions.get_or_insert_with(Vec::new).push(region);
        self
    }

    /// Make the maps file of `pid` unreadable
    pub fn without_maps(mut self, pid: u32) -> Self {
        if let Some(process) = self.processes.get_mut(&Process(pid)) {
            process.regions = None;
        }
        self
    }

    /// Make `pid` look like it exited after being listed
    pub fn vanish(mut self, pid: u32) -> Self {
        if let Some(process) = self.processes.get_mut(&Process(pid)) {
            process.status = None;
            process.regions = None;
        }
        self
    }

    fn get(&self, process: Process) -> Result<&MockProcess> {
        self.processes
            .get(&process)
            .ok_or(ProcError::NotFound { process })
    }
}

impl ProcessSource for MockProcessSource {
    fn processes(&self) -> Result<Vec<Process>> {
        Ok(self.processes.keys().copied().collect())
    }

    fn status(&self, process: Process) -> Result<Status> {
        self.get(process)?
            .status
            .clone()
            .ok_or(ProcError::NotFound { process })
    }

    fn maps(&self, process: Process) -> Result<Vec<MemoryRegion>> {
        self.get(process)?
            .regions
            .clone()
            .ok_or_else(|| ProcError::PermissionDenied {
                process,
                path: PathBuf::from(format!("/proc/{}/maps", process)),
            })
    }

    fn read_memory(
        &self,
        process: Process,
        region: &MemoryRegion,
        offset: u64,
        length: u64,
    ) -> Result<Vec<u8>> {
        let length = if length == 0 { region.size } else { length };
        let start = region.address + offset;
        let end = start + length;

        let backing = self.get(process)?.memory.range(..=start).next_back();
        match backing {
            Some((&base, data)) if end <= base + data.len() as u64 => {
                let from = (start - base) as usize;
                Ok(data[from..from + length as usize].to_vec())
            }
            _ => Err(ProcError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no mock memory for {:#x}..{:#x}", start, end),
            ))),
        }
    }

    fn ownership(&self, process: Process) -> Result<Ownership> {
        self.get(process)?;
        Ok(Ownership { uid: 0, gid: 0 })
    }

    fn open_files(&self, process: Process) -> Result<Vec<PathBuf>> {
        Ok(self.get(process)?.files.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_read_memory() {
        let source = MockProcessSource::new().with_process(10, "app", 1).with_region(
            10,
            region(0x1000, 4, "rw-p", ""),
            b"ABCD".to_vec(),
        );
        let regions = source.maps(Process(10)).unwrap();

        assert_eq!(
            source.read_memory(Process(10), &regions[0], 0, 0).unwrap(),
            b"ABCD"
        );
        assert_eq!(
            source.read_memory(Process(10), &regions[0], 1, 2).unwrap(),
            b"BC"
        );
        assert!(source.read_memory(Process(10), &regions[0], 2, 4).is_err());
    }

    #[test]
    fn test_mock_vanished_process() {
        let source = MockProcessSource::new().with_process(10, "app", 1).vanish(10);
        assert!(matches!(
            source.status(Process(10)),
            Err(ProcError::NotFound { .. })
        ));
        assert!(matches!(
            source.status(Process(11)),
            Err(ProcError::NotFound { .. })
        ));
    }

    #[test]
    fn test_mock_unreadable_maps() {
        let source = MockProcessSource::new().with_process(10, "app", 1).without_maps(10);
        assert!(matches!(
            source.maps(Process(10)),
            Err(ProcError::PermissionDenied { .. })
        ));
    }
}
