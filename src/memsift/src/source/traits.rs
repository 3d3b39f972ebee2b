//! Process Source Trait
//!
//! Core abstraction over where process facts come from.

use std::path::PathBuf;

use crate::error::Result;
use crate::maps::MemoryRegion;
use crate::process::{Ownership, Process};
use crate::status::Status;

/// Trait for reading process state from procfs or a stand-in
pub trait ProcessSource: Send + Sync {
    /// All visible processes in ascending PID order
    fn processes(&self) -> Result<Vec<Process>>;

    /// Fresh status snapshot; never cached
    fn status(&self, process: Process) -> Result<Status>;

    /// Current memory layout of the process
    fn maps(&self, process: Process) -> Result<Vec<MemoryRegion>>;

    /// Read `length` bytes starting `offset` bytes into `region`.
    /// A `length` of 0 reads the whole region.
    fn read_memory(
        &self,
        process: Process,
        region: &MemoryRegion,
        offset: u64,
        length: u64,
    ) -> Result<Vec<u8>>;

    fn ownership(&self, process: Process) -> Result<Ownership>;

    /// Targets of the process's open file descriptors
    fn open_files(&self, process: Process) -> Result<Vec<PathBuf>>;

    /// Display name, or `unknown` if the status cannot be read
    fn name(&self, process: Process) -> String {
        self.status(process)
            .ok()
            .map(|s| s.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// `1234 (bash)` style label
    fn label(&self, process: Process) -> String {
        process.label(&self.name(process))
    }

    /// Direct children of `parent`. Processes whose status cannot be read are
    /// skipped.
    fn children(&self, parent: Process) -> Result<Vec<Process>> {
        Ok(self
            .processes()?
            .into_iter()
            .filter(|&p| {
                self.status(p)
                    .map(|s| s.parent == parent)
                    .unwrap_or(false)
            })
            .collect())
    }

    /// First process whose name is exactly `name`
    fn find_by_name(&self, name: &str) -> Result<Option<Process>> {
        for process in self.processes()? {
            match self.status(process) {
                Ok(status) if status.name == name => return Ok(Some(process)),
                Ok(_) => {}
                Err(e) => tracing::debug!("failed to read status for process {}: {}", process, e),
            }
        }
        Ok(None)
    }
}
