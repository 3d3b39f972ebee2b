//! Process Handle
//!
//! A process is identified by its PID and nothing else. Every accessor goes
//! back to procfs, so a handle to an exited process stays valid as a value
//! but any read through it fails with `ProcError::NotFound`.

use serde::Serialize;
use std::fmt;

/// A process identified by its OS-assigned PID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Process(pub u32);

/// Sentinel for "no process", used as the parent of init and kernel threads
pub const NO_PROCESS: Process = Process(0);

impl Process {
    /// The process running this code
    pub fn current() -> Self {
        Process(std::process::id())
    }

    pub fn pid(self) -> u32 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self == NO_PROCESS
    }

    /// Human-readable label in the form `1234 (bash)`
    pub fn label(self, name: &str) -> String {
        let name = if name.is_empty() { "unknown" } else { name };
        format!("{} ({})", self.0, name)
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for Process {
    fn from(pid: u32) -> Self {
        Process(pid)
    }
}

/// Owner of a process, taken from its procfs directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ownership {
    pub uid: u32,
    pub gid: u32,
}
