//! Process control
//!
//! Thin wrappers over `kill(2)` for stopping, pausing and resuming a process.

use std::io;
use std::path::PathBuf;

use crate::error::{ProcError, Result};
use crate::process::Process;

/// A signal memsift knows how to send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Kill,
    Stop,
    Continue,
    /// Signal 0: checks the process exists and may be signalled
    Probe,
}

impl Signal {
    pub fn number(self) -> libc::c_int {
        match self {
            Signal::Kill => libc::SIGKILL,
            Signal::Stop => libc::SIGSTOP,
            Signal::Continue => libc::SIGCONT,
            Signal::Probe => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Signal::Kill => "SIGKILL",
            Signal::Stop => "SIGSTOP",
            Signal::Continue => "SIGCONT",
            Signal::Probe => "0",
        }
    }
}

/// Send `signal` to `process`
pub fn send(process: Process, signal: Signal) -> Result<()> {
    let pid = libc::pid_t::try_from(process.pid()).map_err(|_| {
        ProcError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("pid {} out of range", process),
        ))
    })?;
    if pid <= 0 {
        // 0 and negative pids address process groups
        return Err(ProcError::NotFound { process });
    }

    tracing::debug!("sending {} to {}", signal.name(), process);

    // SAFETY: kill has no memory-safety preconditions
    let rc = unsafe { libc::kill(pid, signal.number()) };
    if rc == 0 {
        return Ok(());
    }

    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => Err(ProcError::NotFound { process }),
        Some(libc::EPERM) => Err(ProcError::PermissionDenied {
            process,
            path: PathBuf::from(format!("signal {}", signal.name())),
        }),
        _ => Err(ProcError::Io(err)),
    }
}

/// Kill `process` immediately
pub fn terminate(process: Process) -> Result<()> {
    send(process, Signal::Kill)
}

pub fn suspend(process: Process) -> Result<()> {
    send(process, Signal::Stop)
}

pub fn resume(process: Process) -> Result<()> {
    send(process, Signal::Continue)
}

/// True if `process` exists and this process may signal it
pub fn is_alive(process: Process) -> bool {
    send(process, Signal::Probe).is_ok()
}
