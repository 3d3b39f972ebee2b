//! Error types shared by every procfs accessor.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::process::Process;

/// Errors that can occur while inspecting a process
#[derive(Error, Debug)]
pub enum ProcError {
    /// The process exited between enumeration and access
    #[error("process {process} not found")]
    NotFound { process: Process },

    #[error("permission denied reading {} for process {process}", path.display())]
    PermissionDenied { process: Process, path: PathBuf },

    /// A kernel-exposed record did not match the expected layout
    #[error("failed to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ProcError {
    pub(crate) fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        ProcError::Parse {
            what,
            detail: detail.into(),
        }
    }

    /// Classify an IO error raised while touching `path` on behalf of `process`.
    pub fn from_io(err: io::Error, process: Process, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ProcError::NotFound { process },
            io::ErrorKind::PermissionDenied => ProcError::PermissionDenied {
                process,
                path: path.to_path_buf(),
            },
            _ if err.raw_os_error() == Some(libc::ESRCH) => ProcError::NotFound { process },
            _ => ProcError::Io(err),
        }
    }

    /// Routine failures under process churn or unprivileged scans.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            ProcError::NotFound { .. } | ProcError::PermissionDenied { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ProcError>;
