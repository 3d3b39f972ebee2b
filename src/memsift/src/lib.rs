//! # memsift
//!
//! Live process memory inspection for Linux.
//!
//! This library provides functionality to:
//! - Read process status, ownership and lineage from procfs
//! - Parse memory maps into typed regions
//! - Read raw bytes out of another process's address space
//! - Scan every readable region of every process for regex patterns
//! - Render matches as highlighted hex dumps
//!
//! ## Example
//!
//! ```no_run
//! use memsift::{render, Palette, Pattern, ProcFs, ScanOptions, Scanner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let procfs = ProcFs::new();
//! let pattern = Pattern::adhoc(r"password=\S+")?;
//! let scanner = Scanner::new(&procfs, vec![pattern], ScanOptions::default());
//!
//! for found in scanner.scan()? {
//!     println!("{} in {}", found.text(), found.process);
//!     println!("{}", render(&procfs, &found, 2, &Palette::plain()));
//! }
//! # Ok(())
//! # }
//! ```

pub mod device;
pub mod error;
pub mod kernel;
pub mod maps;
pub mod pattern;
pub mod process;
pub mod render;
pub mod scanner;
pub mod signal;
pub mod source;
pub mod status;

#[doc(inline)]
pub use device::Device;
#[doc(inline)]
pub use error::{ProcError, Result};
#[doc(inline)]
pub use kernel::KernelInfo;
#[doc(inline)]
pub use maps::{parse_maps, MemoryRegion, Permissions};
#[doc(inline)]
pub use pattern::{catalog, Pattern, CATALOG};
#[doc(inline)]
pub use process::{Ownership, Process, NO_PROCESS};
#[doc(inline)]
pub use render::{dump_window, hex_dump, render, Palette};
#[doc(inline)]
pub use scanner::{
    ancestry, is_ancestor, MatchRecord, MatchResult, ScanIter, ScanOptions, ScanStats, Scanner,
    DEFAULT_DUMP_RADIUS, MAX_ANCESTRY_DEPTH,
};
#[doc(inline)]
pub use source::{ProcFs, ProcessSource, DEFAULT_PROC_ROOT};
#[doc(inline)]
pub use status::{State, Status};
