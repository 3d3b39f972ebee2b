//! Process Source Abstraction
//!
//! Where process facts come from:
//! - Live procfs via `ProcFs`
//! - Mock sources for testing

#[cfg(test)]
mod mock;
mod procfs;
mod traits;

pub use procfs::{ProcFs, DEFAULT_PROC_ROOT};
pub use traits::ProcessSource;
