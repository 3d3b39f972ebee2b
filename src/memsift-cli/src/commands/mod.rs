//! Command handlers for memsift CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod process;
pub mod scan;
pub mod signal;
pub mod tree;
