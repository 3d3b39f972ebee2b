//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::scan::ScanArgs;

#[derive(Parser)]
#[command(name = "memsift")]
#[command(about = "Live process memory triage for Linux", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short = 'D', long, global = true)]
    pub debug: bool,

    /// Directory laid out like /proc
    #[arg(long, global = true, env = "MEMSIFT_PROC_ROOT", default_value = memsift::DEFAULT_PROC_ROOT)]
    pub proc_root: PathBuf,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search process memory for a regular expression
    #[command(visible_alias = "g")]
    Grep {
        /// Regular expression, matched against raw bytes
        pattern: String,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Search process memory for the built-in set of secret patterns
    #[command(visible_alias = "s")]
    Scan {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// List all processes currently available on the system
    #[command(visible_alias = "ls")]
    List,

    /// Find a PID by exact process name (first match wins)
    #[command(visible_alias = "f")]
    Find {
        /// Process name
        name: String,
    },

    /// Show detailed information about a process
    #[command(visible_alias = "i")]
    Info {
        /// Process ID
        pid: u32,
    },

    /// Show name and parent of a process
    #[command(visible_alias = "st")]
    Status {
        /// Process ID
        pid: u32,
    },

    /// Show the memory map of a process
    #[command(visible_alias = "m")]
    Maps {
        /// Process ID
        pid: u32,
    },

    /// Show a tree of a process and all of its descendants
    #[command(visible_alias = "t")]
    Tree {
        /// Root of the tree
        #[arg(short, long, default_value = "1")]
        pid: u32,
    },

    /// Show the files a process has open
    Files {
        /// Process ID
        pid: u32,
    },

    /// Show information about the running kernel
    #[command(visible_alias = "k")]
    Kernel,

    /// Kill a process using SIGKILL
    Kill {
        /// Process ID
        pid: u32,

        /// Kill the children of the process, leaving the process itself alive
        #[arg(short, long)]
        children: bool,
    },

    /// Suspend a process using SIGSTOP (undo with `memsift resume`)
    Suspend {
        /// Process ID
        pid: u32,
    },

    /// Resume a suspended process using SIGCONT
    Resume {
        /// Process ID
        pid: u32,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Default number of dump rows shown above and below a match
        #[arg(long)]
        radius: Option<usize>,

        /// Enable or disable coloured output
        #[arg(long)]
        color: Option<bool>,

        /// Default size limit for scanned regions (e.g. 64M)
        #[arg(long, value_parser = super::scan::parse_size)]
        max_region_size: Option<u64>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
