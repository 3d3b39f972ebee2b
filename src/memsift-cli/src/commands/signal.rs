//! Process control command handlers

use anyhow::{Context, Result};
use std::io::Write;

use memsift::{signal, Process, ProcessSource};

/// Handle the kill command
///
/// With `children` set, every direct child of `pid` is killed and `pid` itself
/// is left running.
pub fn kill<S: ProcessSource + ?Sized>(
    source: &S,
    pid: u32,
    children: bool,
    out: &mut impl Write,
) -> Result<()> {
    let process = Process(pid);

    if !children {
        let label = source.label(process);
        signal::terminate(process).with_context(|| format!("Failed to kill process {}", pid))?;
        writeln!(out, "Process {} killed.", label)?;
        return Ok(());
    }

    let targets = source
        .children(process)
        .context("Failed to list children for process")?;
    if targets.is_empty() {
        writeln!(out, "Process {} has no children.", source.label(process))?;
        return Ok(());
    }

    for child in targets {
        let label = source.label(child);
        signal::terminate(child)
            .with_context(|| format!("Failed to kill child process {}", child))?;
        writeln!(out, "Child process {} killed.", label)?;
    }

    Ok(())
}

pub fn suspend<S: ProcessSource + ?Sized>(source: &S, pid: u32, out: &mut impl Write) -> Result<()> {
    let process = Process(pid);
    signal::suspend(process).with_context(|| format!("Failed to suspend process {}", pid))?;
    writeln!(out, "Process {} suspended.", source.label(process))?;
    Ok(())
}

pub fn resume<S: ProcessSource + ?Sized>(source: &S, pid: u32, out: &mut impl Write) -> Result<()> {
    let process = Process(pid);
    signal::resume(process).with_context(|| format!("Failed to resume process {}", pid))?;
    writeln!(out, "Process {} resumed.", source.label(process))?;
    Ok(())
}
