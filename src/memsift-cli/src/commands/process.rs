//! Process information command handlers
//!
//! Handlers for list, find, info, status, maps, files and kernel.

use anyhow::{bail, Context, Result};
use std::io::Write;

use memsift::{ProcFs, Process, ProcessSource};

use crate::output::key_value;

/// List every process whose status can be read
pub fn list<S: ProcessSource + ?Sized>(source: &S, out: &mut impl Write) -> Result<()> {
    let processes = source.processes().context("Failed to list processes")?;

    for process in processes {
        match source.status(process) {
            Ok(status) => writeln!(out, "{:<10} {}", process, status.name)?,
            Err(e) => tracing::debug!("failed to read status for process {}: {}", process, e),
        }
    }

    Ok(())
}

/// Print the PID of the first process named exactly `name`
pub fn find<S: ProcessSource + ?Sized>(source: &S, name: &str, out: &mut impl Write) -> Result<()> {
    match source.find_by_name(name).context("Failed to list processes")? {
        Some(process) => {
            writeln!(out, "{}", process)?;
            Ok(())
        }
        None => bail!("no process found with name '{}'", name),
    }
}

fn parent_label<S: ProcessSource + ?Sized>(source: &S, parent: Process) -> String {
    if parent.is_none() {
        "-".to_string()
    } else {
        source.label(parent)
    }
}

pub fn info<S: ProcessSource + ?Sized>(source: &S, pid: u32, out: &mut impl Write) -> Result<()> {
    let process = Process(pid);
    let status = source
        .status(process)
        .with_context(|| format!("Failed to read status for process {}", pid))?;
    let owner = source
        .ownership(process)
        .with_context(|| format!("Failed to read ownership for process {}", pid))?;

    writeln!(out, "{}", key_value("PID", process))?;
    writeln!(out, "{}", key_value("Name", &status.name))?;
    writeln!(out, "{}", key_value("State", status.state))?;
    writeln!(out, "{}", key_value("Parent", parent_label(source, status.parent)))?;
    writeln!(out, "{}", key_value("Process Group", status.process_group))?;
    writeln!(out, "{}", key_value("Session", status.session))?;
    writeln!(out, "{}", key_value("TTY", &status.tty))?;
    writeln!(
        out,
        "{}",
        key_value("Terminal Process Group", status.foreground_process_group)
    )?;
    writeln!(
        out,
        "{}",
        key_value("Kernel Flags", format!("{:#x}", status.kernel_flags))
    )?;
    writeln!(out, "{}", key_value("Threads", status.threads))?;
    writeln!(out, "{}", key_value("Owner UID", owner.uid))?;
    writeln!(out, "{}", key_value("Owner GID", owner.gid))?;

    Ok(())
}

pub fn status<S: ProcessSource + ?Sized>(source: &S, pid: u32, out: &mut impl Write) -> Result<()> {
    let process = Process(pid);
    let status = source
        .status(process)
        .with_context(|| format!("Failed to read status for process {}", pid))?;

    writeln!(out, "{}", key_value("PID", process))?;
    writeln!(out, "{}", key_value("Name", &status.name))?;
    writeln!(out, "{}", key_value("Parent", parent_label(source, status.parent)))?;

    Ok(())
}

/// Print the memory map of a process, one region per line
pub fn maps<S: ProcessSource + ?Sized>(source: &S, pid: u32, out: &mut impl Write) -> Result<()> {
    let regions = source
        .maps(Process(pid))
        .with_context(|| format!("Failed to read memory map for process {}", pid))?;

    writeln!(
        out,
        "{:<33} {:<5} {:<8} {:<5} {:<10} PATH",
        "ADDRESS", "PERMS", "OFFSET", "DEV", "INODE"
    )?;
    for region in &regions {
        writeln!(
            out,
            "{:016x}-{:016x} {:<5} {:08x} {:02x}:{:02x} {:<10} {}",
            region.address,
            region.end(),
            region.permissions.to_string(),
            region.offset,
            region.device_major(),
            region.device_minor(),
            region.inode,
            region.path
        )?;
    }

    let total: u64 = regions.iter().map(|r| r.size).sum();
    let readable: u64 = regions
        .iter()
        .filter(|r| r.is_readable())
        .map(|r| r.size)
        .sum();
    writeln!(
        out,
        "\n{} regions, {} KiB mapped, {} KiB readable",
        regions.len(),
        total / 1024,
        readable / 1024
    )?;

    Ok(())
}

/// Print the targets of a process's open file descriptors
pub fn files<S: ProcessSource + ?Sized>(source: &S, pid: u32, out: &mut impl Write) -> Result<()> {
    let files = source
        .open_files(Process(pid))
        .with_context(|| format!("Failed to read open files for process {}", pid))?;

    for file in files {
        writeln!(out, "{}", file.display())?;
    }

    Ok(())
}

pub fn kernel(source: &ProcFs, out: &mut impl Write) -> Result<()> {
    let info = source.kernel_info();

    writeln!(out, "{}", key_value("Type", &info.os_type))?;
    writeln!(out, "{}", key_value("Release", &info.os_release))?;
    writeln!(out, "{}", key_value("Boot Args", &info.boot_args))?;
    writeln!(out, "\n{}", info.full_version)?;

    Ok(())
}
