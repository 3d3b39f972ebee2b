//! Status Reader
//!
//! Merges `/proc/<pid>/stat` and `/proc/<pid>/status` into one snapshot.
//! See `man 5 proc` for the field layout of both records.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::device::Device;
use crate::error::{ProcError, Result};
use crate::process::{Process, NO_PROCESS};

/// Lifecycle state of a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum State {
    Running,
    Sleeping,
    DiskSleep,
    Stopped,
    TracingStop,
    Zombie,
    Dead,
    Idle,
    #[default]
    Unknown,
}

impl State {
    pub fn from_code(code: char) -> Self {
        match code {
            'R' => State::Running,
            'S' => State::Sleeping,
            'D' => State::DiskSleep,
            'T' => State::Stopped,
            't' => State::TracingStop,
            'Z' => State::Zombie,
            'X' => State::Dead,
            'I' => State::Idle,
            _ => State::Unknown,
        }
    }

    pub fn code(self) -> char {
        match self {
            State::Running => 'R',
            State::Sleeping => 'S',
            State::DiskSleep => 'D',
            State::Stopped => 'T',
            State::TracingStop => 't',
            State::Zombie => 'Z',
            State::Dead => 'X',
            State::Idle => 'I',
            State::Unknown => '?',
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            State::Running => "running",
            State::Sleeping => "sleeping",
            State::DiskSleep => "disk sleep",
            State::Stopped => "stopped",
            State::TracingStop => "tracing stop",
            State::Zombie => "zombie",
            State::Dead => "dead",
            State::Idle => "idle",
            State::Unknown => "unknown",
        };
        write!(f, "{} ({})", self.code(), description)
    }
}

/// Snapshot of a process taken from `stat` and `status`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Status {
    /// Command name, truncated by the kernel to 15 bytes
    pub name: String,
    pub state: State,
    /// Parent process (`NO_PROCESS` if none)
    pub parent: Process,
    pub process_group: i32,
    pub session: i32,
    /// Controlling terminal
    pub tty: Device,
    /// Foreground process group of the controlling terminal, -1 if none
    pub foreground_process_group: i32,
    /// PF_* flags from include/linux/sched.h
    pub kernel_flags: u32,
    /// Thread group id (from `status` only)
    pub tgid: u32,
    /// Number of threads (from `status` only)
    pub threads: u32,
}

impl Status {
    pub fn has_parent(&self) -> bool {
        self.parent != NO_PROCESS
    }
}

/// Parse both records and merge them.
pub fn parse(stat: &str, status: &str) -> Result<Status> {
    let mut parsed = parse_stat(stat)?;
    apply_status(status, &mut parsed)?;
    Ok(parsed)
}

/// Parse the single-line `/proc/<pid>/stat` record.
///
/// The command name is wrapped in parentheses and may itself contain spaces
/// or parentheses, so it is cut out between the first `(` and the last `)`
/// before the remaining fields are split on whitespace.
pub fn parse_stat(data: &str) -> Result<Status> {
    let open = data
        .find('(')
        .ok_or_else(|| ProcError::parse("stat", "missing '(' around command name"))?;
    let close = data
        .rfind(')')
        .filter(|&close| close > open)
        .ok_or_else(|| ProcError::parse("stat", "missing ')' around command name"))?;

    // Index 0 is blank so positions match the field numbers in `man proc`
    let mut fields: Vec<&str> = vec![""];
    fields.extend(data[..open].split_whitespace());
    fields.push(&data[open + 1..close]);
    fields.extend(data[close + 1..].split_whitespace());

    let state = field(&fields, 3, "state")?
        .chars()
        .next()
        .map(State::from_code)
        .unwrap_or_default();
    let ppid: u32 = parse_number(field(&fields, 4, "ppid")?, "ppid")?;
    let process_group = parse_number(field(&fields, 5, "pgrp")?, "pgrp")?;
    let session = parse_number(field(&fields, 6, "session")?, "session")?;
    let tty_nr: i64 = parse_number(field(&fields, 7, "tty_nr")?, "tty_nr")?;
    let foreground_process_group = parse_number(field(&fields, 8, "tpgid")?, "tpgid")?;
    let kernel_flags = parse_number(field(&fields, 9, "flags")?, "flags")?;

    Ok(Status {
        name: fields[2].to_string(),
        state,
        parent: Process(ppid),
        process_group,
        session,
        tty: Device::from_tty_nr(tty_nr as u64),
        foreground_process_group,
        kernel_flags,
        ..Status::default()
    })
}

fn field<'a>(fields: &[&'a str], index: usize, what: &str) -> Result<&'a str> {
    fields
        .get(index)
        .copied()
        .ok_or_else(|| ProcError::parse("stat", format!("missing field {} ({})", index, what)))
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    value
        .parse()
        .map_err(|e| ProcError::parse("stat", format!("invalid {} '{}': {}", what, value, e)))
}

type FieldSetter = fn(&mut Status, &str) -> Result<()>;

/// `status` keys copied into a `Status`, with the setter for each
const STATUS_FIELDS: &[(&str, FieldSetter)] = &[
    ("Name", set_name),
    ("PPid", set_parent),
    ("Tgid", set_tgid),
    ("Threads", set_threads),
];

fn set_name(status: &mut Status, value: &str) -> Result<()> {
    status.name = value.to_string();
    Ok(())
}

fn set_parent(status: &mut Status, value: &str) -> Result<()> {
    status.parent = Process(parse_unsigned("PPid", value)?);
    Ok(())
}

fn set_tgid(status: &mut Status, value: &str) -> Result<()> {
    status.tgid = parse_unsigned("Tgid", value)?;
    Ok(())
}

fn set_threads(status: &mut Status, value: &str) -> Result<()> {
    status.threads = parse_unsigned("Threads", value)?;
    Ok(())
}

fn parse_unsigned(key: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|e| ProcError::parse("status", format!("invalid {} '{}': {}", key, value, e)))
}

/// Split a `key:\tvalue` record into a table, one entry per line.
pub fn status_table(data: &str) -> HashMap<&str, &str> {
    data.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key, value.trim()))
        .collect()
}

/// Fill `status` from the `/proc/<pid>/status` record. Unknown keys are
/// ignored and missing keys leave the current value untouched.
pub fn apply_status(data: &str, status: &mut Status) -> Result<()> {
    let table = status_table(data);
    for (key, setter) in STATUS_FIELDS {
        if let Some(value) = table.get(key) {
            setter(status, value)?;
        }
    }
    Ok(())
}
