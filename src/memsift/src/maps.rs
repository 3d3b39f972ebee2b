//! Memory Region Types
//!
//! Data structures and parser for `/proc/<pid>/maps`.
//!
//! ```text
//! address           perms offset  dev   inode   pathname
//! 08048000-08056000 r-xp 00000000 03:0c 64593   /usr/sbin/gpm
//! ```

use serde::Serialize;
use std::fmt;

use crate::error::{ProcError, Result};

/// Access flags of a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Permissions {
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
    pub shared: bool,
}

impl Permissions {
    /// Parse the 4-character permission column (`r-xp`, `rw-s`, ...)
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 {
            return Err(ProcError::parse(
                "maps",
                format!("invalid permissions: {}", s),
            ));
        }
        Ok(Permissions {
            readable: bytes[0] == b'r',
            writable: bytes[1] == b'w',
            executable: bytes[2] == b'x',
            shared: bytes[3] == b's',
        })
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            flag(self.readable, 'r'),
            flag(self.writable, 'w'),
            flag(self.executable, 'x'),
            if self.shared { 's' } else { 'p' }
        )
    }
}

/// A memory region from /proc/pid/maps
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MemoryRegion {
    /// Start address
    pub address: u64,
    /// `end - start`
    pub size: u64,
    pub permissions: Permissions,
    pub offset: u64,
    /// Packed as `(major << 32) | minor`
    pub device: u64,
    pub inode: u64,
    /// Backing file, `[heap]`-style pseudo name, or empty for anonymous memory
    pub path: String,
}

impl MemoryRegion {
    pub fn end(&self) -> u64 {
        self.address + self.size
    }

    pub fn is_readable(&self) -> bool {
        self.permissions.readable
    }

    pub fn is_anonymous(&self) -> bool {
        self.path.is_empty()
    }

    /// Kernel pseudo regions such as `[heap]`, `[stack]` and `[vdso]`
    pub fn is_pseudo(&self) -> bool {
        self.path.starts_with('[') && self.path.ends_with(']')
    }

    /// Regions mapped from a file on disk
    pub fn is_file_backed(&self) -> bool {
        !self.is_anonymous() && !self.is_pseudo()
    }

    pub fn contains(&self, address: u64) -> bool {
        address >= self.address && address < self.end()
    }

    pub fn device_major(&self) -> u64 {
        self.device >> 32
    }

    pub fn device_minor(&self) -> u64 {
        self.device & 0xffff_ffff
    }
}

/// Parse the full contents of a maps file.
///
/// Lines with fewer than five fields are skipped. Any malformed line fails
/// the whole parse: a partially understood layout is not trusted.
pub fn parse_maps(data: &str) -> Result<Vec<MemoryRegion>> {
    let mut regions = Vec::new();

    for line in data.lines() {
        if line.split_whitespace().count() < 5 {
            continue;
        }
        regions.push(parse_line(line)?);
    }

    Ok(regions)
}

fn parse_line(line: &str) -> Result<MemoryRegion> {
    let mut rest = line;
    let mut next = || next_field(&mut rest).unwrap_or_default();

    let (start, end) = parse_address_range(next())?;
    let permissions = Permissions::parse(next())?;
    let offset = parse_hex(next(), "offset")?;
    let device = parse_device(next())?;
    let inode_field = next();
    let inode = inode_field.parse::<u64>().map_err(|e| {
        ProcError::parse("maps", format!("invalid inode '{}': {}", inode_field, e))
    })?;

    Ok(MemoryRegion {
        address: start,
        size: end - start,
        permissions,
        offset,
        device,
        inode,
        path: rest.trim().to_string(),
    })
}

/// Pop the next whitespace-delimited field off the front of `rest`.
fn next_field<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let trimmed = rest.trim_start();
    if trimmed.is_empty() {
        *rest = trimmed;
        return None;
    }
    let end = trimmed
        .find(char::is_whitespace)
        .unwrap_or(trimmed.len());
    let (field, remainder) = trimmed.split_at(end);
    *rest = remainder;
    Some(field)
}

fn parse_address_range(input: &str) -> Result<(u64, u64)> {
    let (start, end) = input
        .split_once('-')
        .ok_or_else(|| ProcError::parse("maps", format!("invalid address range: {}", input)))?;
    let start = parse_hex(start, "start address")?;
    let end = parse_hex(end, "end address")?;
    if end < start {
        return Err(ProcError::parse(
            "maps",
            format!("address range ends before it starts: {}", input),
        ));
    }
    Ok((start, end))
}

fn parse_hex(input: &str, what: &str) -> Result<u64> {
    u64::from_str_radix(input, 16)
        .map_err(|e| ProcError::parse("maps", format!("invalid {} '{}': {}", what, input, e)))
}

/// Parse the `major:minor` device column (see `man 3 makedev`). Older kernels
/// emit a single hex number, which is taken as-is.
pub fn parse_device(input: &str) -> Result<u64> {
    match input.split_once(':') {
        Some((major, minor)) => {
            let major = parse_hex(major, "device major")?;
            let minor = parse_hex(minor, "device minor")?;
            if major > u64::from(u32::MAX) || minor > u64::from(u32::MAX) {
                return Err(ProcError::parse(
                    "maps",
                    format!("device number out of range: {}", input),
                ));
            }
            Ok((major << 32) | minor)
        }
        None => parse_hex(input, "device"),
    }
}
