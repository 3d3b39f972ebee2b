//! Character device lookup for controlling terminals.
//!
//! See <https://www.kernel.org/doc/html/latest/admin-guide/devices.html>

use serde::Serialize;
use std::fmt;

/// A character device resolved from its major/minor numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub major: u32,
    pub minor: u32,
    pub name: String,
}

impl Device {
    /// Decode the `tty_nr` field of `/proc/<pid>/stat`.
    ///
    /// The major number lives in bits 15..8; the minor number is split
    /// across bits 31..20 and 7..0.
    pub fn from_tty_nr(value: u64) -> Self {
        let major = ((value >> 8) & 0xfff) as u32;
        let minor = (((value >> 12) & 0xfff00) | (value & 0xff)) as u32;
        Self::new(major, minor)
    }

    pub fn new(major: u32, minor: u32) -> Self {
        Device {
            major,
            minor,
            name: lookup_char_device(major, minor),
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Device::new(0, 0)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn lookup_char_device(major: u32, minor: u32) -> String {
    let known = match (major, minor) {
        (0, _) => Some("none".to_string()),
        (1, 1..=12) => {
            const MEMORY_DEVICES: [&str; 12] = [
                "mem", "kmem", "null", "port", "zero", "core", "full", "random", "urandom", "aio",
                "kmsg", "oldmem",
            ];
            Some(format!("/dev/{}", MEMORY_DEVICES[minor as usize - 1]))
        }
        (2, 255) => Some("/dev/ptyef".to_string()),
        (2, n) => Some(format!("/dev/ptyp{}", n)),
        (3, 255) => Some("/dev/ttyef".to_string()),
        (3, n) => Some(format!("/dev/ttyp{}", n)),
        (4, n) if n >= 64 => Some(format!("/dev/ttyS{}", n - 64)),
        (4, n) => Some(format!("/dev/tty{}", n)),
        (5, 0) => Some("/dev/tty".to_string()),
        (5, 1) => Some("/dev/console".to_string()),
        (5, 2) => Some("/dev/ptmx".to_string()),
        (5, 3) => Some("/dev/ttyprintk".to_string()),
        (5, n) if n >= 64 => Some(format!("/dev/cua{}", n - 64)),
        (7, 0) => Some("/dev/vcs".to_string()),
        (7, n) if n < 64 => Some(format!("/dev/vcs{}", n)),
        (7, 64) => Some("/dev/vcsu".to_string()),
        (7, n) => Some(format!("/dev/vcsu{}", n - 64)),
        // Unix98 PTY slaves span eight majors of 256 minors each
        (136..=143, n) => Some(format!("/dev/pts/{}", (major - 136) * 256 + n)),
        _ => None,
    };

    known.unwrap_or_else(|| format!("unknown ({}/{})", major, minor))
}
