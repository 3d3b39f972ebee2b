//! Evidence Renderer
//!
//! Re-reads a few rows of memory around a match and renders them as a hex
//! dump with the matched bytes highlighted.

use std::fmt::Write;
use std::ops::Range;

use crate::scanner::MatchResult;
use crate::source::ProcessSource;

pub const BYTES_PER_ROW: u64 = 16;

/// Escape sequences used to decorate a dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub highlight: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
    /// Print a `^` marker row under highlighted bytes (for output without colour)
    pub markers: bool,
}

impl Palette {
    pub const fn ansi() -> Self {
        Palette {
            highlight: "\x1b[1m\x1b[31m",
            dim: "\x1b[2m",
            reset: "\x1b[0m",
            markers: false,
        }
    }

    pub const fn plain() -> Self {
        Palette {
            highlight: "",
            dim: "",
            reset: "",
            markers: true,
        }
    }
}

/// Part of a region to dump, relative to the region start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpWindow {
    pub start: u64,
    pub size: u64,
}

/// Compute the dump window for a match of `match_len` bytes at `offset`
/// within a region of `region_size` bytes, with `radius` rows of context.
///
/// The window starts on a row boundary `radius` rows above the match and is
/// clamped to the region on both ends.
pub fn dump_window(offset: u64, match_len: u64, radius: u64, region_size: u64) -> DumpWindow {
    let context = BYTES_PER_ROW.saturating_mul(radius);
    let start = (offset / BYTES_PER_ROW * BYTES_PER_ROW).saturating_sub(context);
    // An empty match still gets the row it sits on
    let size = match_len
        .max(1)
        .saturating_add(context.saturating_mul(2))
        .div_ceil(BYTES_PER_ROW)
        .saturating_mul(BYTES_PER_ROW);

    DumpWindow {
        start,
        size: size.min(region_size.saturating_sub(start)),
    }
}

/// Render the evidence dump for `found`. Read failures are reported inline
/// rather than returned.
pub fn render<S: ProcessSource + ?Sized>(
    source: &S,
    found: &MatchResult,
    radius: usize,
    palette: &Palette,
) -> String {
    let offset = found.offset_in_region();
    let match_len = found.bytes.len() as u64;
    let window = dump_window(offset, match_len, radius as u64, found.region.size);

    // A zero length would mean "whole region" to the reader
    if window.size == 0 {
        let reason = if offset > found.region.size {
            "match lies outside its region"
        } else {
            "empty match at the end of its region"
        };
        return format!("    dump not available: {}", reason);
    }

    match source.read_memory(found.process, &found.region, window.start, window.size) {
        Ok(data) => {
            let from = (offset - window.start) as usize;
            hex_dump(
                &data,
                found.region.address + window.start,
                from..from + match_len as usize,
                palette,
            )
        }
        Err(e) => format!("    dump not available: {}", e),
    }
}

/// Format `data` as 16-byte rows starting at `base_address`. Byte indices in
/// `highlight` are decorated in both the hex and ASCII columns.
pub fn hex_dump(data: &[u8], base_address: u64, highlight: Range<usize>, palette: &Palette) -> String {
    let mut out = String::new();

    // Column header
    let _ = write!(out, "{:20}{}", "", palette.dim);
    for i in 0..BYTES_PER_ROW {
        let _ = write!(out, "{:02X} ", i);
    }
    let _ = writeln!(out, "{}", palette.reset);

    for (row, chunk) in data.chunks(BYTES_PER_ROW as usize).enumerate() {
        let row_start = row * BYTES_PER_ROW as usize;
        let address = base_address + row_start as u64;
        let _ = write!(out, "  {}{:016x}{}  ", palette.dim, address, palette.reset);

        let mut ascii = String::new();
        for (i, &byte) in chunk.iter().enumerate() {
            let marked = highlight.contains(&(row_start + i));
            let c = if (0x20..=0x7e).contains(&byte) {
                byte as char
            } else {
                '.'
            };

            if marked {
                let _ = write!(out, "{}{:02x}{} ", palette.highlight, byte, palette.reset);
                let _ = write!(ascii, "{}{}{}", palette.highlight, c, palette.reset);
            } else {
                let _ = write!(out, "{:02x} ", byte);
                let _ = write!(ascii, "{}{}{}", palette.dim, c, palette.reset);
            }
        }

        // Pad a short final row so the ASCII column lines up
        for _ in chunk.len()..BYTES_PER_ROW as usize {
            out.push_str("   ");
        }
        let _ = writeln!(out, "  {}", ascii);

        if palette.markers {
            let marks: Vec<bool> = (0..chunk.len())
                .map(|i| highlight.contains(&(row_start + i)))
                .collect();
            if marks.iter().any(|&m| m) {
                let mut line = " ".repeat(20);
                for &m in &marks {
                    line.push_str(if m { "^^ " } else { "   " });
                }
                for _ in chunk.len()..BYTES_PER_ROW as usize {
                    line.push_str("   ");
                }
                line.push_str("  ");
                for &m in &marks {
                    line.push(if m { '^' } else { ' ' });
                }
                let _ = writeln!(out, "{}", line.trim_end());
            }
        }
    }

    out
}
