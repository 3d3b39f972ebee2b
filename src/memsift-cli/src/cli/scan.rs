//! Flags shared by the memory scanning commands

use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Only scan this process (default: every process on the system)
    #[arg(short, long)]
    pub pid: Option<u32>,

    /// Only scan processes whose name contains this string
    #[arg(short = 'n', long)]
    pub process_name: Option<String>,

    /// Rows of memory to dump above and below each match
    #[arg(short = 'r', long)]
    pub dump_radius: Option<usize>,

    /// Include this process and its ancestors
    #[arg(short = 's', long = "self")]
    pub include_self: bool,

    /// Skip memory-mapped files to run faster
    #[arg(short, long)]
    pub fast: bool,

    /// Print one JSON object per match instead of a report
    #[arg(long)]
    pub json: bool,

    /// Skip regions larger than this (e.g. 512K, 64M, 2G)
    #[arg(long, value_parser = parse_size)]
    pub max_region_size: Option<u64>,
}

/// Parse a byte count with an optional K/M/G suffix (powers of 1024)
pub fn parse_size(input: &str) -> Result<u64, String> {
    let input = input.trim();
    let (digits, multiplier) = match input.chars().last().map(|c| c.to_ascii_uppercase()) {
        Some('K') => (&input[..input.len() - 1], 1u64 << 10),
        Some('M') => (&input[..input.len() - 1], 1u64 << 20),
        Some('G') => (&input[..input.len() - 1], 1u64 << 30),
        _ => (input, 1),
    };

    let value: u64 = digits
        .parse()
        .map_err(|_| format!("invalid size '{}'", input))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size '{}' is too large", input))
}
