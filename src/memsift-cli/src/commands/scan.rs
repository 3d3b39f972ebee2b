//! Memory scanning command handlers
//!
//! `grep` searches for one expression given on the command line, `scan` for
//! every rule in the built-in secret catalog. Both stream matches as they are
//! found and finish with a one-line summary.

use anyhow::{Context, Result};
use std::io::Write;

use memsift::{render, MatchResult, Pattern, Process, ProcessSource, ScanOptions, Scanner};

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::output::Style;

/// Handle the grep command
pub fn grep<S: ProcessSource + ?Sized>(
    source: &S,
    expression: &str,
    args: &ScanArgs,
    config: &Config,
    style: &Style,
    out: &mut impl Write,
) -> Result<usize> {
    let pattern = Pattern::adhoc(expression)
        .with_context(|| format!("Invalid pattern '{}'", expression))?;
    let scanner = Scanner::new(source, vec![pattern], scan_options(args, config));
    report(source, &scanner, args.json, style, out)
}

/// Handle the scan command
pub fn scan<S: ProcessSource + ?Sized>(
    source: &S,
    args: &ScanArgs,
    config: &Config,
    style: &Style,
    out: &mut impl Write,
) -> Result<usize> {
    let patterns = memsift::catalog();
    tracing::debug!("scanning with {} catalog patterns", patterns.len());
    let scanner = Scanner::new(source, patterns, scan_options(args, config));
    report(source, &scanner, args.json, style, out)
}

/// Merge command-line flags over the config file
pub fn scan_options(args: &ScanArgs, config: &Config) -> ScanOptions {
    ScanOptions {
        target: args.pid.map(Process),
        name_filter: args.process_name.clone(),
        include_self: args.include_self,
        dump_radius: args.dump_radius.unwrap_or_else(|| config.dump_radius()),
        fast: args.fast,
        max_region_size: args.max_region_size.or(config.max_region_size),
    }
}

/// Run the scan and write every match to `out`. Returns the match count.
pub fn report<S: ProcessSource + ?Sized>(
    source: &S,
    scanner: &Scanner<'_, S>,
    json: bool,
    style: &Style,
    out: &mut impl Write,
) -> Result<usize> {
    let radius = scanner.options().dump_radius;
    let mut matches = scanner.scan().context("Failed to list processes")?;

    let mut total = 0;
    for found in matches.by_ref() {
        total += 1;
        if json {
            let line = serde_json::to_string(&found.to_record())
                .context("Failed to serialize match")?;
            writeln!(out, "{}", line)?;
        } else {
            write!(out, "{}", summarise(source, total, &found, radius, style))?;
        }
    }

    let stats = matches.stats();
    tracing::debug!("scan finished: {:?}", stats);
    if stats.processes_scanned == 0 && stats.processes_failed > 0 {
        tracing::warn!(
            "none of the {} candidate processes could be read; try running as root",
            stats.processes_failed
        );
    }

    if !json {
        writeln!(out, "{}", completion(total, style))?;
    }
    Ok(total)
}

/// Report block for one match, numbered from 1
pub fn summarise<S: ProcessSource + ?Sized>(
    source: &S,
    number: usize,
    found: &MatchResult,
    radius: usize,
    style: &Style,
) -> String {
    let (b, r) = (style.bold, style.reset);
    let dump = render(source, found, radius, &style.palette);

    format!(
        " {u}Match #{number}{r}\n\n\
         \x20 {b}Matched{r}   {text}\n\
         \x20 {b}Pattern{r}   {pattern}\n\
         \x20 {b}Process{r}   {process}\n\
         \x20 {b}Address{r}   {address:#x} {path}\n\n\
         \x20 {b}Memory Dump{r}\n\n{dump}\n",
        u = style.underline,
        text = found.text(),
        pattern = found.pattern,
        process = found.process.label(&found.process_name),
        address = found.address,
        path = found.region.path,
    )
}

fn completion(total: usize, style: &Style) -> String {
    if total == 0 {
        format!("{}Operation Complete. No results found.{}\n", style.red, style.reset)
    } else {
        format!(
            "{g}Operation Complete. {b}{total}{r}{g} results found.{r}\n",
            g = style.green,
            b = style.bold,
            r = style.reset,
        )
    }
}
