//! Process tree rendering

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::io::Write;

use memsift::{Process, ProcessSource};

use crate::output::Style;

/// Handle the tree command
pub fn handle<S: ProcessSource + ?Sized>(
    source: &S,
    pid: u32,
    style: &Style,
    out: &mut impl Write,
) -> Result<()> {
    let root = Process(pid);
    let status = source
        .status(root)
        .with_context(|| format!("Failed to read status for process {}", pid))?;

    // parent -> [(child, name)], children in PID order
    let mut children: BTreeMap<Process, Vec<(Process, String)>> = BTreeMap::new();
    for process in source.processes().context("Failed to list processes")? {
        match source.status(process) {
            Ok(child) => children
                .entry(child.parent)
                .or_default()
                .push((process, child.name)),
            Err(e) => tracing::debug!("failed to read status for process {}: {}", process, e),
        }
    }

    write!(out, "{}", render_tree(root, &status.name, &children, style))?;
    Ok(())
}

/// Draw `root` and its descendants. Each process is drawn at most once, so a
/// parent cycle cannot recurse forever.
pub fn render_tree(
    root: Process,
    name: &str,
    children: &BTreeMap<Process, Vec<(Process, String)>>,
    style: &Style,
) -> String {
    let mut out = String::new();
    let mut seen = HashSet::new();
    draw_branch(&mut out, root, name, "", true, children, &mut seen, style);
    out
}

#[allow(clippy::too_many_arguments)]
fn draw_branch(
    out: &mut String,
    process: Process,
    name: &str,
    prefix: &str,
    last: bool,
    children: &BTreeMap<Process, Vec<(Process, String)>>,
    seen: &mut HashSet<Process>,
    style: &Style,
) {
    if !seen.insert(process) {
        return;
    }

    out.push_str(style.dim);
    out.push_str(prefix);
    if !prefix.is_empty() {
        out.push_str(if last { " └─ " } else { " ├─ " });
    }
    out.push_str(style.reset);
    out.push_str(&format!(
        "{name} {d}({r}{process}{d}){r}\n",
        d = style.dim,
        r = style.reset
    ));

    let branch = format!("{}{}", prefix, if last { "   " } else { " │ " });
    let kids: Vec<&(Process, String)> = children
        .get(&process)
        .map(|kids| kids.iter().filter(|(child, _)| *child != process).collect())
        .unwrap_or_default();

    for (i, (child, child_name)) in kids.iter().enumerate() {
        draw_branch(
            out,
            *child,
            child_name,
            &branch,
            i == kids.len() - 1,
            children,
            seen,
            style,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(u32, u32, &str)]) -> BTreeMap<Process, Vec<(Process, String)>> {
        let mut children: BTreeMap<Process, Vec<(Process, String)>> = BTreeMap::new();
        for &(pid, parent, name) in entries {
            children
                .entry(Process(parent))
                .or_default()
                .push((Process(pid), name.to_string()));
        }
        children
    }

    #[test]
    fn test_render_tree() {
        let children = table(&[
            (1, 0, "init"),
            (10, 1, "sshd"),
            (11, 10, "bash"),
            (12, 11, "vim"),
            (20, 1, "cron"),
        ]);
        let text = render_tree(Process(1), "init", &children, &Style::new(false));
        assert_eq!(
            text,
            "init (1)\n\
             \x20   ├─ sshd (10)\n\
             \x20   │  └─ bash (11)\n\
             \x20   │     └─ vim (12)\n\
             \x20   └─ cron (20)\n"
        );
    }

    #[test]
    fn test_render_subtree() {
        let children = table(&[(1, 0, "init"), (10, 1, "sshd"), (11, 10, "bash")]);
        let text = render_tree(Process(10), "sshd", &children, &Style::new(false));
        assert_eq!(text, "sshd (10)\n    └─ bash (11)\n");
    }

    #[test]
    fn test_render_tree_cycle() {
        let children = table(&[(5, 6, "a"), (6, 5, "b")]);
        let text = render_tree(Process(5), "a", &children, &Style::new(false));
        assert_eq!(text.lines().count(), 2);
    }
}
