//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Messages meant for the user go through here and respect `--quiet`.
//! Diagnostics go through `tracing` instead. When `--json` is enabled, the
//! run summary is a single JSON object on stdout.

use std::fmt::Display;

use crate::engine::RunReport;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - summary and warnings
    Normal,
    /// Debug mode - also list every skipped commit
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags. `--quiet` wins over `--debug`.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Human-readable run summary.
pub fn format_report(report: &RunReport, verbosity: Verbosity) -> String {
    let mut lines = Vec::new();

    match &report.target {
        Some(target) => lines.push(format!(
            "{} of {} commits touch '{}' ({} edges, {} branches)",
            report.nodes, report.commits, target, report.edges, report.branches
        )),
        None => lines.push(format!(
            "{} commits, {} edges from {} branches",
            report.nodes, report.edges, report.branches
        )),
    }
    lines.push(format!("wrote {}", report.artifact.display()));

    if let Some(image) = &report.image {
        if report.rendered {
            lines.push(format!("rendered {}", image.display()));
        }
    }

    if !report.unresolved.is_empty() {
        lines.push(format!(
            "{} unreadable objects skipped",
            report.unresolved.len()
        ));
        if verbosity == Verbosity::Debug {
            lines.push(format_list(
                &report
                    .unresolved
                    .iter()
                    .map(|u| format!("{}: {}", u.oid.short(7), u.reason))
                    .collect::<Vec<_>>(),
                "  ",
            ));
        }
    }

    if !report.listing_failures.is_empty() {
        lines.push(format!(
            "{} commits could not be listed and were dropped",
            report.listing_failures.len()
        ));
        if verbosity == Verbosity::Debug {
            lines.push(format_list(
                &report
                    .listing_failures
                    .iter()
                    .map(|f| format!("{}: {}", f.oid.short(7), f.reason))
                    .collect::<Vec<_>>(),
                "  ",
            ));
        }
    }

    lines.join("\n")
}

/// Print the run summary, as prose or JSON.
pub fn report(report: &RunReport, verbosity: Verbosity, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    if report.image.is_some() && !report.rendered {
        let code = report
            .render_exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        warn(format!("renderer exited unsuccessfully ({})", code), verbosity);
    }
    print(format_report(report, verbosity), verbosity);
    Ok(())
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}
