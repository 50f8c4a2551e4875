use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use dirdelta_diff::{compare_with, ComparisonResult};

use crate::cli::{Cli, OutputFormat};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;
    let result = compare_with(&cli.old, &cli.new, &config).with_context(|| {
        format!(
            "comparing {} with {}",
            cli.old.display(),
            cli.new.display()
        )
    })?;

    match cli.format {
        OutputFormat::Text => print!("{}", render_text(&cli.old, &cli.new, &result)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}

/// Human-readable report: one section per kind of change, sorted paths.
pub fn render_text(
    old: &Path,
    new: &Path,
    result: &ComparisonResult,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Comparing directories:")?;
    writeln!(out, "  Old: {}", old.display().to_string().bold())?;
    writeln!(out, "  New: {}", new.display().to_string().bold())?;
    writeln!(out)?;

    if !result.has_changes() {
        writeln!(out, "{}", "No changes detected.".green())?;
    }

    let sections = [
        ("Added Files", "+", result.added()),
        ("Removed Files", "-", result.removed()),
        ("Modified Files", "*", result.modified()),
    ];
    for (title, marker, paths) in sections {
        if paths.is_empty() {
            continue;
        }
        writeln!(out, "{} ({}):", title.bold(), paths.len())?;
        for path in paths {
            let line = format!("  {marker} {path}");
            let line = match marker {
                "+" => line.green(),
                "-" => line.red(),
                _ => line.yellow(),
            };
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
    }

    let stats = result.stats();
    if stats.old_skipped + stats.new_skipped > 0 {
        writeln!(
            out,
            "Skipped non-regular entries: old {}, new {}",
            stats.old_skipped, stats.new_skipped
        )?;
    }

    if !result.diagnostics().is_empty() {
        writeln!(
            out,
            "{} ({}):",
            "Warnings".yellow().bold(),
            result.diagnostics().len()
        )?;
        for diag in result.diagnostics() {
            writeln!(out, "  ! {diag}")?;
        }
    }
    Ok(out)
}
