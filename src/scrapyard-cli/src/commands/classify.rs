//! Classify command handler

use anyhow::{Context, Result};
use scrapyard::{Bucket, DataLayout, Heuristics, ItemsReport};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::{escape_csv, load_report, truncate};
use crate::cli::OutputFormat;

const NAME_WIDTH: usize = 36;

/// Handle the classify command
pub fn handle(
    layout: &DataLayout,
    heuristics: &Heuristics,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let report = load_report(layout, heuristics)?;

    let rendered = match format {
        OutputFormat::Table => render_table(&report)?,
        OutputFormat::Csv => render_csv(&report),
        OutputFormat::Json => report.to_json_pretty().context("Failed to serialize report")?,
    };

    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} items to {}", report.items.len(), path.display());
        }
        None => println!("{}", rendered.trim_end()),
    }

    Ok(())
}

/// Bucket summary followed by each bucket's members
pub fn render_table(report: &ItemsReport) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "{:<12} {:>6}", "Bucket", "Items")?;
    writeln!(out, "{}", "-".repeat(19))?;
    for bucket in Bucket::ALL {
        writeln!(out, "{:<12} {:>6}", bucket, report.categorized.get(bucket).len())?;
    }

    for bucket in Bucket::ALL {
        let members: Vec<_> = report.in_bucket(bucket).collect();
        if members.is_empty() {
            continue;
        }

        writeln!(out)?;
        writeln!(out, "{} ({})", bucket.name().to_uppercase(), members.len())?;
        writeln!(
            out,
            "{:<width$} {:>8} {:>8}  {}",
            "Name",
            "Sell",
            "Recycle",
            "Why",
            width = NAME_WIDTH
        )?;
        writeln!(out, "{}", "-".repeat(NAME_WIDTH + 30))?;

        for entry in members {
            let name = entry.item.display_name();
            let name = if name.is_empty() { entry.item.id.clone() } else { name };
            writeln!(
                out,
                "{:<width$} {:>8} {:>8}  {}",
                truncate(&name, NAME_WIDTH),
                entry.item.value,
                entry.recycle_value,
                entry.rule.describe(),
                width = NAME_WIDTH
            )?;
        }
    }

    Ok(out)
}

/// One `bucket,id,name,sell,recycle` row per item
pub fn render_csv(report: &ItemsReport) -> String {
    let mut lines = vec!["bucket,id,name,sell,recycle".to_string()];
    for bucket in Bucket::ALL {
        for entry in report.in_bucket(bucket) {
            lines.push(format!(
                "{},{},{},{},{}",
                bucket,
                escape_csv(&entry.item.id),
                escape_csv(&entry.item.display_name()),
                entry.item.value,
                entry.recycle_value
            ));
        }
    }
    lines.join("\n")
}
