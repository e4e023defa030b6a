//! Show command handler

use anyhow::{bail, Result};
use scrapyard::{DataLayout, Heuristics, ItemReferences, ItemsReport, ReferenceEntry, ReportItem};
use std::fmt::Write as _;

use super::load_report;

/// Handle the show command
pub fn handle(layout: &DataLayout, heuristics: &Heuristics, query: &str) -> Result<()> {
    let report = load_report(layout, heuristics)?;

    let Some(entry) = report.find(query) else {
        bail!("No item matches '{}'", query);
    };

    print!("{}", describe(&report, entry)?);
    Ok(())
}

/// Multi-line description of one item and what references it
pub fn describe(report: &ItemsReport, entry: &ReportItem) -> Result<String> {
    let item = &entry.item;
    let mut out = String::new();

    let name = item.display_name();
    writeln!(out, "{} ({})", if name.is_empty() { &item.id } else { &name }, item.id)?;
    writeln!(out, "{}", "=".repeat(60))?;

    let description = item.description.resolve();
    if !description.is_empty() {
        writeln!(out, "{}", description)?;
        writeln!(out)?;
    }

    if let Some(t) = &item.item_type {
        writeln!(out, "  Type:        {}", t)?;
    }
    if let Some(c) = &item.category {
        writeln!(out, "  Category:    {}", c)?;
    }
    if let Some(r) = item.rarity {
        writeln!(out, "  Rarity:      {}", r.name())?;
    }
    if let Some(w) = item.weight_kg {
        writeln!(out, "  Weight:      {} kg", w)?;
    }
    if let Some(s) = item.stack_size {
        writeln!(out, "  Stack size:  {}", s)?;
    }
    writeln!(out, "  Sell value:  {}", item.value)?;
    writeln!(out, "  Recycle:     {}", entry.recycle_value)?;
    writeln!(out, "  Bucket:      {} ({})", entry.bucket, entry.rule)?;
    if !entry.tags.is_empty() {
        writeln!(out, "  Tags:        {}", entry.tags.join(", "))?;
    }
    writeln!(
        out,
        "  Image:       {}",
        item.resolved_image.as_deref().unwrap_or("(none)")
    )?;
    writeln!(out, "  Source:      {}", item.source_file)?;

    if !item.recycles_into.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recycles into:")?;
        for (component, qty) in &item.recycles_into {
            let value = report
                .find_by_id(component)
                .map(|c| c.item.value.to_string())
                .unwrap_or_else(|| "?".to_string());
            writeln!(out, "  {:>3} x {:<28} (value {})", qty, component, value)?;
        }
    }

    write_references(&mut out, report.references_of(&item.id))?;
    Ok(out)
}

fn write_references(out: &mut String, refs: &ItemReferences) -> Result<()> {
    writeln!(out)?;
    if !refs.is_referenced() {
        writeln!(out, "Not referenced by any project or quest")?;
        return Ok(());
    }

    if !refs.projects.is_empty() {
        writeln!(out, "Projects ({}):", refs.projects.len())?;
        for r in &refs.projects {
            let mut line = format!("  - {}", label(r));
            if let Some(level) = r.level {
                write!(line, ", level {}", level)?;
            }
            if let Some(qty) = r.quantity {
                write!(line, ", x{}", qty)?;
            }
            writeln!(out, "{}", line)?;
        }
    }

    if !refs.quests.is_empty() {
        writeln!(out, "Quests ({}):", refs.quests.len())?;
        for r in &refs.quests {
            writeln!(out, "  - {}", label(r))?;
            if let Some(objectives) = &r.objectives_summary {
                writeln!(out, "      {}", objectives)?;
            }
        }
    }

    Ok(())
}

fn label(entry: &ReferenceEntry) -> String {
    match &entry.title {
        Some(title) => format!("{} [{}]", title, entry.source_document),
        None => entry.source_document.clone(),
    }
}
