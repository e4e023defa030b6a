//! Items command handler

use anyhow::{Context, Result};
use scrapyard::{Bucket, DataLayout, Heuristics, ItemsReport, ReportItem};

use super::{escape_csv, load_report, truncate};
use crate::cli::OutputFormat;

/// Listing filters
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Case-insensitive substring of the item type
    pub item_type: Option<String>,
    pub bucket: Option<Bucket>,
}

impl ItemFilter {
    fn accepts(&self, entry: &ReportItem) -> bool {
        if let Some(bucket) = self.bucket {
            if entry.bucket != bucket {
                return false;
            }
        }
        match &self.item_type {
            Some(wanted) => entry
                .item
                .item_type
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(&wanted.to_lowercase())),
            None => true,
        }
    }
}

/// Handle the items command
pub fn handle(
    layout: &DataLayout,
    heuristics: &Heuristics,
    filter: &ItemFilter,
    format: OutputFormat,
) -> Result<()> {
    let report = load_report(layout, heuristics)?;
    let selected = select(&report, filter);

    if selected.is_empty() {
        println!("No items found.");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&selected).context("Failed to serialize items")?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            println!("id,name,type,rarity,sell,recycle,bucket");
            for entry in &selected {
                println!("{}", csv_row(entry));
            }
        }
        OutputFormat::Table => {
            let header = format!(
                "{:<24} {:<28} {:<20} {:>7} {:>8}  {}",
                "ID", "Name", "Type", "Sell", "Recycle", "Bucket"
            );
            println!("{}", header);
            println!("{}", "-".repeat(header.len()));
            for entry in &selected {
                println!(
                    "{:<24} {:<28} {:<20} {:>7} {:>8}  {}",
                    truncate(&entry.item.id, 24),
                    truncate(&entry.item.display_name(), 28),
                    truncate(entry.item.item_type.as_deref().unwrap_or("-"), 20),
                    entry.item.value,
                    entry.recycle_value,
                    entry.bucket
                );
            }
            println!();
            println!("{} items", selected.len());
        }
    }

    Ok(())
}

pub fn select<'a>(report: &'a ItemsReport, filter: &ItemFilter) -> Vec<&'a ReportItem> {
    report.items.iter().filter(|e| filter.accepts(e)).collect()
}

fn csv_row(entry: &ReportItem) -> String {
    let item = &entry.item;
    [
        escape_csv(&item.id),
        escape_csv(&item.display_name()),
        escape_csv(item.item_type.as_deref().unwrap_or("")),
        item.rarity.map(|r| r.name().to_string()).unwrap_or_default(),
        item.value.to_string(),
        entry.recycle_value.to_string(),
        entry.bucket.to_string(),
    ]
    .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrapyard::{build_references, Item};
    use serde_json::json;

    fn report() -> ItemsReport {
        let items: Vec<Item> = [
            json!({"id": "metal_parts", "name": "Metal Parts", "type": "Basic Material", "value": 10, "rarity": "Common"}),
            json!({"id": "arc_alloy", "name": "ARC Alloy", "type": "Topside Material", "value": 200, "rarity": "uncommon"}),
            json!({"id": "toaster", "name": "Toaster", "type": "Trinket", "value": 5, "recyclesInto": {"metal_parts": 3}}),
        ]
        .into_iter()
        .map(|raw| Item::from_json(raw, "items.json").unwrap())
        .collect();
        let refs = build_references(&items, &[]);
        ItemsReport::assemble(items, refs, &Heuristics::default())
    }

    #[test]
    fn test_filter_by_type() {
        let report = report();
        let filter = ItemFilter {
            item_type: Some("material".to_string()),
            bucket: None,
        };
        let ids: Vec<&str> = select(&report, &filter).iter().map(|e| e.item.id.as_str()).collect();
        assert_eq!(ids, vec!["metal_parts", "arc_alloy"]);
    }

    #[test]
    fn test_filter_by_bucket() {
        let report = report();
        let filter = ItemFilter {
            item_type: None,
            bucket: Some(Bucket::Recycle),
        };
        let selected = select(&report, &filter);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].item.id, "toaster");
        assert_eq!(selected[0].recycle_value, 30);
    }

    #[test]
    fn test_csv_row() {
        let report = report();
        assert_eq!(
            csv_row(&report.items[1]),
            "arc_alloy,ARC Alloy,Topside Material,uncommon,200,0,sell"
        );
    }
}
