//! Full pipeline: catalog, references, classification
//!
//! ```text
//! load_catalog ──┐
//!                ├─> build_references ──> classify ──> ItemsReport
//! load_documents ┘
//! ```

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::catalog::load_catalog;
use crate::classify::{classify, Bucket, Buckets, Rule};
use crate::documents::load_documents;
use crate::heuristics::Heuristics;
use crate::item::Item;
use crate::layout::DataLayout;
use crate::references::{build_references, ItemReferences, ReferenceIndex};
use crate::Result;

/// An item with everything the pipeline derived for it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    #[serde(flatten)]
    pub item: Item,
    pub recycle_value: i64,
    pub bucket: Bucket,
    pub rule: Rule,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Everything one classification run produces
#[derive(Debug, Clone, Serialize)]
pub struct ItemsReport {
    pub categorized: Buckets,
    pub references: ReferenceIndex,
    /// Catalog order
    pub items: Vec<ReportItem>,
    /// Sorted distinct item types
    pub types: Vec<String>,
}

impl ItemsReport {
    /// Classify `items` against `references`
    pub fn assemble(items: Vec<Item>, references: ReferenceIndex, heuristics: &Heuristics) -> Self {
        let classification = classify(&items, &references, heuristics);

        let types: BTreeSet<String> = items
            .iter()
            .filter_map(|item| item.item_type.clone())
            .filter(|t| !t.is_empty())
            .collect();

        let items = items
            .into_iter()
            .zip(classification.outcomes)
            .map(|(item, outcome)| {
                let tags = heuristics
                    .tags_for(&item)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                ReportItem {
                    item,
                    recycle_value: outcome.recycle_value,
                    bucket: outcome.verdict.bucket,
                    rule: outcome.verdict.rule,
                    tags,
                }
            })
            .collect();

        ItemsReport {
            categorized: classification.buckets,
            references,
            items,
            types: types.into_iter().collect(),
        }
    }

    /// Look up an item by exact id, else by case-insensitive name substring
    pub fn find(&self, query: &str) -> Option<&ReportItem> {
        if let Some(hit) = self.find_by_id(query) {
            return Some(hit);
        }
        let needle = query.to_lowercase();
        self.items
            .iter()
            .find(|r| r.item.display_name().to_lowercase().contains(&needle))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&ReportItem> {
        self.items.iter().find(|r| r.item.id == id)
    }

    pub fn references_of(&self, id: &str) -> &ItemReferences {
        self.references.get(id)
    }

    pub fn in_bucket(&self, bucket: Bucket) -> impl Iterator<Item = &ReportItem> {
        self.items.iter().filter(move |r| r.bucket == bucket)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the whole pipeline over `layout`.
///
/// Everything is re-read from disk; nothing is cached between runs.
pub fn build_report(layout: &DataLayout, heuristics: &Heuristics) -> Result<ItemsReport> {
    let items = load_catalog(layout)?;
    let docs = load_documents(layout)?;
    let references = build_references(&items, &docs);
    let report = ItemsReport::assemble(items, references, heuristics);

    info!(
        "Classified {} items: {} keep, {} sell, {} recycle, {} weapon, {} blueprint",
        report.items.len(),
        report.categorized.keep.len(),
        report.categorized.sell.len(),
        report.categorized.recycle.len(),
        report.categorized.weapon.len(),
        report.categorized.blueprint.len(),
    );

    Ok(report)
}
