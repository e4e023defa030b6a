//! Catalog loading
//!
//! Reads every item-definition document, lifts the items it holds, resolves
//! an image for each and returns them sorted by display name.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::fs_utils::list_files_with_extension;
use crate::images::ImageIndex;
use crate::item::Item;
use crate::layout::DataLayout;
use crate::Result;

/// Load the full catalog described by `layout`.
///
/// Malformed documents are skipped. Only directory-listing failures other
/// than a missing directory are errors.
pub fn load_catalog(layout: &DataLayout) -> Result<Vec<Item>> {
    let images = ImageIndex::load(layout)?;
    let mut items = Vec::new();

    for file in list_files_with_extension(&layout.items_dir, &["json"])? {
        let path = layout.items_dir.join(&file);
        let Some(doc) = read_document(&path) else {
            continue;
        };

        for mut item in items_in_document(doc, &file) {
            item.resolved_image = images.resolve(&item);
            items.push(item);
        }
    }

    sort_items(&mut items);
    warn_duplicate_ids(&items);
    info!("Loaded {} items from {}", items.len(), layout.items_dir.display());

    Ok(items)
}

/// Parse one JSON document, logging and skipping unreadable or malformed files
pub fn read_document(path: &Path) -> Option<Value> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Skipping unreadable {}: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!("Skipping malformed {}: {}", path.display(), e);
            None
        }
    }
}

/// Items held by a document: a single object or an array of objects
pub fn items_in_document(doc: Value, source_file: &str) -> Vec<Item> {
    let candidates = match doc {
        Value::Array(entries) => entries,
        obj @ Value::Object(_) => vec![obj],
        _ => {
            debug!("{} holds neither an object nor an array", source_file);
            return Vec::new();
        }
    };

    candidates
        .into_iter()
        .filter_map(|raw| {
            let item = Item::from_json(raw, source_file);
            if item.is_none() {
                debug!("Skipping entry without a usable id in {}", source_file);
            }
            item
        })
        .collect()
}

/// Case-insensitive display-name order, falling back to id
pub fn sort_items(items: &mut [Item]) {
    items.sort_by_cached_key(|item| (item.sort_key(), item.id.clone()));
}

fn warn_duplicate_ids(items: &[Item]) {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id.as_str()) {
            warn!("Duplicate item id '{}' (from {})", item.id, item.source_file);
        }
    }
}
