//! Reference graph: which projects and quests need each item
//!
//! - Leveled projects reference exactly the items their levels declare in
//!   `requirementItemIds`, with level number and quantity.
//! - Flat projects reference every item id found anywhere in the document.
//! - Quests reference every item id found outside reward-like subtrees.
//!
//! Structural scans record one entry per document per item, however often the
//! id recurs inside that document.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::documents::{ConsumerDocument, DocumentKind};
use crate::item::{as_int, Item};
use crate::locale::{first_present, localized, scalar_to_string};
use crate::walk::{collect_tokens, no_skip, skip_rewards};

const TITLE_KEYS: &[&str] = &["name", "title", "label"];
const DESCRIPTION_KEYS: &[&str] = &["description", "desc", "summary"];
const OBJECTIVE_KEYS: &[&str] = &["objectives", "tasks", "steps", "objectivesList"];
const OBJECTIVE_TEXT_KEYS: &[&str] = &["description", "title", "text"];

/// Separator between objectives in a quest summary
pub const OBJECTIVE_SEPARATOR: &str = " • ";

/// One document's reference to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    /// Source label of the referencing document
    pub source_document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Leveled projects only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    /// Leveled projects only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// Quests only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objectives_summary: Option<String>,
}

/// Everything that references one item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemReferences {
    pub projects: Vec<ReferenceEntry>,
    pub quests: Vec<ReferenceEntry>,
}

impl ItemReferences {
    pub fn is_referenced(&self) -> bool {
        !self.projects.is_empty() || !self.quests.is_empty()
    }

    pub fn required_by_project(&self) -> bool {
        !self.projects.is_empty()
    }
}

static NO_REFERENCES: ItemReferences = ItemReferences {
    projects: Vec::new(),
    quests: Vec::new(),
};

/// Item id → references, with an entry for every catalogued item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReferenceIndex(BTreeMap<String, ItemReferences>);

impl ReferenceIndex {
    /// Empty reference lists for every item
    pub fn for_items(items: &[Item]) -> Self {
        ReferenceIndex(
            items
                .iter()
                .map(|item| (item.id.clone(), ItemReferences::default()))
                .collect(),
        )
    }

    /// References of `id`; unknown ids have none
    pub fn get(&self, id: &str) -> &ItemReferences {
        self.0.get(id).unwrap_or(&NO_REFERENCES)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemReferences)> {
        self.0.iter().map(|(id, refs)| (id.as_str(), refs))
    }
}

/// Build the reference index of `items` over `docs`
pub fn build_references(items: &[Item], docs: &[ConsumerDocument]) -> ReferenceIndex {
    let mut index = ReferenceIndex::for_items(items);

    for doc in docs {
        let header = DocumentHeader::of(doc);

        match (doc.kind, doc.levels()) {
            (DocumentKind::Project, Some(levels)) => {
                add_leveled_project(&mut index, &header, levels);
            }
            (DocumentKind::Project, None) => {
                let tokens = collect_tokens(&doc.body, no_skip);
                for (id, refs) in index.0.iter_mut() {
                    if tokens.contains(id) {
                        refs.projects.push(header.entry());
                    }
                }
            }
            (DocumentKind::Quest, _) => {
                let objectives = objectives_summary(&doc.body, header.description.as_deref());
                let tokens = collect_tokens(&doc.body, skip_rewards);
                for (id, refs) in index.0.iter_mut() {
                    if tokens.contains(id) {
                        refs.quests.push(ReferenceEntry {
                            objectives_summary: objectives.clone(),
                            ..header.entry()
                        });
                    }
                }
            }
        }
    }

    index
}

/// Resolved title/description shared by every entry a document produces
struct DocumentHeader<'a> {
    source: &'a str,
    title: Option<String>,
    description: Option<String>,
}

impl<'a> DocumentHeader<'a> {
    fn of(doc: &'a ConsumerDocument) -> Self {
        let text = |keys: &[&str]| {
            Some(localized(first_present(&doc.body, keys))).filter(|s| !s.is_empty())
        };
        DocumentHeader {
            source: &doc.source,
            title: text(TITLE_KEYS),
            description: text(DESCRIPTION_KEYS),
        }
    }

    fn entry(&self) -> ReferenceEntry {
        ReferenceEntry {
            source_document: self.source.to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            level: None,
            quantity: None,
            objectives_summary: None,
        }
    }
}

fn add_leveled_project(index: &mut ReferenceIndex, header: &DocumentHeader<'_>, levels: &[Value]) {
    for level in levels {
        let level_number = level.get("level").and_then(as_int);
        let Some(requirements) = level.get("requirementItemIds").and_then(Value::as_array) else {
            continue;
        };

        for req in requirements {
            let Some(item_id) = req.get("itemId").filter(|v| !v.is_null()) else {
                continue;
            };
            let item_id = scalar_to_string(item_id);
            let quantity = req
                .get("quantity")
                .and_then(as_int)
                .filter(|q| *q != 0)
                .unwrap_or(1);

            if let Some(refs) = index.0.get_mut(&item_id) {
                refs.projects.push(ReferenceEntry {
                    level: level_number,
                    quantity: Some(quantity),
                    ..header.entry()
                });
            }
        }
    }
}

/// Quest objectives joined into one line, else the quest description
pub fn objectives_summary(body: &Value, description: Option<&str>) -> Option<String> {
    let parts: Vec<String> = match first_present(body, OBJECTIVE_KEYS) {
        Some(Value::Array(entries)) => entries.iter().map(objective_text).collect(),
        Some(Value::Object(map)) => map.values().map(objective_text).collect(),
        _ => return description.map(str::to_string).filter(|s| !s.is_empty()),
    };

    let joined = parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(OBJECTIVE_SEPARATOR);

    Some(joined).filter(|s| !s.is_empty())
}

fn objective_text(objective: &Value) -> String {
    match objective {
        Value::String(s) => s.clone(),
        Value::Object(_) => localized(first_present(objective, OBJECTIVE_TEXT_KEYS).or(Some(objective))),
        other => scalar_to_string(other),
    }
}
