//! Consumer documents: projects and quests that may require items
//!
//! Four sources are merged, each optional:
//! - `projects.json` (one project or an array of projects)
//! - `hideout/*.json` (one leveled project per crafting station)
//! - `quests/*.json` (one quest per file)
//! - `deprecated/quests.json` (legacy array of quests)

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::catalog::read_document;
use crate::fs_utils::list_files_with_extension;
use crate::layout::DataLayout;
use crate::Result;

/// What a consumer document is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Project,
    Quest,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Project => write!(f, "project"),
            DocumentKind::Quest => write!(f, "quest"),
        }
    }
}

/// A project or quest definition, kept as authored
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerDocument {
    /// Where it came from, e.g. `hideout/workbench.json` or `projects.json[2]`
    pub source: String,
    pub kind: DocumentKind,
    pub body: Value,
}

impl ConsumerDocument {
    pub fn project(source: impl Into<String>, body: Value) -> Self {
        ConsumerDocument {
            source: source.into(),
            kind: DocumentKind::Project,
            body,
        }
    }

    pub fn quest(source: impl Into<String>, body: Value) -> Self {
        ConsumerDocument {
            source: source.into(),
            kind: DocumentKind::Quest,
            body,
        }
    }

    /// Leveled projects declare `levels: [...]`
    pub fn levels(&self) -> Option<&Vec<Value>> {
        match self.kind {
            DocumentKind::Project => self.body.get("levels")?.as_array(),
            DocumentKind::Quest => None,
        }
    }
}

/// Load and merge every consumer-document source of `layout`.
///
/// Missing sources contribute nothing; malformed files are skipped.
pub fn load_documents(layout: &DataLayout) -> Result<Vec<ConsumerDocument>> {
    let mut docs = Vec::new();

    if let Some(doc) = read_optional(&layout.projects_file) {
        push_collection(&mut docs, "projects.json", doc, DocumentKind::Project);
    }

    for file in list_files_with_extension(&layout.hideout_dir, &["json"])? {
        if let Some(doc) = read_document(&layout.hideout_dir.join(&file)) {
            docs.push(ConsumerDocument::project(format!("hideout/{}", file), doc));
        }
    }

    for file in list_files_with_extension(&layout.quests_dir, &["json"])? {
        if let Some(doc) = read_document(&layout.quests_dir.join(&file)) {
            docs.push(ConsumerDocument::quest(format!("quests/{}", file), doc));
        }
    }

    if let Some(doc) = read_optional(&layout.legacy_quests_file) {
        push_collection(&mut docs, "deprecated/quests.json", doc, DocumentKind::Quest);
    }

    debug!("Loaded {} consumer documents", docs.len());
    Ok(docs)
}

fn read_optional(path: &Path) -> Option<Value> {
    if path.is_file() {
        read_document(path)
    } else {
        None
    }
}

/// Arrays contribute one document per entry, labelled `<source>[<i>]`
fn push_collection(docs: &mut Vec<ConsumerDocument>, source: &str, doc: Value, kind: DocumentKind) {
    match doc {
        Value::Array(entries) => {
            for (i, body) in entries.into_iter().enumerate() {
                docs.push(ConsumerDocument {
                    source: format!("{}[{}]", source, i),
                    kind,
                    body,
                });
            }
        }
        Value::Null => {}
        body => docs.push(ConsumerDocument {
            source: source.to_string(),
            kind,
            body,
        }),
    }
}
