//! # scrapyard
//!
//! Item catalog loader and keep/sell/recycle classifier.
//!
//! This library provides functionality to:
//! - Load item definitions from a directory of JSON documents
//! - Resolve a servable image for every item
//! - Build a reverse index of the projects and quests that reference each item
//! - Classify every item into exactly one handling bucket
//!
//! ## Example
//!
//! ```no_run
//! use scrapyard::{build_report, DataLayout, Heuristics};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let layout = DataLayout::new("arcraiders-data", "public");
//! let report = build_report(&layout, &Heuristics::default())?;
//!
//! println!("Sell: {}", report.categorized.sell.len());
//! println!("Recycle: {}", report.categorized.recycle.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod classify;
pub mod documents;
pub mod fs_utils;
pub mod heuristics;
pub mod images;
pub mod item;
pub mod layout;
pub mod locale;
pub mod references;
pub mod report;
pub mod walk;

#[doc(inline)]
pub use catalog::load_catalog;
#[doc(inline)]
pub use classify::{classify, recycle_value, Bucket, Buckets, Classification, Outcome, Rule, Verdict};
#[doc(inline)]
pub use documents::{load_documents, ConsumerDocument, DocumentKind};
#[doc(inline)]
pub use heuristics::{Heuristics, Predicate, Tag, TextField};
#[doc(inline)]
pub use item::{Item, LocalizedText, Rarity};
#[doc(inline)]
pub use layout::DataLayout;
#[doc(inline)]
pub use locale::localized;
#[doc(inline)]
pub use references::{build_references, ItemReferences, ReferenceEntry, ReferenceIndex};
#[doc(inline)]
pub use report::{build_report, ItemsReport, ReportItem};

/// Errors that abort a classification run
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
