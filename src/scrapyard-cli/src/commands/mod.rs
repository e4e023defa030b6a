//! Command handlers for scrapyard CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod classify;
pub mod configure;
pub mod items;
pub mod serve;
pub mod show;

use anyhow::{Context, Result};
use scrapyard::{build_report, DataLayout, Heuristics, ItemsReport};

/// Run the full pipeline, naming the data directory on failure
pub fn load_report(layout: &DataLayout, heuristics: &Heuristics) -> Result<ItemsReport> {
    build_report(layout, heuristics).with_context(|| {
        format!(
            "Failed to classify items under {}",
            layout.items_dir.display()
        )
    })
}

/// Quote a CSV field when it contains a separator, quote or newline
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Shorten to `width` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("wires"), "wires");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Metal Parts", 20), "Metal Parts");
        assert_eq!(truncate("Advanced Electrical Components", 10), "Advanced …");
        assert_eq!(truncate("Über", 4), "Über");
    }
}
