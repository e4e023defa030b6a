//! Structural scanning of untyped JSON document trees
//!
//! A single walker visits every scalar leaf and every object key of a tree,
//! skipping subtrees whose key matches a caller-supplied predicate. Quests use
//! it with the reward-key exclusion, flat projects with no exclusion.

use std::collections::HashSet;
use std::ops::ControlFlow;

use serde_json::Value;

use crate::locale::scalar_to_string;

/// Keys whose subtrees hold quest payouts rather than requirements
pub const REWARD_KEYS: &[&str] = &[
    "rewardItemIds",
    "rewardItems",
    "rewards",
    "reward",
    "loot",
    "drops",
    "prize",
    "prizes",
];

/// A string-like token found in a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// An object key (not itself skipped)
    Key(&'a str),
    /// A string, number or boolean leaf
    Leaf(&'a Value),
}

impl Token<'_> {
    /// Token text as compared against item ids
    pub fn text(&self) -> String {
        match self {
            Token::Key(k) => (*k).to_string(),
            Token::Leaf(v) => scalar_to_string(v),
        }
    }
}

/// Skip predicate that never skips
pub fn no_skip(_key: &str) -> bool {
    false
}

/// Skip predicate for [`REWARD_KEYS`]
pub fn skip_rewards(key: &str) -> bool {
    REWARD_KEYS.contains(&key)
}

/// Visit every token of `root`, depth-first, until `visit` breaks.
///
/// Iterative, so arbitrarily deep (acyclic) trees cannot exhaust the stack.
/// Nulls are not tokens.
pub fn walk<'a, S, F, B>(root: &'a Value, skip: S, mut visit: F) -> ControlFlow<B>
where
    S: Fn(&str) -> bool,
    F: FnMut(Token<'a>) -> ControlFlow<B>,
{
    let mut stack: Vec<&'a Value> = vec![root];

    while let Some(node) = stack.pop() {
        match node {
            Value::Null => {}
            Value::Bool(_) | Value::Number(_) | Value::String(_) => visit(Token::Leaf(node))?,
            Value::Array(items) => stack.extend(items.iter().rev()),
            Value::Object(map) => {
                // Keys are visited in document order, children pushed so they
                // pop in the same order.
                let mut children = Vec::with_capacity(map.len());
                for (key, child) in map {
                    if skip(key) {
                        continue;
                    }
                    visit(Token::Key(key.as_str()))?;
                    children.push(child);
                }
                stack.extend(children.into_iter().rev());
            }
        }
    }

    ControlFlow::Continue(())
}

/// Whether `id` occurs as a leaf or key anywhere outside skipped subtrees
pub fn contains_id<S>(root: &Value, id: &str, skip: S) -> bool
where
    S: Fn(&str) -> bool,
{
    walk(root, skip, |token| {
        let hit = match token {
            Token::Key(k) => k == id,
            Token::Leaf(v) => match v {
                Value::String(s) => s == id,
                _ => scalar_to_string(v) == id,
            },
        };
        if hit {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .is_break()
}

/// Every distinct token text of a tree.
///
/// One pass answers [`contains_id`] for every item id at once.
pub fn collect_tokens<S>(root: &Value, skip: S) -> HashSet<String>
where
    S: Fn(&str) -> bool,
{
    let mut tokens = HashSet::new();
    let _ = walk(root, skip, |token| {
        tokens.insert(token.text());
        ControlFlow::<()>::Continue(())
    });
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contains_leaf_and_key() {
        let doc = json!({
            "steps": [{"target": "battery"}, {"need": {"rusted_gear": 3}}]
        });
        assert!(contains_id(&doc, "battery", no_skip));
        assert!(contains_id(&doc, "rusted_gear", no_skip));
        assert!(!contains_id(&doc, "fabric", no_skip));
    }

    #[test]
    fn test_numeric_and_bool_leaves() {
        let doc = json!({"ids": [12, 3.0, true]});
        assert!(contains_id(&doc, "12", no_skip));
        assert!(contains_id(&doc, "3", no_skip));
        assert!(contains_id(&doc, "true", no_skip));
    }

    #[test]
    fn test_reward_subtrees_skipped() {
        let doc = json!({
            "objectives": ["Find the antenna"],
            "rewardItemIds": [{"itemId": "med_kit"}],
            "loot": {"med_kit": 1}
        });
        assert!(!contains_id(&doc, "med_kit", skip_rewards));
        assert!(contains_id(&doc, "med_kit", no_skip));
    }

    #[test]
    fn test_skip_applies_at_any_depth() {
        let doc = json!({"stage": {"rewards": ["canister"], "requires": ["wires"]}});
        let tokens = collect_tokens(&doc, skip_rewards);
        assert!(tokens.contains("wires"));
        assert!(tokens.contains("requires"));
        assert!(!tokens.contains("canister"));
        assert!(!tokens.contains("rewards"));
    }

    #[test]
    fn test_nulls_are_not_tokens() {
        let doc = json!({"a": null});
        let tokens = collect_tokens(&doc, no_skip);
        assert_eq!(tokens.len(), 1);
        assert!(tokens.contains("a"));
    }

    #[test]
    fn test_deep_tree_terminates() {
        let mut doc = json!("deep_item");
        for _ in 0..2_000 {
            doc = Value::Array(vec![doc]);
        }
        assert!(contains_id(&doc, "deep_item", no_skip));
        // Drop iteratively to avoid recursive drop of the nested arrays
        let mut cur = doc;
        while let Value::Array(mut items) = cur {
            cur = items.pop().unwrap_or(Value::Null);
        }
    }

    #[test]
    fn test_walk_order() {
        let doc = json!({"a": ["b", "c"], "d": "e"});
        let mut seen = Vec::new();
        let _ = walk(&doc, no_skip, |t| {
            seen.push(t.text());
            ControlFlow::<()>::Continue(())
        });
        assert_eq!(seen, vec!["a", "d", "b", "c", "e"]);
    }
}
