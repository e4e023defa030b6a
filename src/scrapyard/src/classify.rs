//! Keep / sell / recycle classification
//!
//! Every item lands in exactly one bucket. Rules are tried in order and the
//! first that applies wins:
//!
//! | # | Rule                                                   | Bucket      |
//! |---|--------------------------------------------------------|-------------|
//! | 1 | weapon heuristic matches                               | `weapon`    |
//! | 2 | blueprint heuristic matches                            | `blueprint` |
//! | 3 | some project requires the item                         | `keep`      |
//! | 4 | sell value and recycle value are both 0                | `keep`      |
//! | 5 | a recycle component is referenced by a project/quest   | `recycle`   |
//! | 6 | recycle value exceeds sell value                       | `recycle`   |
//! | 7 | otherwise                                              | `sell`      |
//!
//! Recycle values are one level deep and are returned alongside the buckets;
//! items themselves are never modified.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::heuristics::Heuristics;
use crate::item::Item;
use crate::references::ReferenceIndex;

/// Classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Weapon,
    Blueprint,
    Keep,
    Sell,
    Recycle,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Weapon,
        Bucket::Blueprint,
        Bucket::Keep,
        Bucket::Sell,
        Bucket::Recycle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Bucket::Weapon => "weapon",
            Bucket::Blueprint => "blueprint",
            Bucket::Keep => "keep",
            Bucket::Sell => "sell",
            Bucket::Recycle => "recycle",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Which rule placed an item in its bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    Weapon,
    Blueprint,
    ProjectRequired,
    NoValue,
    NeededComponent,
    RecycleWorthMore,
    Sell,
}

impl Rule {
    pub fn bucket(self) -> Bucket {
        match self {
            Rule::Weapon => Bucket::Weapon,
            Rule::Blueprint => Bucket::Blueprint,
            Rule::ProjectRequired | Rule::NoValue => Bucket::Keep,
            Rule::NeededComponent | Rule::RecycleWorthMore => Bucket::Recycle,
            Rule::Sell => Bucket::Sell,
        }
    }

    /// Position in the decision order, 1-based
    pub fn number(self) -> u8 {
        match self {
            Rule::Weapon => 1,
            Rule::Blueprint => 2,
            Rule::ProjectRequired => 3,
            Rule::NoValue => 4,
            Rule::NeededComponent => 5,
            Rule::RecycleWorthMore => 6,
            Rule::Sell => 7,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Rule::Weapon => "matches the weapon heuristics",
            Rule::Blueprint => "matches the blueprint heuristics",
            Rule::ProjectRequired => "required by a project",
            Rule::NoValue => "no sell or recycle value",
            Rule::NeededComponent => "recycles into a component needed by a project or quest",
            Rule::RecycleWorthMore => "recycling is worth more than selling",
            Rule::Sell => "selling is worth at least as much as recycling",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {}: {}", self.number(), self.describe())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub bucket: Bucket,
    pub rule: Rule,
}

impl From<Rule> for Verdict {
    fn from(rule: Rule) -> Self {
        Verdict {
            bucket: rule.bucket(),
            rule,
        }
    }
}

/// Item ids per bucket, in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Buckets {
    pub weapon: Vec<String>,
    pub blueprint: Vec<String>,
    pub keep: Vec<String>,
    pub sell: Vec<String>,
    pub recycle: Vec<String>,
}

impl Buckets {
    pub fn get(&self, bucket: Bucket) -> &[String] {
        match bucket {
            Bucket::Weapon => &self.weapon,
            Bucket::Blueprint => &self.blueprint,
            Bucket::Keep => &self.keep,
            Bucket::Sell => &self.sell,
            Bucket::Recycle => &self.recycle,
        }
    }

    fn push(&mut self, bucket: Bucket, id: String) {
        let ids = match bucket {
            Bucket::Weapon => &mut self.weapon,
            Bucket::Blueprint => &mut self.blueprint,
            Bucket::Keep => &mut self.keep,
            Bucket::Sell => &mut self.sell,
            Bucket::Recycle => &mut self.recycle,
        };
        ids.push(id);
    }

    pub fn total(&self) -> usize {
        Bucket::ALL.iter().map(|b| self.get(*b).len()).sum()
    }
}

/// Classification of one catalog record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub id: String,
    pub recycle_value: i64,
    pub verdict: Verdict,
}

/// Result of one classification run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub buckets: Buckets,
    /// One outcome per record, aligned with the classified items
    pub outcomes: Vec<Outcome>,
}

impl Classification {
    /// Outcome of the first record with this id
    pub fn outcome(&self, id: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }

    pub fn verdict(&self, id: &str) -> Option<Verdict> {
        self.outcome(id).map(|o| o.verdict)
    }

    pub fn recycle_value(&self, id: &str) -> i64 {
        self.outcome(id).map_or(0, |o| o.recycle_value)
    }
}

/// Sum of `quantity × component value` over the item's direct components.
///
/// Unknown components are worth 0.
pub fn recycle_value(item: &Item, values_by_id: &HashMap<&str, i64>) -> i64 {
    item.recycles_into
        .iter()
        .map(|(component, qty)| {
            let value = values_by_id.get(component.as_str()).copied().unwrap_or(0);
            qty.saturating_mul(value)
        })
        .fold(0i64, i64::saturating_add)
}

/// Classify every item of the catalog
pub fn classify(items: &[Item], references: &ReferenceIndex, heuristics: &Heuristics) -> Classification {
    let values_by_id: HashMap<&str, i64> =
        items.iter().map(|item| (item.id.as_str(), item.value)).collect();

    let mut result = Classification {
        outcomes: Vec::with_capacity(items.len()),
        ..Default::default()
    };

    for item in items {
        let recycle = recycle_value(item, &values_by_id);
        let rule = decide(item, recycle, references, heuristics);

        result.buckets.push(rule.bucket(), item.id.clone());
        result.outcomes.push(Outcome {
            id: item.id.clone(),
            recycle_value: recycle,
            verdict: rule.into(),
        });
    }

    result
}

fn decide(item: &Item, recycle: i64, references: &ReferenceIndex, heuristics: &Heuristics) -> Rule {
    if heuristics.is_weapon(item) {
        return Rule::Weapon;
    }
    if heuristics.is_blueprint(item) {
        return Rule::Blueprint;
    }
    if references.get(&item.id).required_by_project() {
        return Rule::ProjectRequired;
    }
    if item.value == 0 && recycle == 0 {
        return Rule::NoValue;
    }

    let needed_component = item
        .recycles_into
        .iter()
        .any(|(component, _)| references.get(component).is_referenced());
    if needed_component {
        return Rule::NeededComponent;
    }

    if recycle > item.value {
        Rule::RecycleWorthMore
    } else {
        Rule::Sell
    }
}
