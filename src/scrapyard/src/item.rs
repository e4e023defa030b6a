//! Item definitions
//!
//! Items arrive as loosely-structured JSON objects. [`Item::from_json`] lifts
//! the fields the pipeline relies on into typed form and keeps the raw object
//! around for open-ended heuristics.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::locale::{localized, localized_opt, scalar_to_string};

// ============================================================================
// Localized text
// ============================================================================

/// A plain string or a locale-keyed object, kept as authored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(pub Value);

impl LocalizedText {
    /// Display string (see [`crate::locale::localized`])
    pub fn resolve(&self) -> String {
        localized(Some(&self.0))
    }

    pub fn is_empty(&self) -> bool {
        self.resolve().is_empty()
    }
}

// ============================================================================
// Rarity
// ============================================================================

/// Normalized rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Rarity tier information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RarityTier {
    pub tier: u8,
    pub rarity: Rarity,
    pub roman: &'static str,
    pub name: &'static str,
}

/// All rarity tiers in order
pub const RARITY_TIERS: &[RarityTier] = &[
    RarityTier {
        tier: 1,
        rarity: Rarity::Common,
        roman: "i",
        name: "common",
    },
    RarityTier {
        tier: 2,
        rarity: Rarity::Uncommon,
        roman: "ii",
        name: "uncommon",
    },
    RarityTier {
        tier: 3,
        rarity: Rarity::Rare,
        roman: "iii",
        name: "rare",
    },
    RarityTier {
        tier: 4,
        rarity: Rarity::Epic,
        roman: "iv",
        name: "epic",
    },
    RarityTier {
        tier: 5,
        rarity: Rarity::Legendary,
        roman: "v",
        name: "legendary",
    },
];

/// Get rarity tier by tier number
pub fn rarity_by_tier(tier: u8) -> Option<&'static RarityTier> {
    RARITY_TIERS.iter().find(|r| r.tier == tier)
}

impl Rarity {
    /// Normalize free-text rarity or tier.
    ///
    /// Accepts names (`"Rare"`, `"very rare"`), roman numerals (`"IV"`),
    /// digits (`"3"`) and an optional `tier`/`t` prefix (`"Tier II"`).
    pub fn parse(text: &str) -> Option<Rarity> {
        let lower = text.trim().to_lowercase();
        let bare = lower
            .strip_prefix("tier")
            .or_else(|| lower.strip_prefix('t').filter(|rest| rest.trim().parse::<u8>().is_ok()))
            .unwrap_or(lower.as_str())
            .trim();

        if let Ok(tier) = bare.parse::<u8>() {
            return rarity_by_tier(tier).map(|r| r.rarity);
        }
        if let Some(tier) = RARITY_TIERS.iter().find(|r| r.roman == bare) {
            return Some(tier.rarity);
        }

        // Longest names first so "uncommon" is not read as "common"
        let mut by_len: Vec<&RarityTier> = RARITY_TIERS.iter().collect();
        by_len.sort_by_key(|r| std::cmp::Reverse(r.name.len()));
        by_len
            .into_iter()
            .find(|r| bare.contains(r.name))
            .map(|r| r.rarity)
    }

    /// Normalize a rarity field that may be a number or (localized) text
    pub fn from_value(value: &Value) -> Option<Rarity> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .and_then(|t| u8::try_from(t).ok())
                .and_then(rarity_by_tier)
                .map(|r| r.rarity),
            other => localized_opt(Some(other)).and_then(|s| Rarity::parse(&s)),
        }
    }

    pub fn tier(self) -> &'static RarityTier {
        // Every variant has a row
        RARITY_TIERS
            .iter()
            .find(|r| r.rarity == self)
            .unwrap_or(&RARITY_TIERS[0])
    }

    pub fn name(self) -> &'static str {
        self.tier().name
    }
}

// ============================================================================
// Item
// ============================================================================

/// One catalog entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Sell price
    pub value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
    /// Component item id → quantity, in document order
    #[serde(serialize_with = "quantities_as_map")]
    pub recycles_into: Vec<(String, i64)>,
    /// Required item id → quantity (craft cost)
    #[serde(serialize_with = "quantities_as_map")]
    pub recipe: Vec<(String, i64)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub craft_bench: Vec<String>,
    /// Servable image path, filled in by the catalog loader
    pub resolved_image: Option<String>,
    /// Item-definition file this entry came from
    pub source_file: String,
    /// The object as authored
    #[serde(skip)]
    pub raw: Value,
}

fn quantities_as_map<S: Serializer>(pairs: &[(String, i64)], s: S) -> Result<S::Ok, S::Error> {
    s.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}

impl Item {
    /// Lift a raw item object.
    ///
    /// Returns `None` for non-objects and objects without a usable `id`.
    pub fn from_json(raw: Value, source_file: &str) -> Option<Item> {
        let id = match raw.as_object()?.get("id")? {
            Value::String(s) if !s.trim().is_empty() => s.clone(),
            n @ Value::Number(_) => scalar_to_string(n),
            _ => return None,
        };

        let rarity = ["rarity", "tier"]
            .iter()
            .filter_map(|key| raw.get(*key))
            .find_map(Rarity::from_value);

        let recycles_into = raw
            .get("recyclesInto")
            .or_else(|| raw.get("salvagesInto"))
            .map(quantity_map)
            .unwrap_or_default();

        Some(Item {
            id,
            name: LocalizedText(raw.get("name").cloned().unwrap_or(Value::Null)),
            description: LocalizedText(raw.get("description").cloned().unwrap_or(Value::Null)),
            item_type: text_field(&raw, "type"),
            category: text_field(&raw, "category"),
            subtype: text_field(&raw, "subtype"),
            value: raw.get("value").and_then(as_int).unwrap_or(0),
            weight_kg: raw
                .get("weightKg")
                .or_else(|| raw.get("weight"))
                .and_then(as_float),
            stack_size: raw
                .get("stackSize")
                .and_then(as_int)
                .and_then(|n| u32::try_from(n).ok()),
            rarity,
            recycles_into,
            recipe: raw.get("recipe").map(quantity_map).unwrap_or_default(),
            craft_bench: raw.get("craftBench").map(string_list).unwrap_or_default(),
            resolved_image: None,
            source_file: source_file.to_string(),
            raw,
        })
    }

    /// Locale-resolved name
    pub fn display_name(&self) -> String {
        self.name.resolve()
    }

    /// Case-insensitive ordering key: display name, else id
    pub fn sort_key(&self) -> String {
        let name = self.display_name();
        if name.is_empty() {
            self.id.to_lowercase()
        } else {
            name.to_lowercase()
        }
    }
}

/// Free-text field as a string; localized objects resolve, scalars stringify
fn text_field(raw: &Value, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()).filter(|s| !s.is_empty()),
        obj @ Value::Object(_) => localized_opt(Some(obj)),
        other => Some(scalar_to_string(other)),
    }
}

/// Integer from a number or numeric string
pub(crate) fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `{id: qty}` object as ordered pairs; non-numeric quantities count as 0
fn quantity_map(value: &Value) -> Vec<(String, i64)> {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(id, qty)| (id.clone(), as_int(qty).unwrap_or(0)))
                .collect()
        })
        .unwrap_or_default()
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
