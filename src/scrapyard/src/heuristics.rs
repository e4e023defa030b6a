//! Item-kind heuristics
//!
//! Item vocabularies are open-ended, so weapon and blueprint detection is a
//! table of substring and field checks rather than an enum match. The table
//! deserializes from config, letting the rules be tuned without code changes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::item::Item;

/// Item text a predicate can search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    Type,
    Category,
    Subtype,
    Name,
}

impl TextField {
    fn text(self, item: &Item) -> Option<String> {
        match self {
            TextField::Type => item.item_type.clone(),
            TextField::Category => item.category.clone(),
            TextField::Subtype => item.subtype.clone(),
            TextField::Name => Some(item.display_name()),
        }
    }
}

/// One detection rule.
///
/// An item matches when any of the following hold:
/// - one of `fields` contains one of `contains` (case-insensitive)
/// - one of the raw `flags` fields is literally `true`
/// - one of the raw `markers` fields is present and truthy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Predicate {
    pub contains: Vec<String>,
    pub fields: Vec<TextField>,
    pub flags: Vec<String>,
    pub markers: Vec<String>,
}

impl Predicate {
    /// Substring rule over `fields`
    pub fn text(fields: &[TextField], needles: &[&str]) -> Self {
        Predicate {
            contains: needles.iter().map(|s| s.to_string()).collect(),
            fields: fields.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_flags(mut self, flags: &[&str]) -> Self {
        self.flags = flags.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_markers(mut self, markers: &[&str]) -> Self {
        self.markers = markers.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.matches_text(item) || self.matches_flags(&item.raw) || self.matches_markers(&item.raw)
    }

    fn matches_text(&self, item: &Item) -> bool {
        if self.contains.is_empty() {
            return false;
        }
        let needles: Vec<String> = self.contains.iter().map(|n| n.to_lowercase()).collect();

        self.fields
            .iter()
            .filter_map(|field| field.text(item))
            .map(|text| text.to_lowercase())
            .any(|text| needles.iter().any(|n| !n.is_empty() && text.contains(n.as_str())))
    }

    fn matches_flags(&self, raw: &Value) -> bool {
        self.flags
            .iter()
            .any(|flag| raw.get(flag) == Some(&Value::Bool(true)))
    }

    fn matches_markers(&self, raw: &Value) -> bool {
        self.markers
            .iter()
            .any(|marker| raw.get(marker).is_some_and(truthy))
    }
}

/// Present and not null, false, zero or empty text
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Descriptive label attached to items without affecting their bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(flatten)]
    pub predicate: Predicate,
}

/// The rule table consulted by the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    pub weapon: Predicate,
    pub blueprint: Predicate,
    pub tags: Vec<Tag>,
}

impl Default for Heuristics {
    fn default() -> Self {
        use TextField::*;

        // `subtype` is not a weapon marker; blueprints carry one too.
        Heuristics {
            weapon: Predicate::text(&[Type, Category], &["weapon"])
                .with_flags(&["isWeapon"])
                .with_markers(&["weapon", "weaponType", "class"]),
            blueprint: Predicate::text(&[Type, Category, Subtype, Name], &["blueprint"]),
            tags: vec![
                Tag {
                    name: "modification".to_string(),
                    predicate: Predicate::text(&[Type, Category, Subtype, Name], &["modification"]),
                },
                Tag {
                    name: "augment".to_string(),
                    predicate: Predicate::text(&[Type, Category, Subtype, Name], &["augment"]),
                },
                Tag {
                    name: "quick-use".to_string(),
                    predicate: Predicate::text(
                        &[Name, Type, Category],
                        &[
                            "quick-use",
                            "quick use",
                            "quickuse",
                            "quick",
                            "consumable",
                            "usable",
                            "instant",
                            "medkit",
                            "stim",
                            "grenade",
                            "throwable",
                        ],
                    ),
                },
            ],
        }
    }
}

impl Heuristics {
    pub fn is_weapon(&self, item: &Item) -> bool {
        self.weapon.matches(item)
    }

    pub fn is_blueprint(&self, item: &Item) -> bool {
        self.blueprint.matches(item)
    }

    /// Names of every tag `item` matches, in table order
    pub fn tags_for(&self, item: &Item) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|tag| tag.predicate.matches(item))
            .map(|tag| tag.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(raw: Value) -> Item {
        Item::from_json(raw, "test.json").unwrap()
    }

    #[test]
    fn test_weapon_detection() {
        let h = Heuristics::default();
        assert!(h.is_weapon(&item(json!({"id": "a", "type": "Weapon"}))));
        assert!(h.is_weapon(&item(json!({"id": "b", "category": "Heavy Weapons"}))));
        assert!(h.is_weapon(&item(json!({"id": "c", "isWeapon": true}))));
        assert!(h.is_weapon(&item(json!({"id": "d", "weaponType": "SMG"}))));
        assert!(h.is_weapon(&item(json!({"id": "e", "class": "Rifle"}))));

        assert!(!h.is_weapon(&item(json!({"id": "f", "isWeapon": "yes"}))));
        assert!(!h.is_weapon(&item(json!({"id": "g", "weapon": false, "class": ""}))));
        assert!(!h.is_weapon(&item(json!({"id": "h", "subtype": "Rifle", "type": "Material"}))));
    }

    #[test]
    fn test_blueprint_detection() {
        let h = Heuristics::default();
        assert!(h.is_blueprint(&item(json!({"id": "a", "type": "Blueprint"}))));
        assert!(h.is_blueprint(&item(json!({"id": "b", "subtype": "weapon_blueprint"}))));
        assert!(h.is_blueprint(&item(json!({"id": "c", "name": {"en": "Ferro Blueprint"}}))));
        assert!(!h.is_blueprint(&item(json!({"id": "d", "name": "Blue Print"}))));
    }

    #[test]
    fn test_tags() {
        let h = Heuristics::default();
        let medkit = item(json!({"id": "m", "name": "Bandage", "type": "Quick Use"}));
        assert_eq!(h.tags_for(&medkit), vec!["quick-use"]);

        let stock = item(json!({"id": "s", "name": "Stable Stock I", "type": "Modification"}));
        assert_eq!(h.tags_for(&stock), vec!["modification"]);

        assert!(h.tags_for(&item(json!({"id": "x", "name": "Wires"}))).is_empty());
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("x")));
        assert!(truthy(&json!([])));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(null)));
    }

    #[test]
    fn test_deserialize_override() {
        let h: Heuristics = serde_json::from_value(json!({
            "weapon": {"markers": ["subtype"]},
            "tags": [{"name": "trinket", "contains": ["trinket"], "fields": ["type"]}]
        }))
        .unwrap();

        assert!(h.is_weapon(&item(json!({"id": "a", "subtype": "Rifle"}))));
        assert!(!h.is_weapon(&item(json!({"id": "b", "type": "Weapon"}))));
        // Unspecified predicates keep their defaults
        assert_eq!(h.blueprint, Heuristics::default().blueprint);
        assert_eq!(
            h.tags_for(&item(json!({"id": "c", "type": "Trinket"}))),
            vec!["trinket"]
        );
    }
}
