//! Display-string resolution for multi-locale text values
//!
//! Item and document fields are either plain strings or objects keyed by
//! locale code (`{"en": "Stim", "fr": "Stim FR"}`). Resolution prefers
//! English and falls back to the first string the object holds.

use serde_json::Value;

/// Locale keys tried before falling back to the first string value
const PREFERRED_LOCALES: &[&str] = &["en", "en-US"];

/// Resolve a localized value to a single display string.
///
/// Total: absent values and objects without any string resolve to `""`,
/// other scalars are stringified.
pub fn localized(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(_)) => localized_opt(value).unwrap_or_default(),
        Some(other) => scalar_to_string(other),
    }
}

/// Like [`localized`], but `None` when nothing string-like was found.
///
/// Empty strings count as missing, so `{"en": "", "fr": "x"}` resolves to `"x"`.
pub fn localized_opt(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => PREFERRED_LOCALES
            .iter()
            .filter_map(|key| map.get(*key))
            .chain(map.values())
            .find_map(|v| v.as_str().filter(|s| !s.is_empty()))
            .map(str::to_string),
        _ => None,
    }
}

/// Stringify a JSON scalar the way it reads in a document.
///
/// Integral floats print without a fraction (`5.0` → `"5"`) so numeric ids
/// compare equal regardless of how the document spelled them.
pub fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// First present (non-null) field among `keys`
pub fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefers_english() {
        let v = json!({"fr": "Stim FR", "en": "Stim"});
        assert_eq!(localized(Some(&v)), "Stim");
    }

    #[test]
    fn test_en_us_fallback() {
        let v = json!({"de": "Reiniger", "en-US": "Cleaner"});
        assert_eq!(localized(Some(&v)), "Cleaner");
    }

    #[test]
    fn test_first_string_value() {
        let v = json!({"fr": "Seulement"});
        assert_eq!(localized(Some(&v)), "Seulement");

        // Non-string entries are skipped
        let v = json!({"count": 3, "ja": "ガラクタ", "fr": "Ferraille"});
        assert_eq!(localized(Some(&v)), "ガラクタ");
    }

    #[test]
    fn test_absent_and_null() {
        assert_eq!(localized(None), "");
        assert_eq!(localized(Some(&Value::Null)), "");
        assert_eq!(localized(Some(&json!({"n": 1}))), "");
    }

    #[test]
    fn test_plain_and_scalar() {
        assert_eq!(localized(Some(&json!("Battery"))), "Battery");
        assert_eq!(localized(Some(&json!(42))), "42");
        assert_eq!(localized(Some(&json!(true))), "true");
    }

    #[test]
    fn test_localized_opt_empty() {
        assert_eq!(localized_opt(Some(&json!(""))), None);
        assert_eq!(
            localized_opt(Some(&json!({"en": "", "fr": "x"}))),
            Some("x".to_string())
        );
        assert_eq!(localized_opt(None), None);
    }

    #[test]
    fn test_scalar_to_string_numbers() {
        assert_eq!(scalar_to_string(&json!(7)), "7");
        assert_eq!(scalar_to_string(&json!(7.0)), "7");
        assert_eq!(scalar_to_string(&json!(2.5)), "2.5");
    }

    #[test]
    fn test_first_present() {
        let v = json!({"title": null, "label": "Workbench"});
        assert_eq!(
            first_present(&v, &["name", "title", "label"]),
            Some(&json!("Workbench"))
        );
        assert!(first_present(&v, &["name"]).is_none());
    }
}
