//! Field name categorization and value normalization.
//!
//! Categorization is driven by a single ordered rule table so the rules can
//! be tested without any backend. Value normalization is the one place all
//! comparison and clone logic flattens structures to scalars.

use crate::fields::FieldCategory;
use serde_json::{Map, Value};

/// Core post and commerce field allowlist.
const CORE_FIELDS: &[&str] = &[
    "ID",
    "post_title",
    "post_content",
    "post_excerpt",
    "post_status",
    "post_date",
    "post_modified",
    "post_name",
    "_sku",
    "_regular_price",
    "_sale_price",
    "_stock",
    "_stock_status",
    "_weight",
    "_length",
    "_width",
    "_height",
    "_virtual",
    "_downloadable",
    "_tax_status",
    "_tax_class",
    "_purchase_note",
    "_featured",
];

/// Known taxonomy field names.
const TAXONOMY_FIELDS: &[&str] = &["product_cat", "product_tag"];

/// How a categorization rule matches a raw field name.
#[derive(Debug, Clone, Copy)]
enum Match {
    /// Name is one of a fixed set.
    OneOf(&'static [&'static str]),
    /// Name starts with the given prefix.
    Prefix(&'static str),
}

impl Match {
    fn matches(self, name: &str) -> bool {
        match self {
            Self::OneOf(names) => names.contains(&name),
            Self::Prefix(prefix) => name.starts_with(prefix),
        }
    }
}

/// Ordered categorization rules; first match wins.
const RULES: &[(Match, FieldCategory)] = &[
    (Match::OneOf(CORE_FIELDS), FieldCategory::Core),
    (Match::Prefix("_yoast_wpseo"), FieldCategory::Seo),
    (Match::Prefix("wpseo_"), FieldCategory::Seo),
    (Match::OneOf(TAXONOMY_FIELDS), FieldCategory::Taxonomy),
    (Match::Prefix("pa_"), FieldCategory::Taxonomy),
    (Match::Prefix("attribute_"), FieldCategory::Taxonomy),
];

/// Resolve a field name to its category.
///
/// `acf_backed` is the backend's verdict on whether a structured
/// custom-field system owns this name; it only applies when no rule in the
/// table matched.
#[must_use]
pub fn categorize(name: &str, acf_backed: bool) -> FieldCategory {
    for (matcher, category) in RULES {
        if matcher.matches(name) {
            return *category;
        }
    }
    if acf_backed {
        FieldCategory::Acf
    } else {
        FieldCategory::Meta
    }
}

/// Turn a raw field name into a display title.
///
/// Strips one known prefix, then title-cases the remaining words.
#[must_use]
pub fn humanize(key: &str) -> String {
    let stripped = key
        .strip_prefix("_yoast_wpseo_")
        .or_else(|| key.strip_prefix("wpseo_"))
        .or_else(|| key.strip_prefix('_'))
        .unwrap_or(key);

    stripped
        .split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

/// Flatten a structured value to a scalar.
///
/// Non-empty lists join their elements with `", "` (nested structures are
/// rendered to compact JSON text first). Objects exposing a scalar `ID` or
/// `id` member collapse to that identifier; other objects become their JSON
/// text. Scalars pass through unchanged, which makes this idempotent.
#[must_use]
pub fn flatten_value(value: &Value) -> Value {
    match value {
        Value::Array(items) if !items.is_empty() => {
            let parts: Vec<String> = items.iter().map(element_text).collect();
            Value::String(parts.join(", "))
        }
        Value::Object(map) => reference_id(map)
            .cloned()
            .unwrap_or_else(|| Value::String(value.to_string())),
        _ => value.clone(),
    }
}

/// Render one list element to text.
fn element_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// The identifier of a reference object, if it carries one.
fn reference_id(map: &Map<String, Value>) -> Option<&Value> {
    map.get("ID")
        .or_else(|| map.get("id"))
        .filter(|v| v.is_string() || v.is_number())
}

/// String form used for field equality checks.
///
/// Absence and JSON null both compare as the empty string, so a field
/// holding `""` on one side and missing on the other is not a difference.
#[must_use]
pub fn comparable_text(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(v) => match flatten_value(v) {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        },
    }
}

/// Whether a value counts as empty for clone filtering.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_categorize_core_allowlist() {
        assert_eq!(categorize("ID", false), FieldCategory::Core);
        assert_eq!(categorize("post_title", false), FieldCategory::Core);
        assert_eq!(categorize("_sku", false), FieldCategory::Core);
        assert_eq!(categorize("_stock_status", false), FieldCategory::Core);
        assert_eq!(categorize("_purchase_note", false), FieldCategory::Core);
    }

    #[test]
    fn test_categorize_seo_prefixes() {
        assert_eq!(categorize("_yoast_wpseo_title", false), FieldCategory::Seo);
        assert_eq!(categorize("_yoast_wpseo_metadesc", true), FieldCategory::Seo);
        assert_eq!(categorize("wpseo_focuskw", false), FieldCategory::Seo);
    }

    #[test]
    fn test_categorize_taxonomy() {
        assert_eq!(categorize("product_cat", false), FieldCategory::Taxonomy);
        assert_eq!(categorize("product_tag", false), FieldCategory::Taxonomy);
        assert_eq!(categorize("pa_color", false), FieldCategory::Taxonomy);
        assert_eq!(categorize("attribute_size", false), FieldCategory::Taxonomy);
    }

    #[test]
    fn test_categorize_precedence_over_acf_flag() {
        // The table wins even when the backend claims the field.
        assert_eq!(categorize("post_title", true), FieldCategory::Core);
        assert_eq!(categorize("wpseo_title", true), FieldCategory::Seo);
    }

    #[test]
    fn test_categorize_fallthrough() {
        assert_eq!(categorize("fabric", true), FieldCategory::Acf);
        assert_eq!(categorize("fabric", false), FieldCategory::Meta);
        assert_eq!(categorize("_custom_flag", false), FieldCategory::Meta);
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("post_title"), "Post Title");
        assert_eq!(humanize("_sku"), "Sku");
        assert_eq!(humanize("_yoast_wpseo_metadesc"), "Metadesc");
        assert_eq!(humanize("wpseo_focus-keyword"), "Focus Keyword");
        assert_eq!(humanize("stock_status"), "Stock Status");
    }

    #[test]
    fn test_flatten_list_joins() {
        let value = json!(["red", "blue", 3]);
        assert_eq!(flatten_value(&value), json!("red, blue, 3"));
    }

    #[test]
    fn test_flatten_nested_structures_to_json_text() {
        let value = json!([{"name": "Shirts"}, "extra"]);
        assert_eq!(flatten_value(&value), json!(r#"{"name":"Shirts"}, extra"#));
    }

    #[test]
    fn test_flatten_reference_object_uses_identifier() {
        assert_eq!(flatten_value(&json!({"id": 42, "name": "Shirts"})), json!(42));
        assert_eq!(flatten_value(&json!({"ID": "7"})), json!("7"));
    }

    #[test]
    fn test_flatten_plain_object_to_json_text() {
        let value = json!({"width": 3, "height": 4});
        assert_eq!(flatten_value(&value), json!(r#"{"height":4,"width":3}"#));
    }

    #[test]
    fn test_flatten_is_idempotent() {
        for value in [
            json!(["a", "b"]),
            json!({"id": 9}),
            json!({"nested": {"deep": true}}),
            json!("plain"),
            json!(12.5),
            Value::Null,
        ] {
            let once = flatten_value(&value);
            assert_eq!(flatten_value(&once), once);
        }
    }

    #[test]
    fn test_comparable_text_collapses_absent_and_null() {
        assert_eq!(comparable_text(None), "");
        assert_eq!(comparable_text(Some(&Value::Null)), "");
        assert_eq!(comparable_text(Some(&json!(""))), "");
        assert_eq!(comparable_text(Some(&json!("red"))), "red");
        assert_eq!(comparable_text(Some(&json!(5))), "5");
        assert_eq!(comparable_text(Some(&json!(["a", "b"]))), "a, b");
    }

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!({})));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!("no")));
    }
}
