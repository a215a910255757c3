//! Clone payload computation.

use crate::fields::CategorizedFields;
use crate::normalize::is_empty_value;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Names that never survive a clone: identity, unique codes, timestamps,
/// edit locks, and the slug. Overrides cannot reintroduce them.
pub const ALWAYS_EXCLUDE: &[&str] = &[
    "ID",
    "_sku",
    "post_date",
    "post_date_gmt",
    "post_modified",
    "post_modified_gmt",
    "_edit_lock",
    "_edit_last",
    "post_name",
];

/// Compute the flat payload for copying `source` onto another product.
///
/// Caller excludes and the fixed exclude set drop fields, empty values are
/// filtered, then overrides apply unconditionally. Overrides beat the
/// caller's exclusion list and the emptiness filter; only the fixed set is
/// override-proof. The result is the exact payload to hand to a field
/// source's write operation.
#[must_use]
pub fn clone_fields(
    source: &CategorizedFields,
    overrides: &Map<String, Value>,
    exclude: &[String],
) -> Map<String, Value> {
    let excluded: HashSet<&str> = ALWAYS_EXCLUDE
        .iter()
        .copied()
        .chain(exclude.iter().map(String::as_str))
        .collect();

    let mut fields = Map::new();

    for (name, value) in source.flatten() {
        if excluded.contains(name.as_str()) {
            continue;
        }
        if is_empty_value(&value) {
            continue;
        }
        fields.insert(name, value);
    }

    for (name, value) in overrides {
        if ALWAYS_EXCLUDE.contains(&name.as_str()) {
            continue;
        }
        fields.insert(name.clone(), value.clone());
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldCategory;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_clone_drops_defaults_empties_and_applies_overrides() {
        let source = CategorizedFields::new()
            .with_field(FieldCategory::Core, "post_title", "A")
            .with_field(FieldCategory::Core, "ID", 5)
            .with_field(FieldCategory::Meta, "color", "red")
            .with_field(FieldCategory::Meta, "size", "");

        let mut overrides = Map::new();
        overrides.insert("color".to_string(), json!("blue"));

        let fields = clone_fields(&source, &overrides, &[]);

        let mut expected = Map::new();
        expected.insert("post_title".to_string(), json!("A"));
        expected.insert("color".to_string(), json!("blue"));
        assert_eq!(fields, expected);
    }

    #[test]
    fn test_fixed_exclude_set_is_override_proof() {
        let source = CategorizedFields::new().with_field(FieldCategory::Core, "_sku", "W-1");

        let mut overrides = Map::new();
        overrides.insert("_sku".to_string(), json!("W-2"));

        let fields = clone_fields(&source, &overrides, &[]);
        assert!(!fields.contains_key("_sku"));
    }

    #[test]
    fn test_overrides_beat_caller_excludes() {
        let source = CategorizedFields::new()
            .with_field(FieldCategory::Meta, "color", "red")
            .with_field(FieldCategory::Meta, "material", "wool");

        let mut overrides = Map::new();
        overrides.insert("color".to_string(), json!("blue"));

        let exclude = vec!["color".to_string(), "material".to_string()];
        let fields = clone_fields(&source, &overrides, &exclude);

        assert_eq!(fields.get("color"), Some(&json!("blue")));
        assert!(!fields.contains_key("material"));
    }

    #[test]
    fn test_overrides_bypass_emptiness_filter() {
        let source = CategorizedFields::new().with_field(FieldCategory::Meta, "color", "red");

        let mut overrides = Map::new();
        overrides.insert("note".to_string(), json!(""));

        let fields = clone_fields(&source, &overrides, &[]);
        assert_eq!(fields.get("note"), Some(&json!("")));
    }

    #[test]
    fn test_empty_structures_are_dropped() {
        let source = CategorizedFields::new()
            .with_field(FieldCategory::Taxonomy, "product_tag", json!([]))
            .with_field(FieldCategory::Meta, "specs", json!({}))
            .with_field(FieldCategory::Meta, "color", "red");

        let fields = clone_fields(&source, &Map::new(), &[]);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("color"), Some(&json!("red")));
    }

    #[test]
    fn test_all_timestamp_and_lock_fields_excluded() {
        let mut source = CategorizedFields::new();
        for name in ALWAYS_EXCLUDE {
            source.insert(FieldCategory::Meta, *name, "value");
        }
        source.insert(FieldCategory::Core, "post_title", "A");

        let fields = clone_fields(&source, &Map::new(), &[]);
        assert_eq!(fields.len(), 1);
        assert!(fields.contains_key("post_title"));
    }
}
