//! Field comparison between two products.

use crate::fields::{CategorizedFields, FieldCategory};
use crate::normalize::comparable_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One per-field difference between two products.
///
/// A `None` value means the field is absent on that side; absence is
/// reported as-is even though it compares equal to the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDifference {
    /// Raw field name.
    pub field: String,

    /// Category the name resolves to.
    pub category: FieldCategory,

    /// Value on the source side, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_value: Option<Value>,

    /// Value on the target side, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<Value>,
}

/// Compute the per-field differences between two categorized maps.
///
/// Categories are walked in their fixed order; within a category the name
/// union is source keys in map order followed by target-only keys in map
/// order. A difference is emitted iff the normalized string forms disagree.
#[must_use]
pub fn diff_fields(source: &CategorizedFields, target: &CategorizedFields) -> Vec<FieldDifference> {
    let mut differences = Vec::new();

    for category in FieldCategory::ALL {
        let src = source.category(category);
        let tgt = target.category(category);

        let mut names: Vec<&String> = src.keys().collect();
        names.extend(tgt.keys().filter(|name| !src.contains_key(*name)));

        for name in names {
            let source_value = src.get(name);
            let target_value = tgt.get(name);

            if comparable_text(source_value) != comparable_text(target_value) {
                differences.push(FieldDifference {
                    field: name.clone(),
                    category,
                    source_value: source_value.cloned(),
                    target_value: target_value.cloned(),
                });
            }
        }
    }

    differences
}
