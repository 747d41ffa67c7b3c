//! Label-to-attribute inference.
//!
//! Maps the labels returned by the image classifier to an item type and a
//! color using two fixed vocabularies. The first label (in classifier order)
//! found in a vocabulary wins; nothing is re-sorted.

use serde::Serialize;

/// Clothing types recognized as an item type.
pub const CLOTHING_TYPES: &[&str] = &[
    "shirt", "t-shirt", "jeans", "trousers", "pants", "jacket", "dress", "skirt", "sweater",
    "hoodie", "footwear", "shoe",
];

/// Colors recognized as an item color.
pub const COLOR_KEYWORDS: &[&str] = &[
    "blue", "black", "white", "red", "green", "yellow", "gray", "brown", "pink", "purple",
    "orange",
];

/// Sentinel for an attribute with no vocabulary match.
pub const UNKNOWN: &str = "unknown";

/// Generic item type used when only the `"clothing"` label was detected.
pub const GENERIC_CLOTHING: &str = "clothing";

/// Attributes inferred from a label list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAttributes {
    pub item_type: String,
    pub color: String,
    pub tags: Vec<String>,
}

/// Infer item attributes from classifier labels.
///
/// Total: unmatched input yields `"unknown"` sentinels. `tags` is the input
/// unchanged, duplicates included.
#[must_use]
pub fn infer(labels: Vec<String>) -> ItemAttributes {
    let mut item_type = first_match(&labels, CLOTHING_TYPES).unwrap_or(UNKNOWN);
    let color = first_match(&labels, COLOR_KEYWORDS).unwrap_or(UNKNOWN);

    if item_type == UNKNOWN && labels.iter().any(|l| l == GENERIC_CLOTHING) {
        item_type = GENERIC_CLOTHING;
    }

    ItemAttributes {
        item_type: item_type.to_owned(),
        color: color.to_owned(),
        tags: labels,
    }
}

fn first_match<'v>(labels: &[String], vocabulary: &[&'v str]) -> Option<&'v str> {
    labels
        .iter()
        .find_map(|label| vocabulary.iter().copied().find(|word| *word == label))
}
