//! Flat key-value frontmatter parsing.

use crate::constants::{FRONTMATTER_DELIMITER, LIST_ITEM_PREFIX};
use std::collections::BTreeMap;

/// Extracts the flat `key: value` pairs of a document's frontmatter block.
///
/// The block must open at the very start of the text with `---` and is closed
/// by the next `---`. List items and lines without a `:` are skipped, one
/// layer of surrounding quotes is removed from values, and later keys
/// overwrite earlier ones. Documents without a frontmatter block yield an
/// empty map.
///
/// # Examples
///
/// ```
/// use lifelog::journal_core::parse_frontmatter;
///
/// let fm = parse_frontmatter("---\nsleep: \"7.5\"\ntags:\n  - diary\n---\nbody");
/// assert_eq!(fm.get("sleep").map(String::as_str), Some("7.5"));
/// assert!(parse_frontmatter("no frontmatter here").is_empty());
/// ```
pub fn parse_frontmatter(text: &str) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    let Some(rest) = text.strip_prefix(FRONTMATTER_DELIMITER) else {
        return fields;
    };
    let Some(end) = rest.find(FRONTMATTER_DELIMITER) else {
        return fields;
    };

    for line in rest[..end].trim().lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(LIST_ITEM_PREFIX) {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }
    }

    fields
}

/// Removes one layer of double quotes, then one layer of single quotes.
fn unquote(value: &str) -> &str {
    let value = strip_layer(value, '"');
    strip_layer(value, '\'')
}

fn strip_layer(value: &str, quote: char) -> &str {
    let value = value.strip_prefix(quote).unwrap_or(value);
    value.strip_suffix(quote).unwrap_or(value)
}
