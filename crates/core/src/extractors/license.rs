//! License discovery shared by every site variant.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::metadata::MetadataMap;
use crate::parse::Document;

/// Metadata key every license pass writes to.
pub const LICENSE_KEY: &str = "License";

static LICENSE_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(creativecommons|opensource\.org|apache\.org|gnu\.org|mit-license|license)").unwrap()
});

/// Kaggle file listings also link bare `MIT.txt` license files.
static KAGGLE_LICENSE_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(creativecommons|opensource\.org|apache\.org|gnu\.org|mit-license|mit\.txt|license)").unwrap()
});

static LICENSE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\blicense\b").unwrap());

static LICENSE_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)license[:\s\-]*([\w\W]{1,200})").unwrap());

/// Depth-first search for a license value in a linked-data tree.
///
/// Object values are visited in insertion order, array items in index order.
/// A string license wins outright; an object license contributes its `name`,
/// `@id` or `url`, in that order.
pub fn license_in_linked_data(value: &Value) -> Option<String> {
    match value {
        Value::Object(object) => {
            match object.get("license") {
                Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
                Some(Value::Object(license)) => {
                    let named = ["name", "@id", "url"]
                        .iter()
                        .filter_map(|key| license.get(*key).and_then(Value::as_str))
                        .find(|s| !s.trim().is_empty());
                    if let Some(name) = named {
                        return Some(name.trim().to_string());
                    }
                }
                _ => {}
            }
            object.values().find_map(license_in_linked_data)
        }
        Value::Array(items) => items.iter().find_map(license_in_linked_data),
        _ => None,
    }
}

/// License from `application/ld+json` blocks; unparsable blocks are skipped.
pub fn scan_linked_data(doc: &Document, metadata: &mut MetadataMap) {
    for script in doc.select(r#"script[type="application/ld+json"]"#).unwrap_or_default() {
        let text = script.text();
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(value) => {
                if let Some(license) = license_in_linked_data(&value) {
                    metadata.set_if_absent(LICENSE_KEY, &license);
                }
            }
            Err(e) => tracing::debug!(error = %e, "skipping malformed linked-data block"),
        }
    }
}

/// Hyperlinks whose target looks like a license; anchor text wins over the target.
pub fn scan_anchors(doc: &Document, metadata: &mut MetadataMap) {
    scan_anchors_matching(doc, metadata, &LICENSE_HOST);
}

/// [`scan_anchors`] that also accepts links to `mit.txt` files.
pub fn scan_kaggle_anchors(doc: &Document, metadata: &mut MetadataMap) {
    scan_anchors_matching(doc, metadata, &KAGGLE_LICENSE_HOST);
}

fn scan_anchors_matching(doc: &Document, metadata: &mut MetadataMap, hosts: &Regex) {
    for anchor in doc.select("a[href]").unwrap_or_default() {
        let href = anchor.attr("href").unwrap_or_default().trim();
        if hosts.is_match(href) {
            let text = anchor.stripped_text();
            metadata.set_if_absent(LICENSE_KEY, if text.is_empty() { href } else { text.as_str() });
        }
    }
}

/// Text mentioning the word "license": the trailing label value, else the next element's text.
pub fn scan_text(doc: &Document, metadata: &mut MetadataMap) {
    for (text, parent) in doc.text_nodes() {
        if !LICENSE_WORD.is_match(text) || matches!(parent.tag_name().as_str(), "script" | "style") {
            continue;
        }

        let context = parent.joined_text(" ");
        let labelled = LICENSE_LABEL
            .captures(&context)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '-'))
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let value = labelled.or_else(|| parent.next_sibling_element().map(|sibling| sibling.stripped_text()));
        if let Some(value) = value {
            metadata.set_if_absent(LICENSE_KEY, &value);
        }
    }
}
