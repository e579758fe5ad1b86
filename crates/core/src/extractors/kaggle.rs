use std::sync::LazyLock;

use regex::Regex;

use crate::metadata::MetadataMap;
use crate::parse::Document;

static ROW_CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(metadata|info|meta|dataset-)?row").unwrap());

/// `<strong>Label:</strong> value` pairs inside list items, paragraphs and divs.
///
/// The value is the container's text with the label text removed.
pub fn scan_bold_labels(doc: &Document, metadata: &mut MetadataMap) {
    for container in doc.select("li, p, div").unwrap_or_default() {
        let Some(label) = container.select_first("strong").or_else(|| container.select_first("b")) else {
            continue;
        };

        let label_text = label.stripped_text();
        let key = label_text.replace(':', "");
        let value = container.stripped_text().replace(&label_text, "");
        metadata.set_if_absent(&key, value.trim_matches([' ', ':']));
    }
}

/// Table-like rows whose first cell is a label and second a value.
pub fn scan_rows(doc: &Document, metadata: &mut MetadataMap) {
    for row in doc.elements_with_class(&ROW_CLASS, &[]) {
        let cells = row.select("div, span, p, td").unwrap_or_default();
        if let [label, value, ..] = cells.as_slice() {
            metadata.set_if_absent(&label.stripped_text().replace(':', ""), &value.stripped_text());
        }
    }
}
