use crate::metadata::MetadataMap;
use crate::parse::Document;

/// Label/value pairs from the `div.dataset-metadata` panel.
///
/// Each `div.text-xs` block contributes its first `label` as the key and its
/// first `p` as the value. Only the first panel on the page is read.
pub fn scan_metadata_panel(doc: &Document, metadata: &mut MetadataMap) {
    let Some(panel) = doc.select("div.dataset-metadata").unwrap_or_default().into_iter().next() else {
        return;
    };

    for block in panel.select("div.text-xs").unwrap_or_default() {
        if let (Some(label), Some(value)) = (block.select_first("label"), block.select_first("p")) {
            metadata.set_if_absent(&label.stripped_text(), &value.stripped_text());
        }
    }
}
