//! URL to media type and format label classification.
//!
//! Classification looks only at the URL text. It never fails: a URL with no
//! recognised suffix degrades to `application/octet-stream`, and one with no
//! suffix at all is treated as an HTML page.

use std::sync::LazyLock;

use regex::Regex;

/// Media type used when the URL is empty or has no extension.
pub const HTML_MEDIA_TYPE: &str = "text/html";

/// Format label used when the URL has no extension.
pub const HTML_FORMAT: &str = "HTML";

/// Media type for extensions missing from [`EXT_MEDIA`].
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Known file extensions and their media types.
pub const EXT_MEDIA: &[(&str, &str)] = &[
    ("zip", "application/zip"),
    ("csv", "text/csv"),
    ("json", "application/json"),
    ("geojson", "application/geo+json"),
    ("xml", "application/xml"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("xls", "application/vnd.ms-excel"),
    ("parquet", "application/octet-stream"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("txt", "text/plain"),
    ("tgz", "application/gzip"),
    ("gz", "application/gzip"),
    ("tar", "application/x-tar"),
];

static EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.([a-zA-Z0-9]+)(?:$|\?)").unwrap());

/// Media type for a lowercase extension, if it is in the table.
pub fn media_type_for_extension(ext: &str) -> Option<&'static str> {
    EXT_MEDIA
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, media)| *media)
}

/// The first dot-delimited alphanumeric suffix that ends the URL or precedes a `?`.
pub fn extension_of(url: &str) -> Option<&str> {
    EXTENSION
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Best-guess media type for a URL.
pub fn media_type_for_url(url: &str) -> &'static str {
    if url.is_empty() {
        return HTML_MEDIA_TYPE;
    }
    match extension_of(url) {
        Some(ext) => media_type_for_extension(ext).unwrap_or(OCTET_STREAM),
        None => HTML_MEDIA_TYPE,
    }
}

/// Uppercased raw extension, or `HTML` when there is none.
pub fn format_label_for_url(url: &str) -> String {
    extension_of(url)
        .map(|ext| ext.to_uppercase())
        .unwrap_or_else(|| HTML_FORMAT.to_string())
}

/// Classify a URL into `(media type, format label)`.
///
/// # Example
///
/// ```rust
/// use datacat_core::classify_format;
///
/// assert_eq!(classify_format("https://x.org/d.csv?dl=1"), ("text/csv".to_string(), "CSV".to_string()));
/// assert_eq!(classify_format("https://x.org/d"), ("text/html".to_string(), "HTML".to_string()));
/// ```
pub fn classify_format(url: &str) -> (String, String) {
    (media_type_for_url(url).to_string(), format_label_for_url(url))
}
