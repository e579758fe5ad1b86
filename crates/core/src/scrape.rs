//! Page scraping into a [`RawScrapeResult`].
//!
//! The raw scrape is the intermediate record the assembler consumes. It can be
//! persisted as JSON and re-assembled later without the page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extractors::Extractor;
use crate::metadata::{MetadataMap, kind};
use crate::parse::Document;
use crate::site::SiteVariant;
use crate::{DatacatError, Result};

const ABOUT_HEADING: &str = "About Dataset";

/// Loosely structured fields scraped from one dataset page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawScrapeResult {
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Summary")]
    pub summary: Option<String>,
    #[serde(rename = "About Dataset")]
    pub about: Option<String>,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Normally exactly one mapping.
    #[serde(rename = "DATASET METADATA")]
    pub metadata: Vec<MetadataMap>,
    #[serde(rename = "Source")]
    pub source: Option<String>,
    #[serde(rename = "URL")]
    pub url: String,
}

impl RawScrapeResult {
    /// The first metadata mapping, if any.
    pub fn primary_metadata(&self) -> Option<&MetadataMap> {
        self.metadata.first()
    }

    /// Rebuild from persisted JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DatacatError::Assembly`] when the value is not an object, a
    /// text field holds something other than a string, or a metadata mapping
    /// holds nested values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use datacat_core::RawScrapeResult;
    /// use serde_json::json;
    ///
    /// let raw = RawScrapeResult::from_value(&json!({
    ///     "Title": "Rainfall",
    ///     "DATASET METADATA": [{"Year": 2021}],
    ///     "URL": "https://x.org/d"
    /// })).unwrap();
    /// assert_eq!(raw.primary_metadata().unwrap().get("Year"), Some("2021"));
    ///
    /// assert!(RawScrapeResult::from_value(&json!({"Title": ["not", "text"]})).is_err());
    /// ```
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| DatacatError::Assembly(format!("raw scrape must be an object, found {}", kind(value))))?;

        let text = |key: &str| -> Result<Option<String>> {
            match object.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(DatacatError::Assembly(format!("`{}` must be text, found {}", key, kind(other)))),
            }
        };

        let metadata = match object.get("DATASET METADATA") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().map(MetadataMap::from_json).collect::<Result<_>>()?,
            Some(single @ Value::Object(_)) => vec![MetadataMap::from_json(single)?],
            Some(other) => {
                return Err(DatacatError::Assembly(format!(
                    "`DATASET METADATA` must be a list of mappings, found {}",
                    kind(other)
                )));
            }
        };

        Ok(Self {
            title: text("Title")?,
            summary: text("Summary")?,
            about: text("About Dataset")?,
            description: text("Description")?,
            metadata,
            source: text("Source")?,
            url: text("URL")?.unwrap_or_default(),
        })
    }

    /// Parse persisted JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let json = if pretty { serde_json::to_string_pretty(self)? } else { serde_json::to_string(self)? };
        Ok(json)
    }
}

impl<'de> Deserialize<'de> for RawScrapeResult {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Scrape title, summary, about-text and metadata from a parsed page.
pub fn scrape_page(doc: &Document, url: &str, site: SiteVariant) -> RawScrapeResult {
    let heading = doc.select("h1").unwrap_or_default().into_iter().next();
    let title = heading.as_ref().map(|h1| h1.stripped_text());

    let summary = match site {
        SiteVariant::Kaggle => heading
            .as_ref()
            .and_then(|h1| h1.next_sibling_element())
            .filter(|next| matches!(next.tag_name().as_str(), "p" | "div" | "span"))
            .map(|next| next.stripped_text()),
        _ => doc
            .select("p")
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|p| p.stripped_text()),
    };

    let about = doc
        .select("h2, h3")
        .unwrap_or_default()
        .into_iter()
        .find(|h| h.text().contains(ABOUT_HEADING))
        .and_then(|h| doc.find_next(&h, &["p"]))
        .map(|p| p.stripped_text());

    let metadata = Extractor::for_site(site).discover_metadata(doc);

    RawScrapeResult {
        title,
        summary,
        about,
        description: None,
        metadata: vec![metadata],
        source: site.source_label().map(str::to_string),
        url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = r#"
        <html><body>
            <nav><p>Skip to content</p></nav>
            <h1> Global  <em>Temperatures</em> </h1>
            <span>Monthly land temperatures since 1750</span>
            <h2>About Dataset</h2>
            <div><p>Compiled by Berkeley Earth.</p></div>
        </body></html>
    "#;

    #[test]
    fn test_kaggle_summary_is_heading_sibling() {
        let doc = Document::parse(PAGE).unwrap();
        let raw = scrape_page(&doc, "https://www.kaggle.com/datasets/a/b", SiteVariant::Kaggle);
        assert_eq!(raw.title.as_deref(), Some("GlobalTemperatures"));
        assert_eq!(raw.summary.as_deref(), Some("Monthly land temperatures since 1750"));
        assert_eq!(raw.about.as_deref(), Some("Compiled by Berkeley Earth."));
        assert_eq!(raw.source.as_deref(), Some("Kaggle"));
        assert_eq!(raw.metadata.len(), 1);
    }

    #[test]
    fn test_other_sites_use_first_paragraph() {
        let doc = Document::parse(PAGE).unwrap();
        let raw = scrape_page(&doc, "https://data.example.org/d", SiteVariant::Unknown);
        assert_eq!(raw.summary.as_deref(), Some("Skip to content"));
        assert_eq!(raw.source, None);
    }

    #[test]
    fn test_kaggle_sibling_must_be_text_block() {
        let doc = Document::parse("<h1>T</h1><ul><li>x</li></ul><p>later</p>").unwrap();
        let raw = scrape_page(&doc, "https://www.kaggle.com/d", SiteVariant::Kaggle);
        assert_eq!(raw.summary, None);
    }

    #[test]
    fn test_empty_page() {
        let doc = Document::parse("").unwrap();
        let raw = scrape_page(&doc, "https://x.org/d", SiteVariant::Aikosh);
        assert_eq!(raw.title, None);
        assert_eq!(raw.about, None);
        assert_eq!(raw.source.as_deref(), Some("IndiaAI"));
        assert!(raw.metadata[0].is_empty());
    }

    #[test]
    fn test_serialized_keys() {
        let raw = RawScrapeResult {
            title: Some("T".into()),
            metadata: vec![[("Sector", "Health")].into_iter().collect()],
            url: "https://x.org/d".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&raw).unwrap();
        assert_eq!(
            value,
            json!({
                "Title": "T",
                "Summary": null,
                "About Dataset": null,
                "DATASET METADATA": [{"Sector": "Health"}],
                "Source": null,
                "URL": "https://x.org/d"
            })
        );
    }

    #[test]
    fn test_json_round_trip() {
        let doc = Document::parse(PAGE).unwrap();
        let raw = scrape_page(&doc, "https://www.kaggle.com/datasets/a/b", SiteVariant::Kaggle);
        let back: RawScrapeResult = serde_json::from_str(&raw.to_json_string(true).unwrap()).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_from_value_rejects_non_text() {
        let err = RawScrapeResult::from_value(&json!({"Title": 42})).unwrap_err();
        assert!(matches!(err, DatacatError::Assembly(_)));
        assert!(RawScrapeResult::from_value(&json!("just text")).is_err());
        assert!(RawScrapeResult::from_value(&json!({"DATASET METADATA": "x"})).is_err());
    }
}
