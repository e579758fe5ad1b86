//! DCAT record assembly.
//!
//! [`assemble`] reconciles a [`RawScrapeResult`] and the discovered
//! distributions into one [`DcatDocument`], applying the site-aware field
//! precedence. Fields with no resolved value are omitted from the output
//! rather than emitted as `null`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::dates::{extract_year, normalize_date};
use crate::distribution::Distribution;
use crate::formatters::turtle::to_triple_text;
use crate::keywords::extract_keywords;
use crate::metadata::MetadataMap;
use crate::scrape::RawScrapeResult;
use crate::site::SiteVariant;
use crate::{DatacatError, Result};

/// JSON-LD context of every emitted document.
pub const DCAT_CONTEXT: &str = "https://www.w3.org/ns/dcat.jsonld";

/// Title used when the page has none.
pub const DEFAULT_TITLE: &str = "dataset";

/// Publisher used when nothing else resolves.
pub const UNKNOWN_PUBLISHER: &str = "Unknown";

/// Canonical name for any variant of the Indian open government license.
pub const OPEN_GOVERNMENT_LICENSE: &str = "Open Government License, India (https://www.data.gov.in/Godl)";

const AIKOSH_PUBLISHER_KEYS: &[&str] = &["Source organisation", "Author", "Uploaded by"];
const KAGGLE_PUBLISHER_KEYS: &[&str] = &["Author", "Owner", "Uploaded by"];

const AIKOSH_DATE_KEYS: &[&str] = &["Date & Time", "Date", "Published", "Published on", "Uploaded on", "Updated"];
const AIKOSH_YEAR_KEYS: &[&str] = &["Year range", "Year", "Issued", "Created", "Published"];

const MODIFIED_DATE_KEYS: &[&str] =
    &["Date & Time", "Date", "Last Updated", "Last modified", "Updated", "Published", "Published on"];
const ISSUED_YEAR_KEYS: &[&str] = &["Year range", "Year", "Issued", "Published", "Created"];

const LICENSE_KEYS: &[&str] = &["License", "license"];

/// Top-level JSON-LD document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcatDocument {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "dcat:Dataset")]
    pub dataset: CanonicalDataset,
}

/// The `dcat:Dataset` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalDataset {
    #[serde(rename = "dct:title")]
    pub title: String,
    #[serde(rename = "dct:description", default)]
    pub description: String,
    #[serde(rename = "dct:publisher")]
    pub publisher: Publisher,
    #[serde(rename = "dct:issued", default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,
    #[serde(rename = "dct:modified", default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(rename = "dct:license", default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(rename = "dcat:keyword", default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(rename = "dcat:distribution", default)]
    pub distributions: Vec<Distribution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(rename = "foaf:name")]
    pub name: String,
}

impl DcatDocument {
    pub fn new(dataset: CanonicalDataset) -> Self {
        Self { context: DCAT_CONTEXT.to_string(), dataset }
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let json = if pretty { serde_json::to_string_pretty(self)? } else { serde_json::to_string(self)? };
        Ok(json)
    }

    /// Turtle rendering of the record.
    pub fn to_turtle(&self) -> Result<String> {
        Ok(to_triple_text(&self.to_value()?))
    }
}

/// Combine a raw scrape and discovered distributions into a DCAT document.
///
/// # Errors
///
/// Returns [`DatacatError::Assembly`] when the raw scrape carries more than one
/// metadata mapping.
///
/// # Example
///
/// ```rust
/// use datacat_core::{Distribution, RawScrapeResult, SiteVariant, assemble};
///
/// let raw = RawScrapeResult {
///     title: Some("Crime Data of the City".into()),
///     metadata: vec![[("Date", "15/03/2023"), ("Year", "2021")].into_iter().collect()],
///     url: "https://data.example.org/crime".into(),
///     ..Default::default()
/// };
/// let dists = vec![Distribution::from_url("https://data.example.org/crime.csv")];
/// let doc = assemble(&raw, &raw.url, SiteVariant::Unknown, dists).unwrap();
///
/// assert_eq!(doc.dataset.publisher.name, "data.example.org");
/// assert_eq!(doc.dataset.modified.as_deref(), Some("2023-03-15"));
/// assert_eq!(doc.dataset.issued.as_deref(), Some("2021-01-01"));
/// assert_eq!(doc.dataset.keywords, vec!["crime", "city"]);
/// ```
pub fn assemble(
    raw: &RawScrapeResult, url: &str, site: SiteVariant, distributions: Vec<Distribution>,
) -> Result<DcatDocument> {
    if raw.metadata.len() > 1 {
        return Err(DatacatError::Assembly(format!(
            "expected a single metadata mapping, found {}",
            raw.metadata.len()
        )));
    }
    let empty = MetadataMap::new();
    let metadata = raw.primary_metadata().unwrap_or(&empty);

    let title = non_empty(raw.title.as_deref()).unwrap_or(DEFAULT_TITLE).to_string();

    let description = [&raw.about, &raw.summary, &raw.description]
        .into_iter()
        .find_map(|field| non_empty(field.as_deref()))
        .unwrap_or_default()
        .to_string();

    let (issued, modified) = resolve_dates(metadata, site);

    let license = metadata.first_of(LICENSE_KEYS).map(|license| {
        if license.to_lowercase().contains("open government license") {
            OPEN_GOVERNMENT_LICENSE.to_string()
        } else {
            license.to_string()
        }
    });

    let keywords = extract_keywords(Some(&title), raw.summary.as_deref(), &raw.metadata);

    let mut seen = HashSet::new();
    let distributions = distributions
        .into_iter()
        .filter(|d| !d.access_url.is_empty() && seen.insert(d.access_url.clone()))
        .collect();

    Ok(DcatDocument::new(CanonicalDataset {
        title,
        description,
        publisher: Publisher { name: resolve_publisher(raw, metadata, url, site) },
        issued,
        modified,
        license,
        keywords,
        distributions,
    }))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn resolve_publisher(raw: &RawScrapeResult, metadata: &MetadataMap, url: &str, site: SiteVariant) -> String {
    let from_metadata = match site {
        SiteVariant::Aikosh => metadata.first_of(AIKOSH_PUBLISHER_KEYS),
        SiteVariant::Kaggle => metadata.first_of(KAGGLE_PUBLISHER_KEYS),
        SiteVariant::Unknown => None,
    };

    from_metadata
        .or_else(|| non_empty(raw.source.as_deref()))
        .map(str::to_string)
        .or_else(|| Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)))
        .unwrap_or_else(|| UNKNOWN_PUBLISHER.to_string())
}

/// `(issued, modified)` for the site variant.
///
/// Aikosh pages only ever get an issued date; other sites take `modified` from
/// the date keys and `issued` from the year keys independently.
fn resolve_dates(metadata: &MetadataMap, site: SiteVariant) -> (Option<String>, Option<String>) {
    match site {
        SiteVariant::Aikosh => {
            let issued = first_date(metadata, AIKOSH_DATE_KEYS)
                .map(|date| if date.len() > 4 { date } else { format!("{}-01-01", date) })
                .or_else(|| first_year(metadata, AIKOSH_YEAR_KEYS));
            (issued, None)
        }
        _ => (first_year(metadata, ISSUED_YEAR_KEYS), first_date(metadata, MODIFIED_DATE_KEYS)),
    }
}

fn first_date(metadata: &MetadataMap, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| metadata.get(key).and_then(normalize_date))
}

fn first_year(metadata: &MetadataMap, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| metadata.get(key).and_then(extract_year))
        .map(|year| format!("{}-01-01", year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_with(pairs: &[(&str, &str)]) -> RawScrapeResult {
        RawScrapeResult {
            title: Some("Rainfall in India".into()),
            metadata: vec![pairs.iter().copied().collect()],
            url: "https://aikosh.indiaai.gov.in/home/datasets/rainfall".into(),
            ..Default::default()
        }
    }

    fn build(raw: &RawScrapeResult, site: SiteVariant) -> DcatDocument {
        assemble(raw, &raw.url, site, Vec::new()).unwrap()
    }

    #[test]
    fn test_aikosh_date_goes_to_issued() {
        let doc = build(&raw_with(&[("Date & Time", "15/03/2023 10:00:00"), ("Updated", "01/01/2024")]), SiteVariant::Aikosh);
        assert_eq!(doc.dataset.issued.as_deref(), Some("2023-03-15"));
        assert_eq!(doc.dataset.modified, None);
    }

    #[test]
    fn test_aikosh_bare_year_is_padded() {
        let doc = build(&raw_with(&[("Published", "2019")]), SiteVariant::Aikosh);
        assert_eq!(doc.dataset.issued.as_deref(), Some("2019-01-01"));
    }

    #[test]
    fn test_aikosh_year_keys_when_no_date() {
        let doc = build(&raw_with(&[("Date", "n/a"), ("Year range", "2015-2020")]), SiteVariant::Aikosh);
        assert_eq!(doc.dataset.issued.as_deref(), Some("2015-01-01"));
        assert_eq!(doc.dataset.modified, None);
    }

    #[test]
    fn test_non_aikosh_dates_split() {
        let raw = raw_with(&[("Last Updated", "2024-02-29"), ("Year", "FY 2018")]);
        let doc = build(&raw, SiteVariant::Kaggle);
        assert_eq!(doc.dataset.modified.as_deref(), Some("2024-02-29"));
        assert_eq!(doc.dataset.issued.as_deref(), Some("2018-01-01"));
    }

    #[test]
    fn test_no_date_keys_omits_both() {
        let doc = build(&raw_with(&[("Sector", "Agriculture")]), SiteVariant::Unknown);
        let value = doc.to_value().unwrap();
        let dataset = &value["dcat:Dataset"];
        assert!(dataset.get("dct:issued").is_none());
        assert!(dataset.get("dct:modified").is_none());
        assert!(dataset.get("dct:license").is_none());
    }

    #[test]
    fn test_publisher_precedence() {
        let raw = raw_with(&[("Author", "A"), ("Source organisation", "Ministry"), ("Owner", "O")]);
        assert_eq!(build(&raw, SiteVariant::Aikosh).dataset.publisher.name, "Ministry");
        assert_eq!(build(&raw, SiteVariant::Kaggle).dataset.publisher.name, "A");
        assert_eq!(build(&raw, SiteVariant::Unknown).dataset.publisher.name, "aikosh.indiaai.gov.in");
    }

    #[test]
    fn test_publisher_source_then_unknown() {
        let mut raw = raw_with(&[]);
        raw.source = Some("IndiaAI".into());
        assert_eq!(build(&raw, SiteVariant::Aikosh).dataset.publisher.name, "IndiaAI");

        raw.source = None;
        let doc = assemble(&raw, "not a url", SiteVariant::Aikosh, Vec::new()).unwrap();
        assert_eq!(doc.dataset.publisher.name, UNKNOWN_PUBLISHER);
    }

    #[test]
    fn test_open_government_license_rewrite() {
        let doc = build(&raw_with(&[("license", "Government Open Data / open Government License - India")]), SiteVariant::Aikosh);
        assert_eq!(doc.dataset.license.as_deref(), Some(OPEN_GOVERNMENT_LICENSE));

        let doc = build(&raw_with(&[("License", "CC BY 4.0"), ("license", "MIT")]), SiteVariant::Aikosh);
        assert_eq!(doc.dataset.license.as_deref(), Some("CC BY 4.0"));
    }

    #[test]
    fn test_title_and_description_defaults() {
        let raw = RawScrapeResult { title: Some(String::new()), url: "https://x.org/d".into(), ..Default::default() };
        let doc = build(&raw, SiteVariant::Unknown);
        assert_eq!(doc.dataset.title, DEFAULT_TITLE);
        assert_eq!(doc.dataset.description, "");
        assert!(doc.dataset.keywords.is_empty());
        assert!(doc.to_value().unwrap()["dcat:Dataset"].get("dcat:keyword").is_none());
    }

    #[test]
    fn test_description_precedence() {
        let mut raw = raw_with(&[]);
        raw.summary = Some("short".into());
        raw.description = Some("long".into());
        assert_eq!(build(&raw, SiteVariant::Unknown).dataset.description, "short");
        raw.about = Some("about".into());
        assert_eq!(build(&raw, SiteVariant::Unknown).dataset.description, "about");
    }

    #[test]
    fn test_distributions_first_occurrence_wins() {
        let raw = raw_with(&[]);
        let dists = vec![
            Distribution::from_url("https://x.org/b.csv").with_title("first"),
            Distribution::from_url("https://x.org/a.zip"),
            Distribution::from_url("https://x.org/b.csv").with_title("second"),
        ];
        let doc = assemble(&raw, &raw.url, SiteVariant::Unknown, dists).unwrap();
        assert_eq!(doc.dataset.distributions.len(), 2);
        assert_eq!(doc.dataset.distributions[0].title.as_deref(), Some("first"));
    }

    #[test]
    fn test_multiple_metadata_mappings_rejected() {
        let mut raw = raw_with(&[("A", "1")]);
        raw.metadata.push(MetadataMap::new());
        let err = assemble(&raw, &raw.url, SiteVariant::Unknown, Vec::new()).unwrap_err();
        assert!(matches!(err, DatacatError::Assembly(_)));
    }

    #[test]
    fn test_json_shape() {
        let raw = raw_with(&[("Sector", "Water")]);
        let dists = vec![Distribution::from_url("https://x.org/rain.csv")];
        let doc = assemble(&raw, &raw.url, SiteVariant::Aikosh, dists).unwrap();
        assert_eq!(
            doc.to_value().unwrap(),
            json!({
                "@context": DCAT_CONTEXT,
                "dcat:Dataset": {
                    "dct:title": "Rainfall in India",
                    "dct:description": "",
                    "dct:publisher": {"foaf:name": "aikosh.indiaai.gov.in"},
                    "dcat:keyword": ["rainfall", "india", "water"],
                    "dcat:distribution": [{
                        "dcat:accessURL": "https://x.org/rain.csv",
                        "dcat:mediaType": "text/csv",
                        "dct:format": "CSV"
                    }]
                }
            })
        );
    }
}
