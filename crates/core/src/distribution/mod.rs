//! Distribution discovery.
//!
//! Several independent scanners look for downloadable file references in a
//! page. Their findings are merged into a [`DistributionSet`] keyed by
//! absolute access URL; the merged list comes out sorted by URL so repeated
//! runs over the same page produce identical output.

pub mod config;
pub mod scanners;
pub mod script;

pub use config::DiscoveryConfig;
pub use script::ScriptMiner;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::classify::{HTML_FORMAT, HTML_MEDIA_TYPE, classify_format};
use crate::Result;
use crate::parse::Document;
use crate::site::SiteVariant;

/// Domain whose HTML pages stand in for a CSV download when nothing else does.
pub const KAGGLE_DOMAIN: &str = "kaggle.com";

/// One downloadable artifact of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    #[serde(rename = "dcat:accessURL")]
    pub access_url: String,
    #[serde(rename = "dcat:mediaType")]
    pub media_type: String,
    #[serde(rename = "dct:format")]
    pub format: String,
    #[serde(rename = "dct:title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Distribution {
    pub fn new(access_url: impl Into<String>, media_type: impl Into<String>, format: impl Into<String>) -> Self {
        Self { access_url: access_url.into(), media_type: media_type.into(), format: format.into(), title: None }
    }

    /// Distribution whose media type and format come from the URL itself.
    pub fn from_url(access_url: &str) -> Self {
        let (media_type, format) = classify_format(access_url);
        Self::new(access_url, media_type, format)
    }

    /// Attach a title, ignoring blank text.
    pub fn with_title(mut self, title: &str) -> Self {
        let title = title.trim();
        if !title.is_empty() {
            self.title = Some(title.to_string());
        }
        self
    }

    pub fn is_csv(&self) -> bool {
        self.media_type == "text/csv" || self.format.eq_ignore_ascii_case("CSV")
    }
}

/// Distributions keyed by access URL.
///
/// The first insertion for a URL fixes its media type and format; later
/// insertions may only fill a missing title.
#[derive(Debug, Clone, Default)]
pub struct DistributionSet {
    entries: BTreeMap<String, Distribution>,
}

impl DistributionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one distribution. Returns whether its URL was new.
    pub fn insert(&mut self, distribution: Distribution) -> bool {
        if distribution.access_url.is_empty() {
            return false;
        }

        match self.entries.get_mut(&distribution.access_url) {
            Some(existing) => {
                if existing.title.is_none() {
                    existing.title = distribution.title;
                }
                false
            }
            None => {
                self.entries.insert(distribution.access_url.clone(), distribution);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distributions ordered by access URL.
    pub fn into_vec(self) -> Vec<Distribution> {
        self.entries.into_values().collect()
    }
}

impl Extend<Distribution> for DistributionSet {
    fn extend<I: IntoIterator<Item = Distribution>>(&mut self, iter: I) {
        for distribution in iter {
            self.insert(distribution);
        }
    }
}

/// Rewrite the first HTML page on `domain` as CSV when no CSV is present.
///
/// Returns whether anything changed.
pub fn promote_csv(distributions: &mut [Distribution], domain: &str) -> bool {
    if distributions.iter().any(Distribution::is_csv) {
        return false;
    }

    match distributions
        .iter_mut()
        .find(|d| d.access_url.contains(domain) && d.media_type == HTML_MEDIA_TYPE)
    {
        Some(page) => {
            page.media_type = "text/csv".to_string();
            page.format = "CSV".to_string();
            true
        }
        None => false,
    }
}

/// Resolve a reference against the page URL.
///
/// Only web and ftp targets count as downloadable; `javascript:` and
/// `mailto:` references and blank values resolve to nothing.
pub fn resolve_url(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };

    matches!(resolved.scheme(), "http" | "https" | "ftp").then(|| resolved.to_string())
}

/// Find every downloadable artifact referenced by `doc`.
///
/// Site-specific scanners run first, then the generic anchor, attribute and
/// inline-script scanners. With no findings at all the page itself becomes a
/// single HTML distribution. For kaggle pages an HTML page on the kaggle
/// domain is promoted to CSV when no CSV was found.
///
/// # Example
///
/// ```rust
/// use datacat_core::{DiscoveryConfig, Document, SiteVariant, discover_distributions};
///
/// let html = r#"<a href="/files/a.csv">A</a><a href="https://x.org/files/a.csv">again</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let found =
///     discover_distributions(&doc, "https://x.org/page", SiteVariant::Unknown, &DiscoveryConfig::default()).unwrap();
///
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].access_url, "https://x.org/files/a.csv");
/// assert_eq!(found[0].title.as_deref(), Some("A"));
/// ```
pub fn discover_distributions(
    doc: &Document, base_url: &str, site: SiteVariant, config: &DiscoveryConfig,
) -> Result<Vec<Distribution>> {
    let base = Url::parse(base_url).ok();
    let scanner = scanners::Scanner::new(base.as_ref(), config)?;
    let mut set = DistributionSet::new();

    match site {
        SiteVariant::Aikosh => scanner.scan_aikosh(doc, &mut set),
        SiteVariant::Kaggle => scanner.scan_kaggle(doc, &mut set),
        SiteVariant::Unknown => {}
    }
    scanner.scan_generic(doc, &mut set);

    if set.is_empty() {
        tracing::debug!(url = base_url, "no distributions found, falling back to the page itself");
        set.insert(Distribution::new(base_url, HTML_MEDIA_TYPE, HTML_FORMAT));
    }

    let mut distributions = set.into_vec();
    if site == SiteVariant::Kaggle {
        promote_csv(&mut distributions, KAGGLE_DOMAIN);
    }
    Ok(distributions)
}

/// Distributions for a page that was never parsed: the page URL alone.
pub fn fallback_distributions(url: &str, site: SiteVariant) -> Vec<Distribution> {
    if url.is_empty() {
        return Vec::new();
    }

    let mut distributions = vec![Distribution::from_url(url)];
    if site == SiteVariant::Kaggle {
        promote_csv(&mut distributions, KAGGLE_DOMAIN);
    }
    distributions
}
