//! Page-to-DCAT conversion API.
//!
//! The main entry point is the [`Converter`], configured through
//! [`DatacatConfig`], along with the convenience functions [`convert`],
//! [`convert_with_hint`] and [`fetch_and_convert`].
//!
//! # Example
//!
//! ```rust
//! use datacat_core::convert;
//!
//! let html = r#"
//!     <h1>Air Quality</h1>
//!     <p>Hourly PM2.5 readings.</p>
//!     <a href="/files/aq.csv">Download CSV</a>
//! "#;
//! let conversion = convert(html, "https://data.example.org/aq").unwrap();
//!
//! assert_eq!(conversion.record.dataset.title, "Air Quality");
//! assert_eq!(conversion.record.dataset.distributions[0].access_url, "https://data.example.org/files/aq.csv");
//! ```

use crate::dcat::{DcatDocument, assemble};
use crate::distribution::{DiscoveryConfig, discover_distributions, fallback_distributions};
#[cfg(feature = "fetch")]
use crate::fetch::fetch_url;
use crate::fetch::FetchConfig;
use crate::parse::Document;
use crate::scrape::{RawScrapeResult, scrape_page};
use crate::site::SiteVariant;
use crate::Result;

/// Configuration for the [`Converter`].
///
/// # Example
///
/// ```rust
/// use datacat_core::{DatacatConfig, SiteVariant};
///
/// let config = DatacatConfig::builder()
///     .site_hint(SiteVariant::Kaggle)
///     .timeout(10)
///     .build();
/// assert_eq!(config.fetch.timeout, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DatacatConfig {
    /// Site variant to use instead of detecting it from the URL.
    pub site_hint: Option<SiteVariant>,

    /// Distribution discovery heuristics.
    pub discovery: DiscoveryConfig,

    /// HTTP settings for [`Converter::fetch_and_convert`].
    pub fetch: FetchConfig,
}

impl DatacatConfig {
    pub fn builder() -> DatacatConfigBuilder {
        DatacatConfigBuilder::new()
    }
}

/// Builder for DatacatConfig.
pub struct DatacatConfigBuilder {
    config: DatacatConfig,
}

impl DatacatConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: DatacatConfig::default() }
    }

    /// Forces the site variant.
    pub fn site_hint(mut self, site: SiteVariant) -> Self {
        self.config.site_hint = Some(site);
        self
    }

    /// Sets an optional site hint, leaving detection on when `None`.
    pub fn maybe_site_hint(mut self, site: Option<SiteVariant>) -> Self {
        self.config.site_hint = site;
        self
    }

    /// Replaces the discovery heuristics.
    pub fn discovery(mut self, discovery: DiscoveryConfig) -> Self {
        self.config.discovery = discovery;
        self
    }

    /// Sets the characters searched either side of a script extension hit.
    pub fn script_window(mut self, chars: usize) -> Self {
        self.config.discovery.script_window = chars;
        self
    }

    /// Sets the fetch timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.fetch.timeout = seconds;
        self
    }

    /// Sets the fetch User-Agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.fetch.user_agent = user_agent.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> DatacatConfig {
        self.config
    }
}

impl Default for DatacatConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of converting one page.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The intermediate scrape, suitable for persisting.
    pub raw: RawScrapeResult,
    /// The site variant that drove extraction.
    pub site: SiteVariant,
    /// The assembled DCAT document.
    pub record: DcatDocument,
}

/// A scraped page together with its assembly outcome.
///
/// The raw scrape survives a failed assembly so callers can still keep it.
#[derive(Debug)]
pub struct ScrapedPage {
    pub raw: RawScrapeResult,
    pub site: SiteVariant,
    pub record: Result<DcatDocument>,
}

impl ScrapedPage {
    pub fn into_conversion(self) -> Result<Conversion> {
        let record = self.record?;
        Ok(Conversion { raw: self.raw, site: self.site, record })
    }
}

/// Turns dataset pages into DCAT documents.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: DatacatConfig,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DatacatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DatacatConfig {
        &self.config
    }

    /// Site variant for `url` under this configuration.
    pub fn site_for(&self, url: &str) -> SiteVariant {
        SiteVariant::resolve(self.config.site_hint, url)
    }

    /// Scrape, discover and assemble a page in one pass.
    ///
    /// `url` is the page address; it drives site detection and resolves
    /// relative links, so an unparseable value leaves relative links
    /// unresolved rather than failing.
    pub fn convert_html(&self, html: &str, url: &str) -> Result<Conversion> {
        self.scrape_html(html, url)?.into_conversion()
    }

    /// Like [`Converter::convert_html`], but hands back the raw scrape even
    /// when assembly fails.
    pub fn scrape_html(&self, html: &str, url: &str) -> Result<ScrapedPage> {
        let site = self.site_for(url);
        let doc = Document::parse(html)?;
        let raw = scrape_page(&doc, url, site);
        let record = self.assemble_with(&raw, Some(&doc), url, site);

        if let Ok(record) = &record {
            tracing::info!(
                url,
                site = %site,
                distributions = record.dataset.distributions.len(),
                "converted page"
            );
        }

        Ok(ScrapedPage { raw, site, record })
    }

    /// Assemble a previously scraped page.
    ///
    /// Without the parsed page the only distribution is the page URL itself.
    pub fn convert_raw(&self, raw: &RawScrapeResult, document: Option<&Document>, url: &str) -> Result<DcatDocument> {
        self.assemble_with(raw, document, url, self.site_for(url))
    }

    fn assemble_with(
        &self, raw: &RawScrapeResult, document: Option<&Document>, url: &str, site: SiteVariant,
    ) -> Result<DcatDocument> {
        let distributions = match document {
            Some(doc) => discover_distributions(doc, url, site, &self.config.discovery)?,
            None => fallback_distributions(url, site),
        };
        assemble(raw, url, site, distributions)
    }

    /// Fetch a page and convert it.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_convert(&self, url: &str) -> Result<Conversion> {
        let html = fetch_url(url, &self.config.fetch).await?;
        self.convert_html(&html, url)
    }
}

/// Convert a page with default settings.
pub fn convert(html: &str, url: &str) -> Result<Conversion> {
    Converter::new().convert_html(html, url)
}

/// Convert a page with an explicit site variant.
pub fn convert_with_hint(html: &str, url: &str, site: SiteVariant) -> Result<Conversion> {
    Converter::with_config(DatacatConfig::builder().site_hint(site).build()).convert_html(html, url)
}

/// Fetch a page and convert it with default settings.
#[cfg(feature = "fetch")]
pub async fn fetch_and_convert(url: &str) -> Result<Conversion> {
    Converter::new().fetch_and_convert(url).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DatacatError, MetadataMap};

    #[test]
    fn test_builder() {
        let config = DatacatConfig::builder()
            .maybe_site_hint(Some(SiteVariant::Aikosh))
            .script_window(40)
            .user_agent("test-agent")
            .build();
        assert_eq!(config.site_hint, Some(SiteVariant::Aikosh));
        assert_eq!(config.discovery.script_window, 40);
        assert_eq!(config.fetch.user_agent, "test-agent");
    }

    #[test]
    fn test_hint_overrides_detection() {
        let conversion =
            convert_with_hint("<h1>T</h1>", "https://www.kaggle.com/datasets/a/b", SiteVariant::Unknown).unwrap();
        assert_eq!(conversion.site, SiteVariant::Unknown);
        assert_eq!(conversion.record.dataset.distributions[0].media_type, "text/html");
    }

    #[test]
    fn test_convert_raw_without_document() {
        let raw = RawScrapeResult { title: Some("Stored".into()), ..Default::default() };
        let record = Converter::new().convert_raw(&raw, None, "https://data.example.org/files/x.zip").unwrap();
        let dists = &record.dataset.distributions;
        assert_eq!(dists.len(), 1);
        assert_eq!(dists[0].media_type, "application/zip");
        assert_eq!(dists[0].format, "ZIP");
    }

    #[test]
    fn test_convert_raw_matches_convert_html() {
        let html = r#"<h1>T</h1><a href="/a.csv">a</a>"#;
        let url = "https://data.example.org/t";
        let conversion = convert(html, url).unwrap();
        let doc = Document::parse(html).unwrap();
        let again = Converter::new().convert_raw(&conversion.raw, Some(&doc), url).unwrap();
        assert_eq!(again, conversion.record);
    }

    #[test]
    fn test_scrape_html_keeps_raw_with_record() {
        let html = r#"<h1>Rain</h1><a href="/rain.csv">rain</a>"#;
        let page = Converter::new().scrape_html(html, "https://data.example.org/rain").unwrap();
        assert_eq!(page.raw.title.as_deref(), Some("Rain"));
        assert_eq!(page.site, SiteVariant::Unknown);

        let conversion = page.into_conversion().unwrap();
        assert_eq!(conversion.record.dataset.title, "Rain");
    }

    #[test]
    fn test_failed_assembly_keeps_raw() {
        let url = "https://data.example.org/rain";
        let raw = RawScrapeResult {
            title: Some("Rain".into()),
            metadata: vec![MetadataMap::new(), MetadataMap::new()],
            url: url.into(),
            ..Default::default()
        };
        let page = ScrapedPage {
            raw: raw.clone(),
            site: SiteVariant::Unknown,
            record: Converter::new().convert_raw(&raw, None, url),
        };
        assert_eq!(page.raw, raw);
        assert!(matches!(page.into_conversion(), Err(DatacatError::Assembly(_))));
    }

    #[test]
    fn test_empty_storage_hosts_rejected() {
        let discovery = DiscoveryConfig { storage_hosts: Vec::new(), ..Default::default() };
        let converter = Converter::with_config(DatacatConfig::builder().discovery(discovery).build());
        let result = converter.convert_html(r#"<a href="/a.csv">a</a>"#, "https://x.org/p");
        assert!(matches!(result, Err(DatacatError::InvalidConfig(_))));
    }

    #[test]
    fn test_relative_links_need_a_url() {
        let conversion = convert(r#"<a href="/a.csv">a</a>"#, "not a url").unwrap();
        assert_eq!(conversion.record.dataset.distributions[0].access_url, "not a url");
        assert_eq!(conversion.record.dataset.publisher.name, "Unknown");
    }
}
