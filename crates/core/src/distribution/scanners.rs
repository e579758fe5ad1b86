//! Page scanners feeding a [`DistributionSet`].
//!
//! Each scanner walks one kind of reference (anchors, download attributes,
//! inline scripts, site-specific containers) and inserts what it finds. The
//! set handles dedup, so scanners are free to overlap.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::{DiscoveryConfig, Distribution, DistributionSet, ScriptMiner, resolve_url};
use crate::classify::{media_type_for_extension, media_type_for_url};
use crate::Result;
use crate::parse::{Document, Element};

static AIKOSH_CONTAINER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(resource|download|files|dataset)").unwrap());

static AIKOSH_LINK_HOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)dataset-metadata|download|resource").unwrap());

static KAGGLE_CONTAINER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(file|resource|download|data-file|dataset-file|files)").unwrap());

const AIKOSH_LINK_ATTRIBUTES: &[&str] = &["href", "data-download", "data-url", "data-href"];

/// Runs the scanners for one page.
pub struct Scanner<'a> {
    base: Option<&'a Url>,
    config: &'a DiscoveryConfig,
    miner: ScriptMiner,
    storage_host: Regex,
}

impl<'a> Scanner<'a> {
    pub fn new(base: Option<&'a Url>, config: &'a DiscoveryConfig) -> Result<Self> {
        let miner = ScriptMiner::new(config)?;
        let hosts = config
            .storage_hosts
            .iter()
            .map(|host| regex::escape(host))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            base,
            config,
            miner,
            storage_host: Regex::new(&format!("(?i)({})", hosts)).unwrap(),
        })
    }

    /// Allow-listed anchors, download attributes and windowed script URLs.
    pub fn scan_generic(&self, doc: &Document, set: &mut DistributionSet) {
        let before = set.len();

        for anchor in anchors(doc) {
            let Some(full) = anchor.attr("href").and_then(|href| resolve_url(self.base, href)) else {
                continue;
            };
            if let Some(dist) = self.allow_listed(&full) {
                set.insert(dist.with_title(&anchor.stripped_text()));
            }
        }

        for element in doc.elements() {
            for attribute in &self.config.download_attributes {
                if let Some(full) = element.attr(attribute).and_then(|href| resolve_url(self.base, href))
                    && let Some(dist) = self.allow_listed(&full)
                {
                    set.insert(dist);
                }
            }
        }

        for script in scripts(doc) {
            for url in self.miner.windowed_urls(&script.text()) {
                set.insert(Distribution::from_url(&url));
            }
        }

        tracing::debug!(found = set.len() - before, "generic scan");
    }

    /// Links inside resource-like containers and link-bearing attributes on download widgets.
    pub fn scan_aikosh(&self, doc: &Document, set: &mut DistributionSet) {
        let before = set.len();

        for container in doc.elements_with_class(&AIKOSH_CONTAINER, &["section", "div"]) {
            self.insert_titled_links(&container, set);
        }

        for element in doc.elements_with_class(&AIKOSH_LINK_HOLDER, &[]) {
            for attribute in AIKOSH_LINK_ATTRIBUTES {
                if let Some(full) = element.attr(attribute).and_then(|href| resolve_url(self.base, href)) {
                    set.insert(Distribution::from_url(&full));
                }
            }
        }

        tracing::debug!(found = set.len() - before, "aikosh scan");
    }

    /// Links inside file containers plus whatever the storage explorer turns up.
    pub fn scan_kaggle(&self, doc: &Document, set: &mut DistributionSet) {
        let before = set.len();

        for container in doc.elements_with_class(&KAGGLE_CONTAINER, &[]) {
            self.insert_titled_links(&container, set);
        }

        for url in self.explore_storage(doc) {
            set.insert(Distribution::from_url(&url));
        }

        tracing::debug!(found = set.len() - before, "kaggle scan");
    }

    /// Download URLs hidden in scripts or pointing at cloud object storage.
    fn explore_storage(&self, doc: &Document) -> BTreeSet<String> {
        let mut urls = BTreeSet::new();

        for script in scripts(doc) {
            let text = script.text();
            urls.extend(self.miner.download_urls(&text));
            urls.extend(self.miner.keyed_urls(&text));
        }

        for anchor in anchors(doc) {
            if let Some(full) = anchor.attr("href").and_then(|href| resolve_url(self.base, href))
                && self.storage_host.is_match(&full)
                && self.miner.has_download_suffix(&full)
            {
                urls.insert(full);
            }
        }

        urls
    }

    fn insert_titled_links(&self, container: &Element<'_>, set: &mut DistributionSet) {
        for anchor in container.select("a[href]").unwrap_or_default() {
            if let Some(full) = anchor.attr("href").and_then(|href| resolve_url(self.base, href)) {
                set.insert(Distribution::from_url(&full).with_title(&anchor.stripped_text()));
            }
        }
    }

    /// Distribution for a URL carrying an allow-listed extension.
    fn allow_listed(&self, url: &str) -> Option<Distribution> {
        let ext = self.miner.allowed_extension(url)?;
        let media_type = media_type_for_extension(&ext).unwrap_or_else(|| media_type_for_url(url));
        Some(Distribution::new(url, media_type, ext.to_uppercase()))
    }
}

fn anchors(doc: &Document) -> Vec<Element<'_>> {
    doc.select("a[href]").unwrap_or_default()
}

fn scripts(doc: &Document) -> Vec<Element<'_>> {
    doc.select("script").unwrap_or_default()
}
