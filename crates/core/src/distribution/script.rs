//! Heuristic URL mining over inline script text.
//!
//! Everything here is a pure text pass: a script body goes in, candidate
//! absolute URLs come out. The patterns are compiled from a
//! [`DiscoveryConfig`] so the extension lists, window size and key names can
//! change without touching the scanners that call this.

use regex::Regex;

use super::DiscoveryConfig;
use crate::Result;

static ABSOLUTE_URL: &str = r#"https?://[^\s'"<>]+"#;

fn alternation(items: &[String]) -> String {
    items.iter().map(|item| regex::escape(item)).collect::<Vec<_>>().join("|")
}

/// Compiled script-mining heuristics.
#[derive(Debug, Clone)]
pub struct ScriptMiner {
    extension_hit: Regex,
    absolute_url: Regex,
    download_url: Regex,
    download_suffix: Regex,
    keyed_values: Vec<Regex>,
    window: usize,
}

impl ScriptMiner {
    /// Compile the heuristics.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DatacatError::InvalidConfig`] when `config` fails
    /// [`DiscoveryConfig::validate`].
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        config.validate()?;
        let generic = alternation(&config.extensions);
        let kaggle = alternation(&config.kaggle_extensions);

        let keyed_values = config
            .script_keys
            .iter()
            .map(|key| Regex::new(&format!(r#"(?i)"{}"\s*:\s*"([^"]+)""#, regex::escape(key))).unwrap())
            .collect();

        Ok(Self {
            extension_hit: Regex::new(&format!(r"(?i)\.({})(?:$|\?|#)", generic)).unwrap(),
            absolute_url: Regex::new(ABSOLUTE_URL).unwrap(),
            download_url: Regex::new(&format!(r#"(?i){}\.({})(?:\?[^'"\s<>]*)?"#, ABSOLUTE_URL, kaggle)).unwrap(),
            download_suffix: Regex::new(&format!(r"(?i)\.({})(?:\?|$)", kaggle)).unwrap(),
            keyed_values,
            window: config.script_window,
        })
    }

    /// For each extension hit, the first absolute URL within the surrounding window.
    ///
    /// # Example
    ///
    /// ```rust
    /// use datacat_core::{DiscoveryConfig, ScriptMiner};
    ///
    /// let miner = ScriptMiner::new(&DiscoveryConfig::default()).unwrap();
    /// let js = "var f = 'https://cdn.x.org/files/data.csv?dl=1';";
    /// assert_eq!(miner.windowed_urls(js), vec!["https://cdn.x.org/files/data.csv?dl=1".to_string()]);
    /// ```
    pub fn windowed_urls(&self, text: &str) -> Vec<String> {
        self.extension_hit
            .find_iter(text)
            .filter_map(|hit| {
                let snippet = window(text, hit.start(), hit.end(), self.window);
                self.absolute_url.find(snippet).map(|m| m.as_str().to_string())
            })
            .collect()
    }

    /// Absolute URLs ending in a downloadable extension, optional query included.
    pub fn download_urls(&self, text: &str) -> Vec<String> {
        self.download_url
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Quoted values of the configured keys that are absolute download URLs.
    pub fn keyed_urls(&self, text: &str) -> Vec<String> {
        self.keyed_values
            .iter()
            .flat_map(|re| re.captures_iter(text))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .filter(|candidate| candidate.starts_with("http") && self.has_download_suffix(candidate))
            .map(str::to_string)
            .collect()
    }

    /// Whether `url` ends, before any query, in a downloadable extension.
    pub fn has_download_suffix(&self, url: &str) -> bool {
        self.download_suffix.is_match(url)
    }

    /// The allow-listed extension in `url`, lowercased.
    pub fn allowed_extension(&self, url: &str) -> Option<String> {
        self.extension_hit
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
    }
}

/// The slice of `text` spanning `radius` characters either side of `start..end`.
fn window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let lo = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let hi = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| end + i);
    &text[lo..hi]
}
