//! Source-site identification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// The catalog template a page comes from.
///
/// Chosen once per conversion; drives both the metadata extractor and the
/// assembler's field precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteVariant {
    /// AIKosh / IndiaAI dataset pages.
    Aikosh,
    /// Kaggle dataset pages.
    Kaggle,
    /// Anything else; only the generic scanners apply.
    Unknown,
}

impl SiteVariant {
    /// Detect the variant from the page URL.
    ///
    /// The raw URL text is checked first, then its parsed hostname.
    ///
    /// # Example
    ///
    /// ```rust
    /// use datacat_core::SiteVariant;
    ///
    /// assert_eq!(SiteVariant::detect("https://www.kaggle.com/datasets/a/b"), SiteVariant::Kaggle);
    /// assert_eq!(SiteVariant::detect("https://aikosh.indiaai.gov.in/home/datasets/x"), SiteVariant::Aikosh);
    /// assert_eq!(SiteVariant::detect("https://data.gov.uk/dataset/x"), SiteVariant::Unknown);
    /// ```
    pub fn detect(url: &str) -> Self {
        if let Some(variant) = Self::from_marker(&url.to_lowercase()) {
            return variant;
        }

        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase))
            .and_then(|host| Self::from_marker(&host))
            .unwrap_or(SiteVariant::Unknown)
    }

    /// An explicit hint wins; otherwise detect from the URL.
    pub fn resolve(hint: Option<SiteVariant>, url: &str) -> Self {
        hint.unwrap_or_else(|| Self::detect(url))
    }

    fn from_marker(text: &str) -> Option<Self> {
        if text.contains("aikosh") || text.contains("indiaai") {
            Some(SiteVariant::Aikosh)
        } else if text.contains("kaggle") {
            Some(SiteVariant::Kaggle)
        } else {
            None
        }
    }

    /// Page-level source tag recorded in the raw scrape.
    pub fn source_label(&self) -> Option<&'static str> {
        match self {
            SiteVariant::Aikosh => Some("IndiaAI"),
            SiteVariant::Kaggle => Some("Kaggle"),
            SiteVariant::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteVariant::Aikosh => "aikosh",
            SiteVariant::Kaggle => "kaggle",
            SiteVariant::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SiteVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aikosh" | "indiaai" => Ok(SiteVariant::Aikosh),
            "kaggle" => Ok(SiteVariant::Kaggle),
            "unknown" | "generic" => Ok(SiteVariant::Unknown),
            _ => Err(format!("Invalid site: {}. Valid options: aikosh, kaggle, unknown", s)),
        }
    }
}
