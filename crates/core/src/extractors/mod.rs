//! Site-specific metadata extraction.
//!
//! An [`Extractor`] is chosen once per page from the [`SiteVariant`] and runs
//! its passes in a fixed priority order into a single [`MetadataMap`]. Because
//! the map keeps the first non-empty value per key, an earlier pass always
//! beats a later one.
//!
//! # Example
//!
//! ```rust
//! use datacat_core::{Document, SiteVariant};
//! use datacat_core::extractors::Extractor;
//!
//! let html = r#"
//!     <div class="dataset-metadata">
//!         <div class="text-xs"><label>Sector</label><p>Agriculture</p></div>
//!     </div>
//!     <a href="https://creativecommons.org/licenses/by/4.0/">CC BY 4.0</a>
//! "#;
//! let doc = Document::parse(html).unwrap();
//! let metadata = Extractor::for_site(SiteVariant::Aikosh).discover_metadata(&doc);
//!
//! assert_eq!(metadata.get("Sector"), Some("Agriculture"));
//! assert_eq!(metadata.get("License"), Some("CC BY 4.0"));
//! ```

pub mod aikosh;
pub mod kaggle;
pub mod license;

pub use license::{LICENSE_KEY, license_in_linked_data};

use crate::metadata::MetadataMap;
use crate::parse::Document;
use crate::site::SiteVariant;

/// Metadata extraction strategy for one site template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    Aikosh,
    Kaggle,
    Generic,
}

impl Extractor {
    pub fn for_site(site: SiteVariant) -> Self {
        match site {
            SiteVariant::Aikosh => Extractor::Aikosh,
            SiteVariant::Kaggle => Extractor::Kaggle,
            SiteVariant::Unknown => Extractor::Generic,
        }
    }

    /// Every key/value pair this strategy can find, license included.
    pub fn discover_metadata(&self, doc: &Document) -> MetadataMap {
        let mut metadata = MetadataMap::new();
        match self {
            Extractor::Aikosh => aikosh::scan_metadata_panel(doc, &mut metadata),
            Extractor::Kaggle => {
                kaggle::scan_bold_labels(doc, &mut metadata);
                kaggle::scan_rows(doc, &mut metadata);
            }
            Extractor::Generic => {}
        }
        self.scan_license(doc, &mut metadata);

        tracing::debug!(extractor = ?self, keys = metadata.len(), "metadata extracted");
        metadata
    }

    /// The license alone, from the license passes of this strategy.
    pub fn discover_license(&self, doc: &Document) -> Option<String> {
        let mut metadata = MetadataMap::new();
        self.scan_license(doc, &mut metadata);
        metadata.get(LICENSE_KEY).map(str::to_string)
    }

    fn scan_license(&self, doc: &Document, metadata: &mut MetadataMap) {
        license::scan_linked_data(doc, metadata);
        if *self == Extractor::Kaggle {
            license::scan_kaggle_anchors(doc, metadata);
            license::scan_text(doc, metadata);
        } else {
            license::scan_anchors(doc, metadata);
        }
    }
}

impl From<SiteVariant> for Extractor {
    fn from(site: SiteVariant) -> Self {
        Self::for_site(site)
    }
}
