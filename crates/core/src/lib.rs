pub mod classify;
pub mod convert;
pub mod dates;
pub mod dcat;
pub mod distribution;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod formatters;
pub mod keywords;
pub mod metadata;
pub mod parse;
pub mod scrape;
pub mod site;

pub use classify::classify_format;
#[cfg(feature = "fetch")]
pub use convert::fetch_and_convert;
pub use convert::{
    Conversion, Converter, DatacatConfig, DatacatConfigBuilder, ScrapedPage, convert, convert_with_hint,
};
pub use dates::{extract_year, normalize_date};
pub use dcat::{CanonicalDataset, DcatDocument, Publisher, assemble};
pub use distribution::{DiscoveryConfig, Distribution, ScriptMiner, discover_distributions};
pub use error::{DatacatError, Result};
pub use extractors::Extractor;
pub use fetch::FetchConfig;
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use fetch::{fetch_file, fetch_stdin};
pub use formatters::{BothOutput, JsonConfig, JsonFormatter, ReturnFormat, both_output, convert_to_json, to_triple_text};
pub use keywords::extract_keywords;
pub use metadata::MetadataMap;
pub use parse::Document;
pub use scrape::{RawScrapeResult, scrape_page};
pub use site::SiteVariant;
