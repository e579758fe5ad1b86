use serde::Serialize;
use serde_json::Value;

use crate::Result;
use crate::dcat::DcatDocument;
use crate::formatters::turtle::to_triple_text;

/// Response envelope carrying both renderings.
#[derive(Debug, Clone, Serialize)]
pub struct BothOutput {
    /// The JSON-LD record
    pub dcat_jsonld: Value,
    /// The Turtle rendering
    pub dcat_ttl: String,
    /// Wall-clock time spent producing the record
    pub elapsed_seconds: f64,
}

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Pretty print JSON output
    pub pretty: bool,
}

/// Seconds rounded to two decimals, as reported in the envelope.
fn round_seconds(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    Ok(json)
}

/// Convert a DCAT document to JSON-LD text
pub fn convert_to_json(doc: &DcatDocument, config: &JsonConfig) -> Result<String> {
    write_json(doc, config.pretty)
}

/// Build the envelope holding JSON-LD and Turtle together
pub fn both_output(doc: &DcatDocument, elapsed_seconds: f64) -> Result<BothOutput> {
    let dcat_jsonld = doc.to_value()?;
    let dcat_ttl = to_triple_text(&dcat_jsonld);
    Ok(BothOutput { dcat_jsonld, dcat_ttl, elapsed_seconds: round_seconds(elapsed_seconds) })
}

/// JSON formatter with configurable options
pub struct JsonFormatter {
    config: JsonConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, doc: &DcatDocument) -> Result<String> {
        convert_to_json(doc, &self.config)
    }

    pub fn both(&self, doc: &DcatDocument, elapsed_seconds: f64) -> Result<String> {
        write_json(&both_output(doc, elapsed_seconds)?, self.config.pretty)
    }
}
