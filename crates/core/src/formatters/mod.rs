pub mod json;
pub mod turtle;

use std::fmt;
use std::str::FromStr;

pub use json::{BothOutput, JsonConfig, JsonFormatter, both_output, convert_to_json};
pub use turtle::to_triple_text;

/// Requested output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnFormat {
    /// The JSON-LD record.
    #[default]
    JsonLd,
    /// Turtle text.
    Turtle,
    /// Both renderings in one JSON envelope.
    Both,
}

impl ReturnFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnFormat::JsonLd => "jsonld",
            ReturnFormat::Turtle => "ttl",
            ReturnFormat::Both => "both",
        }
    }
}

impl fmt::Display for ReturnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jsonld" | "json-ld" | "json" => Ok(ReturnFormat::JsonLd),
            "ttl" | "turtle" => Ok(ReturnFormat::Turtle),
            "both" => Ok(ReturnFormat::Both),
            _ => Err(format!("Invalid format: {}. Valid options: jsonld, ttl, both", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_return_format() {
        assert_eq!("JSONLD".parse::<ReturnFormat>(), Ok(ReturnFormat::JsonLd));
        assert_eq!("json".parse::<ReturnFormat>(), Ok(ReturnFormat::JsonLd));
        assert_eq!("turtle".parse::<ReturnFormat>(), Ok(ReturnFormat::Turtle));
        assert_eq!(" both ".parse::<ReturnFormat>(), Ok(ReturnFormat::Both));
        assert!("xml".parse::<ReturnFormat>().is_err());
        assert_eq!(ReturnFormat::default(), ReturnFormat::JsonLd);
    }
}
