//! Minimal Turtle rendering of a DCAT document.
//!
//! Hand-written rather than going through an RDF library: the output is one
//! anonymous subject with a fixed statement order, so a string builder is all
//! it takes.

use serde_json::Value;
use url::Url;

/// Returned when the input has no `dcat:Dataset` key.
pub const NO_DATA: &str = "# No DCAT data available";

const PREFIXES: &[(&str, &str)] = &[
    ("dcat", "https://www.w3.org/ns/dcat#"),
    ("dct", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
];

/// Render a JSON-LD DCAT document as Turtle.
///
/// Statements follow a fixed order: title, description, publisher, issued,
/// modified, license, keywords, then one blank node per distribution.
///
/// # Example
///
/// ```rust
/// use datacat_core::to_triple_text;
/// use serde_json::json;
///
/// let doc = json!({"dcat:Dataset": {"dct:title": "The \"Best\" Data"}});
/// let ttl = to_triple_text(&doc);
/// assert!(ttl.contains(r#"dct:title "The \"Best\" Data" ."#));
///
/// assert_eq!(to_triple_text(&json!({})), "# No DCAT data available");
/// ```
pub fn to_triple_text(doc: &Value) -> String {
    let Some(dataset) = doc.get("dcat:Dataset") else {
        return NO_DATA.to_string();
    };

    let mut out = String::new();
    for (prefix, iri) in PREFIXES {
        out.push_str(&format!("@prefix {}: <{}> .\n", prefix, iri));
    }
    out.push('\n');

    let mut statements = vec!["a dcat:Dataset".to_string()];

    if let Some(title) = text(dataset, "dct:title") {
        statements.push(format!("dct:title {}", literal(title)));
    }
    if let Some(description) = text(dataset, "dct:description") {
        statements.push(format!("dct:description {}", literal(&description.replace(['\r', '\n'], " "))));
    }
    if let Some(name) = dataset.get("dct:publisher").and_then(|p| text(p, "foaf:name")) {
        statements.push(format!("dct:publisher [ foaf:name {} ]", literal(name)));
    }
    for key in ["dct:issued", "dct:modified"] {
        if let Some(date) = text(dataset, key) {
            statements.push(format!("{} {}", key, literal(date)));
        }
    }
    if let Some(license) = text(dataset, "dct:license") {
        statements.push(format!("dct:license {}", resource(license)));
    }
    for keyword in array(dataset, "dcat:keyword").iter().filter_map(Value::as_str) {
        statements.push(format!("dcat:keyword {}", literal(keyword)));
    }
    for distribution in array(dataset, "dcat:distribution") {
        statements.push(distribution_block(distribution));
    }

    out.push_str("_:dataset\n    ");
    out.push_str(&statements.join(" ;\n    "));
    out.push_str(" .\n");
    out
}

fn distribution_block(distribution: &Value) -> String {
    let mut inner = vec!["a dcat:Distribution".to_string()];
    if let Some(title) = text(distribution, "dct:title") {
        inner.push(format!("dct:title {}", literal(title)));
    }
    if let Some(access) = text(distribution, "dcat:accessURL") {
        inner.push(format!("dcat:accessURL {}", iri(access)));
    }
    if let Some(media) = text(distribution, "dcat:mediaType") {
        inner.push(format!("dcat:mediaType {}", literal(media)));
    }
    if let Some(format) = text(distribution, "dct:format") {
        inner.push(format!("dct:format {}", literal(format)));
    }
    format!("dcat:distribution [\n        {}\n    ]", inner.join(" ;\n        "))
}

/// Non-empty string value under `key`.
fn text<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

/// Quoted string literal with Turtle escapes.
pub fn literal(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('"');
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

/// IRI reference, percent-encoding characters Turtle forbids inside `<>`.
pub fn iri(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('<');
    for c in s.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => out.push_str(&format!("%{:02X}", c as u32)),
            c if c.is_whitespace() || c.is_control() => {
                let mut buf = [0; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", byte));
                }
            }
            c => out.push(c),
        }
    }
    out.push('>');
    out
}

/// IRI when the value is an absolute URL, otherwise a literal.
fn resource(s: &str) -> String {
    if Url::parse(s).is_ok_and(|u| !u.cannot_be_a_base()) { iri(s) } else { literal(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "@context": "https://www.w3.org/ns/dcat.jsonld",
            "dcat:Dataset": {
                "dct:title": "Rainfall \"daily\"",
                "dct:description": "Line one\nLine two",
                "dct:publisher": {"foaf:name": "IMD"},
                "dct:issued": "2020-01-01",
                "dct:license": "https://creativecommons.org/licenses/by/4.0/",
                "dcat:keyword": ["rainfall", "daily"],
                "dcat:distribution": [
                    {"dcat:accessURL": "https://x.org/r.csv", "dcat:mediaType": "text/csv", "dct:format": "CSV", "dct:title": "CSV file"}
                ]
            }
        })
    }

    #[test]
    fn test_full_document() {
        let ttl = to_triple_text(&sample());
        let expected = r#"@prefix dcat: <https://www.w3.org/ns/dcat#> .
@prefix dct: <http://purl.org/dc/terms/> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .

_:dataset
    a dcat:Dataset ;
    dct:title "Rainfall \"daily\"" ;
    dct:description "Line one Line two" ;
    dct:publisher [ foaf:name "IMD" ] ;
    dct:issued "2020-01-01" ;
    dct:license <https://creativecommons.org/licenses/by/4.0/> ;
    dcat:keyword "rainfall" ;
    dcat:keyword "daily" ;
    dcat:distribution [
        a dcat:Distribution ;
        dct:title "CSV file" ;
        dcat:accessURL <https://x.org/r.csv> ;
        dcat:mediaType "text/csv" ;
        dct:format "CSV"
    ] .
"#;
        assert_eq!(ttl, expected);
    }

    #[rstest]
    #[case(r#"She said "hi""#, r#""She said \"hi\"""#)]
    #[case(r"C:\data", r#""C:\\data""#)]
    #[case("one\ntwo", r#""one\ntwo""#)]
    #[case("tab\there\r", r#""tab\there\r""#)]
    #[case("plain", r#""plain""#)]
    fn test_literal_escapes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(literal(input), expected);
    }

    #[test]
    fn test_license_name_is_literal() {
        let doc = json!({"dcat:Dataset": {"dct:license": "Open Government License, India (https://www.data.gov.in/Godl)"}});
        let ttl = to_triple_text(&doc);
        assert!(ttl.contains(r#"dct:license "Open Government License, India (https://www.data.gov.in/Godl)""#));
    }

    #[test]
    fn test_iri_escapes_forbidden_characters() {
        assert_eq!(iri("https://x.org/a b>c"), "<https://x.org/a%20b%3Ec>");
    }

    #[test]
    fn test_missing_dataset() {
        assert_eq!(to_triple_text(&json!({"@context": "x"})), NO_DATA);
    }

    #[test]
    fn test_empty_fields_skipped() {
        let ttl = to_triple_text(&json!({"dcat:Dataset": {"dct:title": "T", "dct:description": ""}}));
        assert!(!ttl.contains("dct:description"));
        assert!(ttl.ends_with("dct:title \"T\" .\n"));
    }
}
