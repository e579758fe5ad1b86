//! Keyword derivation from title, summary and selected metadata fields.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::metadata::MetadataMap;

/// Maximum number of keywords emitted.
pub const MAX_KEYWORDS: usize = 25;

/// Metadata fields whose values also feed the keyword list.
pub const KEYWORD_FIELDS: [&str; 3] = ["Sector", "Geographical coverage", "Dataset type"];

const STOPWORDS: &[&str] = &[
    "of", "the", "and", "in", "on", "for", "a", "an", "with", "by", "to", "from", "dataset", "data", "2009",
];

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+").unwrap());

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

fn keep_token(token: &str) -> bool {
    if STOPWORDS.contains(&token) || token.chars().count() <= 2 {
        return false;
    }
    let numeric = token.chars().all(|c| c.is_ascii_digit());
    !numeric || token.len() == 4
}

/// Build an ordered, deduplicated keyword list.
///
/// Tokens come from the title, then the summary, then the values of
/// [`KEYWORD_FIELDS`] in the first metadata mapping. Stopwords, tokens of two
/// characters or fewer, and numbers other than four-digit years are dropped.
///
/// # Example
///
/// ```rust
/// use datacat_core::extract_keywords;
///
/// let keywords = extract_keywords(Some("Crime Data of the City"), None, &[]);
/// assert_eq!(keywords, vec!["crime".to_string(), "city".to_string()]);
/// ```
pub fn extract_keywords(title: Option<&str>, summary: Option<&str>, metadata: &[MetadataMap]) -> Vec<String> {
    let mut tokens = Vec::new();

    if let Some(title) = title {
        tokens.extend(tokenize(title));
    }
    if let Some(summary) = summary {
        tokens.extend(tokenize(summary));
    }
    if let Some(first) = metadata.first() {
        for field in KEYWORD_FIELDS {
            if let Some(value) = first.get(field) {
                tokens.extend(tokenize(value));
            }
        }
    }

    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|token| keep_token(token))
        .filter(|token| seen.insert(token.clone()))
        .map(|token| token.replace('_', " ").trim().to_string())
        .take(MAX_KEYWORDS)
        .collect()
}
