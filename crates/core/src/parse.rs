//! HTML parsing and DOM traversal.
//!
//! This module provides the [`Document`] and [`Element`] types the scanners
//! query: CSS selection, class-pattern matching, document-order traversal and
//! text-node access.
//!
//! # Example
//!
//! ```rust
//! use datacat_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <a class="download" href="/files/data.csv">Data</a>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let links = doc.select("a.download").unwrap();
//! assert_eq!(links[0].attr("href"), Some("/files/data.csv"));
//! ```

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::{DatacatError, Result};

/// Represents a parsed HTML document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use datacat_core::parse::Document;
    ///
    /// let doc = Document::parse("<html><body><h1>Title</h1></body></html>").unwrap();
    /// assert_eq!(doc.select("h1").unwrap().len(), 1);
    /// ```
    pub fn parse(html: &str) -> Result<Self> {
        Ok(Self { html: Html::parse_document(html) })
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`DatacatError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use datacat_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| DatacatError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Every element in document order.
    pub fn elements(&'_ self) -> impl Iterator<Item = Element<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Elements whose `class` attribute matches `pattern`, optionally limited to `tags`.
    ///
    /// An empty `tags` slice matches any tag.
    pub fn elements_with_class(&'_ self, pattern: &Regex, tags: &[&str]) -> Vec<Element<'_>> {
        self.elements()
            .filter(|el| tags.is_empty() || tags.contains(&el.tag_name().as_str()))
            .filter(|el| el.class_matches(pattern))
            .collect()
    }

    /// All text nodes in document order, each paired with its parent element.
    pub fn text_nodes(&'_ self) -> Vec<(&'_ str, Element<'_>)> {
        self.html
            .root_element()
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let parent = node.parent().and_then(ElementRef::wrap)?;
                Some((&**text, Element { element: parent }))
            })
            .collect()
    }

    /// First element after `after` in document order whose tag is one of `tags`.
    ///
    /// Descendants of `after` count as following it.
    pub fn find_next(&'_ self, after: &Element<'_>, tags: &[&str]) -> Option<Element<'_>> {
        let target = after.element.id();
        self.html
            .root_element()
            .descendants()
            .skip_while(|node| node.id() != target)
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| tags.contains(&el.value().name()))
            .map(|element| Element { element })
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use datacat_core::parse::Document;
///
/// let html = r#"<a href="https://example.com"> Link <b>text</b> </a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.stripped_text(), "Linktext");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the raw text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Text pieces trimmed, empties dropped, concatenated with no separator.
    pub fn stripped_text(&self) -> String {
        self.joined_text("")
    }

    /// Text pieces trimmed, empties dropped, joined with `separator`.
    pub fn joined_text(&self, separator: &str) -> String {
        self.element
            .text()
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Whether the `class` attribute is present and matches `pattern`.
    pub fn class_matches(&self, pattern: &Regex) -> bool {
        self.attr("class").is_some_and(|class| pattern.is_match(class))
    }

    /// The next sibling that is an element, skipping text and comments.
    pub fn next_sibling_element(&self) -> Option<Element<'a>> {
        self.element
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`DatacatError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel =
            Selector::parse(selector).map_err(|e| DatacatError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// First descendant matching `selector`, if any.
    pub fn select_first(&self, selector: &str) -> Option<Element<'a>> {
        self.select(selector).ok()?.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page</title>
        </head>
        <body>
            <h1>Heading</h1>
            <p>Summary line</p>
            <div class="resource-list">
                <a href="/data.csv">  Data   <span>file</span> </a>
            </div>
            <h3>About Dataset</h3>
            <div><p>About paragraph</p></div>
        </body>
        </html>
    "#;

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let result = doc.select("[[invalid");
        assert!(matches!(result, Err(DatacatError::HtmlParseError(_))));
    }

    #[test]
    fn test_stripped_and_joined_text() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let link = &doc.select("a").unwrap()[0];
        assert_eq!(link.stripped_text(), "Datafile");
        assert_eq!(link.joined_text(" "), "Data file");
    }

    #[test]
    fn test_elements_with_class() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let pattern = Regex::new("(?i)resource").unwrap();
        assert_eq!(doc.elements_with_class(&pattern, &["div"]).len(), 1);
        assert!(doc.elements_with_class(&pattern, &["section"]).is_empty());
    }

    #[test]
    fn test_find_next_in_document_order() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let header = &doc.select("h3").unwrap()[0];
        let next = doc.find_next(header, &["p"]).unwrap();
        assert_eq!(next.stripped_text(), "About paragraph");
    }

    #[test]
    fn test_next_sibling_element() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let h1 = &doc.select("h1").unwrap()[0];
        let sibling = h1.next_sibling_element().unwrap();
        assert_eq!(sibling.tag_name(), "p");
    }

    #[test]
    fn test_text_nodes_have_parents() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let nodes = doc.text_nodes();
        let (_, parent) = nodes.iter().find(|(text, _)| text.contains("Summary")).unwrap();
        assert_eq!(parent.tag_name(), "p");
    }
}
