//! In-memory page model and the page outline format
//!
//! A `MemoryPage` stands in for the hosted document in tests and in the
//! CLI's replay tooling. Pages are described in a small line-based outline
//! format, one element per line:
//!
//! ```text
//! ! watch page, two shorts shelves
//! ytd-rich-section-renderer .style-scope
//! div #secondary
//! ytd-comments
//! ```
//!
//! The first token is the tag name, `#`-prefixed tokens set the id,
//! `.`-prefixed tokens add classes. Blank lines and `!` comment lines are
//! skipped.

use crate::page::{PageDom, Visibility};

/// Error type for outline parsing.
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    #[error("line {0}: element tag must come before selectors")]
    MissingTag(usize),
    #[error("line {line}: empty {what} selector")]
    EmptySelector { line: usize, what: &'static str },
}

/// One element of the modeled page.
#[derive(Debug, Clone)]
pub struct OutlineElement {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub display: Visibility,
}

/// An in-memory `PageDom` that records navigations and warnings.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    elements: Vec<OutlineElement>,
    href: String,
    navigations: Vec<String>,
    warnings: Vec<String>,
}

impl MemoryPage {
    /// Parse an outline. Every element starts visible.
    pub fn parse(text: &str) -> Result<Self, OutlineError> {
        let mut elements = Vec::new();

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('!') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let tag = match tokens.next() {
                Some(tag) if !tag.starts_with('#') && !tag.starts_with('.') => tag,
                _ => return Err(OutlineError::MissingTag(line_no)),
            };

            let mut id = None;
            let mut classes = Vec::new();
            for token in tokens {
                if let Some(name) = token.strip_prefix('#') {
                    if name.is_empty() {
                        return Err(OutlineError::EmptySelector { line: line_no, what: "id" });
                    }
                    id = Some(name.to_string());
                } else if let Some(name) = token.strip_prefix('.') {
                    if name.is_empty() {
                        return Err(OutlineError::EmptySelector { line: line_no, what: "class" });
                    }
                    classes.push(name.to_string());
                } else {
                    return Err(OutlineError::MissingTag(line_no));
                }
            }

            elements.push(OutlineElement {
                tag: tag.to_string(),
                id,
                classes,
                display: Visibility::Visible,
            });
        }

        Ok(Self {
            elements,
            href: String::new(),
            navigations: Vec::new(),
            warnings: Vec::new(),
        })
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = href.to_string();
        self
    }

    pub fn elements(&self) -> &[OutlineElement] {
        &self.elements
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn hidden_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.display == Visibility::Hidden)
            .count()
    }

    /// Display state of every element, in document order.
    pub fn snapshot(&self) -> Vec<Visibility> {
        self.elements.iter().map(|e| e.display).collect()
    }

    pub fn display_by_tag(&self, tag: &str) -> Vec<Visibility> {
        self.elements
            .iter()
            .filter(|e| e.tag.eq_ignore_ascii_case(tag))
            .map(|e| e.display)
            .collect()
    }

    pub fn display_by_id(&self, id: &str) -> Option<Visibility> {
        self.elements
            .iter()
            .find(|e| e.id.as_deref() == Some(id))
            .map(|e| e.display)
    }

    pub fn display_by_class(&self, class: &str) -> Vec<Visibility> {
        self.elements
            .iter()
            .filter(|e| e.classes.iter().any(|c| c == class))
            .map(|e| e.display)
            .collect()
    }
}

impl PageDom for MemoryPage {
    fn set_display_by_tag(&mut self, tag: &str, visibility: Visibility) {
        for element in self.elements.iter_mut().filter(|e| e.tag.eq_ignore_ascii_case(tag)) {
            element.display = visibility;
        }
    }

    fn set_display_by_id(&mut self, id: &str, visibility: Visibility) {
        // Ids are unique in a well-formed document; stop at the first hit
        // like the DOM lookup does.
        if let Some(element) = self.elements.iter_mut().find(|e| e.id.as_deref() == Some(id)) {
            element.display = visibility;
        }
    }

    fn set_display_by_class(&mut self, class: &str, visibility: Visibility) {
        for element in self
            .elements
            .iter_mut()
            .filter(|e| e.classes.iter().any(|c| c == class))
        {
            element.display = visibility;
        }
    }

    fn location_href(&self) -> String {
        self.href.clone()
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
        // Model the unload: later reads see the destination.
        self.href = url.to_string();
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_outline() {
        let page = MemoryPage::parse(
            "! comment line\n\
             \n\
             ytd-comments #comments .style-scope .ytd-watch-flexy\n\
             div #secondary\n",
        )
        .expect("outline should parse");

        assert_eq!(page.elements().len(), 2);
        let comments = &page.elements()[0];
        assert_eq!(comments.tag, "ytd-comments");
        assert_eq!(comments.id.as_deref(), Some("comments"));
        assert_eq!(comments.classes, ["style-scope", "ytd-watch-flexy"]);
    }

    #[test]
    fn test_parse_rejects_leading_selector() {
        let err = MemoryPage::parse(".orphan-class").unwrap_err();
        assert!(matches!(err, OutlineError::MissingTag(1)));
    }

    #[test]
    fn test_parse_rejects_empty_selector() {
        let err = MemoryPage::parse("div #").unwrap_err();
        assert!(matches!(err, OutlineError::EmptySelector { line: 1, what: "id" }));
    }

    #[test]
    fn test_tag_match_is_case_insensitive() {
        let mut page = MemoryPage::parse("YTD-COMMENTS").expect("outline should parse");
        page.set_display_by_tag("ytd-comments", Visibility::Hidden);
        assert_eq!(page.hidden_count(), 1);
    }

    #[test]
    fn test_navigate_updates_href() {
        let mut page = MemoryPage::default().with_href("https://www.youtube.com/");
        page.navigate("https://www.youtube.com/feed/subscriptions");
        assert_eq!(page.location_href(), "https://www.youtube.com/feed/subscriptions");
        assert_eq!(page.navigations().len(), 1);
    }
}
