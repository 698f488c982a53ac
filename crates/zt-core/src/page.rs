//! The seam between the engine and the hosting page
//!
//! `zt-wasm` implements `PageDom` over the real document; tests and the CLI
//! use the in-memory implementation from `outline`.

// =============================================================================
// Visibility
// =============================================================================

/// Target display state for a matched DOM subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn from_hidden(hidden: bool) -> Self {
        if hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }

    /// CSS `display` value written to matched elements.
    pub fn css_value(self) -> &'static str {
        match self {
            Visibility::Visible => "block",
            Visibility::Hidden => "none",
        }
    }
}

// =============================================================================
// PageDom
// =============================================================================

/// Operations the engine needs from the hosting page.
///
/// Every query degrades to a no-op when nothing matches; the hosted site
/// renders and removes the targeted subtrees continuously, so absence is the
/// common case, not an error.
pub trait PageDom {
    /// Set the display state of every element with the given tag name.
    fn set_display_by_tag(&mut self, tag: &str, visibility: Visibility);

    /// Set the display state of the single element with the given id.
    fn set_display_by_id(&mut self, id: &str, visibility: Visibility);

    /// Set the display state of every element carrying the given class.
    fn set_display_by_class(&mut self, class: &str, visibility: Visibility);

    /// Current location of the browsing context.
    fn location_href(&self) -> String;

    /// Navigate the browsing context. May unload the page.
    fn navigate(&mut self, url: &str);

    /// Surface a blocking informational notice to the user.
    fn warn(&mut self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_css_values() {
        assert_eq!(Visibility::Hidden.css_value(), "none");
        assert_eq!(Visibility::Visible.css_value(), "block");
        assert_eq!(Visibility::from_hidden(true), Visibility::Hidden);
        assert_eq!(Visibility::from_hidden(false), Visibility::Visible);
    }
}
