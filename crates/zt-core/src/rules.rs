//! Selector table and visibility rules
//!
//! Four stateless rules, one per feature flag. Each takes the already-gated
//! hide decision and writes it to the matching DOM subtrees; each is
//! idempotent and tolerates zero matches. The selectors track the hosted
//! site's current markup and are the first thing to check when a rule stops
//! biting after a site redesign.

use crate::page::{PageDom, Visibility};

// =============================================================================
// Selectors
// =============================================================================

/// Tag of the shelf sections Shorts are rendered into.
pub const SHORTS_SHELF_TAG: &str = "ytd-rich-section-renderer";

/// Tag of the comment section under a video.
pub const COMMENTS_SECTION_TAG: &str = "ytd-comments";

/// Id of the secondary column holding the "up next" panel.
pub const RELATED_PANEL_ID: &str = "secondary";

/// Class on the individual "up next" result renderers.
pub const RELATED_RESULTS_CLASS: &str = "ytd-watch-next-secondary-results-renderer";

/// Substring identifying the subscriptions feed in the location href.
pub const SUBS_FEED_MARKER: &str = "feed/subscription";

/// Destination of the subscriptions-only redirect.
pub const SUBS_FEED_URL: &str = "https://www.youtube.com/feed/subscriptions";

/// One-shot notice shown before recommendations are first hidden.
pub const RECO_WARNING_TEXT: &str =
    "You are about to hide recommendations. You may switch to Theater Mode for a better experience.";

// =============================================================================
// Rules
// =============================================================================

/// Toggle every Shorts shelf on the page.
pub fn update_shorts(page: &mut dyn PageDom, should_hide: bool) {
    page.set_display_by_tag(SHORTS_SHELF_TAG, Visibility::from_hidden(should_hide));
}

/// Toggle every comment section on the page.
pub fn hide_comments(page: &mut dyn PageDom, should_hide: bool) {
    page.set_display_by_tag(COMMENTS_SECTION_TAG, Visibility::from_hidden(should_hide));
}

/// Toggle the "up next" panel and its result renderers.
pub fn hide_recommendations(page: &mut dyn PageDom, should_hide: bool) {
    let visibility = Visibility::from_hidden(should_hide);
    page.set_display_by_id(RELATED_PANEL_ID, visibility);
    page.set_display_by_class(RELATED_RESULTS_CLASS, visibility);
}

/// Redirect to the subscriptions feed unless already there.
///
/// One-way: turning the flag off issues no navigation back.
pub fn show_subscriptions_only(page: &mut dyn PageDom, subs_only: bool) {
    if subs_only && !page.location_href().contains(SUBS_FEED_MARKER) {
        page.navigate(SUBS_FEED_URL);
    }
}
