//! The apply pass
//!
//! `Engine` owns the settings mirror and the one-shot warning latch for one
//! content-script injection. Every trigger — the startup bulk read, a
//! storage change notification, a coalesced mutation burst — funnels into
//! `apply`, which re-asserts the page state the current settings dictate.
//! The pass is idempotent given constant input: the hosted site re-inserts
//! previously hidden subtrees at will, and re-applying must always be safe.

use log::debug;

use crate::page::PageDom;
use crate::rules;
use crate::settings::{SettingKey, Settings};

/// Settings cache plus per-injection side-effect state.
pub struct Engine {
    settings: Settings,
    warned_recommendations: bool,
}

impl Engine {
    /// Create an engine with all-false defaults. Nothing is hidden until the
    /// first storage read lands.
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            warned_recommendations: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Absorb the startup bulk read. Absent keys arrive coerced to `false`
    /// by the storage bridge; keys the bridge could not recognize were
    /// dropped before this point.
    pub fn load_snapshot(&mut self, values: impl IntoIterator<Item = (SettingKey, bool)>) {
        for (key, value) in values {
            self.settings.set(key, value);
        }
        debug!("settings loaded: {:?}", self.settings);
    }

    /// Overwrite a single flag from a change notification.
    pub fn update(&mut self, key: SettingKey, value: bool) {
        debug!("setting changed: {} = {}", key.as_str(), value);
        self.settings.set(key, value);
    }

    /// Re-assert the page state for the current settings.
    ///
    /// Fixed order: shorts, comments, recommendations (with the one-shot
    /// warning), then the subscriptions redirect. The redirect is the only
    /// step the focus-mode master switch does not gate, and the only one
    /// that may unload the page.
    pub fn apply(&mut self, page: &mut dyn PageDom) {
        let active = self.settings.focus_mode;

        rules::update_shorts(page, active && self.settings.hide_shorts);
        rules::hide_comments(page, active && self.settings.turn_off_comments);

        let hide_recommended = active && self.settings.hide_recommended;
        if hide_recommended && !self.warned_recommendations {
            page.warn(rules::RECO_WARNING_TEXT);
            self.warned_recommendations = true;
        }
        rules::hide_recommendations(page, hide_recommended);

        rules::show_subscriptions_only(page, self.settings.subs_only);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::MemoryPage;
    use crate::page::Visibility;
    use crate::rules::{
        COMMENTS_SECTION_TAG, RELATED_PANEL_ID, SHORTS_SHELF_TAG, SUBS_FEED_URL,
    };

    fn watch_page() -> MemoryPage {
        MemoryPage::parse(
            "ytd-rich-section-renderer\n\
             ytd-comments\n\
             div #secondary\n\
             div .ytd-watch-next-secondary-results-renderer\n",
        )
        .expect("outline should parse")
        .with_href("https://www.youtube.com/watch?v=abc123")
    }

    fn engine_with(pairs: &[(SettingKey, bool)]) -> Engine {
        let mut engine = Engine::new();
        engine.load_snapshot(pairs.iter().copied());
        engine
    }

    #[test]
    fn test_focus_mode_off_hides_nothing() {
        let mut engine = engine_with(&[
            (SettingKey::HideShorts, true),
            (SettingKey::TurnOffComments, true),
            (SettingKey::HideRecommended, true),
        ]);
        let mut page = watch_page();
        engine.apply(&mut page);

        assert_eq!(page.hidden_count(), 0);
        assert!(page.warnings().is_empty());
    }

    #[test]
    fn test_focus_mode_gates_each_feature() {
        let mut engine = engine_with(&[
            (SettingKey::FocusMode, true),
            (SettingKey::HideShorts, true),
        ]);
        let mut page = watch_page();
        engine.apply(&mut page);

        assert_eq!(page.display_by_tag(SHORTS_SHELF_TAG), vec![Visibility::Hidden]);
        assert_eq!(page.display_by_tag(COMMENTS_SECTION_TAG), vec![Visibility::Visible]);
        assert_eq!(page.display_by_id(RELATED_PANEL_ID), Some(Visibility::Visible));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut engine = engine_with(&[
            (SettingKey::FocusMode, true),
            (SettingKey::HideShorts, true),
            (SettingKey::TurnOffComments, true),
        ]);
        let mut page = watch_page();
        engine.apply(&mut page);
        let after_first = page.snapshot();

        engine.apply(&mut page);
        assert_eq!(page.snapshot(), after_first);
    }

    #[test]
    fn test_recommendation_warning_fires_once() {
        let mut engine = engine_with(&[
            (SettingKey::FocusMode, true),
            (SettingKey::HideRecommended, true),
        ]);
        let mut page = watch_page();
        for _ in 0..5 {
            engine.apply(&mut page);
        }
        assert_eq!(page.warnings().len(), 1);
        assert_eq!(page.display_by_id(RELATED_PANEL_ID), Some(Visibility::Hidden));
    }

    #[test]
    fn test_no_warning_while_focus_mode_off() {
        let mut engine = engine_with(&[(SettingKey::HideRecommended, true)]);
        let mut page = watch_page();
        engine.apply(&mut page);
        assert!(page.warnings().is_empty());

        // The latch was not consumed, so enabling focus mode still warns.
        engine.update(SettingKey::FocusMode, true);
        engine.apply(&mut page);
        assert_eq!(page.warnings().len(), 1);
    }

    #[test]
    fn test_subscriptions_redirect_ignores_focus_mode() {
        let mut engine = engine_with(&[(SettingKey::SubsOnly, true)]);
        let mut page = watch_page();
        engine.apply(&mut page);
        assert_eq!(page.navigations(), [SUBS_FEED_URL]);
    }

    #[test]
    fn test_redirect_issued_once_per_pass() {
        let mut engine = engine_with(&[(SettingKey::SubsOnly, true)]);
        let mut page = watch_page();
        engine.apply(&mut page);
        // The navigation moved the page onto the feed; a later pass on the
        // new document must not redirect again.
        engine.apply(&mut page);
        assert_eq!(page.navigations().len(), 1);
    }

    #[test]
    fn test_update_changes_one_flag() {
        let mut engine = engine_with(&[(SettingKey::FocusMode, true)]);
        let mut page = watch_page();
        engine.apply(&mut page);
        assert_eq!(page.hidden_count(), 0);

        engine.update(SettingKey::HideShorts, true);
        engine.apply(&mut page);
        assert_eq!(page.display_by_tag(SHORTS_SHELF_TAG), vec![Visibility::Hidden]);
        assert_eq!(page.display_by_tag(COMMENTS_SECTION_TAG), vec![Visibility::Visible]);
        assert!(page.navigations().is_empty());
    }

    #[test]
    fn test_disabling_flag_restores_visibility() {
        let mut engine = engine_with(&[
            (SettingKey::FocusMode, true),
            (SettingKey::HideShorts, true),
        ]);
        let mut page = watch_page();
        engine.apply(&mut page);
        assert_eq!(page.display_by_tag(SHORTS_SHELF_TAG), vec![Visibility::Hidden]);

        engine.update(SettingKey::HideShorts, false);
        engine.apply(&mut page);
        assert_eq!(page.display_by_tag(SHORTS_SHELF_TAG), vec![Visibility::Visible]);
    }
}
