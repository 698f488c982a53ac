//! Preference record and storage-key dispatch
//!
//! Five boolean flags shared with the popup through the extension's
//! key-value storage area. The content script only ever reads them; the
//! popup owns the writes.

// =============================================================================
// Setting Keys
// =============================================================================

/// One of the five persisted preference flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Suppress Shorts shelves in feeds
    HideShorts,
    /// Suppress the "up next" recommendation panel
    HideRecommended,
    /// Force navigation to the subscriptions feed
    SubsOnly,
    /// Suppress comment sections
    TurnOffComments,
    /// Master switch gating the hide flags
    FocusMode,
}

impl SettingKey {
    /// Every key, in the order used for the startup bulk read.
    pub const ALL: [SettingKey; 5] = [
        SettingKey::HideShorts,
        SettingKey::SubsOnly,
        SettingKey::TurnOffComments,
        SettingKey::HideRecommended,
        SettingKey::FocusMode,
    ];

    /// The storage key this flag is persisted under.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::HideShorts => "hideShorts",
            SettingKey::HideRecommended => "hideRecommended",
            SettingKey::SubsOnly => "subsOnly",
            SettingKey::TurnOffComments => "turnOffComments",
            SettingKey::FocusMode => "focusMode",
        }
    }

    /// Parse a storage key. Unknown keys are not an error: change
    /// notifications may carry keys this engine does not own.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "hideShorts" => Some(SettingKey::HideShorts),
            "hideRecommended" => Some(SettingKey::HideRecommended),
            "subsOnly" => Some(SettingKey::SubsOnly),
            "turnOffComments" => Some(SettingKey::TurnOffComments),
            "focusMode" => Some(SettingKey::FocusMode),
            _ => None,
        }
    }
}

// =============================================================================
// Settings Record
// =============================================================================

/// The in-memory mirror of the persisted flags.
///
/// All fields default to `false` until the first bulk read completes, so a
/// freshly injected script leaves the page untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub hide_shorts: bool,
    pub hide_recommended: bool,
    pub subs_only: bool,
    pub turn_off_comments: bool,
    pub focus_mode: bool,
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::HideShorts => self.hide_shorts,
            SettingKey::HideRecommended => self.hide_recommended,
            SettingKey::SubsOnly => self.subs_only,
            SettingKey::TurnOffComments => self.turn_off_comments,
            SettingKey::FocusMode => self.focus_mode,
        }
    }

    pub fn set(&mut self, key: SettingKey, value: bool) {
        match key {
            SettingKey::HideShorts => self.hide_shorts = value,
            SettingKey::HideRecommended => self.hide_recommended = value,
            SettingKey::SubsOnly => self.subs_only = value,
            SettingKey::TurnOffComments => self.turn_off_comments = value,
            SettingKey::FocusMode => self.focus_mode = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_false() {
        let settings = Settings::default();
        for key in SettingKey::ALL {
            assert!(!settings.get(key));
        }
    }

    #[test]
    fn test_set_is_per_field() {
        let mut settings = Settings::default();
        settings.set(SettingKey::HideShorts, true);
        assert!(settings.hide_shorts);
        for key in SettingKey::ALL {
            if key != SettingKey::HideShorts {
                assert!(!settings.get(key));
            }
        }
    }

    #[test]
    fn test_key_roundtrip() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(SettingKey::parse("autoplay"), None);
        assert_eq!(SettingKey::parse(""), None);
        // Storage keys are case-sensitive
        assert_eq!(SettingKey::parse("hideshorts"), None);
    }
}
