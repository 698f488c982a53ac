//! Settings profile files
//!
//! A profile is the JSON image of the extension's storage area: the five
//! boolean keys the popup writes. The `Profile` type doubles as the source
//! of the TypeScript declaration the popup compiles against.

use std::fs;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use zt_core::settings::{SettingKey, Settings};

/// The storage schema shared with the popup. Serialized field names are the
/// storage keys.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct Profile {
    pub hide_shorts: bool,
    pub hide_recommended: bool,
    pub subs_only: bool,
    pub turn_off_comments: bool,
    pub focus_mode: bool,
}

impl Profile {
    pub fn into_settings(self) -> Settings {
        Settings {
            hide_shorts: self.hide_shorts,
            hide_recommended: self.hide_recommended,
            subs_only: self.subs_only,
            turn_off_comments: self.turn_off_comments,
            focus_mode: self.focus_mode,
        }
    }
}

/// Load a profile for replay. Missing keys default to `false`, matching the
/// storage bridge; anything else malformed is an error.
pub fn load_settings(path: &str) -> Result<Settings, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    let profile: Profile =
        serde_json::from_str(&text).map_err(|e| format!("Invalid profile '{}': {}", path, e))?;
    Ok(profile.into_settings())
}

/// What `check` reports about a profile file.
pub struct ProfileReport {
    pub settings: Settings,
    pub unknown_keys: Vec<String>,
    pub non_boolean_keys: Vec<String>,
}

/// Lenient inspection: unknown keys and non-boolean values are warnings,
/// coerced the way the content script's storage bridge would coerce them.
pub fn inspect_profile(text: &str) -> Result<ProfileReport, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| format!("Not valid JSON: {}", e))?;
    let object = value
        .as_object()
        .ok_or_else(|| "Profile must be a JSON object".to_string())?;

    let mut unknown_keys = Vec::new();
    let mut non_boolean_keys = Vec::new();
    let mut settings = Settings::default();

    for (key, entry) in object {
        let setting = match SettingKey::parse(key) {
            Some(setting) => setting,
            None => {
                unknown_keys.push(key.clone());
                continue;
            }
        };
        let coerced = match entry {
            serde_json::Value::Bool(flag) => *flag,
            other => {
                non_boolean_keys.push(key.clone());
                is_truthy(other)
            }
        };
        settings.set(setting, coerced);
    }

    Ok(ProfileReport {
        settings,
        unknown_keys,
        non_boolean_keys,
    })
}

// JS truthiness, since that is what the store would hand the content script.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_profile() {
        let profile: Profile = serde_json::from_str(
            r#"{"hideShorts":true,"hideRecommended":false,"subsOnly":true,"turnOffComments":false,"focusMode":true}"#,
        )
        .expect("profile should parse");
        let settings = profile.into_settings();

        assert!(settings.hide_shorts);
        assert!(settings.subs_only);
        assert!(settings.focus_mode);
        assert!(!settings.hide_recommended);
        assert!(!settings.turn_off_comments);
    }

    #[test]
    fn missing_keys_default_to_false() {
        let profile: Profile =
            serde_json::from_str(r#"{"focusMode":true}"#).expect("profile should parse");
        let settings = profile.into_settings();

        assert!(settings.focus_mode);
        assert!(!settings.hide_shorts);
        assert!(!settings.subs_only);
    }

    #[test]
    fn inspect_reports_unknown_keys() {
        let report = inspect_profile(r#"{"focusMode":true,"autoplay":false}"#)
            .expect("inspection should succeed");
        assert_eq!(report.unknown_keys, ["autoplay"]);
        assert!(report.settings.focus_mode);
    }

    #[test]
    fn inspect_coerces_non_boolean_values() {
        let report = inspect_profile(r#"{"hideShorts":1,"subsOnly":""}"#)
            .expect("inspection should succeed");
        assert_eq!(report.non_boolean_keys, ["hideShorts", "subsOnly"]);
        assert!(report.settings.hide_shorts);
        assert!(!report.settings.subs_only);
    }

    #[test]
    fn inspect_rejects_non_object() {
        assert!(inspect_profile("[]").is_err());
        assert!(inspect_profile("not json").is_err());
    }
}
