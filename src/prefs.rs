use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MIN_MOUSE_SENSITIVITY: u8 = 1;
pub const MAX_MOUSE_SENSITIVITY: u8 = 9;

/// User preferences, loaded at activation and saved on scene change and on
/// the panel-toggle action. Out-of-range values in the file are clamped, not
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "Preferences::default_mouse_sensitivity")]
    pub mouse_sensitivity: u8,
    #[serde(default)]
    pub zoom_requires_modifier: bool,
    #[serde(default = "Preferences::default_limit_rotation")]
    pub limit_x_rotation: bool,
    #[serde(default = "Preferences::default_limit_rotation")]
    pub limit_y_rotation: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            mouse_sensitivity: Self::default_mouse_sensitivity(),
            zoom_requires_modifier: false,
            limit_x_rotation: Self::default_limit_rotation(),
            limit_y_rotation: Self::default_limit_rotation(),
        }
    }
}

impl Preferences {
    const fn default_mouse_sensitivity() -> u8 {
        3
    }

    const fn default_limit_rotation() -> bool {
        true
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read preferences file {}", path.display()))?;
        let prefs: Preferences = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse preferences file {}", path.display()))?;
        Ok(prefs.clamped())
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(prefs) => prefs,
            Err(err) => {
                eprintln!("[prefs] Load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write preferences file {}", path.display()))?;
        Ok(())
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: u8) {
        self.mouse_sensitivity = sensitivity.clamp(MIN_MOUSE_SENSITIVITY, MAX_MOUSE_SENSITIVITY);
    }

    fn clamped(mut self) -> Self {
        self.set_mouse_sensitivity(self.mouse_sensitivity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensitivity_is_clamped_on_set_and_on_load() {
        let mut prefs = Preferences::default();
        prefs.set_mouse_sensitivity(0);
        assert_eq!(prefs.mouse_sensitivity, MIN_MOUSE_SENSITIVITY);
        prefs.set_mouse_sensitivity(40);
        assert_eq!(prefs.mouse_sensitivity, MAX_MOUSE_SENSITIVITY);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"mouse_sensitivity": 99}"#).expect("write");
        let loaded = Preferences::load(&path).expect("load");
        assert_eq!(loaded.mouse_sensitivity, MAX_MOUSE_SENSITIVITY);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        let mut prefs = Preferences::default();
        prefs.zoom_requires_modifier = true;
        prefs.limit_y_rotation = false;
        prefs.set_mouse_sensitivity(7);
        prefs.save(&path).expect("save");
        assert_eq!(Preferences::load(&path).expect("load"), prefs);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.json");
        assert_eq!(Preferences::load_or_default(&missing), Preferences::default());

        let garbled = dir.path().join("garbled.json");
        fs::write(&garbled, "{not json").expect("write");
        assert_eq!(Preferences::load_or_default(&garbled), Preferences::default());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"zoom_requires_modifier": true}"#).expect("write");
        let loaded = Preferences::load(&path).expect("load");
        assert!(loaded.zoom_requires_modifier);
        assert_eq!(loaded.mouse_sensitivity, 3);
        assert!(loaded.limit_x_rotation);
        assert!(loaded.limit_y_rotation);
    }
}
