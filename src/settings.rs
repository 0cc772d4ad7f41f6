//! Player settings and preferences
//!
//! Persisted separately from tuning and high scores as a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Aiming ===
    /// Show the dotted trajectory preview on the opening shots
    pub show_preview: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (static platforms)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_preview: true,

            master_volume: 1.0,
            sfx_volume: 0.8,
            music_volume: 0.5,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Fold preferences that change gameplay into the tuning
    pub fn apply_to_tuning(&self, tuning: &mut Tuning) {
        if !self.show_preview {
            tuning.preview_shot_count = 0;
        }
        if self.reduced_motion {
            tuning.bob_amplitude = 0.0;
        }
    }

    /// Load settings from a JSON file
    pub fn try_load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::info!("Using default settings ({})", err);
                Self::default()
            }
        }
    }

    /// Save settings as JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_off_disables_opening_preview() {
        let settings = Settings {
            show_preview: false,
            ..Default::default()
        };
        let mut tuning = Tuning::default();
        settings.apply_to_tuning(&mut tuning);
        assert_eq!(tuning.preview_shot_count, 0);
    }

    #[test]
    fn test_reduced_motion_stops_bob() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let mut tuning = Tuning {
            bob_amplitude: 20.0,
            ..Default::default()
        };
        settings.apply_to_tuning(&mut tuning);
        assert_eq!(tuning.bob_amplitude, 0.0);
    }

    #[test]
    fn test_save_load_file() {
        let path = std::env::temp_dir().join(format!("monkey-drop-settings-{}.json", std::process::id()));
        let settings = Settings {
            music_volume: 0.25,
            show_preview: false,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }
}
