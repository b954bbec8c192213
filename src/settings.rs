//! Game settings and preferences
//!
//! Persisted separately from the record table, as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_PANEL_PADDING, DEFAULT_TILE_MARGIN, SWAP_DURATION_MS};
use crate::layout::GridLayout;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    // === Layout ===
    /// Spacing between adjacent tiles, in pixels
    pub tile_margin: u32,
    /// Padding between the panel edge and the outer tiles, in pixels
    pub panel_padding: u32,

    // === Gameplay ===
    /// Whether levels run against the countdown. A game created with the
    /// timer disabled never ticks and cannot game-over.
    pub timer_enabled: bool,

    // === Presentation ===
    /// Swap animation duration handed to the animation sink, milliseconds
    pub swap_duration_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_margin: DEFAULT_TILE_MARGIN,
            panel_padding: DEFAULT_PANEL_PADDING,
            timer_enabled: true,
            swap_duration_ms: SWAP_DURATION_MS,
        }
    }
}

impl Settings {
    /// Grid geometry for the current preferences
    pub fn layout_for(&self, panel: u32, grid_size: u32) -> GridLayout {
        GridLayout::new(panel, self.panel_padding, self.tile_margin, grid_size)
    }

    /// Load settings from `path`, falling back to defaults on a missing
    /// or unreadable file.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("settings file {} is corrupt: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to `path`. Failures are logged, not fatal.
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(err) = std::fs::write(path, json) {
                    log::warn!("could not save settings to {}: {err}", path.display());
                } else {
                    log::info!("settings saved");
                }
            }
            Err(err) => log::warn!("could not serialize settings: {err}"),
        }
    }
}
