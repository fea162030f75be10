//! Game configuration
//!
//! Static layout and palette. Every field has a default, so a partial JSON
//! override is enough to tweak a single value.

use serde::{Deserialize, Serialize};

/// View (canvas) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Colour drawn behind the game area
    pub background_color: u32,
    /// Keep the game area centred in the viewport after a resize
    pub center_on_resize: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            background_color: 0x000000,
            center_on_resize: true,
        }
    }
}

/// Palette shared by all scenes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub primary_background: u32,
    pub secondary_background: u32,
    pub primary_text: u32,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            primary_background: 0x1e4c61,
            secondary_background: 0x307090,
            primary_text: 0xb4d4e8,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub view: ViewConfig,
    /// Game area width in world units
    pub width: f32,
    /// Game area height in world units
    pub height: f32,
    /// Height of the band between header and footer where the action happens
    pub playfield_height: f32,
    pub colors: Colors,
    /// Base url (or directory) manifest paths are relative to
    pub asset_root: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            width: 336.0,
            height: 478.0,
            playfield_height: 300.0,
            colors: Colors::default(),
            asset_root: "assets".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Height of the header band, equal to the footer band
    pub fn band_height(&self) -> f32 {
        (self.height - self.playfield_height) / 2.0
    }

    /// Top edge of the game area (the stage origin is the game area centre)
    pub fn top(&self) -> f32 {
        -self.height / 2.0
    }

    /// Left edge of the game area
    pub fn left(&self) -> f32 {
        -self.width / 2.0
    }
}
