//! Sprite sheet atlas
//!
//! Parses the JSON sheet format exported by TexturePacker for pixi:
//! a `frames` map keyed by frame file name and an optional `animations` map
//! of frame name lists. Only geometry is read; pixel data stays with the
//! renderer.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasFrame {
    pub frame: FrameRect,
    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub trimmed: bool,
    /// Untrimmed size; the logical size of the frame when present
    #[serde(default)]
    pub source_size: Option<FrameSize>,
}

impl AtlasFrame {
    pub fn size(&self) -> Vec2 {
        match self.source_size {
            Some(s) => Vec2::new(s.w, s.h),
            None => Vec2::new(self.frame.w, self.frame.h),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasMeta {
    #[serde(default)]
    pub image: String,
}

/// Frames and animations of one sprite sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteAtlas {
    #[serde(skip)]
    pub id: String,
    pub frames: BTreeMap<String, AtlasFrame>,
    #[serde(default)]
    pub animations: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub meta: AtlasMeta,
}

/// Ordered frame names plus the bounding size used for collisions
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteClip {
    pub frames: Vec<String>,
    pub size: Vec2,
}

impl SpriteClip {
    pub fn new(frames: Vec<String>, size: Vec2) -> Self {
        Self { frames, size }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame shown at a (fractional) cursor position, looping
    pub fn frame_at(&self, cursor: f32) -> Option<&str> {
        if self.frames.is_empty() {
            return None;
        }
        let index = cursor.max(0.0) as usize % self.frames.len();
        Some(&self.frames[index])
    }
}

impl SpriteAtlas {
    pub fn from_json(id: &str, json: &str) -> Result<Self, AssetError> {
        let mut atlas: SpriteAtlas =
            serde_json::from_str(json).map_err(|e| AssetError::Parse {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        atlas.id = id.to_string();

        // Every animation must reference frames that exist
        for (name, frames) in &atlas.animations {
            if let Some(missing) = frames.iter().find(|f| !atlas.frames.contains_key(*f)) {
                return Err(AssetError::Parse {
                    id: id.to_string(),
                    reason: format!("animation `{name}` references unknown frame `{missing}`"),
                });
            }
        }

        Ok(atlas)
    }

    pub fn frame_size(&self, frame: &str) -> Option<Vec2> {
        self.frames.get(frame).map(AtlasFrame::size)
    }

    /// Clip for an animation, or a single-frame clip for a frame name
    ///
    /// The clip size is the largest frame in the animation.
    pub fn clip(&self, name: &str) -> Result<SpriteClip, AssetError> {
        let frames = match self.animations.get(name) {
            Some(frames) if !frames.is_empty() => frames.clone(),
            _ if self.frames.contains_key(name) => vec![name.to_string()],
            _ => {
                return Err(AssetError::MissingFrame {
                    atlas: self.id.clone(),
                    frame: name.to_string(),
                });
            }
        };

        let size = frames
            .iter()
            .filter_map(|f| self.frame_size(f))
            .fold(Vec2::ZERO, Vec2::max);

        Ok(SpriteClip::new(frames, size))
    }
}
