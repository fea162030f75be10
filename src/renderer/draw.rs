//! Flattening the stage into draw commands

use glam::Vec2;

use crate::config::GameConfig;
use crate::sim::collision::Rect;
use crate::stage::{Stage, Visual};

/// A single primitive in root space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        rect: Rect,
        color: u32,
    },
    Sprite {
        rect: Rect,
        frame: String,
        tint: u32,
    },
    Text {
        rect: Rect,
        text: String,
        size: f32,
        color: u32,
    },
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    /// Screen position of the stage root
    pub origin: Vec2,
    /// Clip rectangle in root space
    pub clip: Option<Rect>,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Attached nodes in paint order; empty or invisible nodes are skipped
    pub fn build(stage: &Stage, origin: Vec2) -> Self {
        let commands = stage
            .draw_order()
            .into_iter()
            .filter_map(|id| {
                let node = stage.node(id);
                let rect = stage.bounds(id);
                match &node.visual {
                    Visual::None => None,
                    Visual::Rect { color } => (rect.width > 0.0 && rect.height > 0.0)
                        .then_some(DrawCommand::Rect { rect, color: *color }),
                    Visual::Sprite { tint, .. } => {
                        node.visual.current_frame().map(|frame| DrawCommand::Sprite {
                            rect,
                            frame: frame.to_string(),
                            tint: *tint,
                        })
                    }
                    Visual::Text { text, size, color } => {
                        (!text.is_empty()).then(|| DrawCommand::Text {
                            rect,
                            text: text.clone(),
                            size: *size,
                            color: *color,
                        })
                    }
                }
            })
            .collect();

        Self {
            origin,
            clip: stage.mask(),
            commands,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Screen position of the stage root for the current viewport
///
/// Centred in the viewport when `center_on_resize` is set, otherwise pinned
/// so the game area's top-left corner sits at the screen origin.
pub fn stage_origin(config: &GameConfig, stage: &Stage) -> Vec2 {
    let viewport = stage.viewport();
    if config.view.center_on_resize && viewport != Vec2::ZERO {
        viewport / 2.0
    } else {
        Vec2::new(config.width, config.height) / 2.0
    }
}

/// `#rrggbb` for a packed 0xRRGGBB colour
pub fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0xff_ffff)
}
