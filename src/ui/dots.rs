//! Text label followed by animated dots ("Loading...")

use glam::Vec2;

use crate::assets::BitmapFont;
use crate::assets::font::measure;
use crate::consts::{DOTS_PER_SECOND, MAX_DOTS};
use crate::stage::{Node, NodeId, Stage};

#[derive(Debug, Clone)]
pub struct DotsText {
    pub root: NodeId,
    label: NodeId,
    dots: NodeId,
    size: f32,
    font: Option<BitmapFont>,
    /// Fractional dot count, wraps to 0 once it reaches `MAX_DOTS`
    count: f32,
    shown: u32,
}

impl DotsText {
    /// Spawn under `parent`; the label is centred on the root, the dots trail it
    pub fn new(
        stage: &mut Stage,
        parent: NodeId,
        text: &str,
        size: f32,
        color: u32,
        font: Option<BitmapFont>,
    ) -> Self {
        let root = stage.spawn(parent, Node::container());
        let label = stage.spawn(root, Node::text("", size, color, 0.0));
        let dots = stage.spawn(
            root,
            Node::text("", size, color, 0.0).with_anchor(Vec2::new(0.0, 0.5)),
        );
        let mut this = Self {
            root,
            label,
            dots,
            size,
            font,
            count: 0.0,
            shown: 0,
        };
        this.set_text(stage, text);
        this
    }

    /// Replace the label and move the dots to its right edge
    pub fn set_text(&mut self, stage: &mut Stage, text: &str) {
        let width = measure(self.font.as_ref(), text, self.size);
        stage.set_text(self.label, text, width);
        stage.set_position(self.dots, Vec2::new(width / 2.0, 0.0));
    }

    pub fn tick(&mut self, stage: &mut Stage, delta: f32) {
        self.count += delta / 60.0 * DOTS_PER_SECOND;
        if self.count as u32 != self.shown {
            if self.count >= MAX_DOTS {
                self.count = 0.0;
            }
            let dots = ".".repeat(self.count as usize);
            let width = measure(self.font.as_ref(), &dots, self.size);
            stage.set_text(self.dots, &dots, width);
            self.shown = self.count as u32;
        }
    }

    /// Dots currently shown
    pub fn dots(&self) -> usize {
        self.shown as usize
    }

    pub fn label(&self) -> NodeId {
        self.label
    }

    pub fn dots_node(&self) -> NodeId {
        self.dots
    }
}
