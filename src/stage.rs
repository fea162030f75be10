//! Retained 2D scene graph
//!
//! A `Stage` is an arena of nodes. Scenes and entities do not own drawable
//! state themselves; they hold `NodeId` handles and go through the stage to
//! attach, detach, move and measure. Nodes are never freed while the stage
//! lives, so a handle stays valid for the lifetime of its scene.
//!
//! Coordinates are local to the parent, y grows downward, and the root sits
//! at the centre of the game area. There is no rotation or scale.

use glam::Vec2;

use crate::assets::SpriteClip;
use crate::sim::collision::Rect;

/// Handle to a node inside one `Stage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

/// What a node draws
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    /// Pure container
    None,
    /// Solid rectangle covering the node's size
    Rect { color: u32 },
    /// Animated sprite; `cursor` advances by `speed` frames per tick
    Sprite {
        clip: SpriteClip,
        speed: f32,
        cursor: f32,
        tint: u32,
    },
    /// Single line of bitmap text
    Text { text: String, size: f32, color: u32 },
}

impl Visual {
    /// Sprite visual starting on its first frame
    pub fn sprite(clip: SpriteClip, speed: f32, tint: u32) -> Self {
        Visual::Sprite {
            clip,
            speed,
            cursor: 0.0,
            tint,
        }
    }

    /// Name of the frame currently shown, if this is a sprite
    pub fn current_frame(&self) -> Option<&str> {
        match self {
            Visual::Sprite { clip, cursor, .. } => clip.frame_at(*cursor),
            _ => None,
        }
    }
}

/// A single scene graph node
#[derive(Debug, Clone)]
pub struct Node {
    /// Position relative to the parent
    pub position: Vec2,
    /// Bounding size in world units
    pub size: Vec2,
    /// Point of the bounding box that sits at `position` (0..1 per axis)
    pub anchor: Vec2,
    /// Draw order among siblings, higher draws later
    pub z_index: i32,
    pub visual: Visual,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Empty container at the parent's origin
    pub fn container() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            anchor: Vec2::ZERO,
            z_index: 0,
            visual: Visual::None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Filled rectangle anchored at its top-left corner
    pub fn rect(size: Vec2, color: u32) -> Self {
        Self {
            size,
            visual: Visual::Rect { color },
            ..Self::container()
        }
    }

    /// Sprite sized by its clip and anchored at its centre
    pub fn sprite(clip: SpriteClip, speed: f32, tint: u32) -> Self {
        Self {
            size: clip.size,
            anchor: Vec2::splat(0.5),
            visual: Visual::sprite(clip, speed, tint),
            ..Self::container()
        }
    }

    /// Text line anchored at its centre; `width` is the measured text width
    pub fn text(text: impl Into<String>, size: f32, color: u32, width: f32) -> Self {
        Self {
            size: Vec2::new(width, size),
            anchor: Vec2::splat(0.5),
            visual: Visual::Text {
                text: text.into(),
                size,
                color,
            },
            ..Self::container()
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_z(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// Arena-backed scene graph with a single root
#[derive(Debug, Clone)]
pub struct Stage {
    nodes: Vec<Node>,
    root: NodeId,
    viewport: Vec2,
    mask: Option<Rect>,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::container()],
            root: NodeId(0),
            viewport: Vec2::ZERO,
            mask: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever created (attached or not), root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Add a detached node
    pub fn create(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            ..node
        });
        id
    }

    /// Add a node and attach it to `parent`
    pub fn spawn(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.create(node);
        self.add_child(parent, id);
        id
    }

    /// Attach `child` as the last child of `parent`, detaching it from any previous parent
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            !self.is_ancestor(child, parent),
            "attaching a node below itself"
        );
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Detach `child` if it is a child of `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child)
    }

    /// Detach a node from its parent; returns false if it was already detached
    pub fn detach(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.node(child).parent else {
            return false;
        };
        self.node_mut(parent).children.retain(|&c| c != child);
        self.node_mut(child).parent = None;
        true
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// True if the node is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.is_ancestor(self.root, id)
    }

    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec2) {
        self.node_mut(id).position = position;
    }

    pub fn translate(&mut self, id: NodeId, delta: Vec2) {
        self.node_mut(id).position += delta;
    }

    /// Position in root space, summing the parent chain
    ///
    /// A detached node is measured as if its subtree were the root.
    pub fn world_position(&self, id: NodeId) -> Vec2 {
        let mut pos = self.node(id).position;
        let mut current = self.parent(id);
        while let Some(p) = current {
            pos += self.node(p).position;
            current = self.parent(p);
        }
        pos
    }

    /// Root-space bounding box from the node's current size and anchor
    pub fn bounds(&self, id: NodeId) -> Rect {
        let node = self.node(id);
        Rect::anchored(self.world_position(id), node.size, node.anchor)
    }

    /// Replace a node's visual; sprites also take their clip's frame size
    pub fn set_visual(&mut self, id: NodeId, visual: Visual) {
        let node = self.node_mut(id);
        if let Visual::Sprite { clip, .. } = &visual {
            node.size = clip.size;
        }
        node.visual = visual;
    }

    /// Update a text node in place; `width` is the new measured width
    pub fn set_text(&mut self, id: NodeId, value: &str, width: f32) {
        let node = self.node_mut(id);
        if let Visual::Text { text, .. } = &mut node.visual {
            text.clear();
            text.push_str(value);
            node.size.x = width;
        }
    }

    /// Advance the sprite animations of attached nodes by `delta` ticks
    pub fn animate(&mut self, delta: f32) {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id.0 as usize];
            if let Visual::Sprite { speed, cursor, .. } = &mut node.visual {
                *cursor += *speed * delta;
            }
            stack.extend_from_slice(&node.children);
        }
    }

    /// Attached nodes in paint order: depth-first, siblings by ascending z-index
    pub fn draw_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            let mut children = self.children(id).to_vec();
            // Stable sort keeps insertion order among equal z
            children.sort_by_key(|&c| self.node(c).z_index);
            stack.extend(children.into_iter().rev());
        }
        order
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, size: Vec2) {
        self.viewport = size;
    }

    /// Clip rectangle in root space
    pub fn mask(&self) -> Option<Rect> {
        self.mask
    }

    pub fn set_mask(&mut self, mask: Option<Rect>) {
        self.mask = mask;
    }
}
