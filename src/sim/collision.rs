//! Axis-aligned bounding box collision
//!
//! A level holds at most a few dozen entities, so collision is a plain
//! pairwise scan over projectile x enemy and enemy x player. No spatial
//! partitioning.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in stage space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` placed so that `anchor` (0..1 on each axis) sits at `pos`
    pub fn anchored(pos: Vec2, size: Vec2, anchor: Vec2) -> Self {
        let origin = pos - size * anchor;
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap test; rectangles sharing only an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        aabb_overlap(self, other)
    }
}

/// Strict-inequality AABB overlap
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlapping_rects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(aabb_overlap(&a, &b));
        assert!(aabb_overlap(&b, &a));
    }

    #[test]
    fn test_edge_contact_is_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        let corner = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(!aabb_overlap(&a, &right));
        assert!(!aabb_overlap(&a, &below));
        assert!(!aabb_overlap(&a, &corner));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Rect::new(-20.0, -20.0, 40.0, 40.0);
        let inner = Rect::new(-1.0, -3.0, 2.0, 6.0);
        assert!(aabb_overlap(&outer, &inner));
        assert!(aabb_overlap(&inner, &outer));
    }

    #[test]
    fn test_anchored_rect() {
        let rect = Rect::anchored(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0), Vec2::splat(0.5));
        assert_eq!(rect, Rect::new(8.0, 17.0, 4.0, 6.0));
        assert_eq!(rect.center(), Vec2::new(10.0, 20.0));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0, aw in 0.5f32..50.0, ah in 0.5f32..50.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0, bw in 0.5f32..50.0, bh in 0.5f32..50.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(aabb_overlap(&a, &b), aabb_overlap(&b, &a));
        }

        #[test]
        fn prop_rect_overlaps_itself(
            x in -100.0f32..100.0, y in -100.0f32..100.0, w in 0.5f32..50.0, h in 0.5f32..50.0,
        ) {
            let r = Rect::new(x, y, w, h);
            prop_assert!(aabb_overlap(&r, &r));
        }

        #[test]
        fn prop_horizontal_neighbour_never_overlaps(
            x in -100.0f32..100.0, y in -100.0f32..100.0, w in 1.0f32..50.0, h in 1.0f32..50.0,
            gap in 0.0f32..20.0,
        ) {
            let a = Rect::new(x, y, w, h);
            let b = Rect::new(a.right() + gap, y, w, h);
            prop_assert!(!aabb_overlap(&a, &b));
        }
    }
}
