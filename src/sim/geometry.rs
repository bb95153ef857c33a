//! Axis-aligned boxes for collision
//!
//! World space has y pointing up; a box is anchored at its bottom-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::spans_overlap;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Bottom-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Top edge y
    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Right edge x
    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    /// Strict overlap; boxes that only share an edge don't overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        spans_overlap(self.min.x, self.size.x, other.min.x, other.size.x)
            && spans_overlap(self.min.y, self.size.y, other.min.y, other.size.y)
    }

    /// True once the box has scrolled entirely past the left screen edge
    #[inline]
    pub fn is_behind_left_edge(&self) -> bool {
        self.right() < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::new(20.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::new(0.0, 11.0, 10.0, 10.0)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Aabb::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_edges() {
        let a = Aabb::new(-30.0, 100.0, 20.0, 40.0);
        assert_eq!(a.top(), 140.0);
        assert_eq!(a.right(), -10.0);
        assert!(a.is_behind_left_edge());
        assert!(!Aabb::new(-20.0, 0.0, 20.0, 1.0).is_behind_left_edge());
    }
}
