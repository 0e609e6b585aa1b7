//! Axis-aligned bounding boxes.

use crate::math::{Real, Vec2};

/// An axis-aligned bounding box in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub lower: Vec2,
    pub upper: Vec2,
}

impl Aabb {
    #[inline]
    pub fn new(lower: Vec2, upper: Vec2) -> Self {
        debug_assert!(lower.x <= upper.x && lower.y <= upper.y);
        Self { lower, upper }
    }

    /// This AABB grown uniformly by `margin` on every side. Used by the
    /// broad phase to cut down pair-list churn for slow-moving bodies;
    /// defaults to zero margin, which makes the test exact.
    #[inline]
    pub fn expanded(self, margin: Real) -> Aabb {
        let m = Vec2::new(margin, margin);
        Aabb::new(self.lower - m, self.upper + m)
    }

    #[inline]
    pub fn overlaps(self, other: Aabb) -> bool {
        self.lower.x <= other.upper.x
            && self.upper.x >= other.lower.x
            && self.lower.y <= other.upper.y
            && self.upper.y >= other.lower.y
    }

    #[inline]
    pub fn merged(self, other: Aabb) -> Aabb {
        Aabb::new(self.lower.min(other.lower), self.upper.max(other.upper))
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        (self.lower + self.upper) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_boxes_do_not_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = Aabb::new(Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0));
        assert!(!a.overlaps(b));
    }

    #[test]
    fn touching_boxes_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        assert!(a.overlaps(b));
    }
}
