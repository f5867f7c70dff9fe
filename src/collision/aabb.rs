// Axis-aligned bounding boxes in screen space (y grows downward).

use serde::{Deserialize, Serialize};

use crate::math::vec2::Vec2;

/// An Axis-Aligned Bounding Box defined by its minimum (left, top) and maximum
/// (right, bottom) corner points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Creates a new Aabb, reordering the corners so `min <= max` on both axes.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb {
            min: Vec2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Vec2::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    /// Creates an Aabb from the `(left, top, width, height)` form game entities carry.
    pub fn from_rect(left: f64, top: f64, width: f64, height: f64) -> Self {
        Aabb::new(Vec2::new(left, top), Vec2::new(left + width, top + height))
    }

    /// Creates an Aabb that encompasses a set of points.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min_pt = *first;
        let mut max_pt = *first;
        for point in rest {
            min_pt.x = min_pt.x.min(point.x);
            min_pt.y = min_pt.y.min(point.y);
            max_pt.x = max_pt.x.max(point.x);
            max_pt.y = max_pt.y.max(point.y);
        }
        Some(Aabb { min: min_pt, max: max_pt })
    }

    pub fn left(&self) -> f64 {
        self.min.x
    }

    pub fn top(&self) -> f64 {
        self.min.y
    }

    pub fn right(&self) -> f64 {
        self.max.x
    }

    pub fn bottom(&self) -> f64 {
        self.max.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        self.min.midpoint(self.max)
    }

    /// Half of the smaller dimension. Used as a uniform "radius" for every shape
    /// when estimating penetration depth.
    pub fn half_min_extent(&self) -> f64 {
        self.width().min(self.height()) * 0.5
    }

    /// Half of the larger dimension.
    pub fn half_max_extent(&self) -> f64 {
        self.width().max(self.height()) * 0.5
    }

    /// Checks if this Aabb overlaps another with positive area.
    /// Boxes that only share an edge or a corner do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let x_overlap = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let y_overlap = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        x_overlap > 0.0 && y_overlap > 0.0
    }

    /// Inclusive point containment (points on the border count as inside).
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Returns a copy grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Aabb {
        Aabb::new(
            Vec2::new(self.min.x - margin, self.min.y - margin),
            Vec2::new(self.max.x + margin, self.max.y + margin),
        )
    }

    /// Returns a copy moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Aabb {
        Aabb { min: self.min + offset, max: self.max + offset }
    }

    /// Merges another Aabb into this one, expanding this Aabb to contain both.
    pub fn merge(&mut self, other: &Aabb) {
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
    }

    /// The four corners, clockwise from top-left.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Finite with `min <= max` on both axes. Zero-size boxes are allowed.
    pub fn is_well_formed(&self) -> bool {
        self.is_finite() && self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// The point inside the box nearest to `point`.
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(point.x.max(self.min.x).min(self.max.x), point.y.max(self.min.y).min(self.max.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rect_and_accessors() {
        let b = Aabb::from_rect(100.0, 50.0, 40.0, 20.0);
        assert_eq!(b.left(), 100.0);
        assert_eq!(b.top(), 50.0);
        assert_eq!(b.right(), 140.0);
        assert_eq!(b.bottom(), 70.0);
        assert_eq!(b.center(), Vec2::new(120.0, 60.0));
        assert_eq!(b.half_min_extent(), 10.0);
        assert_eq!(b.half_max_extent(), 20.0);
    }

    #[test]
    fn test_new_reorders_corners() {
        let b = Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(1.0, 2.0));
        assert_eq!(b.min, Vec2::new(1.0, 2.0));
        assert_eq!(b.max, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_overlap_requires_positive_area() {
        let a = Aabb::from_rect(0.0, 0.0, 10.0, 10.0);
        let touching = Aabb::from_rect(10.0, 0.0, 10.0, 10.0);
        let corner = Aabb::from_rect(10.0, 10.0, 5.0, 5.0);
        let overlapping = Aabb::from_rect(9.0, 9.0, 5.0, 5.0);
        let sliver = Aabb::from_rect(5.0, 0.0, 0.0, 10.0);

        assert!(!a.overlaps(&touching));
        assert!(!a.overlaps(&corner));
        assert!(!a.overlaps(&sliver));
        assert!(a.overlaps(&overlapping));
        assert!(overlapping.overlaps(&a));
    }

    #[test]
    fn test_contains_point_inclusive() {
        let b = Aabb::from_rect(0.0, 0.0, 10.0, 10.0);
        assert!(b.contains_point(Vec2::new(0.0, 0.0)));
        assert!(b.contains_point(Vec2::new(10.0, 5.0)));
        assert!(!b.contains_point(Vec2::new(10.1, 5.0)));
    }

    #[test]
    fn test_from_points() {
        assert!(Aabb::from_points(&[]).is_none());
        let b = Aabb::from_points(&[Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0), Vec2::new(0.0, 0.0)]);
        assert_eq!(b, Some(Aabb::new(Vec2::new(-2.0, -1.0), Vec2::new(3.0, 4.0))));
    }

    #[test]
    fn test_expanded_and_merge() {
        let mut b = Aabb::from_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(b.expanded(2.0), Aabb::from_rect(-2.0, -2.0, 14.0, 14.0));
        b.merge(&Aabb::from_rect(20.0, -5.0, 1.0, 1.0));
        assert_eq!(b, Aabb::new(Vec2::new(0.0, -5.0), Vec2::new(21.0, 10.0)));
    }

    #[test]
    fn test_is_well_formed() {
        assert!(Aabb::from_rect(5.0, 5.0, 0.0, 0.0).is_well_formed());
        let inverted = Aabb { min: Vec2::new(350.0, 50.0), max: Vec2::new(260.0, 10.0) };
        assert!(inverted.is_finite());
        assert!(!inverted.is_well_formed());
        assert!(!Aabb { min: Vec2::ZERO, max: Vec2::new(f64::NAN, 1.0) }.is_well_formed());
    }

    #[test]
    fn test_clamp_point() {
        let b = Aabb::from_rect(0.0, 0.0, 90.0, 90.0);
        assert_eq!(b.clamp_point(Vec2::new(150.0, 45.0)), Vec2::new(90.0, 45.0));
        assert_eq!(b.clamp_point(Vec2::new(-3.0, -4.0)), Vec2::ZERO);
        assert_eq!(b.clamp_point(Vec2::new(10.0, 20.0)), Vec2::new(10.0, 20.0));
    }
}
