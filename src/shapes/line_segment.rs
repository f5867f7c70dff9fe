use crate::collision::Aabb;
use crate::math::vec2::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// The entity bounds the segment was built inside.
    pub bounds: Aabb,
    pub start: Vec2,
    pub end: Vec2,
}

impl LineSegment {
    pub fn new(bounds: Aabb, start: Vec2, end: Vec2) -> Self {
        Self { bounds, start, end }
    }

    /// A free-standing segment whose bounds are its own endpoints' box.
    pub fn between(start: Vec2, end: Vec2) -> Self {
        Self { bounds: Aabb::new(start, end), start, end }
    }

    /// Calculates the length of the line segment.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Returns the direction vector of the line segment (from start to end).
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_line_segment_between() {
        let line = LineSegment::between(Vec2::new(4.0, 6.0), Vec2::new(1.0, 2.0));
        assert_eq!(line.bounds, Aabb::from_rect(1.0, 2.0, 3.0, 4.0));
        assert_relative_eq!(line.length(), 5.0);
        assert_eq!(line.direction(), Vec2::new(-3.0, -4.0));
    }
}
