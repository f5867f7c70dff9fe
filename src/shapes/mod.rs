pub mod circle;
pub mod line_segment;

pub use circle::Circle;
pub use line_segment::LineSegment;

use crate::collision::Aabb;
use crate::math::vec2::Vec2;

/// Concrete narrow-phase geometry, built fresh from an entity for each test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeData {
    Rectangle(Aabb),
    Circle(Circle),
    Line(LineSegment),
}

impl ShapeData {
    /// The entity bounds this shape was derived from.
    pub fn bounds(&self) -> Aabb {
        match self {
            ShapeData::Rectangle(bounds) => *bounds,
            ShapeData::Circle(circle) => circle.bounds,
            ShapeData::Line(line) => line.bounds,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}
