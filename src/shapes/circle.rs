use crate::collision::Aabb;
use crate::math::vec2::Vec2;

/// Narrow-phase circle derived from an entity's bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub bounds: Aabb,
    pub center: Vec2,
    pub radius: f64,
}

impl Circle {
    /// Builds the circle inscribed in `bounds`: centered on the box, with a radius of
    /// `radius_fraction` of the smaller side minus `visual_padding`, never negative.
    pub fn from_bounds(bounds: Aabb, radius_fraction: f64, visual_padding: f64) -> Self {
        let radius = (bounds.width().min(bounds.height()) * radius_fraction - visual_padding).max(0.0);
        Self { bounds, center: bounds.center(), radius }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circle_from_bounds() {
        let c = Circle::from_bounds(Aabb::from_rect(0.0, 0.0, 40.0, 30.0), 0.5, 2.0);
        assert_eq!(c.center, Vec2::new(20.0, 15.0));
        assert_relative_eq!(c.radius, 13.0);
    }

    #[test]
    fn test_circle_padding_never_goes_negative() {
        let c = Circle::from_bounds(Aabb::from_rect(0.0, 0.0, 2.0, 2.0), 0.5, 5.0);
        assert_eq!(c.radius, 0.0);
    }
}
