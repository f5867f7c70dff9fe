//! Narrow-phase overlap predicates.
//!
//! Every ordered pair of [`ShapeData`] variants is handled explicitly in
//! [`shapes_intersect`]; mirrored pairs forward to the same predicate with the
//! operands swapped so the result never depends on argument order.

use super::Aabb;
use crate::math::vec2::Vec2;
use crate::shapes::{Circle, LineSegment, ShapeData};

/// Determinants smaller than this are treated as parallel segments.
const PARALLEL_EPSILON: f64 = 1e-10;

/// Dispatches to the predicate for the given pair of shapes.
pub fn shapes_intersect(a: &ShapeData, b: &ShapeData) -> bool {
    match (a, b) {
        (ShapeData::Rectangle(ra), ShapeData::Rectangle(rb)) => rect_rect(ra, rb),
        (ShapeData::Rectangle(r), ShapeData::Circle(c)) => rect_circle(r, c),
        (ShapeData::Rectangle(r), ShapeData::Line(l)) => line_rect(l, r),
        (ShapeData::Circle(c), ShapeData::Rectangle(r)) => rect_circle(r, c),
        (ShapeData::Circle(ca), ShapeData::Circle(cb)) => circle_circle(ca, cb),
        (ShapeData::Circle(c), ShapeData::Line(l)) => line_circle(l, c),
        (ShapeData::Line(l), ShapeData::Rectangle(r)) => line_rect(l, r),
        (ShapeData::Line(l), ShapeData::Circle(c)) => line_circle(l, c),
        (ShapeData::Line(la), ShapeData::Line(lb)) => line_line(la, lb),
    }
}

/// Standard axis-aligned overlap; touching edges do not count.
pub fn rect_rect(a: &Aabb, b: &Aabb) -> bool {
    a.overlaps(b)
}

/// Clamps the circle center into the rectangle and compares squared distances.
pub fn rect_circle(rect: &Aabb, circle: &Circle) -> bool {
    let closest = Vec2::new(
        circle.center.x.clamp(rect.min.x, rect.max.x),
        circle.center.y.clamp(rect.min.y, rect.max.y),
    );
    closest.distance_squared(circle.center) < circle.radius * circle.radius
}

pub fn circle_circle(a: &Circle, b: &Circle) -> bool {
    let radii_sum = a.radius + b.radius;
    a.center.distance_squared(b.center) < radii_sum * radii_sum
}

/// True if either endpoint is inside the rectangle or the segment crosses one of its edges.
pub fn line_rect(line: &LineSegment, rect: &Aabb) -> bool {
    if rect.contains_point(line.start) || rect.contains_point(line.end) {
        return true;
    }
    let corners = rect.corners();
    (0..4).any(|i| {
        let edge_start = corners[i];
        let edge_end = corners[(i + 1) % 4];
        intersect_line_segments(line.start, line.end, edge_start, edge_end).is_some()
    })
}

/// Parametric segment intersection. Parallel and collinear segments never intersect,
/// even when they overlap.
pub fn line_line(a: &LineSegment, b: &LineSegment) -> bool {
    intersect_line_segments(a.start, a.end, b.start, b.end).is_some()
}

/// Projects the circle center onto the segment and compares squared distances.
pub fn line_circle(line: &LineSegment, circle: &Circle) -> bool {
    let (closest, _) = closest_point_on_segment(line.start, line.end, circle.center);
    closest.distance_squared(circle.center) < circle.radius * circle.radius
}

/// Finds the point on a line segment closest to a given point.
/// Returns the closest point and the parameter `t` (0 <= t <= 1) along the segment.
pub fn closest_point_on_segment(segment_a: Vec2, segment_b: Vec2, point: Vec2) -> (Vec2, f64) {
    let segment_vec = segment_b - segment_a;
    let length_sq = segment_vec.magnitude_squared();
    if length_sq < 1e-12 {
        return (segment_a, 0.0);
    }
    let t = ((point - segment_a).dot(segment_vec) / length_sq).clamp(0.0, 1.0);
    (segment_a + segment_vec * t, t)
}

/// Intersects segments `a1-a2` and `b1-b2`.
/// Returns the intersection point and parameters `(t, u)` along each segment when both
/// lie in `[0, 1]`; `None` for parallel or collinear segments.
pub fn intersect_line_segments(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<(Vec2, f64, f64)> {
    let d1 = a2 - a1;
    let d2 = b2 - b1;
    let delta_start = b1 - a1;

    let denominator = d1.cross(d2);
    if !denominator.is_finite() || denominator.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = delta_start.cross(d2) / denominator;
    let u = delta_start.cross(d1) / denominator;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some((a1 + d1 * t, t, u))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> ShapeData {
        ShapeData::Rectangle(Aabb::from_rect(x, y, w, h))
    }

    fn circle(cx: f64, cy: f64, r: f64) -> ShapeData {
        let bounds = Aabb::from_rect(cx - r, cy - r, 2.0 * r, 2.0 * r);
        ShapeData::Circle(Circle { bounds, center: Vec2::new(cx, cy), radius: r })
    }

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> ShapeData {
        ShapeData::Line(LineSegment::between(Vec2::new(x1, y1), Vec2::new(x2, y2)))
    }

    fn assert_symmetric(a: &ShapeData, b: &ShapeData, expected: bool) {
        assert_eq!(shapes_intersect(a, b), expected, "{:?} vs {:?}", a, b);
        assert_eq!(shapes_intersect(b, a), expected, "{:?} vs {:?}", b, a);
    }

    #[test]
    fn test_rect_rect() {
        assert_symmetric(&rect(0.0, 0.0, 50.0, 50.0), &rect(25.0, 25.0, 50.0, 50.0), true);
        assert_symmetric(&rect(100.0, 100.0, 50.0, 50.0), &rect(150.0, 100.0, 50.0, 50.0), false);
        assert_symmetric(&rect(0.0, 0.0, 10.0, 10.0), &rect(0.0, 20.0, 10.0, 10.0), false);
    }

    #[test]
    fn test_rect_circle() {
        assert_symmetric(&rect(0.0, 0.0, 10.0, 10.0), &circle(12.0, 5.0, 3.0), true);
        assert_symmetric(&rect(0.0, 0.0, 10.0, 10.0), &circle(14.0, 5.0, 3.0), false);
        // Near a corner the clamped point is the corner itself.
        assert_symmetric(&rect(0.0, 0.0, 10.0, 10.0), &circle(12.0, 12.0, 2.0), false);
        assert_symmetric(&rect(0.0, 0.0, 10.0, 10.0), &circle(12.0, 12.0, 3.0), true);
        // Center inside the rectangle.
        assert_symmetric(&rect(0.0, 0.0, 10.0, 10.0), &circle(5.0, 5.0, 1.0), true);
    }

    #[test]
    fn test_circle_circle() {
        assert_symmetric(&circle(0.0, 0.0, 1.0), &circle(1.5, 0.0, 1.0), true);
        assert_symmetric(&circle(0.0, 0.0, 1.0), &circle(2.0, 0.0, 1.0), false);
        assert_symmetric(&circle(0.0, 0.0, 2.0), &circle(0.0, 0.0, 1.0), true);
    }

    #[test]
    fn test_line_rect() {
        // Endpoint inside.
        assert_symmetric(&line(5.0, 5.0, 50.0, 50.0), &rect(0.0, 0.0, 10.0, 10.0), true);
        // Passes straight through without an endpoint inside.
        assert_symmetric(&line(-10.0, 5.0, 20.0, 5.0), &rect(0.0, 0.0, 10.0, 10.0), true);
        assert_symmetric(&line(-10.0, 20.0, 20.0, 20.0), &rect(0.0, 0.0, 10.0, 10.0), false);
        assert_symmetric(&line(-10.0, 0.0, 0.0, -10.0), &rect(1.0, 1.0, 10.0, 10.0), false);
    }

    #[test]
    fn test_line_line() {
        assert_symmetric(&line(0.0, 0.0, 10.0, 10.0), &line(0.0, 10.0, 10.0, 0.0), true);
        assert_symmetric(&line(0.0, 0.0, 1.0, 1.0), &line(2.0, 0.0, 3.0, -1.0), false);
        // Collinear overlap is a documented miss.
        assert_symmetric(&line(0.0, 0.0, 10.0, 0.0), &line(5.0, 0.0, 15.0, 0.0), false);
        assert_symmetric(&line(0.0, 0.0, 10.0, 0.0), &line(0.0, 1.0, 10.0, 1.0), false);
    }

    #[test]
    fn test_line_circle() {
        assert_symmetric(&line(-2.0, 0.5, 2.0, 0.5), &circle(0.0, 0.0, 1.0), true);
        assert_symmetric(&line(2.0, 1.0, 4.0, 1.0), &circle(0.0, 0.0, 1.0), false);
        // Projection clamps to the nearest endpoint.
        assert_symmetric(&line(0.5, 0.0, 5.0, 0.0), &circle(0.0, 0.0, 1.0), true);
    }

    #[test]
    fn test_degenerate_shapes_do_not_panic() {
        assert_symmetric(&line(3.0, 3.0, 3.0, 3.0), &line(3.0, 3.0, 3.0, 3.0), false);
        assert_symmetric(&rect(0.0, 0.0, 0.0, 0.0), &rect(0.0, 0.0, 0.0, 0.0), false);
        assert_symmetric(&line(1.0, 1.0, 1.0, 1.0), &circle(1.0, 1.0, 0.5), true);
    }

    #[test]
    fn test_intersect_line_segments_point() {
        let (point, t, u) = intersect_line_segments(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(point.x, 1.0);
        assert_relative_eq!(point.y, 1.0);
        assert_relative_eq!(t, 0.5);
        assert_relative_eq!(u, 0.5);
    }

    #[test]
    fn test_intersect_line_segments_touching_endpoints() {
        let hit = intersect_line_segments(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
        );
        assert!(hit.is_some());
    }

    #[test]
    fn test_closest_point_on_segment() {
        let (p, t) = closest_point_on_segment(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(4.0, 3.0));
        assert_eq!(p, Vec2::new(4.0, 0.0));
        assert_relative_eq!(t, 0.4);
        let (p, t) = closest_point_on_segment(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(-4.0, 3.0));
        assert_eq!(p, Vec2::ZERO);
        assert_eq!(t, 0.0);
    }
}
