// Continuous tests: swept-AABB time of impact and ray/box slab intersection.

use super::Aabb;
use crate::math::vec2::Vec2;

/// Direction components smaller than this are treated as parallel to a slab.
const RAY_PARALLEL_EPSILON: f64 = 1e-12;

/// Result of a swept-box test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweptHit {
    /// Time at which the boxes first touch, in the same units as the velocity's time base.
    pub time: f64,
    /// Axis-aligned unit normal pointing from the moving box toward the target.
    pub normal: Vec2,
}

/// Entry and exit times of a moving interval `[m_min, m_max]` against `[t_min, t_max]`.
/// `None` when the intervals never overlap with positive length.
fn axis_times(m_min: f64, m_max: f64, t_min: f64, t_max: f64, velocity: f64) -> Option<(f64, f64)> {
    if velocity > 0.0 {
        Some(((t_min - m_max) / velocity, (t_max - m_min) / velocity))
    } else if velocity < 0.0 {
        Some(((t_max - m_min) / velocity, (t_min - m_max) / velocity))
    } else if m_max <= t_min || m_min >= t_max {
        None
    } else {
        Some((f64::NEG_INFINITY, f64::INFINITY))
    }
}

/// Finds when `moving`, travelling at `velocity` relative to a stationary `target`,
/// first overlaps it within `[0, max_time]`.
///
/// Boxes that already overlap report a hit at time zero with a center-to-center normal.
/// Zero, NaN or infinite velocities, and non-positive or non-finite `max_time`, report no hit.
pub fn swept_aabb(moving: &Aabb, velocity: Vec2, target: &Aabb, max_time: f64) -> Option<SweptHit> {
    if !velocity.is_finite() || velocity.is_zero() || !max_time.is_finite() || max_time <= 0.0 {
        return None;
    }
    if moving.overlaps(target) {
        return Some(SweptHit {
            time: 0.0,
            normal: (target.center() - moving.center()).normalize(),
        });
    }

    let (entry_x, exit_x) = axis_times(moving.min.x, moving.max.x, target.min.x, target.max.x, velocity.x)?;
    let (entry_y, exit_y) = axis_times(moving.min.y, moving.max.y, target.min.y, target.max.y, velocity.y)?;

    let entry = entry_x.max(entry_y);
    let exit = exit_x.min(exit_y);

    if entry >= exit || entry < 0.0 || entry > max_time {
        return None;
    }

    let normal = if entry_x > entry_y {
        Vec2::new(velocity.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, velocity.y.signum())
    };

    Some(SweptHit { time: entry, normal })
}

/// Slab-method ray/box intersection. `direction` must be a unit vector.
/// Returns the distance along the ray to the first contact (zero when the origin is
/// inside the box), or `None` when the box is missed or farther than `max_distance`.
pub fn ray_aabb(origin: Vec2, direction: Vec2, max_distance: f64, bounds: &Aabb) -> Option<f64> {
    let mut t_entry = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;

    let axes = [
        (origin.x, direction.x, bounds.min.x, bounds.max.x),
        (origin.y, direction.y, bounds.min.y, bounds.max.y),
    ];
    for (o, d, lo, hi) in axes {
        if d.abs() < RAY_PARALLEL_EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        t_entry = t_entry.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }

    if t_entry > t_exit || t_exit < 0.0 {
        return None;
    }
    let distance = t_entry.max(0.0);
    (distance <= max_distance).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_swept_hits_thin_wall_that_a_static_test_misses() {
        let bullet = Aabb::from_rect(0.0, 0.0, 2.0, 2.0);
        let wall = Aabb::from_rect(50.0, -10.0, 1.0, 30.0);
        // 6000 units/s over a 1/60 s frame moves 100 units, tunnelling past the wall.
        let hit = swept_aabb(&bullet, Vec2::new(6000.0, 0.0), &wall, 1.0 / 60.0).unwrap();
        assert_relative_eq!(hit.time, 48.0 / 6000.0, epsilon = 1e-12);
        assert_eq!(hit.normal, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_swept_rejects_hit_after_interval() {
        let a = Aabb::from_rect(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::from_rect(100.0, 0.0, 10.0, 10.0);
        assert!(swept_aabb(&a, Vec2::new(10.0, 0.0), &b, 1.0).is_none());
        assert!(swept_aabb(&a, Vec2::new(10.0, 0.0), &b, 9.0).is_some());
    }

    #[test]
    fn test_swept_vertical_normal() {
        let a = Aabb::from_rect(0.0, 0.0, 10.0, 10.0);
        let floor = Aabb::from_rect(-50.0, 20.0, 100.0, 10.0);
        let hit = swept_aabb(&a, Vec2::new(1.0, 20.0), &floor, 1.0).unwrap();
        assert_relative_eq!(hit.time, 0.5);
        assert_eq!(hit.normal, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_swept_moving_away_or_parallel_misses() {
        let a = Aabb::from_rect(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::from_rect(20.0, 0.0, 10.0, 10.0);
        assert!(swept_aabb(&a, Vec2::new(-10.0, 0.0), &b, 5.0).is_none());
        let above = Aabb::from_rect(20.0, 30.0, 10.0, 10.0);
        assert!(swept_aabb(&a, Vec2::new(10.0, 0.0), &above, 5.0).is_none());
    }

    #[test]
    fn test_swept_degenerate_velocity_reports_nothing() {
        let a = Aabb::from_rect(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::from_rect(5.0, 0.0, 10.0, 10.0);
        assert!(swept_aabb(&a, Vec2::ZERO, &b, 1.0).is_none());
        assert!(swept_aabb(&a, Vec2::new(f64::NAN, 0.0), &b, 1.0).is_none());
        assert!(swept_aabb(&a, Vec2::new(f64::INFINITY, 0.0), &b, 1.0).is_none());
        assert!(swept_aabb(&a, Vec2::new(1.0, 0.0), &b, f64::NAN).is_none());
    }

    #[test]
    fn test_swept_already_overlapping_is_time_zero() {
        let a = Aabb::from_rect(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::from_rect(5.0, 0.0, 10.0, 10.0);
        let hit = swept_aabb(&a, Vec2::new(1.0, 0.0), &b, 1.0).unwrap();
        assert_eq!(hit.time, 0.0);
        assert_relative_eq!(hit.normal.x, 1.0);
    }

    #[test]
    fn test_ray_aabb_hit_distance() {
        let target = Aabb::from_rect(500.0, 0.0, 50.0, 50.0);
        let d = ray_aabb(Vec2::ZERO, Vec2::new(1.0, 0.0), 1000.0, &target).unwrap();
        assert_relative_eq!(d, 500.0);
    }

    #[test]
    fn test_ray_aabb_misses() {
        let target = Aabb::from_rect(500.0, 10.0, 50.0, 50.0);
        assert!(ray_aabb(Vec2::ZERO, Vec2::new(1.0, 0.0), 1000.0, &target).is_none());
        let behind = Aabb::from_rect(-100.0, -10.0, 50.0, 50.0);
        assert!(ray_aabb(Vec2::ZERO, Vec2::new(1.0, 0.0), 1000.0, &behind).is_none());
        let far = Aabb::from_rect(500.0, -10.0, 50.0, 50.0);
        assert!(ray_aabb(Vec2::ZERO, Vec2::new(1.0, 0.0), 100.0, &far).is_none());
    }

    #[test]
    fn test_ray_origin_inside_box() {
        let target = Aabb::from_rect(-5.0, -5.0, 10.0, 10.0);
        assert_eq!(ray_aabb(Vec2::ZERO, Vec2::new(0.0, 1.0), 10.0, &target), Some(0.0));
    }
}
