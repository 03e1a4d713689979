//! Collision kernel: point-through-surface resolution and ball responses.
//!
//! Surface resolution works on the ball's center point and the displacement
//! it just traveled, answering "how far back along the travel direction must
//! the point move to undo the crossing". Degenerate inputs (zero travel,
//! travel parallel to the surface, coincident ball centers) are treated as
//! "no collision" rather than surfaced as errors.

use crate::ball::Ball;
use crate::config::COLLISION_DAMPING;
use crate::vec2::{Pos2, Surface, Vec2};

/// Threshold below which lengths and cosines are treated as degenerate.
const EPSILON: f32 = 1e-6;

/// Resolve a point `p` that has just traveled along `v` (previous position
/// `p - v`) against a surface. Returns the displacement that undoes the
/// crossing, or `None` when the path did not pass through the segment from
/// the normal side.
pub fn surface_collision_resolution(surface: &Surface, p: Pos2, v: Vec2) -> Option<Vec2> {
    let n = surface.normal();
    let l = (surface.a - p).dot(n);
    // Point still on the normal side: nothing to undo.
    if l < 0.0 {
        return None;
    }

    let speed = v.length();
    if speed < EPSILON {
        return None;
    }
    // Unit vector pointing back along the travel direction.
    let u = v * (-1.0 / speed);

    // Angle between the back-travel direction and the normal. Non-positive
    // means the point never approached from the normal side.
    let cos_o = n.dot(u);
    if cos_o <= EPSILON {
        return None;
    }

    let adjustment = u * (l / cos_o);
    let intersection = p + adjustment;

    // The crossing is real only if the intersection lies on the segment and
    // on the traveled path.
    if !within_bounds(intersection, surface.a, surface.b) {
        return None;
    }
    if !within_bounds(intersection, p - v, p) {
        return None;
    }

    Some(adjustment)
}

/// True when `p` lies between `e1` and `e2` on at least one axis.
///
/// The OR (rather than AND) is deliberate: for a nearly axis-aligned
/// segment one axis has negligible range and would reject every point; the
/// other axis rescues the test.
fn within_bounds(p: Pos2, e1: Pos2, e2: Pos2) -> bool {
    strictly_between(p.x, e1.x, e2.x) || strictly_between(p.y, e1.y, e2.y)
}

fn strictly_between(v: f32, bound1: f32, bound2: f32) -> bool {
    (bound1 < v && v < bound2) || (bound2 < v && v < bound1)
}

/// Apply a surface collision to a ball: reflect the velocity about the
/// surface normal, damp it (perpendicular hits lose ~15%, grazing hits lose
/// little), undo the penetration, and advance along the new velocity.
pub fn apply_surface_collision(ball: &mut Ball, resolution: Vec2, normal: Vec2, dt: f32) {
    let speed = ball.velocity.length();
    if speed > EPSILON {
        let along_normal = normal.dot(ball.velocity * (1.0 / speed)).abs();
        let damping = 1.0 - COLLISION_DAMPING * along_normal;
        let reflected = ball.velocity - normal * (2.0 * ball.velocity.dot(normal));
        ball.velocity = reflected * damping;
    }
    ball.pos += resolution;
    ball.pos += ball.velocity * dt;
}

/// Resolve an overlapping pair of balls in place: separate the centers and
/// exchange the velocity components along the line of centers (equal-mass
/// elastic), damping each exchanged component.
pub fn resolve_ball_collision(a: &mut Ball, b: &mut Ball) {
    let delta = b.pos - a.pos;
    let min_dist = a.r + b.r;
    if delta.length_squared() >= min_dist * min_dist {
        return;
    }

    let dist = delta.length();
    // Coincident centers leave no axis to resolve along.
    if dist < EPSILON {
        return;
    }
    let n = delta * (1.0 / dist);

    let overlap = min_dist - dist;
    a.pos -= n * (overlap * 0.5);
    b.pos += n * (overlap * 0.5);

    let a_normal = a.velocity.dot(n);
    let b_normal = b.velocity.dot(n);
    let a_exchanged = a.velocity + n * (b_normal - a_normal);
    let b_exchanged = b.velocity + n * (a_normal - b_normal);
    a.velocity = damp_along(a_exchanged, n);
    b.velocity = damp_along(b_exchanged, n);
}

/// Damp the component of `v` along `n` by the collision damping law.
fn damp_along(v: Vec2, n: Vec2) -> Vec2 {
    let speed = v.length();
    if speed < EPSILON {
        return v;
    }
    let factor = 1.0 - COLLISION_DAMPING * n.dot(v * (1.0 / speed)).abs();
    let normal_part = n * v.dot(n);
    let tangent_part = v - normal_part;
    tangent_part + normal_part * factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BALL_RADIUS;

    fn floor() -> Surface {
        Surface::new(Pos2::new(0.0, 0.02), Pos2::new(1.0, 0.02))
    }

    #[test]
    fn point_on_normal_side_does_not_collide() {
        let result = surface_collision_resolution(&floor(), Pos2::new(0.5, 0.1), Vec2::new(0.0, -0.01));
        assert!(result.is_none());
    }

    #[test]
    fn crossing_point_is_pushed_back_to_surface() {
        // Previous position 0.0215, now 0.0195: passed through y=0.02.
        let p = Pos2::new(0.5, 0.0195);
        let v = Vec2::new(0.0, -0.002);
        let adjustment = surface_collision_resolution(&floor(), p, v).expect("should collide");
        assert!((adjustment.x).abs() < 1e-7);
        assert!((adjustment.y - 0.0005).abs() < 1e-6);

        let resolved = p + adjustment;
        assert!((resolved.y - 0.02).abs() < 1e-6);
    }

    #[test]
    fn vertical_travel_is_rescued_by_y_axis_bounds() {
        // The intersection shares x with both path endpoints, so the x test
        // degenerates; the y test must accept the crossing.
        let p = Pos2::new(0.5, 0.0195);
        let v = Vec2::new(0.0, -0.002);
        assert!(surface_collision_resolution(&floor(), p, v).is_some());
    }

    #[test]
    fn vertical_surface_is_rescued_by_x_axis_bounds() {
        // Wall segment has zero x range; the y axis carries the segment test
        // and the x axis carries the path test.
        let wall = Surface::new(Pos2::new(0.3, 0.0), Pos2::new(0.3, 0.7));
        let p = Pos2::new(0.305, 0.35);
        let v = Vec2::new(0.01, 0.0);
        let adjustment = surface_collision_resolution(&wall, p, v).expect("should collide");
        assert!((adjustment.x + 0.005).abs() < 1e-6);
        assert!((adjustment.y).abs() < 1e-7);
    }

    #[test]
    fn crossing_outside_segment_misses() {
        let short_floor = Surface::new(Pos2::new(0.4, 0.02), Pos2::new(0.6, 0.02));
        let p = Pos2::new(0.8, 0.0195);
        let v = Vec2::new(0.0, -0.002);
        assert!(surface_collision_resolution(&short_floor, p, v).is_none());
    }

    #[test]
    fn point_already_past_surface_does_not_recollide() {
        // Both path endpoints are below the surface: the crossing happened
        // on an earlier step and must not be resolved twice.
        let p = Pos2::new(0.5, 0.019);
        let v = Vec2::new(0.0, -0.0005);
        assert!(surface_collision_resolution(&floor(), p, v).is_none());
    }

    #[test]
    fn zero_travel_is_degenerate() {
        let p = Pos2::new(0.5, 0.0195);
        assert!(surface_collision_resolution(&floor(), p, Vec2::ZERO).is_none());
    }

    #[test]
    fn travel_parallel_to_surface_is_degenerate() {
        let p = Pos2::new(0.5, 0.0195);
        let v = Vec2::new(0.01, 0.0);
        assert!(surface_collision_resolution(&floor(), p, v).is_none());
    }

    #[test]
    fn perpendicular_bounce_reflects_and_damps() {
        let mut ball = Ball::new(Pos2::new(0.5, 0.0195), BALL_RADIUS, Vec2::new(0.0, -1.0));
        let travel = ball.velocity * 0.002;
        let surface = floor();
        let resolution =
            surface_collision_resolution(&surface, ball.pos, travel).expect("should collide");

        apply_surface_collision(&mut ball, resolution, surface.normal(), 0.002);

        assert!((ball.velocity.y - 0.85).abs() < 1e-6);
        assert!(ball.velocity.x.abs() < 1e-7);
        // Back on the surface, then advanced upward by the damped velocity.
        assert!(ball.pos.y > 0.02);
    }

    #[test]
    fn grazing_bounce_loses_little_energy() {
        let mut ball = Ball::new(
            Pos2::new(0.5, 0.0195),
            BALL_RADIUS,
            Vec2::new(1.0, -0.01),
        );
        let speed_before = ball.velocity.length();
        apply_surface_collision(&mut ball, Vec2::ZERO, Vec2::new(0.0, 1.0), 0.0);

        assert!(ball.velocity.y > 0.0);
        let speed_after = ball.velocity.length();
        assert!(speed_after > speed_before * 0.99);
    }

    #[test]
    fn head_on_pair_swaps_and_damps_velocities() {
        let mut a = Ball::new(Pos2::new(0.4, 0.3), BALL_RADIUS, Vec2::new(1.0, 0.0));
        let mut b = Ball::new(Pos2::new(0.44, 0.3), BALL_RADIUS, Vec2::new(-1.0, 0.0));

        resolve_ball_collision(&mut a, &mut b);

        assert!((a.velocity.x + 0.85).abs() < 1e-5);
        assert!(a.velocity.y.abs() < 1e-7);
        assert!((b.velocity.x - 0.85).abs() < 1e-5);
        assert!(b.velocity.y.abs() < 1e-7);
    }

    #[test]
    fn overlapping_pair_is_separated() {
        let mut a = Ball::new(Pos2::new(0.4, 0.3), BALL_RADIUS, Vec2::ZERO);
        let mut b = Ball::new(Pos2::new(0.44, 0.3), BALL_RADIUS, Vec2::ZERO);

        resolve_ball_collision(&mut a, &mut b);

        let dist = (b.pos - a.pos).length();
        assert!((dist - 2.0 * BALL_RADIUS).abs() < 1e-6);
        // Separation is symmetric about the midpoint.
        assert!((a.pos.x - 0.395).abs() < 1e-6);
        assert!((b.pos.x - 0.445).abs() < 1e-6);
    }

    #[test]
    fn distant_pair_is_untouched() {
        let mut a = Ball::new(Pos2::new(0.2, 0.3), BALL_RADIUS, Vec2::new(1.0, 0.0));
        let mut b = Ball::new(Pos2::new(0.8, 0.3), BALL_RADIUS, Vec2::new(-1.0, 0.0));
        let (a0, b0) = (a, b);

        resolve_ball_collision(&mut a, &mut b);

        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn coincident_centers_are_degenerate() {
        let mut a = Ball::new(Pos2::new(0.4, 0.3), BALL_RADIUS, Vec2::new(1.0, 0.0));
        let mut b = Ball::new(Pos2::new(0.4, 0.3), BALL_RADIUS, Vec2::new(-1.0, 0.0));

        resolve_ball_collision(&mut a, &mut b);

        // No axis to resolve along; pair is left as-is.
        assert_eq!(a.velocity, Vec2::new(1.0, 0.0));
        assert_eq!(b.velocity, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn oblique_pair_keeps_tangential_components() {
        // Centers aligned on x, velocities have y components that must
        // survive the exchange untouched.
        let mut a = Ball::new(Pos2::new(0.4, 0.3), BALL_RADIUS, Vec2::new(1.0, 0.5));
        let mut b = Ball::new(Pos2::new(0.44, 0.3), BALL_RADIUS, Vec2::new(-1.0, -0.25));

        resolve_ball_collision(&mut a, &mut b);

        assert!((a.velocity.y - 0.5).abs() < 1e-6);
        assert!((b.velocity.y + 0.25).abs() < 1e-6);
        // Normal components crossed over.
        assert!(a.velocity.x < 0.0);
        assert!(b.velocity.x > 0.0);
    }
}
