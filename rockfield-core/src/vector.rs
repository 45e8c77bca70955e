//! Positions and directions.
//!
//! The play area uses screen orientation (y grows downward); a positive
//! rotation turns a vector clockwise on screen.

pub use glam::DVec2 as Vec2;

/// Rotates `v` about the origin by `radians`. The zero vector is left alone.
#[inline]
pub fn rotate(v: &mut Vec2, radians: f64) {
    if *v != Vec2::ZERO && radians != 0.0 {
        *v = Vec2::from_angle(radians).rotate(*v);
    }
}

#[inline]
pub fn rotated(mut v: Vec2, radians: f64) -> Vec2 {
    rotate(&mut v, radians);
    v
}

/// Scales `v` down to `max` when it is longer; never divides by zero.
#[inline]
pub fn limit_magnitude(v: &mut Vec2, max: f64) {
    let length = v.length();
    if length > max && length != 0.0 {
        *v *= max / length;
    }
}

/// Unit vector pointing along the ship's nose for orientation `alpha`.
#[inline]
pub fn heading(alpha: f64) -> Vec2 {
    Vec2::new(alpha.sin(), -alpha.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn rotation_preserves_magnitude() {
        let mut v = Vec2::new(3.0, -4.0);
        for step in 0..37 {
            rotate(&mut v, 0.173 * f64::from(step));
            assert!((v.length() - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn quarter_turn_matches_complex_multiply() {
        assert!(close(rotated(Vec2::new(1.0, 0.0), FRAC_PI_2), Vec2::new(0.0, 1.0)));
        assert!(close(rotated(Vec2::new(0.0, -1.0), PI), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn zero_vector_never_moves() {
        let mut v = Vec2::ZERO;
        rotate(&mut v, 1.0);
        limit_magnitude(&mut v, 0.0);
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn limit_only_shrinks() {
        let mut long = Vec2::new(30.0, 40.0);
        limit_magnitude(&mut long, 10.0);
        assert!((long.length() - 10.0).abs() < 1e-9);
        assert!(close(long, Vec2::new(6.0, 8.0)));

        let mut short = Vec2::new(1.0, 1.0);
        limit_magnitude(&mut short, 10.0);
        assert_eq!(short, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn heading_points_up_at_zero() {
        assert!(close(heading(0.0), Vec2::new(0.0, -1.0)));
        assert!(close(heading(FRAC_PI_2), Vec2::new(1.0, 0.0)));
        // Heading is the canonical nose rotated by alpha.
        assert!(close(heading(0.7), rotated(Vec2::new(0.0, -1.0), 0.7)));
    }
}
