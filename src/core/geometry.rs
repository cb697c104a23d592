//! Polar placement on the radar plane
//!
//! Angles in degrees, 0° at 12 o'clock, increasing clockwise on screen
//! (y grows downward). Radius in percent of the plot radius.

use crate::types::Point;

/// Map a polar placement to the normalized plane
pub fn get_position(angle: f64, radius_percent: f64) -> Point {
    let radius = radius_percent / 100.0 * 0.5;
    let radians = (angle - 90.0).to_radians();
    Point {
        x: 0.5 + radians.cos() * radius,
        y: 0.5 + radians.sin() * radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn close(p: Point, x: f64, y: f64) -> bool {
        (p.x - x).abs() < EPS && (p.y - y).abs() < EPS
    }

    #[test]
    fn test_twelve_oclock_edge() {
        assert!(close(get_position(0.0, 100.0), 0.5, 0.0));
    }

    #[test]
    fn test_three_oclock_edge() {
        assert!(close(get_position(90.0, 100.0), 1.0, 0.5));
    }

    #[test]
    fn test_six_and_nine_oclock() {
        assert!(close(get_position(180.0, 100.0), 0.5, 1.0));
        assert!(close(get_position(270.0, 100.0), 0.0, 0.5));
    }

    #[test]
    fn test_zero_radius_is_center() {
        assert!(close(get_position(123.0, 0.0), 0.5, 0.5));
    }

    #[test]
    fn test_full_turn_is_identity() {
        let a = get_position(37.0, 60.0);
        let b = get_position(397.0, 60.0);
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
    }
}
