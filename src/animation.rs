//! Closed-form circular orbital motion.
//!
//! Each frame recomputes absolute positions from absolute time. There is no
//! per-frame integration, so dropped frames cause no cumulative error, and
//! replaying a timestamp sequence reproduces identical positions.

use crate::registry::BodyDescriptor;

/// Pacing constant applied to every angular speed. Chosen for comfortable
/// on-screen motion, not derived from physics.
pub const ORBIT_PACING: f64 = 0.0005;

/// Orbital angle in radians at `t_millis` milliseconds past the epoch.
pub fn orbit_angle(t_millis: f64, speed: f64) -> f64 {
    t_millis * speed * ORBIT_PACING
}

/// Planar position `(x, z)` on the orbit circle at the given time. The y
/// coordinate is untouched by animation.
pub fn orbit_position(t_millis: f64, body: &BodyDescriptor) -> (f64, f64) {
    let theta = orbit_angle(t_millis, body.speed);
    (body.distance * theta.cos(), body.distance * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn body(distance: f64, speed: f64) -> BodyDescriptor {
        BodyDescriptor {
            name: "Test".to_owned(),
            asset: "assets/test.obj".to_owned(),
            distance,
            scale: 1.0,
            speed,
        }
    }

    #[test]
    fn position_stays_on_the_orbit_circle() {
        let earthlike = body(26.0, 0.02);
        for t in [0.0, 1.0, 16.6, 999.5, 86_400_000.0].iter() {
            let (x, z) = orbit_position(*t, &earthlike);
            assert_relative_eq!((x * x + z * z).sqrt(), 26.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn replay_is_deterministic() {
        let mercurylike = body(10.0, 0.04);
        let times = [0.0, 16.6, 33.3, 1000.0, 5000.0, 123_456.789];
        let first: Vec<_> = times.iter().map(|t| orbit_position(*t, &mercurylike)).collect();
        let second: Vec<_> = times.iter().map(|t| orbit_position(*t, &mercurylike)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn known_position_at_t1000() {
        // distance 10, speed 0.02, t 1000 => theta = 1000 * 0.02 * 0.0005
        let probe = body(10.0, 0.02);
        let theta = 1000.0 * 0.02 * ORBIT_PACING;
        let (x, z) = orbit_position(1000.0, &probe);
        assert_relative_eq!(x, 10.0 * theta.cos(), max_relative = 1e-12);
        assert_relative_eq!(z, 10.0 * theta.sin(), max_relative = 1e-12);
    }

    #[test]
    fn zero_speed_never_moves() {
        let still = body(26.0, 0.0);
        assert_eq!(orbit_position(0.0, &still), (26.0, 0.0));
        assert_eq!(orbit_position(1.0e9, &still), (26.0, 0.0));
    }

    #[test]
    fn skipped_frames_cause_no_drift() {
        // Arriving at t by one jump or by many frames makes no difference.
        let giant = body(50.0, 0.01);
        assert_eq!(
            orbit_position(100.0 * 16.0, &giant),
            orbit_position(1600.0, &giant)
        );
    }
}
