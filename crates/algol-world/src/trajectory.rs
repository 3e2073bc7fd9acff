use glam::Vec3;

/// Closed-form oscillation around a fixed center.
///
/// Each axis swings independently:
///
/// ```text
/// p(t) = center + axes_lengths / 2 * (sin(v.x t + φ.x), sin(v.y t + φ.y), cos(v.z t + φ.z))
/// ```
///
/// The z axis uses `cos`, so an object at rest (`v = φ = 0`) sits half an axis
/// length in front of its center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Trajectory {
    pub center: Vec3,
    pub axes_lengths: Vec3,
    pub velocities: Vec3,
    pub phase: Vec3,
}

impl Trajectory {
    #[inline]
    pub const fn new(center: Vec3, axes_lengths: Vec3, velocities: Vec3, phase: Vec3) -> Self {
        Self { center, axes_lengths, velocities, phase }
    }

    /// A trajectory that never leaves `center`.
    #[inline]
    pub const fn fixed(center: Vec3) -> Self {
        Self::new(center, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO)
    }

    /// Position at elapsed time `t` (seconds).
    #[inline]
    pub fn position_at(&self, t: f32) -> Vec3 {
        let arg = self.velocities * t + self.phase;
        let swing = Vec3::new(arg.x.sin(), arg.y.sin(), arg.z.cos());
        self.center + self.axes_lengths * 0.5 * swing
    }
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::fixed(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-4
    }

    #[test]
    fn at_rest_sits_on_z_extreme() {
        let t = Trajectory::new(
            Vec3::new(10.0, 20.0, 30.0),
            Vec3::new(4.0, 6.0, 8.0),
            Vec3::ZERO,
            Vec3::ZERO,
        );
        for time in [0.0, 1.0, 17.5, -3.0, 1.0e4] {
            assert!(approx(t.position_at(time), Vec3::new(10.0, 20.0, 34.0)));
        }
    }

    #[test]
    fn fixed_never_moves() {
        let t = Trajectory::fixed(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.position_at(42.0), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn quarter_period_hits_x_extreme() {
        let t = Trajectory::new(
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO,
        );
        let p = t.position_at(std::f32::consts::FRAC_PI_2);
        assert!(approx(p, Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn phase_shifts_each_axis() {
        let half_pi = std::f32::consts::FRAC_PI_2;
        let t = Trajectory::new(
            Vec3::ZERO,
            Vec3::splat(2.0),
            Vec3::ZERO,
            Vec3::new(half_pi, half_pi, half_pi),
        );
        // sin(π/2) = 1 on x and y, cos(π/2) = 0 on z.
        assert!(approx(t.position_at(5.0), Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn same_time_same_position() {
        let t = Trajectory::new(
            Vec3::new(640.0, 360.0, 0.0),
            Vec3::new(300.0, 120.0, 80.0),
            Vec3::new(0.7, 1.3, 0.7),
            Vec3::new(0.1, 0.2, 0.3),
        );
        assert_eq!(t.position_at(3.25), t.position_at(3.25));
    }
}
