use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::session::ViewAxis;

/// Perspective camera looking at a fixed focus point along a [`ViewAxis`].
///
/// World units match pixels at zoom 1 and depth 0. A point at view depth `d`
/// (positive is away from the viewer) is scaled by `f / (f + d)`, then by the
/// zoom. Points with `f + d <= 1` are behind the eye and are culled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub focus: Vec3,
    pub focal_length: f32,
}

/// Screen-space placement of a projected point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    /// Pixel position, origin top-left, y down.
    pub pixel: Vec2,
    /// Combined perspective and zoom factor.
    pub scale: f32,
    pub depth: f32,
}

impl Camera {
    pub fn new(focus: Vec3, focal_length: f32) -> Self {
        Self { focus, focal_length }
    }

    /// Camera centered on a `width` × `height` scene in the z = 0 plane.
    pub fn centered(width: f32, height: f32, focal_length: f32) -> Self {
        Self::new(Vec3::new(width * 0.5, height * 0.5, 0.0), focal_length)
    }

    /// `(right, up, forward)` for `axis`.
    ///
    /// "Up" points toward the top of the screen. World Y grows downward in the
    /// X/Y view so scene coordinates read like pixel coordinates.
    pub fn basis(axis: ViewAxis) -> (Vec3, Vec3, Vec3) {
        match axis {
            ViewAxis::Z => (Vec3::X, Vec3::NEG_Y, Vec3::Z),
            ViewAxis::Y => (Vec3::X, Vec3::Z, Vec3::Y),
        }
    }

    /// Row-basis view matrix: `view * (p - focus, 0)` yields
    /// `(right·p, up·p, forward·p)`.
    pub fn view_matrix(axis: ViewAxis) -> Mat4 {
        let (right, up, forward) = Self::basis(axis);
        Mat4::from_cols(right.extend(0.0), up.extend(0.0), forward.extend(0.0), Vec4::W).transpose()
    }

    /// Focus xyz with the focal length in w, as the shader expects it.
    pub fn packed(&self) -> [f32; 4] {
        self.focus.extend(self.focal_length).to_array()
    }

    /// CPU mirror of the shader's projection.
    pub fn project(&self, axis: ViewAxis, point: Vec3, zoom: f32, resolution: Vec2) -> Option<Projection> {
        let v = Self::view_matrix(axis) * (point - self.focus).extend(0.0);
        let denom = self.focal_length + v.z;
        if denom <= 1.0 {
            return None;
        }
        let scale = self.focal_length / denom * zoom;
        let half = resolution * 0.5;
        Some(Projection {
            pixel: Vec2::new(half.x + v.x * scale, half.y - v.y * scale),
            scale,
            depth: v.z,
        })
    }
}
