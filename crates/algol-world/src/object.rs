use std::fmt;

use glam::Vec3;

use crate::preset::ObjectParams;
use crate::trajectory::Trajectory;

/// Which variant a [`WorldObject`] is. Drives shading on the GPU.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    /// Emissive disc with a glow halo.
    Star,
    /// Opaque, dimly lit disc that occludes whatever is behind it.
    Planet,
}

impl ObjectKind {
    /// Value packed into the alpha channel of the shader color array.
    #[inline]
    pub fn emission(self) -> f32 {
        match self {
            ObjectKind::Star => 1.0,
            ObjectKind::Planet => 0.0,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Star => f.write_str("star"),
            ObjectKind::Planet => f.write_str("planet"),
        }
    }
}

/// Anything the world can hold and the compute shader can draw.
///
/// Implementors keep no integrated state: after `update(t)` the position
/// depends only on `t` and the object's construction parameters.
pub trait WorldObject: fmt::Debug {
    fn kind(&self) -> ObjectKind;

    fn radius(&self) -> f32;

    /// Linear RGB in `[0, 1]`.
    fn color(&self) -> [f32; 3];

    /// Position as of the last `update` call.
    fn position(&self) -> Vec3;

    /// Moves the object to where it is at elapsed time `t`.
    fn update(&mut self, t: f32);

    /// `(x, y, z, radius)`, the layout the shader reads.
    fn as_tuple(&self) -> [f32; 4] {
        let p = self.position();
        [p.x, p.y, p.z, self.radius()]
    }
}

/// Shared state of both variants.
#[derive(Debug, Clone, PartialEq)]
struct Body {
    radius: f32,
    color: [f32; 3],
    trajectory: Trajectory,
    position: Vec3,
}

impl Body {
    fn new(radius: f32, trajectory: Trajectory, color: [f32; 3]) -> Self {
        Self {
            radius: radius.max(0.0),
            color: color.map(|c| c.clamp(0.0, 1.0)),
            trajectory,
            position: trajectory.position_at(0.0),
        }
    }

    fn from_params(p: &ObjectParams) -> Self {
        Self::new(
            p.radius,
            Trajectory::new(
                Vec3::from_array(p.center),
                Vec3::from_array(p.axes_lengths),
                Vec3::from_array(p.velocities),
                Vec3::from_array(p.phase),
            ),
            p.color,
        )
    }
}

macro_rules! world_object_variant {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(Body);

        impl $name {
            /// Creates the object at its `t = 0` position.
            ///
            /// Negative radii clamp to zero; color channels clamp to `[0, 1]`.
            pub fn new(radius: f32, trajectory: Trajectory, color: [f32; 3]) -> Self {
                Self(Body::new(radius, trajectory, color))
            }

            /// White object resting at `center`.
            pub fn fixed(radius: f32, center: Vec3) -> Self {
                Self::new(radius, Trajectory::fixed(center), [1.0, 1.0, 1.0])
            }

            pub fn from_params(params: &ObjectParams) -> Self {
                Self(Body::from_params(params))
            }

            pub fn with_color(mut self, color: [f32; 3]) -> Self {
                self.0.color = color.map(|c| c.clamp(0.0, 1.0));
                self
            }
        }

        impl WorldObject for $name {
            #[inline]
            fn kind(&self) -> ObjectKind {
                $kind
            }

            #[inline]
            fn radius(&self) -> f32 {
                self.0.radius
            }

            #[inline]
            fn color(&self) -> [f32; 3] {
                self.0.color
            }

            #[inline]
            fn position(&self) -> Vec3 {
                self.0.position
            }

            #[inline]
            fn update(&mut self, t: f32) {
                self.0.position = self.0.trajectory.position_at(t);
            }
        }
    };
}

world_object_variant!(
    /// Emissive body.
    Star,
    ObjectKind::Star
);

world_object_variant!(
    /// Non-emissive body; eclipses stars that pass behind it.
    Planet,
    ObjectKind::Planet
);
