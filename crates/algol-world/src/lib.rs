//! Algol scene model.
//!
//! Owns everything the renderer needs to know about the simulated scene,
//! without touching the GPU:
//! - [`Trajectory`]: closed-form per-axis oscillation
//! - [`WorldObject`] and its variants [`Star`] and [`Planet`]
//! - [`World`]: the mutable object collection, queried once per frame
//! - [`Preset`] / [`PresetLibrary`]: JSON scene descriptions on disk
//!
//! ```no_run
//! use algol_world::{Preset, World};
//!
//! let preset = Preset::load("presets/preset1.json").unwrap();
//! let mut world = World::from_preset(&preset);
//! world.update(1.5);
//! let (bodies, colors) = world.packed();
//! assert_eq!(bodies.len(), colors.len());
//! ```

pub mod error;
pub mod object;
pub mod preset;
pub mod trajectory;
pub mod world;

pub use error::WorldError;
pub use object::{ObjectKind, Planet, Star, WorldObject};
pub use preset::{ObjectParams, Preset, PresetLibrary};
pub use trajectory::Trajectory;
pub use world::World;
