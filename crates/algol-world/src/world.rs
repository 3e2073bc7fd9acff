use serde_json::Value;

use crate::error::WorldError;
use crate::object::{Planet, Star, WorldObject};
use crate::preset::{ObjectParams, Preset};

/// The mutable collection of simulated objects.
///
/// Objects are kept in insertion order. Every object added is a distinct entry;
/// there is no deletion, only wholesale replacement via [`World::replace_with`].
///
/// Frame queries ([`colors`], [`as_tuples`], [`packed`]) return objects sorted
/// ascending by radius. The sort is stable, so equal radii keep insertion order
/// and the lists are always co-indexed.
///
/// [`colors`]: World::colors
/// [`as_tuples`]: World::as_tuples
/// [`packed`]: World::packed
#[derive(Debug, Default)]
pub struct World {
    objects: Vec<Box<dyn WorldObject>>,
}

impl World {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preset(preset: &Preset) -> Self {
        let mut world = Self::new();
        world.replace_with(preset);
        world
    }

    /// Adds a statically typed object.
    pub fn add(&mut self, obj: impl WorldObject + 'static) {
        self.objects.push(Box::new(obj));
    }

    pub fn extend<I>(&mut self, objs: I)
    where
        I: IntoIterator<Item = Box<dyn WorldObject>>,
    {
        self.objects.extend(objs);
    }

    /// Adds an object described by a JSON value.
    ///
    /// The value must be an object with `"kind": "star"` or `"kind": "planet"`
    /// and the fields of [`ObjectParams`]. Anything else is rejected with
    /// [`WorldError::NotAWorldObject`] and the world is left untouched.
    pub fn add_entry(&mut self, value: Value) -> Result<(), WorldError> {
        let not_an_object = || WorldError::NotAWorldObject(value.to_string());

        let kind = value
            .as_object()
            .and_then(|map| map.get("kind"))
            .and_then(Value::as_str)
            .ok_or_else(not_an_object)?;

        let obj: Box<dyn WorldObject> = match kind {
            "star" | "planet" => {
                let params: ObjectParams =
                    serde_json::from_value(value.clone()).map_err(|_| not_an_object())?;
                if kind == "star" {
                    Box::new(Star::from_params(&params))
                } else {
                    Box::new(Planet::from_params(&params))
                }
            }
            _ => return Err(not_an_object()),
        };

        self.objects.push(obj);
        Ok(())
    }

    /// Replaces every object with the contents of `preset`.
    ///
    /// Stars are inserted before planets, each in file order.
    pub fn replace_with(&mut self, preset: &Preset) {
        self.objects.clear();
        self.objects.reserve(preset.object_count());
        self.extend(
            preset
                .stars
                .iter()
                .map(|p| Box::new(Star::from_params(p)) as Box<dyn WorldObject>),
        );
        self.extend(
            preset
                .planets
                .iter()
                .map(|p| Box::new(Planet::from_params(p)) as Box<dyn WorldObject>),
        );
        log::debug!(
            "world replaced: {} stars, {} planets",
            preset.stars.len(),
            preset.planets.len()
        );
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Moves every object to its position at elapsed time `t`.
    pub fn update(&mut self, t: f32) {
        for obj in &mut self.objects {
            obj.update(t);
        }
    }

    /// Objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn WorldObject> {
        self.objects.iter().map(|o| o.as_ref())
    }

    /// Objects sorted ascending by radius (stable).
    pub fn sorted_by_radius(&self) -> Vec<&dyn WorldObject> {
        let mut sorted: Vec<&dyn WorldObject> = self.iter().collect();
        sorted.sort_by(|a, b| a.radius().total_cmp(&b.radius()));
        sorted
    }

    /// Colors in radius order, alpha carrying the object's emission flag.
    pub fn colors(&self) -> Vec<[f32; 4]> {
        self.sorted_by_radius()
            .into_iter()
            .map(color_entry)
            .collect()
    }

    /// `(x, y, z, radius)` in radius order.
    pub fn as_tuples(&self) -> Vec<[f32; 4]> {
        self.sorted_by_radius()
            .into_iter()
            .map(|o| o.as_tuple())
            .collect()
    }

    /// Both frame lists from a single sort: `(bodies, colors)`.
    pub fn packed(&self) -> (Vec<[f32; 4]>, Vec<[f32; 4]>) {
        self.sorted_by_radius()
            .into_iter()
            .map(|o| (o.as_tuple(), color_entry(o)))
            .unzip()
    }
}

fn color_entry(o: &dyn WorldObject) -> [f32; 4] {
    let [r, g, b] = o.color();
    [r, g, b, o.kind().emission()]
}
