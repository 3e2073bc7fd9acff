use algol_world::{Preset, ObjectParams};

/// Name recorded in the CSV while the built-in scene is shown.
pub const DEFAULT_SCENE_NAME: &str = "default";

/// A large white star in the middle of a `width` × `height` scene, with a
/// smaller yellow star swinging across it and around in depth.
pub fn default_preset(width: f32, height: f32) -> Preset {
    let center = [width / 2.0, height / 2.0, 0.0];

    let companion = ObjectParams {
        radius: 100.0,
        center,
        axes_lengths: [width * 2.0 / 3.0, 0.0, 200.0],
        velocities: [1.0, 0.0, 1.0],
        phase: [0.0; 3],
        color: [1.0, 1.0, 0.0],
    };

    Preset {
        stars: vec![ObjectParams::at(200.0, center), companion],
        planets: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algol_world::World;

    #[test]
    fn companion_swings_across_the_primary() {
        let mut world = World::from_preset(&default_preset(1280.0, 720.0));
        assert_eq!(world.len(), 2);

        world.update(std::f32::consts::FRAC_PI_2);
        let (bodies, _) = world.packed();
        // Sorted by radius: companion first.
        let companion = bodies[0];
        assert!((companion[0] - (640.0 + 1280.0 / 3.0)).abs() < 1e-2);
        assert!((companion[1] - 360.0).abs() < 1e-3);
        assert!(companion[2].abs() < 1e-3);
        assert_eq!(companion[3], 100.0);
    }

    #[test]
    fn primary_stays_put() {
        let mut world = World::from_preset(&default_preset(1280.0, 720.0));
        world.update(12.3);
        let (bodies, colors) = world.packed();
        assert_eq!(bodies[1], [640.0, 360.0, 0.0, 200.0]);
        assert_eq!(colors[1], [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn shipped_presets_parse() {
        let lib = algol_world::PresetLibrary::new(crate::config::StudioConfig::default().presets_dir);
        let mut found = 0;
        for slot in algol_world::PresetLibrary::SLOTS {
            match lib.load(slot) {
                Ok(preset) => {
                    assert!(preset.object_count() > 0, "slot {slot} is empty");
                    found += 1;
                }
                Err(e) => assert!(e.is_not_found(), "slot {slot}: {e}"),
            }
        }
        assert!(found >= 1);
    }
}
