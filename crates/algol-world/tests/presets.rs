use std::fs;
use std::path::PathBuf;

use algol_world::{ObjectKind, Preset, PresetLibrary, World, WorldError};

/// Fresh scratch directory per test, under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("algol-world-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const BINARY: &str = r#"{
    "stars": [
        { "radius": 120, "center": [640, 360, 0], "color": [1.0, 0.9, 0.7] },
        { "radius": 60,  "center": [640, 360, 0], "axes_lengths": [800, 0, 400],
          "velocities": [0.6, 0, 0.6], "color": [0.6, 0.7, 1.0] }
    ],
    "planets": [
        { "radius": 20, "center": [640, 360, 0], "axes_lengths": [500, 60, 300],
          "velocities": [1.1, 1.1, 1.1], "phase": [0, 1.57, 0], "color": [0.4, 0.3, 0.2] }
    ]
}"#;

#[test]
fn library_loads_slot_into_world() {
    let dir = scratch_dir("slot");
    fs::write(dir.join("preset2.json"), BINARY).unwrap();

    let lib = PresetLibrary::new(&dir);
    let preset = lib.load(2).unwrap();
    let world = World::from_preset(&preset);

    assert_eq!(world.len(), 3);
    let (bodies, colors) = world.packed();
    let radii: Vec<f32> = bodies.iter().map(|b| b[3]).collect();
    assert_eq!(radii, vec![20.0, 60.0, 120.0]);
    assert_eq!(colors[0][3], ObjectKind::Planet.emission());
    assert_eq!(colors[2], [1.0, 0.9, 0.7, ObjectKind::Star.emission()]);
}

#[test]
fn unknown_slot_is_not_found() {
    let dir = scratch_dir("missing");
    fs::write(dir.join("preset1.json"), BINARY).unwrap();

    let lib = PresetLibrary::new(&dir);
    assert!(lib.load(1).is_ok());

    let err = lib.load(8).unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
    match err {
        WorldError::PresetIo { path, .. } => assert_eq!(path, dir.join("preset8.json")),
        other => panic!("expected an io error, got {other}"),
    }
}

#[test]
fn malformed_file_is_format_error() {
    let dir = scratch_dir("malformed");
    let path = dir.join("preset3.json");
    fs::write(&path, "{ \"stars\": [ { \"radius\": \"big\" } ] }").unwrap();

    let err = Preset::load(&path).unwrap_err();
    assert!(matches!(err, WorldError::PresetFormat { .. }));
    assert!(!err.is_not_found());
}

#[test]
fn positions_follow_elapsed_time_not_history() {
    let preset = Preset::from_json_str(BINARY).unwrap();

    let mut stepped = World::from_preset(&preset);
    for i in 0..100 {
        stepped.update(i as f32 * 0.05);
    }
    stepped.update(3.0);

    let mut direct = World::from_preset(&preset);
    direct.update(3.0);

    assert_eq!(stepped.as_tuples(), direct.as_tuples());
}
