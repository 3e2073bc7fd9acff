use anyhow::Result;
use glam::Vec2;

use algol_engine::core::{App, AppControl, FrameCtx, FrameStatus};
use algol_engine::render::{BlitRenderer, ShaderTemplate, StorageTarget};
use algol_engine::window::RuntimeCtx;
use algol_world::{PresetLibrary, World, WorldError};

use crate::camera::Camera;
use crate::config::StudioConfig;
use crate::luminance::{mean_luminance, LuminanceReadback, Sample};
use crate::raster::{SceneRaster, SceneUniform};
use crate::recorder::{EventLog, LuminanceCsv};
use crate::scene::{default_preset, DEFAULT_SCENE_NAME};
use crate::session::{Session, SessionEvent, PIXELS_PER_LINE};

/// The render loop: input, preset reloads, world update, compute dispatch,
/// blit, luminance sampling.
pub struct AlgolApp {
    config: StudioConfig,
    session: Session,
    camera: Camera,

    world: World,
    library: PresetLibrary,
    preset_name: String,

    target: StorageTarget,
    raster: SceneRaster,
    blit: BlitRenderer,
    readback: LuminanceReadback,

    events: EventLog,
    csv: LuminanceCsv,
}

impl AlgolApp {
    /// Opens the output files and builds the initial scene.
    pub fn new(config: StudioConfig, shader: ShaderTemplate) -> Result<Self> {
        let events = EventLog::append(&config.event_log_path)?;
        let csv = LuminanceCsv::create(&config.csv_path)?;

        let (w, h) = (config.width as f32, config.height as f32);
        let mut app = Self {
            session: Session::new(),
            camera: Camera::centered(w, h, config.focal_length),
            world: World::from_preset(&default_preset(w, h)),
            library: PresetLibrary::new(config.presets_dir.clone()),
            preset_name: DEFAULT_SCENE_NAME.to_string(),
            target: StorageTarget::new("algol scene texture"),
            raster: SceneRaster::new(shader),
            blit: BlitRenderer::new(),
            readback: LuminanceReadback::new(),
            events,
            csv,
            config,
        };

        if let Some(slot) = app.config.initial_preset {
            app.load_preset(slot);
        }
        Ok(app)
    }

    /// Replaces the world with preset `slot`. A missing, unreadable or
    /// malformed file leaves the scene as it is.
    fn load_preset(&mut self, slot: u8) {
        let name = PresetLibrary::file_name(slot);
        match self.library.load(slot) {
            Ok(preset) => {
                self.world.replace_with(&preset);
                log::info!("loaded {name} ({} objects)", self.world.len());
                self.events.log(format!("loaded {name} ({} objects)", self.world.len()));
                self.preset_name = name;
            }
            Err(e) if e.is_not_found() => {
                log::warn!("{name} not found in {}", self.library.dir().display());
                self.events.log(format!("{name} not found"));
            }
            Err(e @ WorldError::PresetFormat { .. }) => {
                log::warn!("{:#}", anyhow::Error::from(e));
                self.events.log(format!("{name} could not be parsed"));
            }
            Err(e) => {
                let msg = format!("{:#}", anyhow::Error::from(e));
                log::warn!("{msg}");
                self.events.log(msg);
            }
        }
    }

    fn apply_input(&mut self, ctx: &FrameCtx<'_, '_>) -> AppControl {
        let mut control = AppControl::Continue;
        let record = |events: &mut EventLog, ev: SessionEvent| {
            log::debug!("{ev}");
            events.log(ev.to_string());
        };

        for key in ctx.input_frame.key_presses() {
            match self.session.handle_key(key) {
                Some(SessionEvent::ExitRequested) => {
                    record(&mut self.events, SessionEvent::ExitRequested);
                    control = AppControl::Exit;
                }
                Some(ev) => record(&mut self.events, ev),
                None => {}
            }
        }

        let lines: f32 = ctx
            .input_frame
            .wheel()
            .map(|d| d.vertical_lines(PIXELS_PER_LINE))
            .sum();
        if let Some(ev) = self.session.scroll(lines) {
            record(&mut self.events, ev);
        }

        control
    }

    fn scene_uniform(&self, size: (u32, u32)) -> SceneUniform {
        let [r, g, b] = self.config.background;
        SceneUniform {
            view: Camera::view_matrix(self.session.axis()).to_cols_array_2d(),
            background: [r, g, b, 1.0],
            camera: self.camera.packed(),
            resolution: Vec2::new(size.0 as f32, size.1 as f32).to_array(),
            zoom: self.session.zoom(),
            checkerboard: self.session.checkerboard() as u32,
            object_count: self.world.len() as u32,
            _pad: [0; 3],
        }
    }
}

impl App for AlgolApp {
    fn on_start(&mut self, runtime: &mut RuntimeCtx) -> Result<()> {
        runtime.set_title(format!("{} - {}", self.config.title, self.preset_name));
        self.events.log(format!("started with {}", self.preset_name));
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        ctx.gpu.poll();
        if let Some((sample, sum)) = self.readback.take_ready() {
            let mean = mean_luminance(sum, sample.pixel_count);
            self.csv.record(sample.time, mean, &sample.preset);
        }

        if self.apply_input(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        if let Some(slot) = self.session.take_preset_request() {
            let before = self.preset_name.clone();
            self.load_preset(slot);
            if self.preset_name != before {
                ctx.runtime.set_title(format!("{} - {}", self.config.title, self.preset_name));
            }
        }

        let elapsed = ctx.time.elapsed;
        self.world.update(elapsed);
        let (bodies, colors) = self.world.packed();

        let size = ctx.window.physical_size();
        let scene = self.scene_uniform(size);
        let sample = Sample {
            time: elapsed,
            preset: self.preset_name.clone(),
            pixel_count: 0,
        };

        let (target, raster, blit, readback) =
            (&mut self.target, &mut self.raster, &mut self.blit, &mut self.readback);

        let status = ctx.render(self.config.clear_color(), |rctx, frame| {
            target.ensure_size(rctx.device, rctx.size);
            raster.dispatch(rctx, frame.encoder, target, &scene, &bodies, &colors);
            if let Some(sum_buf) = raster.luminance_buffer() {
                let sample = Sample { pixel_count: target.pixel_count(), ..sample };
                readback.record_copy(rctx.device, frame.encoder, sum_buf, sample);
            }
            blit.render(rctx, frame, target);
        });

        self.readback.begin_map(status == FrameStatus::Presented);

        match status {
            FrameStatus::Fatal => {
                log::error!("surface lost; exiting");
                AppControl::Exit
            }
            FrameStatus::Presented | FrameStatus::Skipped => AppControl::Continue,
        }
    }

    fn on_exit(&mut self) {
        self.events.log("exit");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::*;

    const PAIR: &str = r#"{
        "stars": [ { "radius": 50, "center": [100, 100, 0] } ],
        "planets": [ { "radius": 10, "center": [300, 100, 0], "axes_lengths": [200, 0, 0],
                       "velocities": [1, 0, 0] } ]
    }"#;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("algol-app-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("presets")).unwrap();
        dir
    }

    fn app_in(dir: &Path, initial_preset: Option<u8>) -> AlgolApp {
        let config = StudioConfig {
            presets_dir: dir.join("presets"),
            event_log_path: dir.join("events.log"),
            csv_path: dir.join("luminance.csv"),
            initial_preset,
            ..StudioConfig::default()
        };
        AlgolApp::new(config, ShaderTemplate::new("scene", "")).unwrap()
    }

    /// Messages of the event log, without timestamps.
    fn logged(dir: &Path) -> Vec<String> {
        fs::read_to_string(dir.join("events.log"))
            .unwrap()
            .lines()
            .map(|l| l.split_once(';').unwrap().1.to_string())
            .collect()
    }

    // ── preset reloads ────────────────────────────────────────────────────

    #[test]
    fn missing_preset_keeps_world() {
        let dir = scratch_dir("missing");
        let mut app = app_in(&dir, None);
        app.world.update(2.0);
        let before = app.world.as_tuples();

        app.load_preset(7);

        assert_eq!(app.world.as_tuples(), before);
        assert_eq!(app.preset_name, DEFAULT_SCENE_NAME);
        assert_eq!(logged(&dir), vec!["preset7.json not found"]);
    }

    #[test]
    fn malformed_preset_keeps_world() {
        let dir = scratch_dir("malformed");
        fs::write(dir.join("presets/preset2.json"), PAIR).unwrap();
        fs::write(dir.join("presets/preset3.json"), "{ \"stars\": [ { \"radius\": ").unwrap();
        let mut app = app_in(&dir, Some(2));
        app.world.update(1.0);
        let before = app.world.as_tuples();

        app.load_preset(3);

        assert_eq!(app.world.as_tuples(), before);
        assert_eq!(app.preset_name, "preset2.json");
        assert_eq!(
            logged(&dir),
            vec!["loaded preset2.json (2 objects)", "preset3.json could not be parsed"]
        );
    }

    #[test]
    fn unreadable_preset_reports_the_io_error() {
        let dir = scratch_dir("unreadable");
        fs::create_dir_all(dir.join("presets/preset5.json")).unwrap();
        let mut app = app_in(&dir, None);
        let before = app.world.as_tuples();

        app.load_preset(5);

        assert_eq!(app.world.as_tuples(), before);
        assert_eq!(app.preset_name, DEFAULT_SCENE_NAME);
        let lines = logged(&dir);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("failed to read preset"), "{}", lines[0]);
        assert!(lines[0].contains("preset5.json"));
        assert!(!lines[0].contains("could not be parsed"));
    }

    #[test]
    fn valid_preset_replaces_world() {
        let dir = scratch_dir("valid");
        fs::write(dir.join("presets/preset4.json"), PAIR).unwrap();
        let mut app = app_in(&dir, None);

        app.load_preset(4);
        app.world.update(0.0);

        assert_eq!(app.preset_name, "preset4.json");
        assert_eq!(
            app.world.as_tuples(),
            vec![[300.0, 100.0, 0.0, 10.0], [100.0, 100.0, 0.0, 50.0]]
        );
        assert_eq!(logged(&dir), vec!["loaded preset4.json (2 objects)"]);
    }

    #[test]
    fn startup_falls_back_to_default_scene() {
        let dir = scratch_dir("startup");
        let app = app_in(&dir, Some(1));

        assert_eq!(app.preset_name, DEFAULT_SCENE_NAME);
        assert_eq!(app.world.len(), 2);
        assert_eq!(
            fs::read_to_string(dir.join("luminance.csv")).unwrap(),
            "time,mean_luminance,preset_name\n"
        );
    }
}
