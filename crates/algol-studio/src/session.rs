//! Interactive per-run state driven by keyboard and wheel input.

use std::fmt;

use algol_engine::input::Key;
use algol_world::PresetLibrary;

pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 10.0;

/// Zoom multiplier per wheel line.
pub const ZOOM_STEP: f32 = 1.1;

/// Pixel wheel deltas are converted at this many pixels per line.
pub const PIXELS_PER_LINE: f32 = 40.0;

/// Axis the camera looks along.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ViewAxis {
    /// Looks along +Y; shows the X/Z plane.
    Y,
    /// Looks along +Z; shows the X/Y plane.
    #[default]
    Z,
}

impl fmt::Display for ViewAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewAxis::Y => f.write_str("Y"),
            ViewAxis::Z => f.write_str("Z"),
        }
    }
}

/// Something the session did in response to input.
///
/// The `Display` form is what goes into the event log.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SessionEvent {
    AxisChanged(ViewAxis),
    ZoomChanged(f32),
    ZoomReset,
    CheckerboardToggled(bool),
    PresetRequested(u8),
    ExitRequested,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::AxisChanged(axis) => write!(f, "view axis {axis}"),
            SessionEvent::ZoomChanged(zoom) => write!(f, "zoom {zoom:.3}"),
            SessionEvent::ZoomReset => f.write_str("zoom reset"),
            SessionEvent::CheckerboardToggled(on) => {
                write!(f, "checkerboard {}", if *on { "on" } else { "off" })
            }
            SessionEvent::PresetRequested(slot) => write!(f, "preset {slot} requested"),
            SessionEvent::ExitRequested => f.write_str("exit requested"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    axis: ViewAxis,
    zoom: f32,
    checkerboard: bool,
    pending_preset: Option<u8>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            axis: ViewAxis::default(),
            zoom: 1.0,
            checkerboard: false,
            pending_preset: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(&self) -> ViewAxis {
        self.axis
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn checkerboard(&self) -> bool {
        self.checkerboard
    }

    /// Applies one key press. Keys without a binding return `None`.
    pub fn handle_key(&mut self, key: Key) -> Option<SessionEvent> {
        let event = match key {
            Key::Y => {
                self.axis = ViewAxis::Y;
                SessionEvent::AxisChanged(ViewAxis::Y)
            }
            Key::Z => {
                self.axis = ViewAxis::Z;
                SessionEvent::AxisChanged(ViewAxis::Z)
            }
            Key::Space => {
                self.zoom = 1.0;
                SessionEvent::ZoomReset
            }
            Key::Tab => {
                self.checkerboard = !self.checkerboard;
                SessionEvent::CheckerboardToggled(self.checkerboard)
            }
            Key::Escape => SessionEvent::ExitRequested,
            other => {
                let slot = other.digit().filter(|d| PresetLibrary::SLOTS.contains(d))?;
                self.pending_preset = Some(slot);
                SessionEvent::PresetRequested(slot)
            }
        };
        Some(event)
    }

    /// Multiplies zoom by [`ZOOM_STEP`] per wheel line, clamped to
    /// [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    ///
    /// Returns the event only when the zoom actually changed.
    pub fn scroll(&mut self, lines: f32) -> Option<SessionEvent> {
        if !lines.is_finite() || lines == 0.0 {
            return None;
        }
        let zoom = (self.zoom * ZOOM_STEP.powf(lines)).clamp(MIN_ZOOM, MAX_ZOOM);
        if !zoom.is_finite() || zoom == self.zoom {
            return None;
        }
        self.zoom = zoom;
        Some(SessionEvent::ZoomChanged(zoom))
    }

    /// Takes the most recent preset request, if any.
    pub fn take_preset_request(&mut self) -> Option<u8> {
        self.pending_preset.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn axis_keys_select_view() {
        let mut s = Session::new();
        assert_eq!(s.axis(), ViewAxis::Z);
        assert_eq!(s.handle_key(Key::Y), Some(SessionEvent::AxisChanged(ViewAxis::Y)));
        assert_eq!(s.axis(), ViewAxis::Y);
        s.handle_key(Key::Z);
        assert_eq!(s.axis(), ViewAxis::Z);
    }

    #[test]
    fn tab_toggles_checkerboard() {
        let mut s = Session::new();
        assert_eq!(s.handle_key(Key::Tab), Some(SessionEvent::CheckerboardToggled(true)));
        assert_eq!(s.handle_key(Key::Tab), Some(SessionEvent::CheckerboardToggled(false)));
        assert!(!s.checkerboard());
    }

    #[test]
    fn space_resets_zoom() {
        let mut s = Session::new();
        s.scroll(5.0);
        assert!(s.zoom() > 1.0);
        s.handle_key(Key::Space);
        assert_eq!(s.zoom(), 1.0);
    }

    #[test]
    fn digits_request_presets() {
        let mut s = Session::new();
        assert_eq!(s.handle_key(Key::Digit3), Some(SessionEvent::PresetRequested(3)));
        assert_eq!(s.handle_key(Key::Digit7), Some(SessionEvent::PresetRequested(7)));
        assert_eq!(s.take_preset_request(), Some(7));
        assert_eq!(s.take_preset_request(), None);
    }

    #[test]
    fn zero_and_unbound_keys_are_ignored() {
        let mut s = Session::new();
        assert_eq!(s.handle_key(Key::Digit0), None);
        assert_eq!(s.handle_key(Key::Unknown(42)), None);
        assert_eq!(s.take_preset_request(), None);
        assert_eq!(s, Session::new());
    }

    #[test]
    fn escape_requests_exit() {
        assert_eq!(Session::new().handle_key(Key::Escape), Some(SessionEvent::ExitRequested));
    }

    // ── zoom ──────────────────────────────────────────────────────────────

    #[test]
    fn scroll_is_multiplicative() {
        let mut s = Session::new();
        s.scroll(1.0);
        assert!((s.zoom() - 1.1).abs() < 1e-6);
        s.scroll(-1.0);
        assert!((s.zoom() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zoom_stays_clamped_under_any_input() {
        let mut s = Session::new();
        let inputs = [
            1.0, 250.0, -3.0, -1e6, 1e6, 0.5, f32::INFINITY, f32::NEG_INFINITY, f32::NAN,
            -0.25, 42.0, -42.0, f32::MAX, f32::MIN, 1e-7,
        ];
        for _ in 0..10 {
            for &lines in &inputs {
                s.scroll(lines);
                assert!(
                    (MIN_ZOOM..=MAX_ZOOM).contains(&s.zoom()),
                    "zoom {} escaped after {lines}",
                    s.zoom()
                );
            }
        }
    }

    #[test]
    fn scroll_at_limit_reports_nothing() {
        let mut s = Session::new();
        s.scroll(1e6);
        assert_eq!(s.zoom(), MAX_ZOOM);
        assert_eq!(s.scroll(1.0), None);
        assert_eq!(s.scroll(0.0), None);
    }

    #[test]
    fn events_render_for_the_log() {
        assert_eq!(SessionEvent::AxisChanged(ViewAxis::Y).to_string(), "view axis Y");
        assert_eq!(SessionEvent::CheckerboardToggled(true).to_string(), "checkerboard on");
        assert_eq!(SessionEvent::PresetRequested(4).to_string(), "preset 4 requested");
        assert_eq!(SessionEvent::ZoomChanged(1.1).to_string(), "zoom 1.100");
    }
}
