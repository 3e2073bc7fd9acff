use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, Modifiers};

/// Current input state for the window.
///
/// Holds "is down" information. Per-frame transitions are recorded into an
/// `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered while unfocused; drop held keys.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { modifiers, .. } => {
                self.modifiers = *modifiers;
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseWheelDelta;

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), code: 0, repeat }
    }

    #[test]
    fn press_and_release_are_tracked() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(&mut f, key(Key::Tab, KeyState::Pressed, false));
        assert!(s.key_down(Key::Tab));
        assert!(f.keys_pressed.contains(&Key::Tab));

        s.apply_event(&mut f, key(Key::Tab, KeyState::Released, false));
        assert!(!s.key_down(Key::Tab));
        assert!(f.keys_released.contains(&Key::Tab));
    }

    #[test]
    fn repeats_are_not_fresh_presses() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(&mut f, key(Key::Digit2, KeyState::Pressed, false));
        s.apply_event(&mut f, key(Key::Digit2, KeyState::Pressed, true));
        s.apply_event(&mut f, key(Key::Digit5, KeyState::Pressed, false));

        let pressed: Vec<Key> = f.key_presses().collect();
        assert_eq!(pressed, vec![Key::Digit2, Key::Digit5]);
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::Y, KeyState::Pressed, false));
        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(s.keys_down.is_empty());
    }

    #[test]
    fn wheel_events_are_kept_in_order() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        let m = Modifiers { ctrl: true, ..Modifiers::default() };
        s.apply_event(&mut f, InputEvent::MouseWheel { delta: MouseWheelDelta::Line { x: 0.0, y: 1.0 }, modifiers: m });
        s.apply_event(&mut f, InputEvent::MouseWheel { delta: MouseWheelDelta::Line { x: 0.0, y: -2.0 }, modifiers: m });

        let ys: Vec<f32> = f.wheel().map(|d| d.vertical_lines(40.0)).collect();
        assert_eq!(ys, vec![1.0, -2.0]);
        assert!(s.modifiers.any());

        f.clear();
        assert!(f.events.is_empty());
    }
}
