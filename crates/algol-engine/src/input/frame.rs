use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState, MouseWheelDelta};

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held keys, modifiers).
/// `InputFrame` provides events and transition sets for the current frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    /// Keys pressed this frame.
    pub keys_pressed: HashSet<Key>,

    /// Keys released this frame.
    pub keys_released: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Fresh key presses (no auto-repeat) in arrival order.
    pub fn key_presses(&self) -> impl Iterator<Item = Key> + '_ {
        self.events.iter().filter_map(|ev| match ev {
            InputEvent::Key { key, state: KeyState::Pressed, repeat: false, .. } => Some(*key),
            _ => None,
        })
    }

    /// Wheel deltas in arrival order.
    pub fn wheel(&self) -> impl Iterator<Item = MouseWheelDelta> + '_ {
        self.events.iter().filter_map(|ev| match ev {
            InputEvent::MouseWheel { delta, .. } => Some(*delta),
            _ => None,
        })
    }
}
