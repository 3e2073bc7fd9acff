use std::fmt;

/// Keyboard key identifier.
///
/// Only the keys the studio binds are named. Anything else maps to
/// `Key::Unknown(u32)` carrying the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Tab,
    Space,
    Y,
    Z,

    // Top row and numpad map to the same variant.
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    Unknown(u32),
}

impl Key {
    /// Numeric value of a digit key.
    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Digit0 => Some(0),
            Key::Digit1 => Some(1),
            Key::Digit2 => Some(2),
            Key::Digit3 => Some(3),
            Key::Digit4 => Some(4),
            Key::Digit5 => Some(5),
            Key::Digit6 => Some(6),
            Key::Digit7 => Some(7),
            Key::Digit8 => Some(8),
            Key::Digit9 => Some(9),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse wheel delta.
///
/// `Line` corresponds to notched wheels; `Pixel` to touchpads and
/// high-precision wheels (logical pixels).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Vertical scroll expressed in wheel lines, `px_per_line` pixels per line.
    ///
    /// Positive values scroll up / away from the user.
    pub fn vertical_lines(self, px_per_line: f32) -> f32 {
        match self {
            MouseWheelDelta::Line { y, .. } => y,
            MouseWheelDelta::Pixel { y, .. } => {
                if px_per_line > 0.0 { y / px_per_line } else { 0.0 }
            }
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// Stable platform code when available.
        code: u32,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },

    /// Window focus change.
    Focused(bool),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.digit() {
            Some(d) => write!(f, "{d}"),
            None => write!(f, "{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_have_values() {
        assert_eq!(Key::Digit0.digit(), Some(0));
        assert_eq!(Key::Digit7.digit(), Some(7));
        assert_eq!(Key::Z.digit(), None);
    }

    #[test]
    fn display_uses_digit_value() {
        assert_eq!(Key::Digit3.to_string(), "3");
        assert_eq!(Key::Tab.to_string(), "Tab");
    }

    #[test]
    fn pixel_wheel_converts_to_lines() {
        let d = MouseWheelDelta::Pixel { x: 0.0, y: -80.0 };
        assert_eq!(d.vertical_lines(40.0), -2.0);
        assert_eq!(d.vertical_lines(0.0), 0.0);
        assert_eq!(MouseWheelDelta::Line { x: 3.0, y: 1.5 }.vertical_lines(40.0), 1.5);
    }
}
