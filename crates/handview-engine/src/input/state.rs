use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, MouseButton, MouseButtonState};

/// Current input state for a single window.
///
/// Holds "is down" information. Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = f;
                if !f {
                    // On focus loss, clear "down" sets so nothing stays stuck.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    // Repeats never re-insert, so a held key reports one press.
                    if self.keys_down.insert(key) {
                        frame.keys_pressed.insert(key);
                    }
                }
                KeyState::Released => {
                    self.keys_down.remove(&key);
                }
            },

            InputEvent::PointerButton { button, state } => match state {
                MouseButtonState::Pressed => {
                    if self.buttons_down.insert(button) {
                        frame.buttons_pressed.insert(button);
                    }
                }
                MouseButtonState::Released => {
                    self.buttons_down.remove(&button);
                }
            },
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}
