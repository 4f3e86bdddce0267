// src/gfx/camera/input.rs
//! Pending camera input.
//!
//! Event handlers only record into this structure. [`super::Camera::update`]
//! is the single reader: it consumes pointer motion and scroll once per frame
//! and clears them. Held keys and buttons persist until released.

use std::collections::HashSet;

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

#[derive(Debug, Default, Clone)]
pub struct CameraInput {
    held_keys: HashSet<KeyCode>,
    held_buttons: HashSet<MouseButton>,
    pointer_delta: Option<(f32, f32)>,
    scroll: Option<f32>,
}

impl CameraInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_key(&mut self, key: KeyCode) {
        self.held_keys.insert(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.held_keys.remove(&key);
    }

    pub fn press_button(&mut self, button: MouseButton) {
        self.held_buttons.insert(button);
    }

    pub fn release_button(&mut self, button: MouseButton) {
        self.held_buttons.remove(&button);
    }

    /// Adds relative pointer motion in pixels. Motion arriving between two
    /// updates is summed.
    pub fn record_pointer_motion(&mut self, dx: f32, dy: f32) {
        let (x, y) = self.pointer_delta.unwrap_or((0.0, 0.0));
        self.pointer_delta = Some((x + dx, y + dy));
    }

    /// Adds wheel motion; positive values move backwards.
    pub fn record_scroll(&mut self, delta: f32) {
        self.scroll = Some(self.scroll.unwrap_or(0.0) + delta);
    }

    /// Forgets everything, held state included. Used when the window loses focus.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.held_keys.contains(&key)
    }

    pub fn is_button_held(&self, button: MouseButton) -> bool {
        self.held_buttons.contains(&button)
    }

    pub fn pointer_delta(&self) -> Option<(f32, f32)> {
        self.pointer_delta
    }

    pub fn scroll(&self) -> Option<f32> {
        self.scroll
    }

    pub(super) fn take_pointer_delta(&mut self) -> Option<(f32, f32)> {
        self.pointer_delta.take()
    }

    pub(super) fn take_scroll(&mut self) -> Option<f32> {
        self.scroll.take()
    }

    /// Drops per-frame input that nothing consumed this frame.
    pub(super) fn clear_transient(&mut self) {
        self.pointer_delta = None;
        self.scroll = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_motion_accumulates_until_taken() {
        let mut input = CameraInput::new();
        input.record_pointer_motion(2.0, -1.0);
        input.record_pointer_motion(3.0, 4.0);
        assert_eq!(input.take_pointer_delta(), Some((5.0, 3.0)));
        assert_eq!(input.take_pointer_delta(), None);
    }

    #[test]
    fn held_state_survives_clearing() {
        let mut input = CameraInput::new();
        input.press_key(KeyCode::KeyW);
        input.press_button(MouseButton::Right);
        input.record_scroll(5.0);
        input.clear_transient();

        assert!(input.is_key_held(KeyCode::KeyW));
        assert!(input.is_button_held(MouseButton::Right));
        assert_eq!(input.scroll(), None);

        input.release_key(KeyCode::KeyW);
        assert!(!input.is_key_held(KeyCode::KeyW));
        input.reset();
        assert!(!input.is_button_held(MouseButton::Right));
    }
}
