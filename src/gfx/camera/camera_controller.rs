use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::camera::Camera;

/// Browser-style pixels per wheel line.
pub const PIXELS_PER_LINE: f32 = 100.0;

/// Translates winit events into the camera's input record.
///
/// The controller never moves the camera itself; it only records, and
/// [`Camera::update`] applies the motion once per frame.
pub struct CameraController {
    enabled: bool,
    focused: bool,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            enabled: true,
            focused: true,
        }
    }

    /// While disabled, presses are ignored but releases still go through so
    /// nothing stays stuck.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Relative pointer motion, dropped while the window is unfocused.
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut Camera) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.enabled && self.focused {
                camera
                    .input_mut()
                    .record_pointer_motion(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    /// Buttons, wheel and focus changes. Returns true if the event was used.
    pub fn process_window_event(&mut self, event: &WindowEvent, camera: &mut Camera) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                self.process_button(*button, *state, camera);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if self.enabled {
                    camera.input_mut().record_scroll(scroll_amount(delta));
                }
                true
            }
            WindowEvent::Focused(false) => {
                self.focused = false;
                camera.input_mut().reset();
                false
            }
            WindowEvent::Focused(true) => {
                self.focused = true;
                false
            }
            _ => false,
        }
    }

    fn process_button(&mut self, button: MouseButton, state: ElementState, camera: &mut Camera) {
        match state {
            ElementState::Pressed if self.enabled => camera.input_mut().press_button(button),
            ElementState::Pressed => {}
            ElementState::Released => camera.input_mut().release_button(button),
        }
    }

    /// Movement keys. Returns true if the key is one the camera listens to.
    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut Camera) -> bool {
        let PhysicalKey::Code(code) = event.physical_key else {
            return false;
        };
        if !is_camera_key(code) {
            return false;
        }
        match event.state {
            ElementState::Pressed if self.enabled => camera.input_mut().press_key(code),
            ElementState::Pressed => {}
            ElementState::Released => camera.input_mut().release_key(code),
        }
        true
    }
}

pub fn is_camera_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::KeyW
            | KeyCode::KeyA
            | KeyCode::KeyS
            | KeyCode::KeyD
            | KeyCode::KeyQ
            | KeyCode::KeyE
            | KeyCode::ArrowUp
            | KeyCode::ArrowDown
            | KeyCode::ArrowLeft
            | KeyCode::ArrowRight
    )
}

/// Wheel delta in pixels, positive when scrolling towards the user.
///
/// winit reports wheel-up as positive `y`, the opposite of browser `deltaY`.
pub fn scroll_amount(delta: &MouseScrollDelta) -> f32 {
    -match delta {
        MouseScrollDelta::LineDelta(_, lines) => lines * PIXELS_PER_LINE,
        MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32,
    }
}
