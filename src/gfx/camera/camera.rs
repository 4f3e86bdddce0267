// src/gfx/camera/camera.rs
//! Free-flying composer camera with perspective and orthogonal projections.
//!
//! The camera is not a scene node. It keeps both projection matrices up to
//! date at all times and reports the one selected by its [`ProjectionMode`].
//! Every derived matrix is rebuilt eagerly by the setter that invalidates it.
//!
//! View matrix convention: `view = view_rotation * view_translation`, where
//! `view_translation` moves the world by `-position` and `view_rotation` is
//! the transpose of the camera's own rotation.
//!
//! Matrices use the OpenGL clip volume (z in -1..1). The render engine
//! remaps depth when uploading, see [`super::camera_utils::to_wgpu_projection`].

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use super::input::CameraInput;
use crate::config::CameraConfig;
use crate::math::{Mat4, Vector3};

/// Keyboard rotation is normalized then scaled by this many degrees per
/// sensitivity-second, putting it in the range of mouse drags.
const KEYBOARD_ROTATION_FACTOR: f32 = 10.0;
/// Same calibration for WASD/QE translation.
const KEYBOARD_TRANSLATION_FACTOR: f32 = 20.0;

pub const MIN_ORTHO_WIDTH: f32 = 1.0;
pub const MAX_ORTHO_WIDTH: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthogonal,
}

/// Callback fired with the new width on every orthogonal width assignment.
pub type WidthListener = Box<dyn FnMut(f32)>;

pub struct Camera {
    input: CameraInput,
    pub speed: f32,
    pub sensitivity: f32,

    position: Vector3,
    rotation: Vector3,
    view_translation: Mat4,
    view_rotation: Mat4,
    view: Mat4,

    mode: ProjectionMode,
    fov: f32,
    aspect_ratio: f32,
    perspective_width: f32,
    perspective_height: f32,
    ortho_width: f32,
    ortho_height: f32,
    near: f32,
    far: f32,
    perspective: Mat4,
    orthogonal: Mat4,

    width_listener: Option<WidthListener>,
    defaults: CameraConfig,
}

impl Camera {
    pub fn new(aspect_ratio: f32) -> Self {
        Self::with_config(CameraConfig::default(), aspect_ratio)
    }

    pub fn with_config(defaults: CameraConfig, aspect_ratio: f32) -> Self {
        let mut camera = Self {
            input: CameraInput::new(),
            speed: defaults.speed,
            sensitivity: defaults.sensitivity,
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            view_translation: Mat4::identity(),
            view_rotation: Mat4::identity(),
            view: Mat4::identity(),
            mode: ProjectionMode::Perspective,
            fov: defaults.fov,
            aspect_ratio: sanitize_aspect(aspect_ratio),
            perspective_width: 1.0,
            perspective_height: 1.0,
            ortho_width: defaults.ortho_width,
            ortho_height: 1.0,
            near: defaults.near,
            far: defaults.far,
            perspective: Mat4::identity(),
            orthogonal: Mat4::identity(),
            width_listener: None,
            defaults,
        };
        camera.load_default_values();
        camera
    }

    /// Restores the configured position, rotation, fov, ortho width, speed
    /// and sensitivity. Mode and aspect ratio are kept.
    pub fn load_default_values(&mut self) {
        let d = self.defaults;
        self.near = d.near;
        self.far = d.far;
        self.set_position(d.position);
        self.set_rotation(d.rotation);
        self.set_fov(d.fov);
        self.set_ortho_width(d.ortho_width);
        self.speed = d.speed;
        self.sensitivity = d.sensitivity;
    }

    /// Input record for event handlers to write into.
    pub fn input_mut(&mut self) -> &mut CameraInput {
        &mut self.input
    }

    pub fn input(&self) -> &CameraInput {
        &self.input
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        self.update_view_translation();
    }

    pub fn rotation(&self) -> Vector3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vector3) {
        self.rotation = rotation;
        self.update_view_rotation();
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Horizontal field of view in degrees.
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
        self.perspective_width = 2.0 * self.near * (fov / 2.0).to_radians().tan();
        self.perspective_height = self.perspective_width / self.aspect_ratio;
        self.update_perspective_matrix();
    }

    pub fn ortho_width(&self) -> f32 {
        self.ortho_width
    }

    pub fn ortho_height(&self) -> f32 {
        self.ortho_height
    }

    /// Clamps to `[MIN_ORTHO_WIDTH, MAX_ORTHO_WIDTH]`, then notifies the
    /// width listener.
    pub fn set_ortho_width(&mut self, width: f32) {
        self.ortho_width = width.clamp(MIN_ORTHO_WIDTH, MAX_ORTHO_WIDTH);
        self.ortho_height = self.ortho_width / self.aspect_ratio;
        self.update_orthogonal_matrix();
        let width = self.ortho_width;
        if let Some(listener) = self.width_listener.as_mut() {
            listener(width);
        }
    }

    pub fn set_width_listener(&mut self, listener: impl FnMut(f32) + 'static) {
        self.width_listener = Some(Box::new(listener));
    }

    pub fn clear_width_listener(&mut self) {
        self.width_listener = None;
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = sanitize_aspect(aspect_ratio);
        self.perspective_height = self.perspective_width / self.aspect_ratio;
        self.ortho_height = self.ortho_width / self.aspect_ratio;
        self.update_perspective_matrix();
        self.update_orthogonal_matrix();
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        // the perspective width is derived from near
        self.set_fov(self.fov);
        self.update_orthogonal_matrix();
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ProjectionMode) {
        self.mode = mode;
    }

    pub fn is_orthogonal(&self) -> bool {
        self.mode == ProjectionMode::Orthogonal
    }

    pub fn toggle_mode(&mut self) -> ProjectionMode {
        self.mode = match self.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthogonal,
            ProjectionMode::Orthogonal => ProjectionMode::Perspective,
        };
        self.mode
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    /// World-to-camera rotation only, used by the overlay pass.
    pub fn view_rotation_matrix(&self) -> &Mat4 {
        &self.view_rotation
    }

    pub fn view_translation_matrix(&self) -> &Mat4 {
        &self.view_translation
    }

    /// Projection of the active mode.
    pub fn projection_matrix(&self) -> &Mat4 {
        match self.mode {
            ProjectionMode::Perspective => &self.perspective,
            ProjectionMode::Orthogonal => &self.orthogonal,
        }
    }

    pub fn perspective_matrix(&self) -> &Mat4 {
        &self.perspective
    }

    pub fn orthogonal_matrix(&self) -> &Mat4 {
        &self.orthogonal
    }

    /// Consumes the pending input and moves the camera for a frame of
    /// `delta_time` seconds.
    pub fn update(&mut self, delta_time: f32) {
        self.apply_rotation(delta_time);
        self.apply_translation(delta_time);
        self.input.clear_transient();
    }

    fn apply_rotation(&mut self, delta_time: f32) {
        let mut rotation: Option<Vector3> = None;

        if self.input.is_button_held(MouseButton::Right) {
            if let Some((dx, dy)) = self.input.take_pointer_delta() {
                rotation = Some(Vector3::new(dy, dx, 0.0));
            }
        }

        let mut keyboard = Vector3::zero();
        let mut any_key = false;
        for (key, axis) in [
            (KeyCode::ArrowUp, Vector3::new(1.0, 0.0, 0.0)),
            (KeyCode::ArrowDown, Vector3::new(-1.0, 0.0, 0.0)),
            (KeyCode::ArrowLeft, Vector3::new(0.0, 1.0, 0.0)),
            (KeyCode::ArrowRight, Vector3::new(0.0, -1.0, 0.0)),
        ] {
            if self.input.is_key_held(key) {
                keyboard.add(axis);
                any_key = true;
            }
        }
        if any_key {
            // opposing keys cancel to zero, which needs no normalizing
            if !keyboard.is_zero() {
                keyboard.normalize().scale(KEYBOARD_ROTATION_FACTOR);
            }
            rotation.get_or_insert_with(Vector3::zero).add(keyboard);
        }

        if let Some(mut rotation) = rotation {
            rotation.scale(delta_time * self.sensitivity);
            self.rotation.add(rotation);
            self.update_view_rotation();
        }
    }

    fn apply_translation(&mut self, delta_time: f32) {
        let mut translation: Option<Vector3> = None;

        if self.input.is_button_held(MouseButton::Left) {
            if let Some((dx, dy)) = self.input.take_pointer_delta() {
                translation = Some(Vector3::new(-dx, dy, 0.0));
            }
        }
        if let Some(scroll) = self.input.take_scroll() {
            translation.get_or_insert_with(Vector3::zero).z = scroll;
        }

        let mut keyboard = Vector3::zero();
        let mut any_key = false;
        for (key, axis) in [
            (KeyCode::KeyW, Vector3::forward()),
            (KeyCode::KeyS, Vector3::backward()),
            (KeyCode::KeyA, Vector3::left()),
            (KeyCode::KeyD, Vector3::right()),
            (KeyCode::KeyQ, Vector3::down()),
            (KeyCode::KeyE, Vector3::up()),
        ] {
            if self.input.is_key_held(key) {
                keyboard.add(axis);
                any_key = true;
            }
        }
        if any_key {
            if !keyboard.is_zero() {
                keyboard.normalize().scale(KEYBOARD_TRANSLATION_FACTOR);
            }
            translation.get_or_insert_with(Vector3::zero).add(keyboard);
        }

        if let Some(mut translation) = translation {
            translation.scale(self.speed * delta_time);
            if self.is_orthogonal() {
                // depth motion becomes a width change in orthogonal mode
                self.set_ortho_width(self.ortho_width + translation.z);
                translation.z = 0.0;
            }
            translation.rotate_by_matrix(&self.view_rotation);
            self.position.add(translation);
            self.update_view_translation();
        }
    }

    fn update_view_translation(&mut self) {
        self.view_translation
            .set_translation(Vector3::negated(self.position));
        self.update_view_matrix();
    }

    fn update_view_rotation(&mut self) {
        self.view_rotation = Mat4::from_rotation(self.rotation).transpose();
        self.update_view_matrix();
    }

    fn update_view_matrix(&mut self) {
        self.view = Mat4::pre_multiply(&self.view_rotation, &self.view_translation);
    }

    /// Symmetric frustum (right = -left, top = -bottom).
    fn update_perspective_matrix(&mut self) {
        let (n, f) = (self.near, self.far);
        let mut m = Mat4::zero();
        m.set(0, 0, n / (self.perspective_width / 2.0));
        m.set(1, 1, n / (self.perspective_height / 2.0));
        m.set(2, 2, -(f + n) / (f - n));
        m.set(2, 3, -(2.0 * f * n) / (f - n));
        m.set(3, 2, -1.0);
        self.perspective = m;
    }

    /// Symmetric box (right = -left, top = -bottom).
    fn update_orthogonal_matrix(&mut self) {
        let (n, f) = (self.near, self.far);
        let mut m = Mat4::identity();
        m.set(0, 0, 1.0 / (self.ortho_width / 2.0));
        m.set(1, 1, 1.0 / (self.ortho_height / 2.0));
        m.set(2, 2, -2.0 / (f - n));
        m.set(2, 3, -(f + n) / (f - n));
        self.orthogonal = m;
    }
}

/// A zero-height surface would make every derived height infinite.
fn sanitize_aspect(aspect_ratio: f32) -> f32 {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        aspect_ratio
    } else {
        log::warn!("invalid aspect ratio {aspect_ratio}, using 1.0");
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPS: f32 = 1e-5;

    fn still_camera() -> Camera {
        let mut camera = Camera::new(16.0 / 9.0);
        camera.speed = 1.0;
        camera.sensitivity = 1.0;
        camera
    }

    #[test]
    fn defaults() {
        let camera = Camera::new(1.0);
        assert_eq!(camera.position(), Vector3::new(4.0, 5.0, 10.0));
        assert_eq!(camera.rotation(), Vector3::new(-20.0, 20.0, 0.0));
        assert_eq!(camera.fov(), 80.0);
        assert_eq!(camera.ortho_width(), 25.0);
        assert_eq!(camera.speed, 0.6);
        assert_eq!(camera.sensitivity, 3.0);
        assert_eq!(camera.mode(), ProjectionMode::Perspective);
    }

    #[test]
    fn fov_drives_the_perspective_scale() {
        let mut camera = Camera::new(2.0);
        camera.set_fov(80.0);
        let p = camera.perspective_matrix();
        let expected = 1.0 / 40.0_f32.to_radians().tan();
        assert!((p.get(0, 0) - expected).abs() < EPS);
        assert!((p.get(1, 1) - expected * 2.0).abs() < 1e-4);
        assert_eq!(p.get(3, 2), -1.0);
        assert_eq!(p.get(3, 3), 0.0);
    }

    #[test]
    fn perspective_maps_near_and_far_to_gl_clip_range() {
        let camera = Camera::new(1.0);
        let p = camera.perspective_matrix();
        let clip_z = |z: f32| {
            let zc = p.get(2, 2) * z + p.get(2, 3);
            let wc = p.get(3, 2) * z;
            zc / wc
        };
        assert!((clip_z(-camera.near()) + 1.0).abs() < 1e-4);
        assert!((clip_z(-camera.far()) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn orthogonal_matrix_entries() {
        let mut camera = Camera::new(2.0);
        camera.set_ortho_width(20.0);
        let o = camera.orthogonal_matrix();
        assert!((o.get(0, 0) - 0.1).abs() < EPS);
        assert!((o.get(1, 1) - 0.2).abs() < EPS);
        assert_eq!(o.get(3, 3), 1.0);
        assert_eq!(camera.ortho_height(), 10.0);
    }

    #[test]
    fn ortho_width_is_clamped_and_reported() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut camera = Camera::new(1.0);
        let sink = Rc::clone(&seen);
        camera.set_width_listener(move |w| sink.borrow_mut().push(w));

        camera.set_ortho_width(0.2);
        camera.set_ortho_width(500.0);
        camera.set_ortho_width(42.0);
        assert_eq!(*seen.borrow(), vec![1.0, 100.0, 42.0]);
        assert_eq!(camera.ortho_width(), 42.0);
    }

    #[test]
    fn aspect_ratio_updates_both_projections() {
        let mut camera = Camera::new(1.0);
        let before = camera.perspective_matrix().get(1, 1);
        camera.set_aspect_ratio(2.0);
        assert!((camera.perspective_matrix().get(1, 1) - before * 2.0).abs() < 1e-4);
        assert!((camera.ortho_height() - 12.5).abs() < EPS);
        assert!((camera.orthogonal_matrix().get(1, 1) - 2.0 / 12.5).abs() < EPS);
    }

    #[test]
    fn view_is_rotation_times_translation() {
        let camera = Camera::new(1.0);
        let expected = Mat4::pre_multiply(
            &Mat4::from_rotation(camera.rotation()).transpose(),
            &Mat4::from_translation(-camera.position()),
        );
        assert!(camera.view_matrix().approx_eq(&expected, EPS));

        // the camera's own position lands at the eye-space origin
        let eye = camera.view_matrix().transform_point(camera.position());
        assert!(eye.length() < 1e-4);
    }

    #[test]
    fn projection_follows_mode() {
        let mut camera = Camera::new(1.0);
        assert_eq!(camera.projection_matrix(), camera.perspective_matrix());
        assert_eq!(camera.toggle_mode(), ProjectionMode::Orthogonal);
        assert_eq!(camera.projection_matrix(), camera.orthogonal_matrix());
    }

    #[test]
    fn ortho_scroll_changes_width_not_depth() {
        let mut camera = still_camera();
        camera.set_rotation(Vector3::zero());
        camera.set_mode(ProjectionMode::Orthogonal);
        let start = camera.position();

        camera.input_mut().record_scroll(5.0);
        camera.update(1.0);

        assert_eq!(camera.ortho_width(), 30.0);
        assert_eq!(camera.position(), start);
    }

    #[test]
    fn ortho_width_zoom_respects_bounds() {
        let mut camera = still_camera();
        camera.set_mode(ProjectionMode::Orthogonal);
        camera.input_mut().record_scroll(-1000.0);
        camera.update(1.0);
        assert_eq!(camera.ortho_width(), MIN_ORTHO_WIDTH);
    }

    #[test]
    fn perspective_scroll_moves_along_view_axis() {
        let mut camera = still_camera();
        camera.set_rotation(Vector3::zero());
        camera.set_position(Vector3::zero());
        camera.input_mut().record_scroll(2.0);
        camera.update(0.5);
        assert!(camera.position().approx_eq_to(Vector3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn scroll_is_consumed_once() {
        let mut camera = still_camera();
        camera.input_mut().record_scroll(3.0);
        camera.update(1.0);
        let after_first = camera.position();
        camera.update(1.0);
        assert_eq!(camera.position(), after_first);
    }

    #[test]
    fn right_drag_rotates_and_is_consumed() {
        let mut camera = still_camera();
        camera.set_rotation(Vector3::zero());
        camera.input_mut().press_button(MouseButton::Right);
        camera.input_mut().record_pointer_motion(4.0, 2.0);
        camera.update(0.5);
        assert_eq!(camera.rotation(), Vector3::new(1.0, 2.0, 0.0));

        camera.update(0.5);
        assert_eq!(camera.rotation(), Vector3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn left_drag_pans_in_camera_space() {
        let mut camera = still_camera();
        camera.set_rotation(Vector3::new(0.0, 90.0, 0.0));
        camera.set_position(Vector3::zero());
        camera.input_mut().press_button(MouseButton::Left);
        camera.input_mut().record_pointer_motion(-1.0, 0.0);
        camera.update(1.0);

        // camera-local +X is world -Z after a 90 degree yaw
        assert!(camera.position().approx_eq_to(Vector3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn motion_without_buttons_is_dropped() {
        let mut camera = still_camera();
        let start = (camera.position(), camera.rotation());
        camera.input_mut().record_pointer_motion(10.0, 10.0);
        camera.update(1.0);
        assert_eq!((camera.position(), camera.rotation()), start);

        // the stale motion must not apply once a button goes down
        camera.input_mut().press_button(MouseButton::Right);
        camera.update(1.0);
        assert_eq!(camera.rotation(), start.1);
    }

    #[test]
    fn keyboard_rotation_is_normalized() {
        let mut camera = still_camera();
        camera.set_rotation(Vector3::zero());
        camera.input_mut().press_key(KeyCode::ArrowUp);
        camera.input_mut().press_key(KeyCode::ArrowLeft);
        camera.update(1.0);
        let r = camera.rotation();
        assert!((r.length() - KEYBOARD_ROTATION_FACTOR).abs() < 1e-4);
        assert!((r.x - r.y).abs() < EPS);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut camera = still_camera();
        let start = camera.position();
        camera.input_mut().press_key(KeyCode::KeyA);
        camera.input_mut().press_key(KeyCode::KeyD);
        camera.update(1.0);
        assert_eq!(camera.position(), start);
    }

    #[test]
    fn held_keys_keep_moving() {
        let mut camera = still_camera();
        camera.set_rotation(Vector3::zero());
        camera.set_position(Vector3::zero());
        camera.input_mut().press_key(KeyCode::KeyW);
        camera.update(0.1);
        camera.update(0.1);
        assert!(camera.position().approx_eq_to(Vector3::new(0.0, 0.0, -4.0)));

        camera.input_mut().release_key(KeyCode::KeyW);
        camera.update(0.1);
        assert!(camera.position().approx_eq_to(Vector3::new(0.0, 0.0, -4.0)));
    }

    #[test]
    fn load_default_values_restores_state() {
        let mut camera = Camera::new(1.0);
        camera.set_position(Vector3::one());
        camera.set_fov(30.0);
        camera.speed = 9.0;
        camera.load_default_values();
        assert_eq!(camera.position(), Vector3::new(4.0, 5.0, 10.0));
        assert_eq!(camera.fov(), 80.0);
        assert_eq!(camera.speed, 0.6);
    }

    #[test]
    fn invalid_aspect_falls_back() {
        let camera = Camera::new(0.0);
        assert_eq!(camera.aspect_ratio(), 1.0);
    }

    trait ApproxVec {
        fn approx_eq_to(&self, other: Vector3) -> bool;
    }

    impl ApproxVec for Vector3 {
        fn approx_eq_to(&self, other: Vector3) -> bool {
            Vector3::difference(*self, other).length() < 1e-4
        }
    }
}
