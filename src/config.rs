// src/config.rs
//! Start-up configuration.
//!
//! Defaults reproduce the composer's stock look. Setters follow the
//! consuming `with_*` builder style; [`ComposerConfig::from_env`] layers a
//! few environment overrides on top.

use crate::math::Vector3;

/// Camera start state, also the target of `Camera::load_default_values`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: Vector3,
    /// Euler degrees
    pub rotation: Vector3,
    /// Horizontal field of view in degrees
    pub fov: f32,
    pub ortho_width: f32,
    pub near: f32,
    pub far: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(4.0, 5.0, 10.0),
            rotation: Vector3::new(-20.0, 20.0, 0.0),
            fov: 80.0,
            ortho_width: 25.0,
            near: 0.1,
            far: 1000.0,
            speed: 0.6,
            sensitivity: 3.0,
        }
    }
}

impl CameraConfig {
    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_ortho_width(mut self, width: f32) -> Self {
        self.ortho_width = width;
        self
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposerConfig {
    pub title: String,
    pub window_size: (u32, u32),
    pub vsync: bool,
    /// Side length in pixels of each gizmo viewport
    pub gizmo_size: u32,
    /// Clear colour of the scene pass, also used as the ambient light colour
    pub background_color: [f32; 3],
    pub outline_color: [f32; 3],
    pub spotlight_strength: f32,
    /// Direction the scene light travels in
    pub light_direction: Vector3,
    pub camera: CameraConfig,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            title: "Scenecraft".to_string(),
            window_size: (1280, 720),
            vsync: true,
            gizmo_size: 150,
            background_color: [0.30, 0.35, 0.40],
            outline_color: [2.0, 0.2, 0.5],
            spotlight_strength: 0.60,
            light_direction: Vector3::new(1.0, -1.0, -0.5),
            camera: CameraConfig::default(),
        }
    }
}

impl ComposerConfig {
    pub const ENV_VSYNC: &'static str = "SCENECRAFT_VSYNC";
    pub const ENV_GIZMO_SIZE: &'static str = "SCENECRAFT_GIZMO_SIZE";

    /// Defaults with `SCENECRAFT_VSYNC` and `SCENECRAFT_GIZMO_SIZE` applied.
    pub fn from_env() -> Self {
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key/value source. Unparsable values are
    /// logged and ignored.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(Self::ENV_VSYNC) {
            match parse_bool(&raw) {
                Some(vsync) => self.vsync = vsync,
                None => log::warn!("ignoring {}={raw:?}: expected a boolean", Self::ENV_VSYNC),
            }
        }
        if let Some(raw) = lookup(Self::ENV_GIZMO_SIZE) {
            match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => self.gizmo_size = size,
                _ => log::warn!(
                    "ignoring {}={raw:?}: expected a positive integer",
                    Self::ENV_GIZMO_SIZE
                ),
            }
        }
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_gizmo_size(mut self, size: u32) -> Self {
        self.gizmo_size = size;
        self
    }

    pub fn with_background_color(mut self, color: [f32; 3]) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_light_direction(mut self, direction: Vector3) -> Self {
        self.light_direction = direction;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
