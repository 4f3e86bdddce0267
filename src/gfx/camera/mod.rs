pub mod camera;
pub mod camera_controller;
pub mod camera_utils;
pub mod input;

// Re-export main types
pub use camera::{Camera, ProjectionMode, WidthListener};
pub use camera_controller::CameraController;
pub use camera_utils::{to_wgpu_projection, OPENGL_TO_WGPU_MATRIX};
pub use input::CameraInput;
