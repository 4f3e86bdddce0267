// src/lib.rs
//! Scenecraft
//!
//! An interactive composer for scenes of primitive solids, built on wgpu and
//! winit.

pub mod app;
pub mod composer;
pub mod config;
pub mod error;
pub mod gfx;
pub mod math;
pub mod prelude;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ComposerApp;
pub use composer::{Composer, Shortcut};
pub use config::ComposerConfig;
pub use error::{GfxError, MathError};

/// Creates an application with configuration read from the environment
pub fn default() -> anyhow::Result<ComposerApp> {
    ComposerApp::new(ComposerConfig::from_env())
}
