use anyhow::Context;
use env_logger::Env;

use scenecraft::{ComposerApp, ComposerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn,naga=warn"),
    )
    .init();

    let config = ComposerConfig::from_env();
    log::info!(
        "starting {} at {}x{} (vsync {})",
        config.title,
        config.window_size.0,
        config.window_size.1,
        config.vsync
    );

    ComposerApp::new(config)
        .context("failed to set up the application")?
        .run()
}
