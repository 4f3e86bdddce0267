use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes, WindowId},
};

use crate::composer::{Composer, Shortcut};
use crate::config::ComposerConfig;
use crate::error::GfxError;
use crate::gfx::rendering::RenderEngine;

pub struct ComposerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ComposerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    composer: Option<Composer>,
    last_frame: Instant,
}

impl ComposerApp {
    pub fn new(config: ComposerConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                composer: None,
                last_frame: Instant::now(),
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated with an error")
    }
}

impl AppState {
    fn init_gpu(&mut self, window: Arc<Window>) -> Result<(), GfxError> {
        let (width, height) = window.inner_size().into();
        let mut render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.vsync,
        ))?;
        let composer = Composer::new(&self.config, width, height, render_engine.geometry_store())?;
        log::info!(
            "renderer ready: {}x{} {:?}",
            width,
            height,
            render_engine.surface_format()
        );

        self.window = Some(window);
        self.composer = Some(composer);
        self.render_engine = Some(render_engine);
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let (Some(composer), Some(render_engine)) =
            (self.composer.as_mut(), self.render_engine.as_mut())
        else {
            return;
        };
        if composer
            .controller
            .process_keyed_events(event, &mut composer.camera)
        {
            return;
        }
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(shortcut) = Shortcut::from_key(code) else {
            return;
        };
        match composer.apply(shortcut, render_engine.geometry_store()) {
            Ok(true) => {}
            Ok(false) => event_loop.exit(),
            Err(err) => log::error!("{shortcut:?} failed: {err}"),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(composer), Some(render_engine)) =
            (self.composer.as_mut(), self.render_engine.as_mut())
        else {
            return;
        };

        let now = Instant::now();
        let delta_time = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let (width, height) = render_engine.get_surface_size();
        let frame = match composer.record_frame(delta_time, width, height) {
            Ok(frame) => frame,
            Err(err) => {
                log::error!("failed to record frame: {err}");
                return;
            }
        };

        match render_engine.render(frame) {
            Ok(()) => {}
            Err(GfxError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                render_engine.reconfigure();
            }
            Err(GfxError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                log::error!("surface out of memory, exiting");
                event_loop.exit();
            }
            Err(err) => log::error!("render failed: {err}"),
        }
        log::trace!("frame recorded in {:?}", now.elapsed());
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.window_size;
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(width, height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        if let Err(err) = self.init_gpu(window) {
            log::error!("failed to initialise renderer: {err}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(composer) = self.composer.as_mut() {
            composer
                .controller
                .process_window_event(&event, &mut composer.camera);
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(composer) = self.composer.as_mut() {
                    composer.resize(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(composer) = self.composer.as_mut() {
            composer.controller.process_events(&event, &mut composer.camera);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let (Some(composer), Some(render_engine)) =
            (self.composer.as_mut(), self.render_engine.as_mut())
        {
            if let Err(err) = composer.shutdown(render_engine.geometry_store()) {
                log::warn!("failed to release geometry on exit: {err}");
            }
        }
        log::info!("composer shut down");
    }
}
