//! WGPU-based rendering engine
//!
//! Owns the surface, device and every GPU resource, and replays a
//! [`FrameRecorder`] command list into render passes.

use wgpu::TextureFormat;

use crate::error::GfxError;
use crate::gfx::resources::{GpuGeometryStore, TextureResource};
use crate::wgpu_utils::{binding_types, UniformPool};

use super::frame::{FrameRecorder, Primitive, ProgramKind, RenderCommand, Viewport};
use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::uniforms::{DrawUniformsRaw, PassUniformsRaw};

/// Pipeline registered for a program and primitive.
///
/// The overlay only ever fills, so Unlit line loops have no pipeline.
pub fn pipeline_name(program: ProgramKind, primitive: Primitive) -> Option<&'static str> {
    match (program, primitive) {
        (ProgramKind::Lit, Primitive::Triangles) => Some("lit_fill"),
        (ProgramKind::Lit, Primitive::LineLoop) => Some("lit_outline"),
        (ProgramKind::Unlit, Primitive::Triangles) => Some("unlit_fill"),
        (ProgramKind::Unlit, Primitive::LineLoop) => None,
    }
}

/// Every pipeline name with the shader and topology it is built from.
const PIPELINES: [(&str, &str, Primitive); 3] = [
    ("lit_fill", "lit", Primitive::Triangles),
    ("lit_outline", "lit", Primitive::LineLoop),
    ("unlit_fill", "unlit", Primitive::Triangles),
];

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    pass_layout: wgpu::BindGroupLayout,
    draw_layout: wgpu::BindGroupLayout,
    pass_uniforms: UniformPool<PassUniformsRaw>,
    draw_uniforms: UniformPool<DrawUniformsRaw>,
    geometry: GpuGeometryStore,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `vsync` - Present with `AutoVsync` instead of `AutoNoVsync`
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, GfxError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| GfxError::Pipeline("surface reports no formats".to_string()))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("surface configured: {}x{} {:?}", config.width, config.height, format);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let visibility = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let pass_layout =
            binding_types::uniform_layout(&device, "Pass Uniforms Layout", visibility);
        let draw_layout =
            binding_types::uniform_layout(&device, "Draw Uniforms Layout", visibility);

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("lit", include_str!("lit.wgsl"));
        pipeline_manager.load_shader("unlit", include_str!("unlit.wgsl"));

        let layouts = vec![pass_layout.clone(), draw_layout.clone()];
        for (name, shader, primitive) in PIPELINES {
            let config = PipelineConfig::default()
                .with_label(name)
                .with_shader(shader)
                .with_color_format(format)
                .with_bind_group_layouts(layouts.clone());
            let config = match primitive {
                Primitive::Triangles => config,
                // outlines sit exactly on the filled surface
                Primitive::LineLoop => config
                    .with_primitive_topology(wgpu::PrimitiveTopology::LineStrip)
                    .with_cull_mode(None)
                    .with_depth_compare(Some(wgpu::CompareFunction::LessEqual)),
            };
            pipeline_manager.register_pipeline(name, config);
        }
        pipeline_manager.create_all_pipelines()?;

        let geometry = GpuGeometryStore::new(device.clone());

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            pass_layout,
            draw_layout,
            pass_uniforms: UniformPool::new("Pass Uniforms"),
            draw_uniforms: UniformPool::new("Draw Uniforms"),
            geometry,
        })
    }

    /// Submits one recorded frame and presents it
    ///
    /// Every `Clear` opens a render pass; commands before the first `Clear`
    /// draw on top of the previous contents.
    pub fn render(&mut self, frame: &FrameRecorder) -> Result<(), GfxError> {
        self.upload_uniforms(frame);

        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut pass_slot = 0;
        let mut draw_slot = 0;
        for segment in split_passes(frame.commands()) {
            let (color_load, depth_load) = match segment.first() {
                Some(RenderCommand::Clear { color, depth }) => (
                    match color {
                        Some([r, g, b]) => wgpu::LoadOp::Clear(wgpu::Color {
                            r: *r as f64,
                            g: *g as f64,
                            b: *b as f64,
                            a: 1.0,
                        }),
                        None => wgpu::LoadOp::Load,
                    },
                    if *depth {
                        wgpu::LoadOp::Clear(1.0)
                    } else {
                        wgpu::LoadOp::Load
                    },
                ),
                _ => (wgpu::LoadOp::Load, wgpu::LoadOp::Load),
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composer Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut program: Option<ProgramKind> = None;
            let mut visible = true;
            for command in segment {
                match command {
                    RenderCommand::Clear { .. } => {}
                    RenderCommand::BindProgram(binding) => {
                        let bind_group = self
                            .pass_uniforms
                            .bind_group(pass_slot)
                            .ok_or(GfxError::PassNotBound)?;
                        render_pass.set_bind_group(0, bind_group, &[]);
                        program = Some(binding.kind());
                        pass_slot += 1;
                    }
                    RenderCommand::SetViewport(viewport) => {
                        match viewport.clamped_to(self.config.width, self.config.height) {
                            Some(Viewport {
                                x,
                                y,
                                width,
                                height,
                            }) => {
                                render_pass.set_viewport(
                                    x as f32,
                                    y as f32,
                                    width as f32,
                                    height as f32,
                                    0.0,
                                    1.0,
                                );
                                visible = true;
                            }
                            None => visible = false,
                        }
                    }
                    RenderCommand::Draw(call) => {
                        let slot = draw_slot;
                        draw_slot += 1;
                        if !visible {
                            continue;
                        }
                        let program = program.ok_or(GfxError::PassNotBound)?;
                        let mesh = self
                            .geometry
                            .get(call.geometry)
                            .ok_or(GfxError::UnknownGeometry(call.geometry))?;
                        let name = pipeline_name(program, call.primitive).ok_or_else(|| {
                            GfxError::Pipeline(format!("{program:?} {:?}", call.primitive))
                        })?;
                        let pipeline = self
                            .pipeline_manager
                            .pipeline(name)
                            .ok_or_else(|| GfxError::Pipeline(name.to_string()))?;
                        let bind_group = self
                            .draw_uniforms
                            .bind_group(slot)
                            .ok_or(GfxError::PassNotBound)?;

                        render_pass.set_pipeline(pipeline);
                        render_pass.set_bind_group(1, bind_group, &[]);
                        mesh.bind(&mut render_pass);
                        render_pass.draw_indexed(0..call.index_count.min(mesh.index_len), 0, 0..1);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        log::trace!("frame submitted: {} draws", draw_slot);
        Ok(())
    }

    /// Queues every uniform write of the frame ahead of the passes.
    fn upload_uniforms(&mut self, frame: &FrameRecorder) {
        let mut pass_slot = 0;
        let mut draw_slot = 0;
        for command in frame.commands() {
            match command {
                RenderCommand::BindProgram(binding) => {
                    self.pass_uniforms.write(
                        &self.device,
                        &self.queue,
                        &self.pass_layout,
                        pass_slot,
                        PassUniformsRaw::from(binding),
                    );
                    pass_slot += 1;
                }
                RenderCommand::Draw(call) => {
                    self.draw_uniforms.write(
                        &self.device,
                        &self.queue,
                        &self.draw_layout,
                        draw_slot,
                        DrawUniformsRaw::from(&call.uniforms),
                    );
                    draw_slot += 1;
                }
                _ => {}
            }
        }
    }

    /// Resizes the surface and recreates the depth texture
    ///
    /// Zero-sized requests, as sent while minimized, are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        log::info!("surface resized to {width}x{height}");
    }

    /// Reconfigures the surface at its current size, after `Lost`/`Outdated`
    pub fn reconfigure(&mut self) {
        self.resize(self.config.width, self.config.height);
    }

    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = present_mode(enable);
        self.surface.configure(&self.device, &self.config);
    }

    /// Returns current surface dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    /// Geometry store that nodes upload into and release from
    pub fn geometry_store(&mut self) -> &mut GpuGeometryStore {
        &mut self.geometry
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// Splits a command list at every `Clear`, each part becoming one pass.
fn split_passes(commands: &[RenderCommand]) -> Vec<&[RenderCommand]> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (i, command) in commands.iter().enumerate() {
        if i > start && matches!(command, RenderCommand::Clear { .. }) {
            segments.push(&commands[start..i]);
            start = i;
        }
    }
    if start < commands.len() {
        segments.push(&commands[start..]);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::frame::ProgramBinding;
    use crate::math::Mat4;

    #[test]
    fn recorded_primitives_map_to_registered_pipelines() {
        let registered: Vec<&str> = PIPELINES.iter().map(|(name, _, _)| *name).collect();
        for (program, primitive) in [
            (ProgramKind::Lit, Primitive::Triangles),
            (ProgramKind::Lit, Primitive::LineLoop),
            (ProgramKind::Unlit, Primitive::Triangles),
        ] {
            let name = pipeline_name(program, primitive).expect("pipeline");
            assert!(registered.contains(&name), "{name} not registered");
        }
        assert_eq!(pipeline_name(ProgramKind::Unlit, Primitive::LineLoop), None);
        assert_eq!(registered.len(), 3);
    }

    #[test]
    fn pipeline_table_matches_names() {
        for (name, shader, primitive) in PIPELINES {
            let program = match shader {
                "lit" => ProgramKind::Lit,
                _ => ProgramKind::Unlit,
            };
            assert_eq!(pipeline_name(program, primitive), Some(name));
        }
    }

    #[test]
    fn passes_split_at_clears() {
        let mut frame = FrameRecorder::new();
        frame.set_viewport(Viewport::full(4, 4));
        frame.clear(Some([0.0; 3]), true);
        frame.bind_program(ProgramBinding::Unlit {
            view: Mat4::identity(),
            projection: Mat4::identity(),
        });
        frame.clear(None, true);

        let segments = split_passes(frame.commands());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].len(), 1);
        assert_eq!(segments[1].len(), 2);
        assert!(matches!(segments[2][0], RenderCommand::Clear { color: None, .. }));
        assert!(split_passes(&[]).is_empty());
    }
}
