use bytemuck::Zeroable;
use glam::Vec3;
use ignite_core::constants::{
    rgb_hex, AMBIENT_INTENSITY, BACKGROUND_COLOR, SUN_INTENSITY, SUN_POSITION,
};
use ignite_core::{Aabb, Asset, Camera, PointLight, ViewerContext};
use web_sys as web;

mod helpers;
mod lines;
mod mesh;
mod sprite;

use helpers::pack;
use lines::{create_line_resources, LineResources};
use mesh::{create_mesh_resources, MeshResources};
use sprite::{create_sprite_resources, SpriteResources};

// Shaders bundled as string constants
pub(crate) static MESH_WGSL: &str = include_str!("../shaders/mesh.wgsl");
pub(crate) static SPRITE_WGSL: &str = include_str!("../shaders/sprite.wgsl");
pub(crate) static LINES_WGSL: &str = include_str!("../shaders/lines.wgsl");

/// Per-frame camera and lighting block shared by every pipeline (group 0).
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    sun_dir: [f32; 4],
    ambient: [f32; 4],
    point_pos: [f32; 4],
    point_color: [f32; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
}

impl FrameUniforms {
    fn new(camera: &Camera, light: &PointLight) -> Self {
        let (right, up) = camera.billboard_axes();
        let (point_color, range) = if light.visible {
            (light.color * light.intensity, light.range)
        } else {
            (Vec3::ZERO, 0.0)
        };
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: pack(camera.eye, 1.0),
            sun_dir: pack(SUN_POSITION.normalize_or_zero(), SUN_INTENSITY),
            ambient: pack(Vec3::ONE * AMBIENT_INTENSITY, 1.0),
            point_pos: pack(light.position, range),
            point_color: pack(point_color, light.decay),
            cam_right: pack(right, 0.0),
            cam_up: pack(up, 0.0),
        }
    }
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: (wgpu::Texture, wgpu::TextureView),

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    mesh: MeshResources,
    sprite: SpriteResources,
    lines: LineResources,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    uploaded_generation: u64,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth = helpers::create_depth_texture(&device, width, height);

        let frame_bgl = helpers::uniform_layout(
            &device,
            "frame_bgl",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );
        let frame_buffer =
            helpers::uniform_buffer(&device, "frame_ub", &FrameUniforms::zeroed());
        let frame_bind_group =
            helpers::uniform_bind_group(&device, "frame_bg", &frame_bgl, &frame_buffer);

        let mesh = create_mesh_resources(&device, &frame_bgl, format);
        let sprite = create_sprite_resources(&device, &frame_bgl, format);
        let lines = create_line_resources(&device, &frame_bgl, format);

        let bg = helpers::srgb_to_linear(rgb_hex(BACKGROUND_COLOR));
        let clear_color = wgpu::Color {
            r: bg.x as f64,
            g: bg.y as f64,
            b: bg.z as f64,
            a: 1.0,
        };
        log::info!("[gpu] surface {}x{} {:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth,
            frame_buffer,
            frame_bind_group,
            mesh,
            sprite,
            lines,
            width,
            height,
            clear_color,
            uploaded_generation: 0,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth = helpers::create_depth_texture(&self.device, width, height);
        }
    }

    /// Re-apply the current configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Rebuild geometry for a newly attached asset.
    fn upload_asset(&mut self, asset: &Asset, bounds: Option<Aabb>) {
        self.mesh.upload(&self.device, asset);
        self.lines.set_bounds(&self.device, bounds);
    }

    pub fn render(&mut self, ctx: &ViewerContext) -> Result<(), wgpu::SurfaceError> {
        if let Some(asset) = ctx.asset() {
            if ctx.asset_generation() != self.uploaded_generation {
                self.upload_asset(asset, ctx.framed_bounds());
                self.uploaded_generation = ctx.asset_generation();
            }
            self.mesh.update(&self.queue, asset);
        }
        let uniforms = FrameUniforms::new(ctx.camera(), ctx.effect().light());
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.sprite.update(&self.queue, ctx.effect().marker());

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.1,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.frame_bind_group, &[]);
            if let Some(asset) = ctx.asset() {
                self.mesh.draw(&mut rpass, asset);
            }
            self.lines.draw(&mut rpass);
            // additive, after all opaque geometry
            self.sprite.draw(&mut rpass);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
