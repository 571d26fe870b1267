use super::helpers;
use crate::constants::DEFAULT_SURFACE_GRAY;
use glam::Vec3;
use ignite_core::{Asset, MaterialId, SurfaceId};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MeshVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SurfaceUniforms {
    model: [[f32; 4]; 4],
    base_color: [f32; 4],
    emissive: [f32; 4],
}

/// GPU copy of one drawable surface.
pub(crate) struct SurfaceDraw {
    surface: SurfaceId,
    material: Option<MaterialId>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub(crate) struct MeshResources {
    pipeline: wgpu::RenderPipeline,
    surface_bgl: wgpu::BindGroupLayout,
    draws: Vec<SurfaceDraw>,
}

pub(crate) fn create_mesh_resources(
    device: &wgpu::Device,
    frame_bgl: &wgpu::BindGroupLayout,
    color_format: wgpu::TextureFormat,
) -> MeshResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("mesh_shader"),
        source: wgpu::ShaderSource::Wgsl(super::MESH_WGSL.into()),
    });
    let surface_bgl = helpers::uniform_layout(
        device,
        "surface_bgl",
        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
    );
    let pl = helpers::pipeline_layout(device, "mesh_pl", &[frame_bgl, &surface_bgl]);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("mesh_pipeline"),
        layout: Some(&pl),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[MeshVertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(helpers::depth_state(true)),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });
    MeshResources {
        pipeline,
        surface_bgl,
        draws: Vec::new(),
    }
}

impl MeshResources {
    /// Replace all GPU surfaces with the asset's.
    pub(crate) fn upload(&mut self, device: &wgpu::Device, asset: &Asset) {
        self.draws.clear();
        for surface in asset.surfaces() {
            let Some(mesh) = asset.mesh(surface.mesh) else {
                continue;
            };
            if mesh.indices.is_empty() {
                continue;
            }
            let vertices: Vec<MeshVertex> = mesh
                .positions
                .iter()
                .zip(&mesh.normals)
                .map(|(p, n)| MeshVertex {
                    position: p.to_array(),
                    normal: n.to_array(),
                })
                .collect();
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("surface_vb"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("surface_ib"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            let uniforms = surface_uniforms(asset, surface, mesh.material);
            let uniform_buffer = helpers::uniform_buffer(device, "surface_ub", &uniforms);
            let bind_group =
                helpers::uniform_bind_group(device, "surface_bg", &self.surface_bgl, &uniform_buffer);
            self.draws.push(SurfaceDraw {
                surface,
                material: mesh.material,
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
                uniform_buffer,
                bind_group,
            });
        }
        log::info!("[render] uploaded {} surfaces", self.draws.len());
    }

    /// Refresh transforms and material colours (the effect rewrites emissive).
    pub(crate) fn update(&self, queue: &wgpu::Queue, asset: &Asset) {
        for d in &self.draws {
            let u = surface_uniforms(asset, d.surface, d.material);
            queue.write_buffer(&d.uniform_buffer, 0, bytemuck::bytes_of(&u));
        }
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, asset: &Asset) {
        rpass.set_pipeline(&self.pipeline);
        for d in &self.draws {
            if !asset.is_visible(d.surface) {
                continue;
            }
            rpass.set_bind_group(1, &d.bind_group, &[]);
            rpass.set_vertex_buffer(0, d.vertex_buffer.slice(..));
            rpass.set_index_buffer(d.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..d.index_count, 0, 0..1);
        }
    }
}

fn surface_uniforms(
    asset: &Asset,
    surface: SurfaceId,
    material: Option<MaterialId>,
) -> SurfaceUniforms {
    let (base_color, emitted, lit) = match material.and_then(|id| asset.material(id)) {
        Some(m) => (m.base_color(), m.emitted(), m.is_lit()),
        None => (
            Vec3::splat(DEFAULT_SURFACE_GRAY).extend(1.0),
            Vec3::ZERO,
            true,
        ),
    };
    SurfaceUniforms {
        model: asset.world_matrix(surface.node).to_cols_array_2d(),
        base_color: base_color.to_array(),
        emissive: helpers::pack(emitted, if lit { 1.0 } else { 0.0 }),
    }
}
