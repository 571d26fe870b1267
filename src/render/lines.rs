use super::helpers;
use crate::constants::{AXES_LENGTH, GRID_CENTER_COLOR, GRID_COLOR, GRID_DIVISIONS, GRID_SIZE};
use crate::gizmos::{self, LineVertex};
use ignite_core::bounds::Aabb;
use ignite_core::constants::BOUNDS_HELPER_COLOR;
use wgpu::util::DeviceExt;

struct LineBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

fn line_buffer(device: &wgpu::Device, label: &str, vertices: &[LineVertex]) -> Option<LineBuffer> {
    if vertices.is_empty() {
        return None;
    }
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    Some(LineBuffer {
        buffer,
        count: vertices.len() as u32,
    })
}

/// Grid, axes and the framed-bounds box.
pub(crate) struct LineResources {
    pipeline: wgpu::RenderPipeline,
    grid: Option<LineBuffer>,
    axes: Option<LineBuffer>,
    bounds: Option<LineBuffer>,
}

const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

pub(crate) fn create_line_resources(
    device: &wgpu::Device,
    frame_bgl: &wgpu::BindGroupLayout,
    color_format: wgpu::TextureFormat,
) -> LineResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("lines_shader"),
        source: wgpu::ShaderSource::Wgsl(super::LINES_WGSL.into()),
    });
    let pl = helpers::pipeline_layout(device, "lines_pl", &[frame_bgl]);
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("lines_pipeline"),
        layout: Some(&pl),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &ATTRS,
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::LineList,
            ..Default::default()
        },
        depth_stencil: Some(helpers::depth_state(true)),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });

    let grid = gizmos::grid_lines(GRID_SIZE, GRID_DIVISIONS, GRID_CENTER_COLOR, GRID_COLOR);
    let axes = gizmos::axes_lines(AXES_LENGTH);
    LineResources {
        pipeline,
        grid: line_buffer(device, "grid_vb", &grid),
        axes: line_buffer(device, "axes_vb", &axes),
        bounds: None,
    }
}

impl LineResources {
    pub(crate) fn set_bounds(&mut self, device: &wgpu::Device, bounds: Option<Aabb>) {
        self.bounds = bounds.and_then(|b| {
            line_buffer(device, "bounds_vb", &gizmos::box_lines(&b, BOUNDS_HELPER_COLOR))
        });
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_pipeline(&self.pipeline);
        for lines in [&self.grid, &self.axes, &self.bounds].into_iter().flatten() {
            rpass.set_vertex_buffer(0, lines.buffer.slice(..));
            rpass.draw(0..lines.count, 0..1);
        }
    }
}
