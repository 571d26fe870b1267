use super::helpers;
use crate::constants::FLAME_SPRITE_COLOR;
use ignite_core::constants::rgb_hex;
use ignite_core::Marker;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SpriteUniforms {
    center: [f32; 4],
    size: [f32; 4],
    color: [f32; 4],
}

/// The flame marker: one camera-facing quad drawn additively.
pub(crate) struct SpriteResources {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    visible: bool,
}

pub(crate) fn create_sprite_resources(
    device: &wgpu::Device,
    frame_bgl: &wgpu::BindGroupLayout,
    color_format: wgpu::TextureFormat,
) -> SpriteResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("sprite_shader"),
        source: wgpu::ShaderSource::Wgsl(super::SPRITE_WGSL.into()),
    });
    let sprite_bgl = helpers::uniform_layout(
        device,
        "sprite_bgl",
        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
    );
    let pl = helpers::pipeline_layout(device, "sprite_pl", &[frame_bgl, &sprite_bgl]);
    let additive = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    };
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("sprite_pipeline"),
        layout: Some(&pl),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(helpers::depth_state(false)),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState {
                    color: additive,
                    alpha: additive,
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });

    let uniforms = SpriteUniforms {
        center: [0.0; 4],
        size: [0.0; 4],
        color: [0.0; 4],
    };
    let uniform_buffer = helpers::uniform_buffer(device, "sprite_ub", &uniforms);
    let bind_group = helpers::uniform_bind_group(device, "sprite_bg", &sprite_bgl, &uniform_buffer);

    SpriteResources {
        pipeline,
        uniform_buffer,
        bind_group,
        visible: false,
    }
}

impl SpriteResources {
    pub(crate) fn update(&mut self, queue: &wgpu::Queue, marker: &Marker) {
        self.visible = marker.visible && marker.scale.min_element() > 0.0;
        if !self.visible {
            return;
        }
        let u = SpriteUniforms {
            center: helpers::pack(marker.position, 1.0),
            size: [marker.scale.x, marker.scale.y, 0.0, 0.0],
            color: helpers::pack(helpers::srgb_to_linear(rgb_hex(FLAME_SPRITE_COLOR)), 1.0),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&u));
    }

    pub(crate) fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if !self.visible {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(1, &self.bind_group, &[]);
        rpass.draw(0..6, 0..1);
    }
}
