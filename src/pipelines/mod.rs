//! Render pipelines and their shaders.
//!
//! Three pipelines exist: `standard` lights meshes with metalness and
//! roughness, `matcap` shades them from a lookup texture, and `gui` draws
//! the flat debug overlay on top of both.

pub mod gui;
pub mod light;
pub mod matcap;
pub mod standard;

use crate::data_structures::texture::Texture;

/// Every pipeline the render loop batches into, created once per context.
#[derive(Debug)]
pub struct Pipelines {
    pub standard: wgpu::RenderPipeline,
    pub matcap: wgpu::RenderPipeline,
    pub gui: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        light_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            standard: standard::pipeline(device, format, camera_layout, light_layout),
            matcap: matcap::pipeline(device, format, camera_layout),
            gui: gui::pipeline(device, format),
        }
    }
}

/// How a pipeline treats the depth buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Depth {
    /// Test and write, nearest fragment wins.
    Test,
    /// Always pass, never write.
    Overlay,
}

/// The parts that differ between the pipelines. Everything else is shared:
/// triangle lists, counter clockwise front faces, one sample.
pub(crate) struct PipelineDesc<'a> {
    pub label: &'a str,
    pub shader: &'a str,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub vertex_layouts: &'a [wgpu::VertexBufferLayout<'a>],
    pub blend: wgpu::BlendState,
    pub cull_mode: Option<wgpu::Face>,
    pub depth: Depth,
}

pub(crate) fn build(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    desc: PipelineDesc,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(desc.label),
        source: wgpu::ShaderSource::Wgsl(desc.shader.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: desc.bind_group_layouts,
        immediate_size: 0,
    });
    let (depth_write_enabled, depth_compare) = match desc.depth {
        Depth::Test => (true, wgpu::CompareFunction::Less),
        Depth::Overlay => (false, wgpu::CompareFunction::Always),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: desc.vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(desc.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            cull_mode: desc.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Layout of a single uniform buffer at binding 0, visible to both stages.
pub(crate) fn uniform_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

pub(crate) fn uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}
