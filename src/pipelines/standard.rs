use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
    },
    pipelines::{Depth, PipelineDesc, build},
    resources::texture::standard_material_layout,
};

/// Lit pipeline: material at group 0, camera at group 1, lights at group 2.
pub fn pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
    light_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    build(
        device,
        format,
        PipelineDesc {
            label: "standard",
            shader: include_str!("standard.wgsl"),
            bind_group_layouts: &[&standard_material_layout(device), camera_layout, light_layout],
            vertex_layouts: &[ModelVertex::desc(), InstanceRaw::desc()],
            blend: wgpu::BlendState::REPLACE,
            cull_mode: Some(wgpu::Face::Back),
            depth: Depth::Test,
        },
    )
}
