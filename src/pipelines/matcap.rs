use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
    },
    pipelines::{Depth, PipelineDesc, build},
    resources::texture::texture_layout,
};

/// Unlit pipeline shading by view-space normal lookup: matcap at group 0, camera at group 1.
pub fn pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    build(
        device,
        format,
        PipelineDesc {
            label: "matcap",
            shader: include_str!("matcap.wgsl"),
            bind_group_layouts: &[&texture_layout(device), camera_layout],
            vertex_layouts: &[ModelVertex::desc(), InstanceRaw::desc()],
            blend: wgpu::BlendState::REPLACE,
            cull_mode: Some(wgpu::Face::Back),
            depth: Depth::Test,
        },
    )
}
