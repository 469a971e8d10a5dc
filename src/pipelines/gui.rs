use crate::pipelines::{Depth, PipelineDesc, build};

/// A corner of a flat, untextured overlay quad in normalised device coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x4  // color
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Alpha blended quads drawn over the scene regardless of depth.
pub fn pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    build(
        device,
        format,
        PipelineDesc {
            label: "gui",
            shader: include_str!("gui.wgsl"),
            bind_group_layouts: &[],
            vertex_layouts: &[Vertex::desc()],
            blend: wgpu::BlendState::ALPHA_BLENDING,
            cull_mode: None,
            depth: Depth::Overlay,
        },
    )
}
