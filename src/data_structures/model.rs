//! GPU meshes, materials and the draw helpers used by the render loop.

use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::{data_structures::texture::Texture, geometry::MeshData};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl ModelVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2, // uv
        2 => Float32x3  // normal
    ];
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// A texture (plus optional parameter buffer) bound as group 0 of a mesh pipeline.
#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub texture: Texture,
    pub params: Option<wgpu::Buffer>,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    /// Texture and sampler only, as used by the matcap pipeline.
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        texture: Texture,
        layout: &wgpu::BindGroupLayout,
    ) -> anyhow::Result<Self> {
        let sampler = texture
            .sampler
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Texture for material {} has no sampler", name))?;
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some(name),
        });
        Ok(Self {
            name: name.to_string(),
            texture,
            params: None,
            bind_group,
        })
    }

    /// Texture, sampler and a uniform buffer with the material parameters.
    pub fn with_params<P: bytemuck::Pod>(
        device: &wgpu::Device,
        name: &str,
        texture: Texture,
        params: P,
        layout: &wgpu::BindGroupLayout,
    ) -> anyhow::Result<Self> {
        let sampler = texture
            .sampler
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Texture for material {} has no sampler", name))?;
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Params", name)),
            contents: bytemuck::cast_slice(&[params]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffer.as_entire_binding(),
                },
            ],
            label: Some(name),
        });
        Ok(Self {
            name: name.to_string(),
            texture,
            params: Some(buffer),
            bind_group,
        })
    }

    pub fn write_params<P: bytemuck::Pod>(&self, queue: &wgpu::Queue, params: P) {
        match &self.params {
            Some(buffer) => queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[params])),
            None => log::warn!("Material {} has no parameter buffer", self.name),
        }
    }
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl Mesh {
    pub fn from_data(device: &wgpu::Device, name: &str, data: &MeshData) -> Self {
        let vertices = data.vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: data.indices.len() as u32,
        }
    }
}

/// A mesh drawn with one material.
#[derive(Debug)]
pub struct Model {
    pub mesh: Mesh,
    pub material: std::rc::Rc<Material>,
}

pub trait DrawModel {
    /// Draw `model` with its material at group 0 and `groups` bound from group 1 on.
    fn draw_model_instanced(&mut self, model: &Model, instances: Range<u32>, groups: &[&wgpu::BindGroup]);
}

impl DrawModel for wgpu::RenderPass<'_> {
    fn draw_model_instanced(&mut self, model: &Model, instances: Range<u32>, groups: &[&wgpu::BindGroup]) {
        self.set_vertex_buffer(0, model.mesh.vertex_buffer.slice(..));
        self.set_index_buffer(model.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, &model.material.bind_group, &[]);
        for (i, group) in groups.iter().enumerate() {
            self.set_bind_group(i as u32 + 1, *group, &[]);
        }
        self.draw_indexed(0..model.mesh.num_elements, 0, instances);
    }
}
