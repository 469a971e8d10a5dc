use wgpu::util::DeviceExt;

use crate::{
    data_structures::{instance::Instance, model::Model},
    render::Instanced,
};

/**
 * A `MeshGroup` is one model drawn at any number of transforms with a single
 * instanced draw call.
 *
 * Changes to `instances` only reach the GPU after `write_to_buffer`.
 */
#[derive(Debug)]
pub struct MeshGroup {
    pub id: u32,
    pub model: Model,
    pub instances: Vec<Instance>,
    pub instance_buffer: wgpu::Buffer,
    capacity: usize,
}

impl MeshGroup {
    pub fn new(id: u32, device: &wgpu::Device, model: Model, instances: Vec<Instance>) -> Self {
        let instance_buffer = mk_instance_buffer(device, &model.mesh.name, &instances);
        let capacity = instances.len();
        Self {
            id,
            model,
            instances,
            instance_buffer,
            capacity,
        }
    }

    pub fn single(id: u32, device: &wgpu::Device, model: Model, instance: Instance) -> Self {
        Self::new(id, device, model, vec![instance])
    }

    /// Upload the instance transforms. The buffer is recreated when it is too small.
    pub fn write_to_buffer(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.instances.len() > self.capacity {
            self.instance_buffer = mk_instance_buffer(device, &self.model.mesh.name, &self.instances);
            self.capacity = self.instances.len();
            return;
        }
        let data = self.instances.iter().map(Instance::to_raw).collect::<Vec<_>>();
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&data));
    }

    pub fn instanced(&self) -> Instanced<'_> {
        Instanced {
            instance: &self.instance_buffer,
            model: &self.model,
            amount: self.instances.len(),
            id: self.id,
        }
    }
}

fn mk_instance_buffer(device: &wgpu::Device, name: &str, instances: &[Instance]) -> wgpu::Buffer {
    let instance_data = instances.iter().map(Instance::to_raw).collect::<Vec<_>>();
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Instance Buffer", name)),
        contents: bytemuck::cast_slice(&instance_data),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}
