use wgpu::util::DeviceExt;

use crate::pipelines::{uniform_bind_group, uniform_layout};

/// Scene lighting: one ambient term and one point light.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, uniform: LightUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("light"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = uniform_layout(device, "light");
        let bind_group = uniform_bind_group(device, &bind_group_layout, &buffer, "light");
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write_to_buffer(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub position: [f32; 3],
    // vec3 members are 16 byte aligned
    _padding: u32,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl LightUniform {
    pub fn new(ambient: ([f32; 3], f32), position: [f32; 3], point: ([f32; 3], f32)) -> Self {
        Self {
            ambient_color: ambient.0,
            ambient_intensity: ambient.1,
            position,
            _padding: 0,
            color: point.0,
            intensity: point.1,
        }
    }
}

impl Default for LightUniform {
    /// White ambient light and a white point light at (2, 3, 4), both at half strength.
    fn default() -> Self {
        Self::new(([1.0; 3], 0.5), [2.0, 3.0, 4.0], ([1.0; 3], 0.5))
    }
}
