use cgmath::{InnerSpace, Vector3};

/// Texture + sampler, as bound by the matcap pipeline.
pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    material_layout(device, "matcap material", false)
}

/// Texture + sampler + material parameters, as bound by the standard pipeline.
pub fn standard_material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    material_layout(device, "standard material", true)
}

fn material_layout(device: &wgpu::Device, label: &str, with_params: bool) -> wgpu::BindGroupLayout {
    let entry = |binding, ty| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty,
        count: None,
    };
    let mut entries = vec![
        entry(
            0,
            wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
        ),
        entry(1, wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)),
    ];
    if with_params {
        entries.push(entry(
            2,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
        ));
    }
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &entries,
    })
}

/**
 * A lit sphere painted on the CPU. Stands in for the matcap image when it
 * cannot be loaded, so the scene still shows shaded geometry.
 */
pub fn procedural_matcap(size: u32, base: [f32; 3]) -> image::RgbaImage {
    let size = size.max(1);
    let light = Vector3::new(-0.4f32, 0.6, 0.7).normalize();
    let half = (light + Vector3::unit_z()).normalize();
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;

    image::RgbaImage::from_fn(size, size, |x, y| {
        let nx = (x as f32 + 0.5) / size as f32 * 2.0 - 1.0;
        let ny = 1.0 - (y as f32 + 0.5) / size as f32 * 2.0;
        let r2 = nx * nx + ny * ny;
        if r2 > 1.0 {
            // rim colour for normals facing away
            return image::Rgba([to_u8(base[0] * 0.2), to_u8(base[1] * 0.2), to_u8(base[2] * 0.2), 255]);
        }
        let normal = Vector3::new(nx, ny, (1.0 - r2).sqrt());
        let diffuse = normal.dot(light).max(0.0);
        let specular = normal.dot(half).max(0.0).powi(32);
        let shade = |c: f32| to_u8(c * (0.25 + 0.75 * diffuse) + specular * 0.6);
        image::Rgba([shade(base[0]), shade(base[1]), shade(base[2]), 255])
    })
}
