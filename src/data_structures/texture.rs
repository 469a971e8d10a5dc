//! GPU textures: the depth buffer and sampled RGBA images.
//!
//! Every sampled texture is uploaded as `Rgba8UnormSrgb` with a linear
//! sampler. Matcaps clamp at the edge, surface maps repeat.

use anyhow::{Context, Result, bail};
use image::{GenericImageView, ImageFormat};

/// How a sampler treats uvs outside [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Wrap {
    #[default]
    Repeat,
    Clamp,
}

impl From<Wrap> for wgpu::AddressMode {
    fn from(wrap: Wrap) -> Self {
        match wrap {
            Wrap::Repeat => wgpu::AddressMode::Repeat,
            Wrap::Clamp => wgpu::AddressMode::ClampToEdge,
        }
    }
}

/// A GPU texture with its view. Depth textures carry no sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

impl Texture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Depth attachment of `[width, height]`, at least 1x1.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(size[0].max(1), size[1].max(1)),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            sampler: None,
        }
    }

    /// A 1x1 texture of a single colour. Used where a material has no image.
    pub fn solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: [u8; 4],
        label: &str,
    ) -> Result<Self> {
        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba(rgba));
        Self::from_rgba(device, queue, &img, label)
    }

    /// Decode an image file. `format` is an extension hint such as `"png"`,
    /// `None` sniffs the format from the bytes.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
        format: Option<&str>,
    ) -> Result<Self> {
        let img = match format {
            None => image::load_from_memory(bytes),
            Some(ext) => {
                let format = ImageFormat::from_extension(ext)
                    .with_context(|| format!("Unknown image format {} for {}", ext, label))?;
                image::load_from_memory_with_format(bytes, format)
            }
        }
        .with_context(|| format!("Could not decode {}", label))?;
        Self::from_image(device, queue, &img, Some(label))
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Result<Self> {
        let label = label.unwrap_or("image");
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            bail!("Texture {} has no pixels", label);
        }
        Self::from_rgba(device, queue, &img.to_rgba8(), label)
    }

    fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &image::RgbaImage,
        label: &str,
    ) -> Result<Self> {
        let (width, height) = rgba.dimensions();
        let size = extent(width, height);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            rgba.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        Ok(Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            texture,
            sampler: Some(sampler(device, Wrap::Repeat)),
        })
    }

    /// Replace the sampler with one that wraps uvs as `wrap` says.
    pub fn with_wrap(mut self, device: &wgpu::Device, wrap: Wrap) -> Self {
        self.sampler = Some(sampler(device, wrap));
        self
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

fn sampler(device: &wgpu::Device, wrap: Wrap) -> wgpu::Sampler {
    let mode = wrap.into();
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(match wrap {
            Wrap::Repeat => "repeat sampler",
            Wrap::Clamp => "clamp sampler",
        }),
        address_mode_u: mode,
        address_mode_v: mode,
        address_mode_w: mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
