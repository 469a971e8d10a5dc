//! Offscreen targets for golden image tests.
//!
//! With the `integration-tests` feature every frame is drawn into a
//! [`Capture`] instead of the surface and read back for the flows to check.

use instant::Duration;

use crate::{context::Context, data_structures::texture::Texture};

/// Rows copied out of a texture must be a multiple of this many bytes.
const ROW_ALIGN: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

/// Round both sides up so that an RGBA8 row is a multiple of [`ROW_ALIGN`].
/// The height is padded too, which keeps the image centre on the NDC centre.
pub fn padded_size(width: u32, height: u32) -> (u32, u32) {
    let pad = |n: u32| n.div_ceil(ROW_ALIGN) * ROW_ALIGN;
    (pad(width), pad(height))
}

pub(crate) struct Capture {
    pub(crate) color: wgpu::TextureView,
    pub(crate) depth: wgpu::TextureView,
    texture: wgpu::Texture,
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
}

impl Capture {
    pub(crate) fn new(ctx: &Context) -> Self {
        let (width, height) = padded_size(ctx.config.width, ctx.config.height);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let target = |label: &str, format: wgpu::TextureFormat| {
            ctx.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
        };
        let texture = target("capture colour", ctx.config.format);
        let depth = target("capture depth", Texture::DEPTH_FORMAT);
        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("capture readback"),
            size: (4 * width * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        Self {
            color: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            depth: depth.create_view(&wgpu::TextureViewDescriptor::default()),
            texture,
            buffer,
            width,
            height,
        }
    }

    /// Queue the copy of the colour target into the readback buffer.
    pub(crate) fn copy(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.copy_texture_to_buffer(
            self.texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &self.buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * self.width),
                    rows_per_image: Some(self.height),
                },
            },
            self.texture.size(),
        );
    }

    /// Wait for the submitted frame and map it as an image.
    pub(crate) async fn read(
        &self,
        device: &wgpu::Device,
    ) -> anyhow::Result<image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>> {
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let slice = self.buffer.slice(..);
        slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).ok();
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(Duration::from_secs(3)),
            })
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        rx.receive()
            .await
            .ok_or_else(|| anyhow::anyhow!("Mapping the capture was cancelled"))??;
        image::ImageBuffer::from_raw(self.width, self.height, slice.get_mapped_range())
            .ok_or_else(|| anyhow::anyhow!("Capture has the wrong size"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_row_alignment() {
        assert_eq!(padded_size(800, 600), (1024, 768));
        assert_eq!(padded_size(256, 512), (256, 512));
        assert_eq!(padded_size(1, 1), (256, 256));
    }
}
