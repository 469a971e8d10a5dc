//! The two demo scenes and the resources they share.

pub mod donuts;
pub mod materials;

use crate::{
    context::InitContext,
    data_structures::texture::{Texture, Wrap},
    resources::{self, font::Typeface, texture::procedural_matcap},
};

pub use donuts::DonutsScene;
pub use materials::MaterialsScene;

pub const MATCAP_TEXTURE: &str = "textures/matcaps/8.png";
pub const DOOR_COLOR_TEXTURE: &str = "textures/door/color.jpg";
pub const FONT: &str = "fonts/helvetiker_regular.typeface.json";

/// Load a matcap image, or paint a lit sphere when it is unavailable.
pub(crate) async fn load_matcap(ctx: &InitContext, file_name: &str) -> anyhow::Result<Texture> {
    let texture = match resources::load_texture(file_name, &ctx.device, &ctx.queue, None).await {
        Ok(texture) => texture,
        Err(e) => {
            log::warn!("Matcap {} unavailable ({:#}), using a generated one", file_name, e);
            let img = image::DynamicImage::ImageRgba8(procedural_matcap(256, [0.95, 0.62, 0.42]));
            Texture::from_image(&ctx.device, &ctx.queue, &img, Some("procedural matcap"))?
        }
    };
    Ok(texture.with_wrap(&ctx.device, Wrap::Clamp))
}

/// Load a typeface file, or fall back to the face built into the binary.
pub(crate) async fn load_typeface(file_name: &str) -> anyhow::Result<Typeface> {
    match resources::load_typeface(file_name).await {
        Ok(typeface) => Ok(typeface),
        Err(e) => {
            log::warn!("Typeface {} unavailable ({:#}), using the bundled one", file_name, e);
            Typeface::bundled()
        }
    }
}
