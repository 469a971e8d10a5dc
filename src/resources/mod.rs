use std::{path::PathBuf, sync::OnceLock};

use crate::data_structures::texture::Texture;

/**
 * This module contains all logic for loading textures and fonts from external files.
 *
 * Natively, files are read from the asset root (`./assets` unless configured).
 * On the web they are fetched relative to the page origin and public path.
 */
pub mod font;
pub mod texture;

static ASSET_ROOT: OnceLock<PathBuf> = OnceLock::new();

/// Set where assets are read from. Only the first call has an effect.
pub fn set_asset_root(root: impl Into<PathBuf>) {
    let root = root.into();
    if ASSET_ROOT.set(root.clone()).is_err() {
        log::warn!("Asset root already set, ignoring {:?}", root);
    }
}

pub fn asset_root() -> PathBuf {
    ASSET_ROOT
        .get()
        .cloned()
        .unwrap_or_else(|| PathBuf::from("./assets"))
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("No window available"))?;
    let location = window.location();
    let origin = location
        .origin()
        .map_err(|_| anyhow::anyhow!("Page origin is not readable"))?;
    let pathname = location.pathname().unwrap_or_default();
    // served from the public path in production, from the origin in development
    let base = if pathname.contains(crate::config::PUBLIC_PATH) {
        format!("{}/{}", origin, crate::config::PUBLIC_PATH)
    } else {
        format!("{}/", origin)
    };
    let base = reqwest::Url::parse(&base)?;
    Ok(base.join(file_name)?)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(file_name)?;
        reqwest::get(url).await?.error_for_status()?.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = {
        let path = asset_root().join(file_name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| anyhow::anyhow!("Could not read {:?}: {}", path, e))?
    };

    Ok(txt)
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        reqwest::get(url)
            .await?
            .error_for_status()?
            .bytes()
            .await?
            .to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = asset_root().join(file_name);
        tokio::fs::read(&path)
            .await
            .map_err(|e| anyhow::anyhow!("Could not read {:?}: {}", path, e))?
    };

    Ok(data)
}

pub async fn load_texture(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    format: Option<&str>,
) -> anyhow::Result<Texture> {
    let data = load_binary(file_name).await?;
    Texture::from_bytes(device, queue, &data, file_name, format)
}

pub async fn load_typeface(file_name: &str) -> anyhow::Result<font::Typeface> {
    let json = load_string(file_name).await?;
    font::Typeface::from_json(&json)
}
