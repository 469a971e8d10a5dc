//! Start-up configuration.
//!
//! [`DemoConfig`] collects the few knobs the demo has: which scene to show,
//! where assets live and how the donuts are scattered. Natively the values
//! come from command-line flags or `LOVE_DONUTS_*` environment variables, on
//! the web from the page's query string. Anything not set falls back to
//! [`Default`].

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Public path the web build is served from.
pub const PUBLIC_PATH: &str = "love-donuts/";

pub const SCENE_ENV: &str = "LOVE_DONUTS_SCENE";
pub const ASSETS_ENV: &str = "LOVE_DONUTS_ASSETS";
pub const SEED_ENV: &str = "LOVE_DONUTS_SEED";
pub const DONUTS_ENV: &str = "LOVE_DONUTS_COUNT";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Matcap text plus scattered donuts.
    #[default]
    #[value(alias = "text")]
    Donuts,
    /// Sphere, plane and torus with a lit material and the debug panel.
    #[value(alias = "primitives")]
    Materials,
}

#[derive(Clone, Debug, PartialEq, Parser)]
#[command(name = "love-donuts", version, about = "Matcap text with donuts, or a lit materials playground")]
pub struct DemoConfig {
    /// Scene to show
    #[arg(long, value_enum, ignore_case = true, env = SCENE_ENV, default_value_t = SceneKind::Donuts)]
    pub scene: SceneKind,

    /// Directory textures and fonts are read from
    #[arg(long = "assets", value_name = "DIR", env = ASSETS_ENV, default_value = "./assets")]
    pub asset_root: PathBuf,

    /// Seed for the donut scatter, random when unset
    #[arg(long, env = SEED_ENV)]
    pub seed: Option<u64>,

    /// Number of donuts to scatter
    #[arg(long = "donuts", value_name = "COUNT", env = DONUTS_ENV, default_value_t = 100)]
    pub donut_count: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::default(),
            asset_root: PathBuf::from("./assets"),
            seed: None,
            donut_count: 100,
        }
    }
}

impl DemoConfig {
    /// Build a config from decoded `(key, value)` query pairs. Unknown keys
    /// are ignored, bad values are logged and the default is kept.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "scene" => match SceneKind::from_str(value, true) {
                    Ok(scene) => config.scene = scene,
                    Err(e) => log::warn!("Ignoring scene '{}': {}", value, e),
                },
                "assets" => config.asset_root = PathBuf::from(value),
                "seed" => match value.parse() {
                    Ok(seed) => config.seed = Some(seed),
                    Err(e) => log::warn!("Ignoring seed '{}': {}", value, e),
                },
                "donuts" => match value.parse() {
                    Ok(count) => config.donut_count = count,
                    Err(e) => log::warn!("Ignoring donut count '{}': {}", value, e),
                },
                _ => (),
            }
        }
        config
    }

    /// Reads `?scene=...&seed=...` from the page location.
    #[cfg(target_arch = "wasm32")]
    pub fn from_location() -> Self {
        let href = web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default();
        match reqwest::Url::parse(&href) {
            Ok(url) => Self::from_pairs(url.query_pairs()),
            Err(e) => {
                log::warn!("Unreadable page location '{}': {}", href, e);
                Self::default()
            }
        }
    }
}
