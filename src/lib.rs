//! love-donuts
//!
//! A small 3D demo on wgpu and winit that runs natively and in the browser.
//! The default scene writes "Love Donuts." in extruded, matcap-shaded text
//! and scatters a hundred donuts around it. A second scene shows a sphere,
//! a plane and a torus under a lit metal/rough material with a tweak panel.
//!
//! High-level modules
//! - `animation`: eased tweens such as the sphere spin
//! - `camera`: camera, projection, orbit controls and their uniforms
//! - `config`: start-up configuration from flags, the environment or the query string
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: meshes, materials, instances and textures on the GPU
//! - `debug`: the tweak panel (sliders and a button drawn as flat quads)
//! - `display`: drawing buffer sizing and the fullscreen toggle
//! - `flow`: the event loop and the flow (scene) abstraction
//! - `geometry`: primitive meshes and extruded text
//! - `material`: parameters of the lit material
//! - `pipelines`: the standard, matcap and gui render pipelines
//! - `resources`: loading textures and typefaces
//! - `render`: what flows draw, batched per pipeline
//! - `scenes`: the two demo scenes
//!

pub mod animation;
pub mod camera;
#[cfg(feature = "integration-tests")]
pub mod capture;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod debug;
pub mod display;
pub mod flow;
pub mod geometry;
pub mod material;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scenes;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::{
    config::{DemoConfig, SceneKind},
    context::InitContext,
    flow::{FlowConstructor, GraphicsFlow},
    scenes::{DonutsScene, MaterialsScene},
};

// Re-exports commonly used types for convenience in downstream code.
pub use winit::dpi::PhysicalPosition;
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
pub use wgpu::*;

/// The flow constructors for the scene `config` selects.
pub fn constructors<S: 'static, E: 'static>(config: &DemoConfig) -> Vec<FlowConstructor<S, E>> {
    let constructor: FlowConstructor<S, E> = match config.scene {
        SceneKind::Donuts => {
            let (count, seed) = (config.donut_count, config.seed);
            Box::new(move |ctx: InitContext| {
                Box::pin(async move {
                    let scene = DonutsScene::new(ctx, count, seed).await?;
                    anyhow::Ok(Box::new(scene) as Box<dyn GraphicsFlow<S, E>>)
                })
            })
        }
        SceneKind::Materials => Box::new(|ctx: InitContext| {
            Box::pin(async move {
                let scene = MaterialsScene::new(ctx).await?;
                anyhow::Ok(Box::new(scene) as Box<dyn GraphicsFlow<S, E>>)
            })
        }),
    };
    vec![constructor]
}

/// Open the window and run the configured scene until it is closed.
pub fn start(config: DemoConfig) -> anyhow::Result<()> {
    log::info!("Starting {:?} scene", config.scene);
    resources::set_asset_root(config.asset_root.clone());
    flow::run::<(), ()>(constructors(&config))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    flow::init_logger();
    start(DemoConfig::from_location()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
