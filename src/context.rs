//! The GPU and window context shared by every flow.

use std::sync::Arc;

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalPosition, window::Window};

use crate::{
    camera::{self, CameraResources, CameraUniform, OrbitController, Projection},
    data_structures::texture,
    pipelines::{
        self, Pipelines,
        light::{LightResources, LightUniform},
    },
};

/// Device pixel ratios above this are rendered at this ratio.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub clear_colour: wgpu::Color,
    pub tick_duration_millis: u64,
    /// Last cursor position reported by the window.
    pub cursor: PhysicalPosition<f64>,
    pixel_ratio: f64,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("Requesting a GPU for a {}x{} surface", size.width, size.height);
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // the web build targets WebGL2
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Could not create the device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // shaders write linear colour and expect the surface to encode it
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface supports no formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // eight units in front of the origin, looking at it
        let camera = camera::Camera::looking_at((0.0, 0.0, 8.0), (0.0, 0.0, 0.0));
        let projection = Projection::new(config.width, config.height, cgmath::Deg(75.0), 0.1, 1000.0);
        let mut controller = OrbitController::new(1.0, 1.0);
        controller.enable_damping = true;
        controller.set_viewport(config.width, config.height);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout = pipelines::uniform_layout(&device, "camera");
        let camera_bind_group =
            pipelines::uniform_bind_group(&device, &camera_bind_group_layout, &camera_buffer, "camera");

        let light = LightResources::new(&device, LightUniform::default());

        let pipelines = Pipelines::new(
            &device,
            config.format,
            &camera_bind_group_layout,
            &light.bind_group_layout,
        );

        let camera = CameraResources {
            camera,
            controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            pipelines,
            clear_colour: wgpu::Color::BLACK,
            tick_duration_millis: 1000,
            cursor: PhysicalPosition::new(0.0, 0.0),
            pixel_ratio: 1.0,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Store the device pixel ratio, capped at [`MAX_PIXEL_RATIO`].
    pub fn set_pixel_ratio(&mut self, device_ratio: f64) {
        self.pixel_ratio = capped_pixel_ratio(device_ratio);
    }

    /// Surface pixels per logical window pixel.
    pub fn surface_scale(&self) -> f64 {
        let logical = self
            .window
            .inner_size()
            .to_logical::<f64>(self.window.scale_factor());
        if logical.width > 0.0 {
            self.config.width as f64 / logical.width
        } else {
            1.0
        }
    }

    /// A cursor position reported by the window, in surface pixels.
    pub fn to_surface_coords(&self, position: PhysicalPosition<f64>) -> (f32, f32) {
        let size = self.window.inner_size();
        let sx = self.config.width as f64 / size.width.max(1) as f64;
        let sy = self.config.height as f64 / size.height.max(1) as f64;
        ((position.x * sx) as f32, (position.y * sy) as f32)
    }

    /// Push the camera and light uniforms to the GPU.
    pub fn write_uniforms(&mut self) {
        self.camera
            .uniform
            .update_view_proj(&self.camera.camera, &self.projection);
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.camera.uniform]),
        );
        self.light.write_to_buffer(&self.queue);
    }
}

/// `min(ratio, 2)`; non-positive or NaN ratios count as 1.
pub fn capped_pixel_ratio(device_ratio: f64) -> f64 {
    if device_ratio.is_nan() || device_ratio <= 0.0 {
        1.0
    } else {
        device_ratio.min(MAX_PIXEL_RATIO)
    }
}

/// What flow constructors get to create their GPU resources.
/// Device and queue are internally reference counted, cloning them is cheap.
#[derive(Debug, Clone)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub format: wgpu::TextureFormat,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            format: ctx.config.format,
        }
    }
}
