#![allow(dead_code)]

#[cfg(feature = "integration-tests")]
use love_donuts::flow::ImageTestResult;
use love_donuts::{
    context::Context,
    flow::{GraphicsFlow, Out},
    render::Render,
};

/// Something a golden image test can draw.
pub(crate) trait Renderable {
    fn render<'pass>(&self) -> Render<'_, 'pass>;
}

pub(crate) struct Nothing;
impl Renderable for Nothing {
    fn render<'pass>(&self) -> Render<'_, 'pass> {
        Render::None
    }
}

impl Renderable for love_donuts::data_structures::mesh_group::MeshGroup {
    fn render<'pass>(&self) -> Render<'_, 'pass> {
        Render::Matcap(self.instanced())
    }
}

pub(crate) type Setup = Box<dyn Fn(&mut Context)>;
#[cfg(feature = "integration-tests")]
pub(crate) type Validate = Box<
    dyn Fn(
        &Context,
        &mut FrameCounter,
        &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>,
>;

#[cfg(feature = "integration-tests")]
pub(crate) struct TestRender<T: Renderable> {
    object: T,
    setup: Setup,
    validate: Validate,
}

#[cfg(feature = "integration-tests")]
impl<T: Renderable> TestRender<T> {
    pub(crate) fn new(object: T, setup: Setup, validate: Validate) -> Self {
        Self {
            object,
            setup,
            validate,
        }
    }
}

#[cfg(feature = "integration-tests")]
impl<T: Renderable> GraphicsFlow<FrameCounter, ()> for TestRender<T> {
    fn on_init(&mut self, ctx: &mut Context, _: &mut FrameCounter) -> Out<FrameCounter, ()> {
        (self.setup)(ctx);
        Out::Empty
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        self.object.render()
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        s: &mut FrameCounter,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        (self.validate)(ctx, s, texture)
    }

    fn on_update(&mut self, _: &Context, state: &mut FrameCounter, _: instant::Duration) -> Out<FrameCounter, ()> {
        state.progress();
        Out::Empty
    }

    fn on_tick(&mut self, _: &Context, _: &mut FrameCounter) -> Out<FrameCounter, ()> {
        Out::Empty
    }

    fn on_device_events(&mut self, _: &Context, _: &mut FrameCounter, _: &love_donuts::DeviceEvent) -> Out<FrameCounter, ()> {
        Out::Empty
    }

    fn on_window_events(&mut self, _: &Context, _: &mut FrameCounter, _: &love_donuts::WindowEvent) -> Out<FrameCounter, ()> {
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &Context, _: &mut FrameCounter, event: ()) -> Option<()> {
        Some(event)
    }
}

/// Frames drawn so far. The first frame is usually not presented yet.
#[derive(Default)]
pub(crate) struct FrameCounter(pub(crate) u32);

impl FrameCounter {
    pub(crate) fn frame(&self) -> u32 {
        self.0
    }

    pub(crate) fn progress(&mut self) {
        self.0 += 1;
    }
}

/// Reorder a captured pixel to RGBA. Captures use the surface format,
/// which is BGRA on many platforms.
pub(crate) fn rgba(ctx: &Context, pixel: image::Rgba<u8>) -> image::Rgba<u8> {
    match ctx.config.format {
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => {
            let [b, g, r, a] = pixel.0;
            image::Rgba([r, g, b, a])
        }
        _ => pixel,
    }
}

/// Pixel value a cleared frame should hold for `colour`.
pub(crate) fn to_pixel(colour: wgpu::Color) -> image::Rgba<u8> {
    let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([byte(colour.r), byte(colour.g), byte(colour.b), byte(colour.a)])
}

#[macro_export]
macro_rules! golden_image_test {
    ($build:expr) => {{
        use crate::common::test_utils::FrameCounter;
        use love_donuts::flow::{FlowConstructor, GraphicsFlow};
        let constructor: FlowConstructor<FrameCounter, ()> = Box::new(|ctx| {
            Box::pin(async move {
                let flow: Box<dyn GraphicsFlow<FrameCounter, ()>> = Box::new(($build)(ctx).await?);
                anyhow::Ok(flow)
            })
        });
        love_donuts::flow::run(vec![constructor]).expect("golden image test did not run");
    }};
}
