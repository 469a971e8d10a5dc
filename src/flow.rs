//! Flows and the event loop that drives them.
//!
//! A flow is one scene: it creates its GPU resources in a
//! [`FlowConstructor`], reacts to input and time through the
//! [`GraphicsFlow`] hooks and describes its frame with a [`Render`].
//!
//! Each redraw runs in this order:
//! 1. window and device events reach the flows, then the orbit controls
//! 2. the `on_render` trees of all flows are drawn, batched per pipeline
//! 3. `on_tick` runs when a tick is due
//! 4. the orbit controls advance and the camera and light uniforms are uploaded
//! 5. `on_update` runs with the frame time

use std::{fmt::Debug, pin::Pin, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

#[cfg(feature = "integration-tests")]
use crate::capture::Capture;
use crate::{
    context::{Context, InitContext},
    data_structures::texture::Texture,
    display::{self, DoubleClick, SurfaceKind},
    render::{Batches, Render},
};

/// What a hook hands back to the loop.
///
/// - `FutEvent` futures resolve to custom events that are queued for
///   [`GraphicsFlow::on_custom_events`].
/// - `FutFn` futures resolve to mutations of the shared state.
/// - `Configure` changes the [`Context`] right away, before the next hook
///   or the orbit controls see the same event.
/// - `Empty` does nothing.
pub enum Out<S, E> {
    FutEvent(Vec<Box<dyn Future<Output = E>>>),
    FutFn(Vec<Box<dyn Future<Output = Box<dyn FnOnce(&mut S)>>>>),
    Configure(Box<dyn FnOnce(&mut Context)>),
    Empty,
}

impl<S, E> Default for Out<S, E> {
    fn default() -> Self {
        Self::Empty
    }
}

/// Verdict of a flow on a captured frame.
#[cfg(feature = "integration-tests")]
pub enum ImageTestResult {
    Passed,
    Waiting,
    Failed,
}

/// A scene driven by the event loop. `S` is state shared by all flows, `E`
/// the custom event type they exchange.
pub trait GraphicsFlow<S, E> {
    /// Called once after every flow was constructed and the surface sized.
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> Out<S, E>;

    /// Called every frame with the time since the previous one.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out<S, E>;

    /// Called every `ctx.tick_duration_millis`.
    fn on_tick(&mut self, ctx: &Context, state: &mut S) -> Out<S, E>;

    fn on_device_events(&mut self, ctx: &Context, state: &mut S, event: &DeviceEvent) -> Out<S, E>;

    /// Window events arrive here before the orbit controls handle them.
    fn on_window_events(&mut self, ctx: &Context, state: &mut S, event: &WindowEvent) -> Out<S, E>;

    /// Return the event to pass it on to the next flow, `None` consumes it.
    fn on_custom_events(&mut self, ctx: &Context, state: &mut S, event: E) -> Option<E>;

    fn on_render<'pass>(&self) -> Render<'_, 'pass>;

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut S,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>;
}

impl<S, E> Debug for dyn GraphicsFlow<S, E> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

type Flows<S, E> = Vec<Box<dyn GraphicsFlow<S, E>>>;

/// Builds a flow once the GPU is ready. A constructor error aborts start-up.
pub type FlowConstructor<S, E> = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S, E>>>>>>,
>;

/// The context plus the state shared by all flows.
#[derive(Debug)]
pub struct AppState<S: 'static> {
    pub(crate) ctx: Context,
    state: S,
    is_surface_configured: bool,
}

impl<S: Default> AppState<S> {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let mut ctx = Context::new(window).await?;
        ctx.set_pixel_ratio(ctx.window.scale_factor());
        Ok(Self {
            ctx,
            state: S::default(),
            is_surface_configured: false,
        })
    }

    /// Match projection, controls, surface and depth buffer to the window.
    /// Zero sizes (minimised windows) are ignored.
    fn fit_window(&mut self) {
        let ctx = &mut self.ctx;
        let scale_factor = ctx.window.scale_factor();
        ctx.set_pixel_ratio(scale_factor);
        let Some(size) = SurfaceKind::CURRENT.buffer_size(
            ctx.window.inner_size(),
            scale_factor,
            ctx.pixel_ratio(),
        ) else {
            return;
        };
        log::debug!("Drawing buffer {}x{}", size.width, size.height);
        ctx.config.width = size.width;
        ctx.config.height = size.height;
        ctx.projection.resize(size.width, size.height);
        ctx.camera.controller.set_viewport(size.width, size.height);
        ctx.surface.configure(&ctx.device, &ctx.config);
        ctx.depth_texture =
            Texture::create_depth_texture(&ctx.device, [size.width, size.height], "depth_texture");
        self.is_surface_configured = true;
    }

    /// Draw one frame. With `integration-tests` the frame goes to a
    /// [`Capture`] and the returned flag tells whether every flow passed.
    #[cfg_attr(not(feature = "integration-tests"), allow(unused_variables))]
    fn render<E>(&mut self, flows: &mut Flows<S, E>, sink: &Sink<S, E>) -> Result<bool, wgpu::SurfaceError> {
        self.ctx.window.request_redraw();
        if !self.is_surface_configured {
            return Ok(false);
        }

        let output = self.ctx.surface.get_current_texture()?;
        #[cfg(not(feature = "integration-tests"))]
        let surface_view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        #[cfg(not(feature = "integration-tests"))]
        let (color, depth) = (&surface_view, &self.ctx.depth_texture.view);
        #[cfg(feature = "integration-tests")]
        let capture = Capture::new(&self.ctx);
        #[cfg(feature = "integration-tests")]
        let (color, depth) = (&capture.color, &capture.depth);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            let mut batches = Batches::default();
            for flow in flows.iter() {
                flow.on_render().collect(&self.ctx, &mut pass, &mut batches);
            }
            batches.draw(&self.ctx, &mut pass);
        }

        #[cfg(feature = "integration-tests")]
        capture.copy(&mut encoder);
        self.ctx.queue.submit(std::iter::once(encoder.finish()));

        #[cfg(feature = "integration-tests")]
        let passed = self.check_capture(flows, &capture, sink);
        #[cfg(not(feature = "integration-tests"))]
        let passed = false;

        self.ctx.window.pre_present_notify();
        output.present();
        Ok(passed)
    }

    #[cfg(feature = "integration-tests")]
    fn check_capture<E>(&mut self, flows: &mut Flows<S, E>, capture: &Capture, sink: &Sink<S, E>) -> bool {
        let mut img = match sink.runtime.block_on(capture.read(&self.ctx.device)) {
            Ok(img) => img,
            Err(e) => panic!("Could not read back the rendered frame: {:#}", e),
        };
        let mut passed = true;
        for flow in flows.iter_mut() {
            match flow.render_to_texture(&self.ctx, &mut self.state, &mut img) {
                Ok(ImageTestResult::Passed) => (),
                Ok(ImageTestResult::Waiting) => passed = false,
                Ok(ImageTestResult::Failed) => panic!("Assertion failed"),
                Err(e) => panic!("{}", e),
            }
        }
        passed
    }
}

/// Where [`Out`] values go: resolved on the tokio runtime natively, spawned
/// on the browser's executor and fed back through the event loop on the web.
struct Sink<S: 'static, E: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent<S, E>>,
}

impl<S: 'static, E: 'static> Sink<S, E> {
    fn handle(&self, app: &mut AppState<S>, out: Out<S, E>) {
        match out {
            Out::FutEvent(futures) => {
                let resolve = futures::future::join_all(futures.into_iter().map(Pin::from));
                #[cfg(not(target_arch = "wasm32"))]
                send_all(&self.proxy, self.runtime.block_on(resolve).into_iter().map(FlowEvent::Custom));
                #[cfg(target_arch = "wasm32")]
                {
                    let proxy = self.proxy.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        send_all(&proxy, resolve.await.into_iter().map(FlowEvent::Custom));
                    });
                }
            }
            Out::FutFn(futures) => {
                let resolve = futures::future::join_all(futures.into_iter().map(Pin::from));
                #[cfg(not(target_arch = "wasm32"))]
                for mutation in self.runtime.block_on(resolve) {
                    mutation(&mut app.state);
                }
                #[cfg(target_arch = "wasm32")]
                {
                    let proxy = self.proxy.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        send_all(&proxy, resolve.await.into_iter().map(FlowEvent::Mut));
                    });
                }
            }
            Out::Configure(configure) => configure(&mut app.ctx),
            Out::Empty => (),
        }
    }

    /// Run `hook` on every flow in order, handling each output before the
    /// next flow is called.
    fn each(
        &self,
        flows: &mut Flows<S, E>,
        app: &mut AppState<S>,
        mut hook: impl FnMut(&mut Box<dyn GraphicsFlow<S, E>>, &mut Context, &mut S) -> Out<S, E>,
    ) {
        for flow in flows.iter_mut() {
            let out = hook(flow, &mut app.ctx, &mut app.state);
            self.handle(app, out);
        }
    }
}

fn send_all<S, E>(proxy: &EventLoopProxy<FlowEvent<S, E>>, events: impl Iterator<Item = FlowEvent<S, E>>) {
    for event in events {
        if proxy.send_event(event).is_err() {
            log::error!("Event loop closed with flow output still pending");
            break;
        }
    }
}

pub(crate) enum FlowEvent<S: 'static, E: 'static> {
    #[allow(dead_code)]
    Initialized { state: AppState<S>, flows: Flows<S, E> },
    #[allow(dead_code)]
    Mut(Box<dyn FnOnce(&mut S)>),
    Custom(E),
    Exit,
}

impl<S, E> Debug for FlowEvent<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { flows, .. } => f.debug_struct("Initialized").field("flows", flows).finish(),
            Self::Mut(_) => f.write_str("Mut"),
            Self::Custom(_) => f.write_str("Custom"),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

pub struct App<S: 'static, E: 'static> {
    sink: Sink<S, E>,
    state: Option<AppState<S>>,
    flows: Flows<S, E>,
    // taken on the first resume
    constructors: Option<Vec<FlowConstructor<S, E>>>,
    double_click: DoubleClick,
    last_frame: Instant,
    since_tick: Duration,
}

impl<S: Default + 'static, E: 'static> App<S, E> {
    fn new(event_loop: &EventLoop<FlowEvent<S, E>>, constructors: Vec<FlowConstructor<S, E>>) -> anyhow::Result<Self> {
        Ok(Self {
            sink: Sink {
                #[cfg(not(target_arch = "wasm32"))]
                runtime: tokio::runtime::Runtime::new()?,
                proxy: event_loop.create_proxy(),
            },
            state: None,
            flows: Vec::new(),
            constructors: Some(constructors),
            double_click: DoubleClick::default(),
            last_frame: Instant::now(),
            since_tick: Duration::ZERO,
        })
    }

    /// Take over the constructed flows, size the surface and run `on_init`.
    fn start(&mut self, mut app: AppState<S>, flows: Flows<S, E>) {
        log::info!("Starting {} flow(s)", flows.len());
        self.flows = flows;
        app.fit_window();
        self.sink
            .each(&mut self.flows, &mut app, |flow, ctx, state| flow.on_init(ctx, state));
        app.ctx.window.request_redraw();
        self.state = Some(app);
    }

    fn redraw(&mut self) {
        let Some(app) = &mut self.state else { return };
        let dt = self.last_frame.elapsed();
        self.last_frame = Instant::now();
        self.since_tick += dt;

        match app.render(&mut self.flows, &self.sink) {
            Ok(all_passed) => {
                if all_passed {
                    send_all(&self.sink.proxy, std::iter::once(FlowEvent::Exit));
                }
                if self.since_tick >= Duration::from_millis(app.ctx.tick_duration_millis) {
                    self.since_tick = Duration::ZERO;
                    self.sink
                        .each(&mut self.flows, app, |flow, ctx, state| flow.on_tick(ctx, state));
                }
                let camera = &mut app.ctx.camera;
                camera.controller.update(&mut camera.camera, &app.ctx.projection);
                app.ctx.write_uniforms();
                self.sink
                    .each(&mut self.flows, app, |flow, ctx, state| flow.on_update(ctx, state, dt));
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => app.fit_window(),
            Err(e) => log::error!("Unable to render: {}", e),
        }
    }
}

impl<S: Default + 'static, E: 'static> ApplicationHandler<FlowEvent<S, E>> for App<S, E> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(constructors) = self.constructors.take() else {
            // resumed again after a suspend, the window is still ours
            return;
        };

        #[allow(unused_mut)]
        let mut attributes = Window::default_attributes().with_title("Love Donuts");
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_SELECTOR: &str = "canvas.webgl";

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.query_selector(CANVAS_SELECTOR).ok().flatten());
            attributes = match canvas {
                Some(canvas) => attributes.with_canvas(Some(canvas.unchecked_into())),
                None => {
                    log::warn!("No {} element, appending a new canvas", CANVAS_SELECTOR);
                    attributes.with_append(true)
                }
            };
        }

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let init = async move {
            let app = AppState::<S>::new(window).await?;
            // InitContext clones Arc handles of device and queue
            let pending = constructors
                .into_iter()
                .map(|constructor| constructor(InitContext::from(&app.ctx)));
            let flows = futures::future::join_all(pending)
                .await
                .into_iter()
                .collect::<anyhow::Result<Flows<S, E>>>()?;
            anyhow::Ok((app, flows))
        };

        #[cfg(not(target_arch = "wasm32"))]
        match self.sink.runtime.block_on(init) {
            Ok((app, flows)) => self.start(app, flows),
            Err(e) => {
                log::error!("Start-up failed: {:#}", e);
                event_loop.exit();
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.sink.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match init.await {
                    Ok((state, flows)) => {
                        send_all(&proxy, std::iter::once(FlowEvent::Initialized { state, flows }))
                    }
                    Err(e) => log::error!("Start-up failed: {:#}", e),
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent<S, E>) {
        match event {
            FlowEvent::Initialized { state, flows } => self.start(state, flows),
            FlowEvent::Custom(event) => {
                let Some(app) = &mut self.state else { return };
                let unconsumed = self
                    .flows
                    .iter_mut()
                    .try_fold(event, |event, flow| flow.on_custom_events(&app.ctx, &mut app.state, event));
                if unconsumed.is_some() {
                    log::warn!("Custom event was not consumed by any flow");
                }
            }
            FlowEvent::Mut(mutation) => {
                if let Some(app) = &mut self.state {
                    mutation(&mut app.state);
                }
            }
            FlowEvent::Exit => event_loop.exit(),
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        let Some(app) = &mut self.state else { return };
        self.sink
            .each(&mut self.flows, app, |flow, ctx, state| flow.on_device_events(ctx, state, &event));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let Some(app) = &mut self.state else { return };

        if let WindowEvent::CursorMoved { position, .. } = event {
            app.ctx.cursor = position;
        }
        // flows first, they may pause the orbit controls for this event
        self.sink
            .each(&mut self.flows, app, |flow, ctx, state| flow.on_window_events(ctx, state, &event));
        app.ctx.camera.controller.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => app.fit_window(),
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if self.double_click.press(Instant::now(), app.ctx.cursor) {
                    display::toggle_fullscreen(&app.ctx.window);
                }
            }
            _ => (),
        }
    }
}

/// Initialise logging: `env_logger` natively, the browser console on the web.
/// Calling it more than once is harmless.
pub fn init_logger() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
    }

    #[cfg(target_arch = "wasm32")]
    {
        let _ = console_log::init_with_level(log::Level::Info);
    }
}

/// Open the window and run `constructors` until the window closes.
pub fn run<S: Default + 'static, E: 'static>(constructors: Vec<FlowConstructor<S, E>>) -> anyhow::Result<()> {
    init_logger();

    // test harnesses call this off the main thread
    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        EventLoop::with_user_event().with_any_thread(true).build()?
    };
    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop = {
        use winit::platform::windows::EventLoopBuilderExtWindows;
        EventLoop::with_user_event().with_any_thread(true).build()?
    };
    #[cfg(not(feature = "integration-tests"))]
    let event_loop = EventLoop::with_user_event().build()?;

    let mut app = App::<S, E>::new(&event_loop, constructors)?;

    #[cfg(not(target_arch = "wasm32"))]
    event_loop.run_app(&mut app)?;

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::EventLoopExtWebSys;
        event_loop.spawn_app(app);
    }

    Ok(())
}
