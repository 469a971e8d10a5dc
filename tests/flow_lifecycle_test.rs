#[cfg(feature = "integration-tests")]
mod lifecycle {
    use instant::Duration;
    use love_donuts::{
        DeviceEvent, WindowEvent,
        context::Context,
        flow::{FlowConstructor, GraphicsFlow, ImageTestResult, Out},
        render::Render,
    };
    use wgpu::Color;

    /// What the hooks saw, shared through the loop state.
    #[derive(Default)]
    pub(crate) struct Seen {
        inits: u32,
        frames: u32,
        ticks: u32,
        received: Vec<u32>,
        served: String,
    }

    pub(crate) struct Recorder;

    impl GraphicsFlow<Seen, u32> for Recorder {
        fn on_init(&mut self, _: &mut Context, seen: &mut Seen) -> Out<Seen, u32> {
            assert_eq!((seen.inits, seen.frames, seen.ticks), (0, 0, 0));
            seen.inits += 1;
            Out::Configure(Box::new(|ctx: &mut Context| {
                ctx.clear_colour = Color::TRANSPARENT;
                ctx.tick_duration_millis = 10;
                ctx.camera.controller.enabled = false;
            }))
        }

        fn on_update(&mut self, ctx: &Context, seen: &mut Seen, _: Duration) -> Out<Seen, u32> {
            assert_eq!(seen.inits, 1);
            assert_eq!(ctx.clear_colour, Color::TRANSPARENT);
            assert_eq!(ctx.tick_duration_millis, 10);
            assert!(!ctx.camera.controller.enabled, "the orbit controls were re-enabled");
            seen.frames += 1;

            match seen.frames {
                2 => Out::FutEvent(vec![Box::new(async { 7 }), Box::new(async { 11 })]),
                4 => {
                    let a: Box<dyn FnOnce(&mut Seen)> = Box::new(|seen: &mut Seen| seen.served.push('a'));
                    let b: Box<dyn FnOnce(&mut Seen)> = Box::new(|seen: &mut Seen| seen.served.push('b'));
                    Out::FutFn(vec![Box::new(async move { a }), Box::new(async move { b })])
                }
                n if n > 4 => {
                    // mutations resolve in the order they were returned
                    assert_eq!(seen.served, "ab");
                    Out::Empty
                }
                _ => Out::Empty,
            }
        }

        fn on_tick(&mut self, _: &Context, seen: &mut Seen) -> Out<Seen, u32> {
            seen.ticks += 1;
            Out::Empty
        }

        fn on_device_events(&mut self, _: &Context, _: &mut Seen, _: &DeviceEvent) -> Out<Seen, u32> {
            Out::Empty
        }

        fn on_window_events(&mut self, _: &Context, _: &mut Seen, _: &WindowEvent) -> Out<Seen, u32> {
            Out::Empty
        }

        fn on_custom_events(&mut self, _: &Context, seen: &mut Seen, event: u32) -> Option<u32> {
            assert!(seen.frames >= 2, "event {} arrived before it was sent", event);
            seen.received.push(event);
            None
        }

        fn on_render<'pass>(&self) -> Render<'_, 'pass> {
            Render::None
        }

        fn render_to_texture(
            &self,
            _: &Context,
            seen: &mut Seen,
            _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error> {
            if seen.frames > 6 && seen.ticks > 0 && seen.received.len() == 2 {
                assert_eq!(seen.received, [7, 11]);
                Ok(ImageTestResult::Passed)
            } else {
                Ok(ImageTestResult::Waiting)
            }
        }
    }

    pub(crate) fn constructor() -> FlowConstructor<Seen, u32> {
        Box::new(|_| Box::pin(async { anyhow::Ok(Box::new(Recorder) as Box<dyn GraphicsFlow<_, _>>) }))
    }
}

#[test]
#[cfg(feature = "integration-tests")]
fn hooks_run_in_order_and_outputs_are_applied() {
    if let Err(e) = love_donuts::flow::run(vec![lifecycle::constructor()]) {
        panic!("{:#}", e);
    }
}
