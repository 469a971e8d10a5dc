//! A sphere, a plane and a torus under one lit material. The debug panel
//! (toggled with `H`) edits metalness and roughness and spins the sphere.

use std::rc::Rc;

use cgmath::Vector3;
use instant::Duration;
use wgpu::util::DeviceExt;
use winit::{
    event::{ElementState, MouseButton},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::{
    DeviceEvent, WindowEvent,
    animation::Spin,
    context::{Context, InitContext},
    data_structures::{
        instance::Instance,
        mesh_group::MeshGroup,
        model::{Material, Mesh, Model},
        texture::Texture,
    },
    debug::{DebugPanel, PanelEvent},
    flow::{GraphicsFlow, Out},
    geometry,
    material::StandardMaterial,
    pipelines::gui,
    render::{Flat, Render},
    resources::{self, texture::standard_material_layout},
    scenes::DOOR_COLOR_TEXTURE,
};

const SPHERE_ID: u32 = 0;
const PLANE_ID: u32 = 1;
const TORUS_ID: u32 = 2;
const PANEL_ID: u32 = 3;

// radians per second
const IDLE_SPEED_X: f32 = 0.15;
const IDLE_SPEED_Y: f32 = 0.1;

/// Euler angles of the idle rotation after `elapsed`.
pub fn idle_rotation(elapsed: Duration) -> (f32, f32) {
    let t = elapsed.as_secs_f32();
    (IDLE_SPEED_X * t, IDLE_SPEED_Y * t)
}

pub struct MaterialsScene {
    material: Rc<Material>,
    params: StandardMaterial,
    params_dirty: bool,
    sphere: MeshGroup,
    plane: MeshGroup,
    torus: MeshGroup,
    panel: DebugPanel,
    panel_vertices: wgpu::Buffer,
    panel_indices: wgpu::Buffer,
    index_count: usize,
    elapsed: Duration,
    spin: Option<Spin>,
    spin_offset: f32,
}

impl MaterialsScene {
    pub async fn new(ctx: InitContext) -> anyhow::Result<Self> {
        let device = &ctx.device;
        let texture = match resources::load_texture(DOOR_COLOR_TEXTURE, device, &ctx.queue, None).await {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("Door texture unavailable, using plain white: {:#}", e);
                Texture::solid(device, &ctx.queue, [255; 4], "white")?
            }
        };
        let params = StandardMaterial::default();
        let material = Rc::new(Material::with_params(
            device,
            "standard",
            texture,
            params.to_uniform(),
            &standard_material_layout(device),
        )?);

        let mut plane = geometry::plane(1.0, 1.0, 1, 1);
        plane.double_sided();
        let group = |id: u32, name: &str, data: &geometry::MeshData, x: f32| {
            let model = Model {
                mesh: Mesh::from_data(device, name, data),
                material: Rc::clone(&material),
            };
            MeshGroup::single(id, device, model, Instance::from(Vector3::new(x, 0.0, 0.0)))
        };
        let sphere = group(SPHERE_ID, "sphere", &geometry::sphere(0.5, 16, 16), -1.5);
        let plane = group(PLANE_ID, "plane", &plane, 0.0);
        let torus = group(TORUS_ID, "torus", &geometry::torus(0.3, 0.2, 16, 32), 1.5);

        let panel = DebugPanel::new(params.metalness(), params.roughness());
        let (vertices, indices) = panel.vertices();
        let panel_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Debug Panel Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let panel_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Debug Panel Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            material,
            params,
            params_dirty: false,
            sphere,
            plane,
            torus,
            panel,
            panel_vertices,
            panel_indices,
            index_count: indices.len(),
            elapsed: Duration::ZERO,
            spin: None,
            spin_offset: 0.0,
        })
    }

    pub fn params(&self) -> &StandardMaterial {
        &self.params
    }

    pub fn panel(&self) -> &DebugPanel {
        &self.panel
    }

    fn apply(&mut self, event: PanelEvent) {
        match event {
            PanelEvent::Metalness(value) => {
                self.params.set_metalness(value);
                self.params_dirty = true;
            }
            PanelEvent::Roughness(value) => {
                self.params.set_roughness(value);
                self.params_dirty = true;
            }
            PanelEvent::Spin => {
                if self.spin.as_ref().is_some_and(|spin| !spin.is_finished()) {
                    return;
                }
                log::debug!("Spinning the sphere");
                self.spin = Some(Spin::new(self.spin_offset, Spin::DEFAULT_DURATION));
            }
        }
    }

    fn write_panel(&self, queue: &wgpu::Queue) {
        let (vertices, _) = self.panel.vertices();
        queue.write_buffer(&self.panel_vertices, 0, bytemuck::cast_slice::<gui::Vertex, u8>(&vertices));
    }
}

impl<S, E> GraphicsFlow<S, E> for MaterialsScene {
    fn on_init(&mut self, ctx: &mut Context, _: &mut S) -> Out<S, E> {
        ctx.clear_colour = wgpu::Color::BLACK;
        self.panel
            .set_viewport(ctx.config.width, ctx.config.height, ctx.surface_scale() as f32);
        log::info!("Press H to show the debug panel");
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, _: &mut S, dt: Duration) -> Out<S, E> {
        self.elapsed += dt;
        if let Some(spin) = &mut self.spin {
            self.spin_offset = spin.advance(dt);
            if spin.is_finished() {
                self.spin_offset = self.spin_offset.rem_euclid(std::f32::consts::TAU);
                self.spin = None;
            }
        }

        let (x, y) = idle_rotation(self.elapsed);
        for (group, extra_y) in [
            (&mut self.sphere, self.spin_offset),
            (&mut self.plane, 0.0),
            (&mut self.torus, 0.0),
        ] {
            if let Some(instance) = group.instances.first_mut() {
                *instance = Instance::from(instance.position).with_euler(x, y + extra_y, 0.0);
            }
            group.write_to_buffer(&ctx.device, &ctx.queue);
        }

        if self.params_dirty {
            self.material.write_params(&ctx.queue, self.params.to_uniform());
            self.params_dirty = false;
        }

        self.panel
            .set_viewport(ctx.config.width, ctx.config.height, ctx.surface_scale() as f32);
        if self.panel.is_visible() {
            self.write_panel(&ctx.queue);
        }
        Out::Empty
    }

    fn on_tick(&mut self, _: &Context, _: &mut S) -> Out<S, E> {
        Out::Empty
    }

    fn on_device_events(&mut self, _: &Context, _: &mut S, _: &DeviceEvent) -> Out<S, E> {
        Out::Empty
    }

    fn on_window_events(&mut self, ctx: &Context, _: &mut S, event: &WindowEvent) -> Out<S, E> {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.physical_key == PhysicalKey::Code(KeyCode::KeyH)
                    && event.state == ElementState::Pressed
                    && !event.repeat =>
            {
                let visible = self.panel.toggle();
                log::info!("Debug panel {}", if visible { "shown" } else { "hidden" });
                if !visible {
                    return Out::Configure(Box::new(|ctx: &mut Context| {
                        ctx.camera.controller.enabled = true
                    }));
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.panel.is_dragging() {
                    let (x, _) = ctx.to_surface_coords(*position);
                    if let Some(event) = self.panel.drag_to(x) {
                        self.apply(event);
                    }
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let (x, y) = ctx.to_surface_coords(ctx.cursor);
                if self.panel.contains(x, y) {
                    if let Some(event) = self.panel.press(x, y) {
                        self.apply(event);
                    }
                    return Out::Configure(Box::new(|ctx: &mut Context| {
                        ctx.camera.controller.enabled = false
                    }));
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Released,
                button: MouseButton::Left,
                ..
            } => {
                self.panel.release();
                if !ctx.camera.controller.enabled {
                    return Out::Configure(Box::new(|ctx: &mut Context| {
                        ctx.camera.controller.enabled = true
                    }));
                }
            }
            _ => (),
        }
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &Context, _: &mut S, event: E) -> Option<E> {
        Some(event)
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        let meshes = Render::Standards(vec![
            self.sphere.instanced(),
            self.plane.instanced(),
            self.torus.instanced(),
        ]);
        if !self.panel.is_visible() {
            return meshes;
        }
        Render::Composed(vec![
            meshes,
            Render::GUI(Flat {
                vertex: &self.panel_vertices,
                index: &self.panel_indices,
                amount: self.index_count,
                id: PANEL_ID,
            }),
        ])
    }

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _: &Context,
        _: &mut S,
        _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<crate::flow::ImageTestResult, anyhow::Error> {
        Ok(crate::flow::ImageTestResult::Passed)
    }
}
