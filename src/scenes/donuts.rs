//! "Love Donuts." in matcap-shaded 3D text, a credit line, and a hundred
//! donuts scattered around them. Every mesh shares the one matcap material.

use std::{f32::consts::PI, rc::Rc};

use cgmath::Vector3;
use instant::Duration;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    DeviceEvent, WindowEvent,
    context::{Context, InitContext},
    data_structures::{
        instance::Instance,
        mesh_group::MeshGroup,
        model::{Material, Mesh, Model},
    },
    flow::{GraphicsFlow, Out},
    geometry::{self, MeshData, TextOptions},
    render::Render,
    resources::{font::Typeface, texture::texture_layout},
    scenes::{FONT, MATCAP_TEXTURE, load_matcap, load_typeface},
};

pub const TITLE: &str = "Love Donuts.";
pub const CREDIT: &str = "Made by Ronald Pereira.";
pub const DONUT_COUNT: usize = 100;

const TITLE_ID: u32 = 0;
const CREDIT_ID: u32 = 1;
const DONUTS_ID: u32 = 2;

pub fn title_options() -> TextOptions {
    TextOptions {
        size: 0.5,
        height: 0.2,
        curve_segments: 12,
        bevel_enabled: true,
        bevel_thickness: 0.03,
        bevel_size: 0.02,
        bevel_offset: 0.0,
        bevel_segments: 5,
    }
}

pub fn credit_options() -> TextOptions {
    TextOptions {
        size: 0.1,
        height: 0.2,
        curve_segments: 12,
        bevel_enabled: true,
        bevel_thickness: 0.01,
        bevel_size: 0.01,
        bevel_offset: 0.0,
        bevel_segments: 5,
    }
}

/// The title centred on the origin and the credit line below and to the right of it.
pub fn text_meshes(typeface: &Typeface) -> (MeshData, MeshData) {
    let mut title = geometry::text(typeface, TITLE, &title_options());
    title.center();
    let mut credit = geometry::text(typeface, CREDIT, &credit_options());
    credit.translate(0.5, -0.5, 0.0);
    (title, credit)
}

pub fn donut() -> MeshData {
    geometry::torus(0.3, 0.2, 20, 45)
}

/// Where one donut sits, as sampled. Rotation is Euler x and y, z stays zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DonutPose {
    pub position: Vector3<f32>,
    pub rotation: (f32, f32),
    pub scale: f32,
}

impl From<DonutPose> for Instance {
    fn from(pose: DonutPose) -> Self {
        let (x, y) = pose.rotation;
        Instance::from(pose.position)
            .with_euler(x, y, 0.0)
            .with_uniform_scale(pose.scale)
    }
}

/// `count` donut poses: positions in [-5, 5) on every axis, x and y
/// rotations in [0, π) and a uniform scale in [0, 1).
pub fn scatter<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<DonutPose> {
    (0..count)
        .map(|_| {
            let position = Vector3::new(
                (rng.r#gen::<f32>() - 0.5) * 10.0,
                (rng.r#gen::<f32>() - 0.5) * 10.0,
                (rng.r#gen::<f32>() - 0.5) * 10.0,
            );
            let rotation = (rng.r#gen::<f32>() * PI, rng.r#gen::<f32>() * PI);
            DonutPose {
                position,
                rotation,
                scale: rng.r#gen::<f32>(),
            }
        })
        .collect()
}

pub struct DonutsScene {
    title: Option<MeshGroup>,
    credit: Option<MeshGroup>,
    donuts: MeshGroup,
}

impl DonutsScene {
    pub async fn new(ctx: InitContext, count: usize, seed: Option<u64>) -> anyhow::Result<Self> {
        let device = &ctx.device;
        let texture = load_matcap(&ctx, MATCAP_TEXTURE).await?;
        let material = Rc::new(Material::new(device, "matcap", texture, &texture_layout(device))?);

        let typeface = load_typeface(FONT).await?;
        let (title, credit) = text_meshes(&typeface);
        let title = text_group(device, TITLE_ID, "title", &title, &material);
        let credit = text_group(device, CREDIT_ID, "credit", &credit, &material);

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let donut = Model {
            mesh: Mesh::from_data(device, "donut", &donut()),
            material: Rc::clone(&material),
        };
        let instances = scatter(&mut rng, count).into_iter().map(Instance::from).collect();
        let donuts = MeshGroup::new(DONUTS_ID, device, donut, instances);
        log::info!("Scattered {} donuts", donuts.instances.len());

        Ok(Self {
            title,
            credit,
            donuts,
        })
    }
}

fn text_group(
    device: &wgpu::Device,
    id: u32,
    name: &str,
    data: &MeshData,
    material: &Rc<Material>,
) -> Option<MeshGroup> {
    if data.is_empty() {
        log::warn!("Text mesh {} has no triangles", name);
        return None;
    }
    let model = Model {
        mesh: Mesh::from_data(device, name, data),
        material: Rc::clone(material),
    };
    Some(MeshGroup::single(id, device, model, Instance::new()))
}

impl<S, E> GraphicsFlow<S, E> for DonutsScene {
    fn on_init(&mut self, ctx: &mut Context, _: &mut S) -> Out<S, E> {
        ctx.clear_colour = wgpu::Color::BLACK;
        Out::Empty
    }

    fn on_update(&mut self, _: &Context, _: &mut S, _: Duration) -> Out<S, E> {
        Out::Empty
    }

    fn on_tick(&mut self, _: &Context, _: &mut S) -> Out<S, E> {
        Out::Empty
    }

    fn on_device_events(&mut self, _: &Context, _: &mut S, _: &DeviceEvent) -> Out<S, E> {
        Out::Empty
    }

    fn on_window_events(&mut self, _: &Context, _: &mut S, _: &WindowEvent) -> Out<S, E> {
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &Context, _: &mut S, event: E) -> Option<E> {
        Some(event)
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        let batch = self
            .title
            .iter()
            .chain(self.credit.iter())
            .chain(std::iter::once(&self.donuts))
            .map(MeshGroup::instanced)
            .collect();
        Render::Matcaps(batch)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let donuts = scatter(&mut rng, DONUT_COUNT);
        assert_eq!(donuts.len(), 100);
        for donut in &donuts {
            for c in [donut.position.x, donut.position.y, donut.position.z] {
                assert!((-5.0..5.0).contains(&c), "{} out of range", c);
            }
            let (x, y) = donut.rotation;
            assert!((0.0..PI).contains(&x), "x rotation {} out of range", x);
            assert!((0.0..PI).contains(&y), "y rotation {} out of range", y);
            assert!((0.0..1.0).contains(&donut.scale));
        }
    }

    #[test]
    fn poses_become_uniformly_scaled_instances_without_roll() {
        let pose = DonutPose {
            position: Vector3::new(1.0, -2.0, 3.0),
            rotation: (0.5, 1.25),
            scale: 0.75,
        };
        let instance = Instance::from(pose);
        assert_eq!(instance.position, pose.position);
        assert_eq!(instance.scale, Vector3::new(0.75, 0.75, 0.75));
        let upright = Instance::from(pose.position).with_euler(0.5, 1.25, 0.0);
        assert_eq!(instance.rotation, upright.rotation);
        let rolled = Instance::from(pose.position).with_euler(0.5, 1.25, 0.1);
        assert_ne!(instance.rotation, rolled.rotation);
    }

    #[test]
    fn bundled_face_writes_both_lines() {
        let typeface = Typeface::bundled().expect("bundled face parses");
        for c in TITLE.chars().chain(CREDIT.chars()) {
            assert!(typeface.glyphs.contains_key(&c.to_string()), "no glyph for '{}'", c);
        }
        let (title, credit) = text_meshes(&typeface);
        assert!(!title.is_empty());
        assert!(!credit.is_empty());
    }

    #[test]
    fn same_seed_same_scatter() {
        let a = scatter(&mut StdRng::seed_from_u64(42), 10);
        let b = scatter(&mut StdRng::seed_from_u64(42), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_donuts() {
        assert!(scatter(&mut StdRng::seed_from_u64(1), 0).is_empty());
    }

    #[test]
    fn donut_is_a_torus() {
        let mesh = donut();
        assert_eq!(mesh.vertex_count(), 21 * 46);
        assert_eq!(mesh.triangle_count(), 20 * 45 * 2);
    }
}
