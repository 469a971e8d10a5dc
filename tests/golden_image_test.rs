#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_draw_a_matcap_sphere_over_the_clear_colour() {
    use std::rc::Rc;

    use love_donuts::{
        context::{Context, InitContext},
        data_structures::{
            instance::Instance,
            mesh_group::MeshGroup,
            model::{Material, Mesh, Model},
            texture::Texture,
        },
        flow::ImageTestResult,
        geometry,
        resources::texture::texture_layout,
    };
    use wgpu::Color;

    use crate::common::test_utils::{FrameCounter, TestRender, rgba, to_pixel};

    golden_image_test!(async move |ctx: InitContext| {
        let texture = Texture::solid(&ctx.device, &ctx.queue, [255, 0, 0, 255], "red")?;
        let material = Material::new(&ctx.device, "red", texture, &texture_layout(&ctx.device))?;
        let model = Model {
            mesh: Mesh::from_data(&ctx.device, "sphere", &geometry::sphere(2.0, 32, 16)),
            material: Rc::new(material),
        };
        let sphere = MeshGroup::single(0, &ctx.device, model, Instance::new());
        anyhow::Ok(TestRender::new(
            sphere,
            Box::new(|ctx: &mut Context| ctx.clear_colour = Color::WHITE),
            Box::new(|ctx: &Context, state: &mut FrameCounter, actual| {
                if state.frame() == 0 {
                    return Ok(ImageTestResult::Waiting);
                }
                let (width, height) = actual.dimensions();
                let centre = rgba(ctx, *actual.get_pixel(width / 2, height / 2));
                assert!(centre[0] > 200 && centre[1] < 50 && centre[2] < 50, "centre is {:?}", centre);
                assert_eq!(*actual.get_pixel(0, 0), to_pixel(Color::WHITE));
                Ok(ImageTestResult::Passed)
            }),
        ))
    });
}
