//! What a flow asks to have drawn this frame.
//!
//! Flows return a [`Render`] tree from `on_render`. The frame loop flattens
//! the trees of all flows into per-pipeline [`Batches`] so that each pipeline
//! is bound once: lit meshes first, then matcap meshes, then the overlay.

use wgpu::RenderPass;

use crate::{
    context::Context,
    data_structures::model::{DrawModel, Model},
};

/// One model drawn `amount` times from an [`InstanceRaw`](crate::data_structures::instance::InstanceRaw) buffer.
#[derive(Clone, Copy)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
    pub id: u32,
}

/// Overlay triangles: coloured vertices and `amount` u16 indices.
#[derive(Clone, Copy)]
pub struct Flat<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub index: &'a wgpu::Buffer,
    pub amount: usize,
    pub id: u32,
}

/// A draw request. The plural variants carry a batch for the same pipeline,
/// `Composed` nests requests and `Custom` gets the open render pass.
pub enum Render<'a, 'pass>
where
    'pass: 'a,
{
    None,
    Standard(Instanced<'a>),
    Standards(Vec<Instanced<'a>>),
    Matcap(Instanced<'a>),
    Matcaps(Vec<Instanced<'a>>),
    GUI(Flat<'a>),
    Composed(Vec<Render<'a, 'pass>>),
    Custom(Box<dyn 'a + FnOnce(&Context, &mut wgpu::RenderPass<'pass>)>),
}

/// Draw lists collected from all flows for one frame.
#[derive(Default)]
pub(crate) struct Batches<'a> {
    pub(crate) standards: Vec<Instanced<'a>>,
    pub(crate) matcaps: Vec<Instanced<'a>>,
    pub(crate) guis: Vec<Flat<'a>>,
}

impl Batches<'_> {
    /// Bind each pipeline once and draw its batch, the overlay last.
    pub(crate) fn draw(self, ctx: &Context, pass: &mut RenderPass<'_>) {
        let camera = &ctx.camera.bind_group;
        draw_instanced(pass, &ctx.pipelines.standard, self.standards, &[camera, &ctx.light.bind_group]);
        draw_instanced(pass, &ctx.pipelines.matcap, self.matcaps, &[camera]);
        if self.guis.is_empty() {
            return;
        }
        pass.set_pipeline(&ctx.pipelines.gui);
        for flat in self.guis {
            pass.set_vertex_buffer(0, flat.vertex.slice(..));
            pass.set_index_buffer(flat.index.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..flat.amount as u32, 0, 0..1);
        }
    }
}

fn draw_instanced(
    pass: &mut RenderPass<'_>,
    pipeline: &wgpu::RenderPipeline,
    batch: Vec<Instanced<'_>>,
    groups: &[&wgpu::BindGroup],
) {
    if batch.is_empty() {
        return;
    }
    pass.set_pipeline(pipeline);
    for instanced in batch {
        // an empty instance buffer cannot be bound
        if instanced.amount == 0 {
            log::debug!("Skipping mesh group {} without instances", instanced.id);
            continue;
        }
        pass.set_vertex_buffer(1, instanced.instance.slice(..));
        pass.draw_model_instanced(instanced.model, 0..instanced.amount as u32, groups);
    }
}

impl<'a, 'pass> Render<'a, 'pass> {
    /// Sort `self` into `batches`. Custom renders are drawn immediately.
    pub(crate) fn collect(
        self,
        ctx: &Context,
        render_pass: &mut RenderPass<'pass>,
        batches: &mut Batches<'a>,
    ) {
        match self {
            Render::Standard(instanced) => batches.standards.push(instanced),
            Render::Standards(mut vec) => batches.standards.append(&mut vec),
            Render::Matcap(instanced) => batches.matcaps.push(instanced),
            Render::Matcaps(mut vec) => batches.matcaps.append(&mut vec),
            Render::GUI(flat) => batches.guis.push(flat),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.collect(ctx, render_pass, batches)),
            Render::Custom(f) => f(ctx, render_pass),
            Render::None => (),
        }
    }

    /// Number of leaf draws, custom renders included.
    pub fn len(&self) -> usize {
        match self {
            Render::None => 0,
            Render::Standard(_) | Render::Matcap(_) | Render::GUI(_) | Render::Custom(_) => 1,
            Render::Standards(vec) | Render::Matcaps(vec) => vec.len(),
            Render::Composed(renders) => renders.iter().map(Render::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
