use crate::{
    geometry::{ExtrudeOptions, MeshData, extrude_shapes},
    resources::font::Typeface,
};

/// Text layout and extrusion settings. `height` is the extrusion depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextOptions {
    pub size: f32,
    pub height: f32,
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            size: 100.0,
            height: 50.0,
            curve_segments: 12,
            bevel_enabled: false,
            bevel_thickness: 10.0,
            bevel_size: 8.0,
            bevel_offset: 0.0,
            bevel_segments: 3,
        }
    }
}

impl From<&TextOptions> for ExtrudeOptions {
    fn from(options: &TextOptions) -> Self {
        ExtrudeOptions {
            depth: options.height,
            steps: 1,
            bevel_enabled: options.bevel_enabled,
            bevel_thickness: options.bevel_thickness,
            bevel_size: options.bevel_size,
            bevel_offset: options.bevel_offset,
            bevel_segments: options.bevel_segments,
        }
    }
}

/// Lay out `content` with `typeface` and extrude it. The baseline of the
/// first line sits on y = 0 and the text starts at x = 0.
pub fn text(typeface: &Typeface, content: &str, options: &TextOptions) -> MeshData {
    let shapes = typeface.generate_shapes(content, options.size, options.curve_segments);
    extrude_shapes(&shapes, &options.into())
}
