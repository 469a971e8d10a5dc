use approx::assert_relative_eq;
use love_donuts::{
    geometry::{self, TextOptions, path::signed_area},
    resources::font::Typeface,
    scenes::donuts::{credit_options, text_meshes, title_options},
};

const BLOCKS: &str = include_str!("fixtures/blocks.typeface.json");

fn blocks() -> Typeface {
    Typeface::from_json(BLOCKS).expect("fixture parses")
}

fn flat(size: f32) -> TextOptions {
    TextOptions {
        size,
        height: 0.2,
        curve_segments: 12,
        bevel_enabled: false,
        ..Default::default()
    }
}

#[test]
fn parses_typeface_json() {
    let typeface = blocks();
    assert_eq!(typeface.family_name, "Blocks");
    assert_eq!(typeface.glyphs.len(), 6);
    assert_eq!(typeface.glyph('I').map(|g| g.ha), Some(200.0));
    assert!(typeface.glyph(' ').is_some_and(|g| g.o.is_none()));
}

#[test]
fn unknown_characters_fall_back_to_question_mark() {
    let typeface = blocks();
    assert_eq!(typeface.glyph('Z').map(|g| g.ha), Some(400.0));
}

#[test]
fn rejects_malformed_typefaces() {
    assert!(Typeface::from_json("{ not json").is_err());
    let no_resolution = BLOCKS.replace("\"resolution\": 1000", "\"resolution\": 0");
    assert!(Typeface::from_json(&no_resolution).is_err());
}

#[test]
fn line_height_scales_with_size() {
    assert_relative_eq!(blocks().line_height(1.0), 1.05);
    assert_relative_eq!(blocks().line_height(0.5), 0.525);
}

#[test]
fn glyph_with_a_counter_becomes_a_shape_with_a_hole() {
    let shapes = blocks().generate_shapes("O", 1.0, 12);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].holes.len(), 1);
    assert_relative_eq!(signed_area(&shapes[0].contour).abs(), 0.36, epsilon = 1e-5);
    assert_relative_eq!(signed_area(&shapes[0].holes[0]).abs(), 0.16, epsilon = 1e-5);
}

#[test]
fn glyphs_advance_along_x() {
    let shapes = blocks().generate_shapes("I I", 1.0, 12);
    assert_eq!(shapes.len(), 2);
    let min_x = shapes[1]
        .contour
        .iter()
        .map(|p| p.x)
        .fold(f32::INFINITY, f32::min);
    // "I" and the space are 0.2 and 0.3 wide
    assert_relative_eq!(min_x, 0.5, epsilon = 1e-5);
}

#[test]
fn newline_starts_a_lower_line() {
    let shapes = blocks().generate_shapes("I\nI", 1.0, 12);
    assert_eq!(shapes.len(), 2);
    let max_y = shapes[1]
        .contour
        .iter()
        .map(|p| p.y)
        .fold(f32::NEG_INFINITY, f32::max);
    assert_relative_eq!(max_y, 0.7 - 1.05, epsilon = 1e-5);
}

#[test]
fn curves_follow_curve_segments() {
    let coarse = blocks().generate_shapes("D", 1.0, 2);
    let fine = blocks().generate_shapes("D", 1.0, 12);
    assert_eq!(coarse.len(), 1);
    assert_eq!(fine.len(), 1);
    assert!(fine[0].contour.len() > coarse[0].contour.len());
}

#[test]
fn bad_outlines_are_skipped() {
    assert!(blocks().generate_shapes("X", 1.0, 12).is_empty());
    assert!(blocks().generate_shapes(" ", 1.0, 12).is_empty());
    // the rest of the line survives
    assert_eq!(blocks().generate_shapes("XI", 1.0, 12).len(), 1);
}

#[test]
fn text_is_extruded_to_height() {
    let mesh = geometry::text(&blocks(), "I", &flat(1.0));
    assert_eq!(mesh.triangle_count(), 12);
    let aabb = mesh.bounding_box().expect("not empty");
    assert_relative_eq!(aabb.min.z, 0.0);
    assert_relative_eq!(aabb.max.z, 0.2);
    assert_relative_eq!(aabb.max.x, 0.1, epsilon = 1e-5);
    assert_relative_eq!(aabb.max.y, 0.7, epsilon = 1e-5);
}

#[test]
fn title_is_centred_and_credit_offset() {
    let (title, credit) = text_meshes(&blocks());
    assert!(!title.is_empty());
    assert!(!credit.is_empty());

    let title_box = title.bounding_box().expect("title");
    assert_relative_eq!(title_box.center().x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(title_box.center().y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(title_box.center().z, 0.0, epsilon = 1e-5);

    // the credit starts at x = 0.5 minus its bevel and sits on y = -0.5
    let credit_box = credit.bounding_box().expect("credit");
    let bevel = credit_options().bevel_size;
    assert_relative_eq!(credit_box.min.x, 0.5 - bevel, epsilon = 1e-4);
    assert_relative_eq!(credit_box.min.z, -credit_options().bevel_thickness, epsilon = 1e-5);
    assert!(title_options().size > credit_options().size);
}
