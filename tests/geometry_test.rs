use approx::assert_relative_eq;
use cgmath::Vector2;
use love_donuts::geometry::{
    self, ExtrudeOptions, MeshData, Shape, ShapePath, extrude_shapes,
    path::{is_clockwise, signed_area},
    triangulate::triangulate,
};

fn square(min: f32, max: f32) -> Vec<Vector2<f32>> {
    // counter-clockwise
    vec![
        Vector2::new(min, min),
        Vector2::new(max, min),
        Vector2::new(max, max),
        Vector2::new(min, max),
    ]
}

fn triangle_area(points: &[Vector2<f32>], [a, b, c]: [usize; 3]) -> f32 {
    signed_area(&[points[a], points[b], points[c]])
}

#[test]
fn sphere_has_a_vertex_grid_and_no_pole_slivers() {
    let sphere = geometry::sphere(0.5, 16, 16);
    assert_eq!(sphere.vertex_count(), 17 * 17);
    assert_eq!(sphere.triangle_count(), 16 * 15 * 2);
    for p in &sphere.positions {
        let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        assert_relative_eq!(r, 0.5, epsilon = 1e-5);
    }
}

#[test]
fn plane_is_centred_and_faces_z() {
    let plane = geometry::plane(1.0, 1.0, 1, 1);
    assert_eq!(plane.vertex_count(), 4);
    assert_eq!(plane.triangle_count(), 2);
    let aabb = plane.bounding_box().expect("plane has vertices");
    assert_relative_eq!(aabb.min.x, -0.5);
    assert_relative_eq!(aabb.max.y, 0.5);
    assert!(plane.normals.iter().all(|n| *n == [0.0, 0.0, 1.0]));
}

#[test]
fn double_sided_plane_mirrors_every_face() {
    let mut plane = geometry::plane(1.0, 1.0, 1, 1);
    plane.double_sided();
    assert_eq!(plane.vertex_count(), 8);
    assert_eq!(plane.triangle_count(), 4);
    assert!(plane.normals[4..].iter().all(|n| *n == [0.0, 0.0, -1.0]));
    // back faces are the front ones with reversed winding
    assert_eq!(&plane.indices[6..9], &[plane.indices[0] + 4, plane.indices[2] + 4, plane.indices[1] + 4]);
}

#[test]
fn torus_spans_radius_plus_tube() {
    let torus = geometry::torus(0.3, 0.2, 16, 32);
    assert_eq!(torus.vertex_count(), 17 * 33);
    assert_eq!(torus.triangle_count(), 16 * 32 * 2);
    let aabb = torus.bounding_box().expect("torus has vertices");
    assert_relative_eq!(aabb.max.x, 0.5, epsilon = 1e-5);
    assert_relative_eq!(aabb.max.z, 0.2, epsilon = 1e-3);
}

#[test]
fn center_moves_the_bounding_box_to_the_origin() {
    let mut mesh = geometry::plane(2.0, 1.0, 1, 1);
    mesh.translate(3.0, -1.0, 0.5);
    let before = mesh.bounding_box().expect("not empty");
    assert_relative_eq!(before.center().x, 3.0);
    mesh.center();
    let after = mesh.bounding_box().expect("not empty");
    assert_relative_eq!(after.center().x, 0.0);
    assert_relative_eq!(after.center().y, 0.0);
    assert_relative_eq!(after.center().z, 0.0);
    assert_relative_eq!(after.size().x, 2.0);
}

#[test]
fn empty_mesh_has_no_bounding_box() {
    let mut mesh = MeshData::default();
    assert!(mesh.bounding_box().is_none());
    mesh.center();
    assert!(mesh.is_empty());
}

#[test]
fn merge_offsets_indices() {
    let mut a = geometry::plane(1.0, 1.0, 1, 1);
    let b = geometry::plane(1.0, 1.0, 1, 1);
    a.merge(&b);
    assert_eq!(a.vertex_count(), 8);
    assert_eq!(*a.indices.iter().max().expect("indices"), 7);
}

#[test]
fn triangulates_a_square_ring() {
    let outer = square(0.0, 3.0);
    let hole: Vec<_> = square(1.0, 2.0).into_iter().rev().collect();
    let triangles = triangulate(&outer, std::slice::from_ref(&hole));
    // V + 2H - 2 triangles for a polygon with holes
    assert_eq!(triangles.len(), 8);

    let points: Vec<_> = outer.iter().chain(hole.iter()).copied().collect();
    let area: f32 = triangles.iter().map(|t| triangle_area(&points, *t)).sum();
    assert_relative_eq!(area, 9.0 - 1.0, epsilon = 1e-4);
    assert!(triangles.iter().all(|t| triangle_area(&points, *t) > 0.0));
}

#[test]
fn triangulates_clockwise_input_counter_clockwise() {
    let outer: Vec<_> = square(0.0, 1.0).into_iter().rev().collect();
    assert!(is_clockwise(&outer));
    let triangles = triangulate(&outer, &[]);
    assert_eq!(triangles.len(), 2);
    assert!(triangles.iter().all(|t| triangle_area(&outer, *t) > 0.0));
}

#[test]
fn degenerate_contours_give_no_triangles() {
    let line = vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)];
    assert!(triangulate(&line, &[]).is_empty());
}

#[test]
fn shape_path_splits_solids_and_holes() {
    let mut path = ShapePath::new();
    // clockwise outer, counter-clockwise inner
    path.move_to(0.0, 0.0)
        .line_to(0.0, 4.0)
        .line_to(4.0, 4.0)
        .line_to(4.0, 0.0)
        .move_to(1.0, 1.0)
        .line_to(3.0, 1.0)
        .line_to(3.0, 3.0)
        .line_to(1.0, 3.0);
    let shapes = path.to_shapes(12);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].holes.len(), 1);
    assert_relative_eq!(signed_area(&shapes[0].contour).abs(), 16.0);
}

#[test]
fn curves_are_flattened() {
    let mut path = ShapePath::new();
    path.move_to(0.0, 0.0)
        .quadratic_curve_to(1.0, 2.0, 2.0, 0.0)
        .line_to(1.0, -1.0);
    let shapes = path.to_shapes(12);
    assert_eq!(shapes.len(), 1);
    // start, 12 curve points, the line end
    assert_eq!(shapes[0].contour.len(), 14);
}

#[test]
fn extrudes_a_square_without_bevel() {
    let shape = Shape {
        contour: square(0.0, 1.0),
        holes: Vec::new(),
    };
    let options = ExtrudeOptions {
        depth: 0.2,
        bevel_enabled: false,
        ..Default::default()
    };
    let mesh = extrude_shapes(&[shape], &options);
    // two caps of two triangles, four walls of two
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.vertex_count(), 36);
    let aabb = mesh.bounding_box().expect("not empty");
    assert_relative_eq!(aabb.min.z, 0.0);
    assert_relative_eq!(aabb.max.z, 0.2);
    assert_relative_eq!(aabb.max.x, 1.0);
}

#[test]
fn bevel_grows_the_solid() {
    let shape = Shape {
        contour: square(0.0, 1.0),
        holes: Vec::new(),
    };
    let options = ExtrudeOptions {
        depth: 0.2,
        steps: 1,
        bevel_enabled: true,
        bevel_thickness: 0.03,
        bevel_size: 0.02,
        bevel_offset: 0.0,
        bevel_segments: 5,
    };
    let mesh = extrude_shapes(&[shape], &options);
    let aabb = mesh.bounding_box().expect("not empty");
    assert_relative_eq!(aabb.min.z, -0.03, epsilon = 1e-5);
    assert_relative_eq!(aabb.max.z, 0.23, epsilon = 1e-5);
    assert_relative_eq!(aabb.min.x, -0.02, epsilon = 1e-5);
    assert_relative_eq!(aabb.max.x, 1.02, epsilon = 1e-5);
}
