//! Extrusion of flat shapes into solids with an optional rounded bevel.
//!
//! The solid is built from stacked copies ("layers") of the outline:
//! `bevel_segments` layers sweeping out from the front cap, the body from
//! z = 0 to z = `depth`, and the mirrored bevel back in. Caps are triangulated
//! once and reused front and back, side walls join neighbouring layers.
//! Faces get flat normals, each triangle owns its three vertices.

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Vector2, Vector3};

use crate::geometry::{
    MeshData,
    path::{Point, Shape, is_clockwise},
    triangulate::triangulate,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExtrudeOptions {
    pub depth: f32,
    pub steps: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for ExtrudeOptions {
    fn default() -> Self {
        Self {
            depth: 1.0,
            steps: 1,
            bevel_enabled: true,
            bevel_thickness: 0.2,
            bevel_size: 0.1,
            bevel_offset: 0.0,
            bevel_segments: 3,
        }
    }
}

pub fn extrude_shapes(shapes: &[Shape], options: &ExtrudeOptions) -> MeshData {
    let mut data = MeshData::default();
    for shape in shapes {
        extrude_shape(&mut data, shape, options);
    }
    data
}

/// Direction and length a vertex moves so that both adjacent edges shift
/// outwards by one unit.
fn bevel_vec(pt: Point, prev: Point, next: Point) -> Point {
    let v_prev = pt - prev;
    let v_next = next - pt;
    let v_prev_lensq = v_prev.magnitude2();
    let collinear = v_prev.x * v_next.y - v_prev.y * v_next.x;

    let (trans, shrink_by) = if collinear.abs() > f32::EPSILON {
        let v_prev_len = v_prev_lensq.sqrt();
        let v_next_len = v_next.magnitude();
        // shift both edges to the left by one unit and intersect them
        let prev_shift = Vector2::new(prev.x - v_prev.y / v_prev_len, prev.y + v_prev.x / v_prev_len);
        let next_shift = Vector2::new(next.x - v_next.y / v_next_len, next.y + v_next.x / v_next_len);
        let sf = ((next_shift.x - prev_shift.x) * v_next.y - (next_shift.y - prev_shift.y) * v_next.x)
            / collinear;
        let trans = prev_shift + v_prev * sf - pt;
        let trans_sq = trans.magnitude2();
        if trans_sq <= 2.0 {
            return trans;
        }
        (trans, (trans_sq / 2.0).sqrt())
    } else {
        let direction_eq = if v_prev.x > f32::EPSILON {
            v_next.x > f32::EPSILON
        } else if v_prev.x < -f32::EPSILON {
            v_next.x < -f32::EPSILON
        } else {
            v_prev.y.signum() == v_next.y.signum()
        };
        if direction_eq {
            (Vector2::new(-v_prev.y, v_prev.x), v_prev_lensq.sqrt())
        } else {
            (v_prev, (v_prev_lensq / 2.0).sqrt())
        }
    };
    if shrink_by > 0.0 {
        trans / shrink_by
    } else {
        Vector2::new(0.0, 0.0)
    }
}

fn movements(contour: &[Point]) -> Vec<Point> {
    let n = contour.len();
    (0..n)
        .map(|i| bevel_vec(contour[i], contour[(i + n - 1) % n], contour[(i + 1) % n]))
        .collect()
}

fn extrude_shape(data: &mut MeshData, shape: &Shape, options: &ExtrudeOptions) {
    if shape.contour.len() < 3 {
        return;
    }
    // outer contour clockwise, holes counter-clockwise
    let mut contour = shape.contour.clone();
    if !is_clockwise(&contour) {
        contour.reverse();
    }
    let holes: Vec<Vec<Point>> = shape
        .holes
        .iter()
        .filter(|h| h.len() >= 3)
        .map(|h| {
            let mut h = h.clone();
            if is_clockwise(&h) {
                h.reverse();
            }
            h
        })
        .collect();

    let faces = triangulate(&contour, &holes);

    let outline: Vec<Point> = contour.iter().chain(holes.iter().flatten()).copied().collect();
    let moves: Vec<Point> = movements(&contour)
        .into_iter()
        .chain(holes.iter().flat_map(|h| movements(h)))
        .collect();
    let vlen = outline.len();

    let (bevel_segments, bevel_thickness, bevel_size, bevel_offset) = if options.bevel_enabled {
        (
            options.bevel_segments,
            options.bevel_thickness,
            options.bevel_size,
            options.bevel_offset,
        )
    } else {
        (0, 0.0, 0.0, 0.0)
    };
    let steps = options.steps.max(1);

    let layer = |bs: f32, z: f32| -> Vec<Vector3<f32>> {
        outline
            .iter()
            .zip(moves.iter())
            .map(|(p, m)| {
                let q = *p + *m * bs;
                Vector3::new(q.x, q.y, z)
            })
            .collect()
    };

    let mut layers: Vec<Vec<Vector3<f32>>> = Vec::new();
    for b in 0..bevel_segments {
        let t = b as f32 / bevel_segments as f32;
        let z = bevel_thickness * (t * FRAC_PI_2).cos();
        let bs = bevel_size * (t * FRAC_PI_2).sin() + bevel_offset;
        layers.push(layer(bs, -z));
    }
    let body = bevel_size + bevel_offset;
    for s in 0..=steps {
        layers.push(layer(body, options.depth / steps as f32 * s as f32));
    }
    for b in (0..bevel_segments).rev() {
        let t = b as f32 / bevel_segments as f32;
        let z = bevel_thickness * (t * FRAC_PI_2).cos();
        let bs = bevel_size * (t * FRAC_PI_2).sin() + bevel_offset;
        layers.push(layer(bs, options.depth + z));
    }

    let front = &layers[0];
    let back = &layers[layers.len() - 1];
    for face in &faces {
        push_triangle(data, front[face[2]], front[face[1]], front[face[0]], Uv::Lid);
        push_triangle(data, back[face[0]], back[face[1]], back[face[2]], Uv::Lid);
    }

    let mut ring_offset = 0;
    let ring_lengths = std::iter::once(contour.len()).chain(holes.iter().map(Vec::len));
    for ring_len in ring_lengths {
        for i in (0..ring_len).rev() {
            let j = ring_offset + i;
            let k = ring_offset + if i == 0 { ring_len - 1 } else { i - 1 };
            for s in 0..layers.len() - 1 {
                let (a, b) = (layers[s][j], layers[s][k]);
                let (c, d) = (layers[s + 1][k], layers[s + 1][j]);
                push_triangle(data, a, b, d, Uv::Side);
                push_triangle(data, b, c, d, Uv::Side);
            }
        }
        ring_offset += ring_len;
    }
    debug_assert_eq!(ring_offset, vlen);
}

#[derive(Clone, Copy)]
enum Uv {
    Lid,
    Side,
}

fn push_triangle(data: &mut MeshData, a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>, uv: Uv) {
    let normal = (b - a).cross(c - a);
    if normal.magnitude2() <= f32::EPSILON * f32::EPSILON {
        return;
    }
    let normal: [f32; 3] = normal.normalize().into();
    let uvs = match uv {
        Uv::Lid => [[a.x, a.y], [b.x, b.y], [c.x, c.y]],
        Uv::Side => {
            if (a.y - b.y).abs() < (a.x - b.x).abs() {
                [[a.x, 1.0 - a.z], [b.x, 1.0 - b.z], [c.x, 1.0 - c.z]]
            } else {
                [[a.y, 1.0 - a.z], [b.y, 1.0 - b.z], [c.y, 1.0 - c.z]]
            }
        }
    };
    for (p, uv) in [a, b, c].into_iter().zip(uvs) {
        let idx = data.push_vertex(p.into(), normal, uv);
        data.indices.push(idx);
    }
}
