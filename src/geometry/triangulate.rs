//! Polygon triangulation by ear clipping.
//!
//! Holes are first merged into the outer contour through zero-width bridges,
//! turning the polygon into a single (weakly simple) ring that is then
//! clipped ear by ear. Indices refer to the concatenation
//! `contour ++ holes[0] ++ holes[1] ++ ...`.

use crate::geometry::path::{Point, signed_area};

const EPSILON: f32 = 1e-9;

fn cross(o: Point, a: Point, b: Point) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Counter-clockwise triangles covering the polygon.
pub fn triangulate(contour: &[Point], holes: &[Vec<Point>]) -> Vec<[usize; 3]> {
    let points: Vec<Point> = contour
        .iter()
        .chain(holes.iter().flatten())
        .copied()
        .collect();
    if contour.len() < 3 {
        return Vec::new();
    }

    let mut ring: Vec<usize> = (0..contour.len()).collect();
    if signed_area(contour) < 0.0 {
        ring.reverse();
    }

    let mut hole_rings: Vec<Vec<usize>> = Vec::new();
    let mut start = contour.len();
    for hole in holes {
        let mut indices: Vec<usize> = (start..start + hole.len()).collect();
        start += hole.len();
        if hole.len() < 3 {
            continue;
        }
        // holes run against the outer ring
        if signed_area(hole) > 0.0 {
            indices.reverse();
        }
        hole_rings.push(indices);
    }
    // bridge the leftmost holes first
    hole_rings.sort_by(|a, b| leftmost_x(&points, a).total_cmp(&leftmost_x(&points, b)));

    for idx in 0..hole_rings.len() {
        let (hole, rest) = (&hole_rings[idx], &hole_rings[idx + 1..]);
        ring = bridge_hole(&points, ring, hole, rest);
    }

    clip_ears(&points, ring)
}

fn leftmost_x(points: &[Point], ring: &[usize]) -> f32 {
    ring.iter().map(|&i| points[i].x).fold(f32::INFINITY, f32::min)
}

/// Splice `hole` into `ring` through the closest visible ring vertex.
fn bridge_hole(
    points: &[Point],
    ring: Vec<usize>,
    hole: &[usize],
    pending: &[Vec<usize>],
) -> Vec<usize> {
    let Some(hole_pos) = (0..hole.len()).min_by(|&a, &b| {
        let (pa, pb) = (points[hole[a]], points[hole[b]]);
        pa.x.total_cmp(&pb.x).then(pa.y.total_cmp(&pb.y))
    }) else {
        return ring;
    };
    let m = points[hole[hole_pos]];

    let mut candidates: Vec<usize> = (0..ring.len()).collect();
    candidates.sort_by(|&a, &b| {
        let da = distance2(points[ring[a]], m);
        let db = distance2(points[ring[b]], m);
        da.total_cmp(&db)
    });

    let visible = candidates.into_iter().find(|&pos| {
        let p = points[ring[pos]];
        let n = ring.len();
        let prev = points[ring[(pos + n - 1) % n]];
        let next = points[ring[(pos + 1) % n]];
        locally_inside(prev, p, next, m)
            && !crosses_any(points, p, m, &ring)
            && !crosses_any(points, p, m, hole)
            && pending.iter().all(|other| !crosses_any(points, p, m, other))
    });

    let Some(pos) = visible else {
        log::debug!("No visible bridge for a hole, leaving it open");
        return ring;
    };

    let mut merged = Vec::with_capacity(ring.len() + hole.len() + 2);
    merged.extend_from_slice(&ring[..=pos]);
    merged.extend(hole[hole_pos..].iter().chain(hole[..=hole_pos].iter()));
    merged.extend_from_slice(&ring[pos..]);
    merged
}

fn distance2(a: Point, b: Point) -> f32 {
    (a.x - b.x).powi(2) + (a.y - b.y).powi(2)
}

/// Whether direction `p -> target` points into the polygon at vertex `p` of a
/// counter-clockwise ring.
fn locally_inside(prev: Point, p: Point, next: Point, target: Point) -> bool {
    if cross(prev, p, next) >= 0.0 {
        cross(p, next, target) >= 0.0 && cross(p, target, prev) >= 0.0
    } else {
        !(cross(p, prev, target) > 0.0 && cross(p, target, next) > 0.0)
    }
}

fn crosses_any(points: &[Point], a: Point, b: Point, ring: &[usize]) -> bool {
    let n = ring.len();
    (0..n).any(|i| {
        let c = points[ring[i]];
        let d = points[ring[(i + 1) % n]];
        // edges touching the bridge ends do not block it
        if c == a || c == b || d == a || d == b {
            return false;
        }
        segments_cross(a, b, c, d)
    })
}

fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = cross(a, b, c);
    let d2 = cross(a, b, d);
    let d3 = cross(c, d, a);
    let d4 = cross(c, d, b);
    ((d1 > EPSILON && d2 < -EPSILON) || (d1 < -EPSILON && d2 > EPSILON))
        && ((d3 > EPSILON && d4 < -EPSILON) || (d3 < -EPSILON && d4 > EPSILON))
}

fn point_in_triangle(a: Point, b: Point, c: Point, p: Point) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

fn is_ear(points: &[Point], ring: &[usize], prev: usize, cur: usize, next: usize) -> bool {
    let (a, b, c) = (points[ring[prev]], points[ring[cur]], points[ring[next]]);
    if cross(a, b, c) <= EPSILON {
        return false;
    }
    ring.iter().enumerate().all(|(i, &idx)| {
        if i == prev || i == cur || i == next {
            return true;
        }
        let p = points[idx];
        // bridge duplicates share a position with the triangle corners
        p == a || p == b || p == c || !point_in_triangle(a, b, c, p)
    })
}

fn clip_ears(points: &[Point], mut ring: Vec<usize>) -> Vec<[usize; 3]> {
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));
    let mut pos = 0;
    let mut stalled = 0;
    while ring.len() > 3 {
        let n = ring.len();
        pos %= n;
        let prev = (pos + n - 1) % n;
        let next = (pos + 1) % n;
        let area = cross(points[ring[prev]], points[ring[pos]], points[ring[next]]);

        if area.abs() <= EPSILON {
            // collinear or doubled back, contributes no area
            ring.remove(pos);
            stalled = 0;
        } else if is_ear(points, &ring, prev, pos, next) {
            triangles.push([ring[prev], ring[pos], ring[next]]);
            ring.remove(pos);
            stalled = 0;
        } else {
            pos += 1;
            stalled += 1;
            if stalled > n {
                // self-intersecting input: force the most convex corner out
                let forced = (0..n)
                    .max_by(|&a, &b| {
                        let area_at = |i: usize| {
                            cross(points[ring[(i + n - 1) % n]], points[ring[i]], points[ring[(i + 1) % n]])
                        };
                        area_at(a).total_cmp(&area_at(b))
                    })
                    .unwrap_or(0);
                let (p, q) = ((forced + n - 1) % n, (forced + 1) % n);
                if cross(points[ring[p]], points[ring[forced]], points[ring[q]]) > 0.0 {
                    triangles.push([ring[p], ring[forced], ring[q]]);
                }
                ring.remove(forced);
                stalled = 0;
            }
        }
    }
    if ring.len() == 3 && cross(points[ring[0]], points[ring[1]], points[ring[2]]) > EPSILON {
        triangles.push([ring[0], ring[1], ring[2]]);
    }
    triangles
}
