//! 2D outlines built from line and bezier segments.
//!
//! A [`ShapePath`] records drawing commands (`move_to`, `line_to`, ...) into
//! sub-paths. [`ShapePath::to_shapes`] flattens the curves and groups the
//! resulting contours into [`Shape`]s: one outer contour plus the holes it
//! contains, told apart by winding.

use cgmath::Vector2;

pub type Point = Vector2<f32>;

#[derive(Clone, Debug, PartialEq)]
enum Segment {
    Line(Point),
    Quadratic { control: Point, to: Point },
    Cubic { c1: Point, c2: Point, to: Point },
}

#[derive(Clone, Debug, PartialEq)]
struct SubPath {
    start: Point,
    segments: Vec<Segment>,
}

impl SubPath {
    /// Flatten to a polyline. Lines contribute their end point, curves
    /// `divisions` points. Consecutive duplicates and a closing point equal to
    /// the first one are dropped.
    fn points(&self, divisions: u32) -> Vec<Point> {
        let divisions = divisions.max(1);
        let mut points = vec![self.start];
        let mut current = self.start;
        let push = |points: &mut Vec<Point>, p: Point| {
            if points.last() != Some(&p) {
                points.push(p);
            }
        };
        for segment in &self.segments {
            match *segment {
                Segment::Line(to) => {
                    push(&mut points, to);
                    current = to;
                }
                Segment::Quadratic { control, to } => {
                    for step in 1..=divisions {
                        let t = step as f32 / divisions as f32;
                        push(&mut points, quadratic(t, current, control, to));
                    }
                    current = to;
                }
                Segment::Cubic { c1, c2, to } => {
                    for step in 1..=divisions {
                        let t = step as f32 / divisions as f32;
                        push(&mut points, cubic(t, current, c1, c2, to));
                    }
                    current = to;
                }
            }
        }
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        points
    }
}

fn quadratic(t: f32, p0: Point, p1: Point, p2: Point) -> Point {
    let k = 1.0 - t;
    p0 * (k * k) + p1 * (2.0 * k * t) + p2 * (t * t)
}

fn cubic(t: f32, p0: Point, p1: Point, p2: Point, p3: Point) -> Point {
    let k = 1.0 - t;
    p0 * (k * k * k) + p1 * (3.0 * k * k * t) + p2 * (3.0 * k * t * t) + p3 * (t * t * t)
}

/// Signed area, positive for counter-clockwise contours (y up).
pub fn signed_area(contour: &[Point]) -> f32 {
    let n = contour.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for p in 0..n {
        let q = (p + 1) % n;
        area += contour[p].x * contour[q].y - contour[q].x * contour[p].y;
    }
    area * 0.5
}

pub fn is_clockwise(contour: &[Point]) -> bool {
    signed_area(contour) < 0.0
}

/// Even-odd point in polygon test.
pub fn contains_point(polygon: &[Point], p: Point) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// A flattened outline with holes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    pub contour: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapePath {
    sub_paths: Vec<SubPath>,
}

impl ShapePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_paths.iter().all(|s| s.segments.is_empty())
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        let p = Vector2::new(x, y);
        self.sub_paths.push(SubPath {
            start: p,
            segments: Vec::new(),
        });
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.push(Segment::Line(Vector2::new(x, y)))
    }

    pub fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        self.push(Segment::Quadratic {
            control: Vector2::new(cx, cy),
            to: Vector2::new(x, y),
        })
    }

    pub fn bezier_curve_to(
        &mut self,
        c1x: f32,
        c1y: f32,
        c2x: f32,
        c2y: f32,
        x: f32,
        y: f32,
    ) -> &mut Self {
        self.push(Segment::Cubic {
            c1: Vector2::new(c1x, c1y),
            c2: Vector2::new(c2x, c2y),
            to: Vector2::new(x, y),
        })
    }

    fn push(&mut self, segment: Segment) -> &mut Self {
        // drawing without a move_to starts a sub-path at the origin
        if self.sub_paths.is_empty() {
            self.move_to(0.0, 0.0);
        }
        if let Some(sub_path) = self.sub_paths.last_mut() {
            sub_path.segments.push(segment);
        }
        self
    }

    /// Flatten every sub-path and sort the contours into shapes.
    ///
    /// Clockwise contours are solids and counter-clockwise ones are holes (the
    /// typeface convention). If an outline has no clockwise contour at all
    /// the convention is flipped. Each hole goes to the smallest solid
    /// containing it, or to the last solid seen before it.
    pub fn to_shapes(&self, divisions: u32) -> Vec<Shape> {
        let contours: Vec<Vec<Point>> = self
            .sub_paths
            .iter()
            .map(|s| s.points(divisions))
            .filter(|points| points.len() >= 3 && signed_area(points).abs() > f32::EPSILON)
            .collect();
        if contours.is_empty() {
            return Vec::new();
        }

        let any_clockwise = contours.iter().any(|c| is_clockwise(c));
        let is_solid = |c: &[Point]| is_clockwise(c) == any_clockwise;

        let mut shapes: Vec<Shape> = Vec::new();
        let mut orphan_holes: Vec<(Option<usize>, Vec<Point>)> = Vec::new();
        for contour in contours {
            if is_solid(&contour) {
                shapes.push(Shape {
                    contour,
                    holes: Vec::new(),
                });
            } else {
                orphan_holes.push((shapes.len().checked_sub(1), contour));
            }
        }

        for (preceding, hole) in orphan_holes {
            let owner = shapes
                .iter()
                .enumerate()
                .filter(|(_, s)| contains_point(&s.contour, hole[0]))
                .min_by(|(_, a), (_, b)| {
                    signed_area(&a.contour)
                        .abs()
                        .total_cmp(&signed_area(&b.contour).abs())
                })
                .map(|(idx, _)| idx)
                .or(preceding);
            match owner {
                Some(idx) => shapes[idx].holes.push(hole),
                None => log::warn!("Dropping a hole that belongs to no outline"),
            }
        }
        shapes
    }
}
