//! Tessellated closed polygons.

use holder_kernel_math::{lerp2, Point2, Vec2};

/// A closed polygon in sketch coordinates (last vertex connects to the first).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2 {
    points: Vec<Point2>,
}

impl Polygon2 {
    /// Wrap an ordered vertex list.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Vertices in order.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area via the shoelace formula (positive when counter-clockwise).
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice / 2.0
    }

    /// True when vertices wind counter-clockwise.
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Area centroid, falling back to the vertex average for degenerate polygons.
    pub fn centroid(&self) -> Point2 {
        let n = self.points.len();
        if n == 0 {
            return Point2::origin();
        }
        let area = self.signed_area();
        if area.abs() < 1e-15 {
            let sum = self
                .points
                .iter()
                .fold(Vec2::zeros(), |acc, p| acc + p.coords);
            return Point2::from(sum / n as f64);
        }
        let mut c = Vec2::zeros();
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let cross = a.x * b.y - b.x * a.y;
            c += (a.coords + b.coords) * cross;
        }
        Point2::from(c / (6.0 * area))
    }

    /// The polygon with reversed winding, keeping vertex 0 in place.
    pub fn reversed(&self) -> Self {
        let mut points = Vec::with_capacity(self.points.len());
        if let Some(first) = self.points.first() {
            points.push(*first);
            points.extend(self.points.iter().skip(1).rev().copied());
        }
        Self { points }
    }

    /// Vertex-wise interpolation towards `other`.
    ///
    /// Returns `None` when the vertex counts differ.
    pub fn lerp(&self, other: &Polygon2, t: f64) -> Option<Polygon2> {
        if self.points.len() != other.points.len() {
            return None;
        }
        let points = self
            .points
            .iter()
            .zip(&other.points)
            .map(|(a, b)| lerp2(a, b, t))
            .collect();
        Some(Polygon2 { points })
    }

    /// Check whether any two non-adjacent edges cross.
    ///
    /// Brute force over all edge pairs; profiles have a few dozen edges.
    pub fn self_intersects(&self) -> bool {
        let n = self.points.len();
        if n < 4 {
            return false;
        }
        for i in 0..n {
            let a0 = self.points[i];
            let a1 = self.points[(i + 1) % n];
            for j in (i + 2)..n {
                // Edge n-1 shares vertex 0 with edge 0.
                if i == 0 && j == n - 1 {
                    continue;
                }
                let b0 = self.points[j];
                let b1 = self.points[(j + 1) % n];
                if segments_cross(a0, a1, b0, b1) {
                    return true;
                }
            }
        }
        false
    }

    /// Ear-clipping triangulation of a simple counter-clockwise polygon.
    ///
    /// Returns vertex index triples wound counter-clockwise, or `None` when no
    /// ear can be found (self-intersecting or clockwise input).
    pub fn triangulate(&self) -> Option<Vec<[usize; 3]>> {
        let n = self.points.len();
        if n < 3 {
            return None;
        }

        let mut remaining: Vec<usize> = (0..n).collect();
        let mut triangles = Vec::with_capacity(n - 2);

        while remaining.len() > 3 {
            let m = remaining.len();
            let mut found_ear = false;

            for i in 0..m {
                let prev = (i + m - 1) % m;
                let next = (i + 1) % m;
                let a = self.points[remaining[prev]];
                let b = self.points[remaining[i]];
                let c = self.points[remaining[next]];

                if orient(a, b, c) <= 0.0 {
                    continue;
                }

                let blocked = (0..m)
                    .filter(|&j| j != prev && j != i && j != next)
                    .any(|j| point_in_triangle(self.points[remaining[j]], a, b, c));
                if blocked {
                    continue;
                }

                triangles.push([remaining[prev], remaining[i], remaining[next]]);
                remaining.remove(i);
                found_ear = true;
                break;
            }

            if !found_ear {
                return None;
            }
        }

        triangles.push([remaining[0], remaining[1], remaining[2]]);
        Some(triangles)
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

fn orient(a: Point2, b: Point2, c: Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn point_in_triangle(p: Point2, a: Point2, b: Point2, c: Point2) -> bool {
    let eps = 1e-12;
    orient(a, b, p) > eps && orient(b, c, p) > eps && orient(c, a, p) > eps
}

fn segments_cross(a0: Point2, a1: Point2, b0: Point2, b1: Point2) -> bool {
    let d1 = orient(b0, b1, a0);
    let d2 = orient(b0, b1, a1);
    let d3 = orient(a0, a1, b0);
    let d4 = orient(a0, a1, b1);
    (d1 * d2 < 0.0) && (d3 * d4 < 0.0)
}
