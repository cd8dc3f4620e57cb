//! Indexed triangle meshes.

use std::collections::HashMap;

use holder_kernel_math::{Point3, Vec3};

/// A triangle mesh with flat vertex, index and normal buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]` (f32).
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]` (u32).
    pub indices: Vec<u32>,
    /// Flat array of vertex normals: `[nx0, ny0, nz0, ...]` (f32). Same length as vertices.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            normals: Vec::new(),
        }
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Check if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a vertex and return its index. Its normal starts at zero.
    pub fn push_vertex(&mut self, p: Point3) -> u32 {
        let index = self.num_vertices() as u32;
        self.vertices
            .extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        self.normals.extend_from_slice(&[0.0, 0.0, 0.0]);
        index
    }

    /// Append a triangle by vertex indices.
    pub fn push_triangle(&mut self, tri: [u32; 3]) {
        self.indices.extend_from_slice(&tri);
    }

    /// Position of vertex `i`.
    pub fn position(&self, i: usize) -> Point3 {
        Point3::new(
            self.vertices[3 * i] as f64,
            self.vertices[3 * i + 1] as f64,
            self.vertices[3 * i + 2] as f64,
        )
    }

    /// Iterate triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Enclosed volume by the divergence theorem.
    ///
    /// Positive when triangles wind counter-clockwise seen from outside.
    /// Only meaningful for closed meshes.
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| {
                let v0 = self.position(a).coords;
                let v1 = self.position(b).coords;
                let v2 = self.position(c).coords;
                v0.dot(&v1.cross(&v2)) / 6.0
            })
            .sum()
    }

    /// Check that every directed edge is matched by exactly one opposite edge.
    ///
    /// This is the watertight, consistently oriented condition: each
    /// undirected edge is shared by exactly two triangles that traverse it in
    /// opposite directions.
    pub fn is_closed(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        let mut directed: HashMap<(usize, usize), u32> = HashMap::new();
        for [a, b, c] in self.triangles() {
            for edge in [(a, b), (b, c), (c, a)] {
                *directed.entry(edge).or_insert(0) += 1;
            }
        }
        directed
            .iter()
            .all(|(&(a, b), &count)| count == 1 && directed.get(&(b, a)) == Some(&1))
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        if self.num_vertices() == 0 {
            return None;
        }
        let first = self.position(0);
        Some((1..self.num_vertices()).map(|i| self.position(i)).fold(
            (first, first),
            |(lo, hi), p| {
                (
                    Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                    Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
                )
            },
        ))
    }

    /// Unit normal of triangle `tri`, or zero for a degenerate triangle.
    pub fn face_normal(&self, tri: [usize; 3]) -> Vec3 {
        let [a, b, c] = tri.map(|i| self.position(i));
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        if len < 1e-12 {
            Vec3::zeros()
        } else {
            n / len
        }
    }

    /// Recompute per-vertex normals as area-weighted face normal averages.
    pub fn compute_normals(&mut self) {
        let mut acc = vec![Vec3::zeros(); self.num_vertices()];
        let tris: Vec<[usize; 3]> = self.triangles().collect();
        for [a, b, c] in tris {
            let pa = self.position(a);
            // Unnormalized cross product weights by twice the area.
            let n = (self.position(b) - pa).cross(&(self.position(c) - pa));
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        self.normals = acc
            .into_iter()
            .flat_map(|n| {
                let len = n.norm();
                let n = if len < 1e-12 { n } else { n / len };
                [n.x as f32, n.y as f32, n.z as f32]
            })
            .collect();
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
