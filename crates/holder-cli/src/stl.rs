//! Binary STL I/O.

use anyhow::{bail, Result};
use holder_kernel_math::{Point3, Vec3};
use holder_kernel_sweep::TriangleMesh;

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

/// Encode `mesh` as binary STL. Facet normals are recomputed per triangle.
pub fn export_stl_bytes(mesh: &TriangleMesh) -> Vec<u8> {
    let num_triangles = mesh.num_triangles();
    let mut data = Vec::with_capacity(HEADER_LEN + 4 + num_triangles * TRIANGLE_LEN);

    let mut header = [b' '; HEADER_LEN];
    let title = b"holder-cli STL export";
    header[..title.len()].copy_from_slice(title);
    data.extend_from_slice(&header);
    data.extend_from_slice(&(num_triangles as u32).to_le_bytes());

    for tri in mesh.triangles() {
        let n = mesh.face_normal(tri);
        let len = n.norm();
        let n = if len > 1e-10 { n / len } else { Vec3::z() };
        for c in [n.x, n.y, n.z] {
            data.extend_from_slice(&(c as f32).to_le_bytes());
        }
        for i in tri {
            let v = &mesh.vertices[3 * i..3 * i + 3];
            for c in v {
                data.extend_from_slice(&c.to_le_bytes());
            }
        }
        // Attribute byte count
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    data
}

/// Decode a binary STL. Every facet gets its own three vertices.
pub fn import_stl_bytes(data: &[u8]) -> Result<TriangleMesh> {
    if data.len() < HEADER_LEN + 4 {
        bail!("STL too short: {} bytes", data.len());
    }
    let count_bytes: [u8; 4] = data[HEADER_LEN..HEADER_LEN + 4].try_into()?;
    let count = u32::from_le_bytes(count_bytes) as usize;
    let expected = HEADER_LEN + 4 + count * TRIANGLE_LEN;
    if data.len() < expected {
        bail!(
            "STL declares {count} triangles ({expected} bytes) but has {} bytes; ASCII STL is not supported",
            data.len()
        );
    }

    let mut mesh = TriangleMesh::new();
    for facet in data[HEADER_LEN + 4..expected].chunks_exact(TRIANGLE_LEN) {
        let mut tri = [0u32; 3];
        for (k, slot) in tri.iter_mut().enumerate() {
            let base = 12 + 12 * k;
            let mut xyz = [0.0f64; 3];
            for (j, c) in xyz.iter_mut().enumerate() {
                let off = base + 4 * j;
                let bytes: [u8; 4] = facet[off..off + 4].try_into()?;
                *c = f32::from_le_bytes(bytes) as f64;
            }
            *slot = mesh.push_vertex(Point3::new(xyz[0], xyz[1], xyz[2]));
        }
        mesh.push_triangle(tri);
    }
    mesh.compute_normals();
    Ok(mesh)
}
