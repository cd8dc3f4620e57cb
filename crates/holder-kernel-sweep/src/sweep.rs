//! Sweep operation: carry one section along a twin-oriented path.

use holder_kernel_math::Point3;
use holder_kernel_sketch::Polygon2;

use crate::frame::{twin_frames, EndOverride, SweepFrame};
use crate::mesh::TriangleMesh;
use crate::SweepError;

/// Options shared by sweeps and lofts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepOptions {
    /// Samples on each side used for the chord tangent. Default: 1.
    ///
    /// Wider windows smooth the plane normal where the path turns sharply.
    pub tangent_window: usize,
    /// Force the section plane normal at both ends. Default: none.
    pub end_override: Option<EndOverride>,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            tangent_window: 1,
            end_override: None,
        }
    }
}

/// Sweep a closed section along `primary`, oriented by `twin`.
///
/// The section is placed unchanged at every sample's frame. The result is a
/// closed, outward-wound mesh with one ring of vertices per sample and flat
/// caps at both ends.
///
/// # Errors
///
/// Any [`SweepError`] from frame construction, an invalid or
/// self-intersecting section, or a section too large for the local path
/// curvature ([`SweepError::Folded`]).
pub fn sweep(
    section: &Polygon2,
    primary: &[Point3],
    twin: &[Point3],
    options: SweepOptions,
) -> Result<TriangleMesh, SweepError> {
    let section = normalized_section(section)?;
    let frames = twin_frames(primary, twin, options.tangent_window, options.end_override)?;
    let rings = vec![section; frames.len()];
    solid_from_rings(&frames, &rings)
}

/// Check a section and return it wound counter-clockwise.
///
/// Reversal keeps vertex 0 in place, so sections that correspond
/// vertex-by-vertex still do after normalization.
pub(crate) fn normalized_section(section: &Polygon2) -> Result<Polygon2, SweepError> {
    if section.len() < 3 {
        return Err(SweepError::InvalidProfile(format!(
            "section has {} vertices",
            section.len()
        )));
    }
    // A symmetric bow-tie has zero net area; report the crossing instead.
    if section.self_intersects() {
        return Err(SweepError::SelfIntersectingProfile);
    }
    if section.signed_area().abs() < 1e-12 {
        return Err(SweepError::InvalidProfile("section has zero area".into()));
    }
    Ok(if section.is_ccw() {
        section.clone()
    } else {
        section.reversed()
    })
}

/// Place `rings[k]` at `frames[k]` and stitch consecutive rings into a solid.
pub(crate) fn solid_from_rings(
    frames: &[SweepFrame],
    rings: &[Polygon2],
) -> Result<TriangleMesh, SweepError> {
    let (first, last) = match (rings.first(), rings.last()) {
        (Some(first), Some(last)) if rings.len() == frames.len() && rings.len() >= 2 => {
            (first, last)
        }
        _ => return Err(SweepError::TooFewSamples(rings.len().min(frames.len()))),
    };
    let m = first.len();

    let placed: Vec<Vec<Point3>> = frames
        .iter()
        .zip(rings)
        .map(|(frame, ring)| ring.points().iter().map(|p| frame.transform_point(*p)).collect())
        .collect();

    for (k, pair) in placed.windows(2).enumerate() {
        let tangent = frames[k].tangent;
        let folds = pair[0]
            .iter()
            .zip(&pair[1])
            .any(|(a, b)| (b - a).dot(tangent.as_ref()) <= 0.0);
        if folds {
            return Err(SweepError::Folded { sample: k });
        }
    }

    let start_cap = first
        .triangulate()
        .ok_or_else(|| SweepError::InvalidProfile("start section cannot be triangulated".into()))?;
    let end_cap = last
        .triangulate()
        .ok_or_else(|| SweepError::InvalidProfile("end section cannot be triangulated".into()))?;

    let mut mesh = TriangleMesh::new();
    let grid: Vec<Vec<u32>> = placed
        .iter()
        .map(|ring| ring.iter().map(|p| mesh.push_vertex(*p)).collect())
        .collect();

    // Lateral faces: two triangles per section edge and path step.
    for pair in grid.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        for v in 0..m {
            let w = (v + 1) % m;
            mesh.push_triangle([a[w], a[v], b[v]]);
            mesh.push_triangle([a[w], b[v], b[w]]);
        }
    }

    // A counter-clockwise section faces backwards along the path, so the
    // start cap keeps its winding and the end cap is reversed.
    let (ring0, ring_n) = (&grid[0], &grid[grid.len() - 1]);
    for [i, j, k] in start_cap {
        mesh.push_triangle([ring0[i], ring0[j], ring0[k]]);
    }
    for [i, j, k] in end_cap {
        mesh.push_triangle([ring_n[i], ring_n[k], ring_n[j]]);
    }

    if mesh.signed_volume() <= 0.0 {
        return Err(SweepError::EmptySolid);
    }
    mesh.compute_normals();
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use holder_kernel_math::{polar_point, Point2, Vec3};

    fn rect(w: f64, h: f64) -> Polygon2 {
        Polygon2::new(vec![
            Point2::new(-w / 2.0, -h / 2.0),
            Point2::new(w / 2.0, -h / 2.0),
            Point2::new(w / 2.0, h / 2.0),
            Point2::new(-w / 2.0, h / 2.0),
        ])
    }

    fn line_z(n: usize, length: f64) -> (Vec<Point3>, Vec<Point3>) {
        let primary: Vec<Point3> = (0..n)
            .map(|i| Point3::new(0.0, 0.0, length * i as f64 / (n - 1) as f64))
            .collect();
        let twin = primary.iter().map(|p| p + Vec3::new(1e-6, 0.0, 0.0)).collect();
        (primary, twin)
    }

    #[test]
    fn test_sweep_rectangle_is_box() {
        let (primary, twin) = line_z(6, 10.0);
        let mesh = sweep(&rect(2.0, 3.0), &primary, &twin, SweepOptions::default()).unwrap();
        assert!(mesh.is_closed());
        assert_relative_eq!(mesh.signed_volume(), 60.0, epsilon = 1e-3);
        assert_eq!(mesh.num_vertices(), 6 * 4);
        // 5 steps × 4 edges × 2 + 2 caps × 2
        assert_eq!(mesh.num_triangles(), 44);
    }

    #[test]
    fn test_clockwise_section_is_normalized() {
        let (primary, twin) = line_z(3, 4.0);
        let mesh = sweep(
            &rect(1.0, 1.0).reversed(),
            &primary,
            &twin,
            SweepOptions::default(),
        )
        .unwrap();
        assert!(mesh.is_closed());
        assert_relative_eq!(mesh.signed_volume(), 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_concave_section() {
        let l = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ]);
        let (primary, twin) = line_z(4, 3.0);
        let mesh = sweep(&l, &primary, &twin, SweepOptions::default()).unwrap();
        assert!(mesh.is_closed());
        assert_relative_eq!(mesh.signed_volume(), 9.0, epsilon = 1e-4);
    }

    #[test]
    fn test_helix_sweep_closed() {
        let primary: Vec<Point3> = (0..60)
            .map(|i| polar_point(40.0, i as f64 * 3.0, -(i as f64)))
            .collect();
        let twin: Vec<Point3> = (0..60)
            .map(|i| polar_point(40.0, i as f64 * 3.0 + 1e-4, -(i as f64)))
            .collect();
        let mesh = sweep(&rect(6.0, 2.0), &primary, &twin, SweepOptions::default()).unwrap();
        assert!(mesh.is_closed());
        assert!(mesh.signed_volume() > 0.0);
    }

    #[test]
    fn test_self_intersecting_section_rejected() {
        let bow = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]);
        let (primary, twin) = line_z(3, 1.0);
        assert_eq!(
            sweep(&bow, &primary, &twin, SweepOptions::default()),
            Err(SweepError::SelfIntersectingProfile)
        );
    }

    #[test]
    fn test_degenerate_section_rejected() {
        let (primary, twin) = line_z(3, 1.0);
        let flat = Polygon2::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ]);
        assert!(matches!(
            sweep(&flat, &primary, &twin, SweepOptions::default()),
            Err(SweepError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_section_wider_than_curvature_folds() {
        // Tight circle of radius 2 in the XZ plane, section 10 wide in-plane.
        let primary: Vec<Point3> = (0..20)
            .map(|i| {
                let a = (i as f64 * 10.0).to_radians();
                Point3::new(2.0 * a.cos(), 0.0, 2.0 * a.sin())
            })
            .collect();
        // Twin displaced towards the circle centre, so the section's long
        // axis lies in the plane of the bend.
        let twin: Vec<Point3> = primary
            .iter()
            .map(|p| Point3::from(p.coords * (1.0 - 1e-6)))
            .collect();
        let result = sweep(&rect(10.0, 1.0), &primary, &twin, SweepOptions::default());
        assert!(matches!(result, Err(SweepError::Folded { .. })));
    }

    /// Arch over 40 degrees of a cylinder, rising from z = 0 to a sharp
    /// peak; the twin leans along the arch at the ends and upwards at the
    /// peak.
    fn peaked_arch(n: usize) -> (Vec<Point3>, Vec<Point3>) {
        let eps = 1e-4;
        let point = |k: usize, offset: f64| {
            let p = k as f64 / (n - 1) as f64;
            let d = (2.0 * p - 1.0).abs();
            let z = 44.5 * (1.0 - d.powf(1.25));
            polar_point(
                42.4,
                160.0 + 40.0 * p + offset * (2.0 * p - 1.0),
                z + offset * (1.0 - d),
            )
        };
        let primary = (0..n).map(|k| point(k, 0.0)).collect();
        let twin = (0..n).map(|k| point(k, eps)).collect();
        (primary, twin)
    }

    #[test]
    fn test_sharp_peak_folds_square_sections() {
        let (primary, twin) = peaked_arch(231);
        let result = sweep(&rect(12.0, 2.4), &primary, &twin, SweepOptions::default());
        assert!(matches!(result, Err(SweepError::Folded { .. })));
    }

    #[test]
    fn test_sharp_peak_sweeps_with_leveled_override() {
        let (primary, twin) = peaked_arch(231);
        let options = SweepOptions {
            tangent_window: 1,
            end_override: Some(EndOverride::z_up(0.5).leveled()),
        };
        let mesh = sweep(&rect(12.0, 2.4), &primary, &twin, options).unwrap();
        assert!(mesh.is_closed());
        assert!(mesh.signed_volume() > 0.0);

        // Both end caps lie flat on z = 0.
        let count = mesh.num_vertices();
        for i in (0..4).chain(count - 4..count) {
            let z = mesh.vertices[3 * i + 2];
            assert!(z.abs() < 1e-4, "vertex {i} at z = {z}");
        }
    }
}
