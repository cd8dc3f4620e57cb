//! Rib cross-sections.
//!
//! A rib section is a curved strip of wall: an inner arc concentric with the
//! bottle, an outer arc one wall thickness further out, and two tangent
//! blends rounding off the ends. Local +y points towards the cylinder axis,
//! local x runs along the bottle surface.

use holder_kernel_math::{Point2, Vec2};
use holder_kernel_sketch::{
    arc_center_from_radius, Polygon2, SketchError, SketchProfile, SketchSegment,
};

/// Blend tangent length as a multiple of the blend chord.
pub const BLEND_FACTOR: f64 = 2.5;

/// Inputs for one cross-section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionParams {
    /// Chord of both arcs, i.e. the rib width along the surface.
    pub width: f64,
    /// Radius of the bottle-facing arc.
    pub inner_radius: f64,
    /// Radius of the outer arc.
    pub outer_radius: f64,
    /// Distance between the two arc chords.
    pub wall_thickness: f64,
    /// Extra offset pushing the section away from the cylinder.
    pub center_bias: f64,
}

/// A centered rib cross-section.
#[derive(Debug, Clone)]
pub struct CrossSection {
    profile: SketchProfile,
}

impl CrossSection {
    /// Build the section described by `params`.
    ///
    /// # Errors
    ///
    /// [`SketchError::RadiusTooSmall`] if an arc radius cannot span the
    /// width; other [`SketchError`]s for degenerate dimensions.
    pub fn new(params: &SectionParams) -> Result<Self, SketchError> {
        let w = params.width / 2.0;
        let t = params.wall_thickness / 2.0;

        let inner_start = Point2::new(-w, t);
        let inner_end = Point2::new(w, t);
        let inner = SketchSegment::Arc {
            start: inner_start,
            end: inner_end,
            center: arc_center_from_radius(inner_start, inner_end, params.inner_radius, true)?,
            ccw: true,
        };

        // Traversed right to left so the loop closes.
        let outer_start = Point2::new(w, -t);
        let outer_end = Point2::new(-w, -t);
        let outer = SketchSegment::Arc {
            start: outer_start,
            end: outer_end,
            center: arc_center_from_radius(outer_start, outer_end, params.outer_radius, false)?,
            ccw: false,
        };

        let right = blend(&inner, &outer);
        let left = blend(&outer, &inner);

        let center = Point2::from((inner.midpoint().coords + outer.midpoint().coords) / 2.0)
            + Vec2::new(0.0, params.center_bias);
        let profile = SketchProfile::new(vec![inner, right, outer, left])?
            .translated(-center.coords);
        Ok(Self { profile })
    }

    /// The centered profile: arcs, then blends, closed.
    pub fn profile(&self) -> &SketchProfile {
        &self.profile
    }

    /// Tessellate for sweeping.
    ///
    /// The vertex count depends only on the segment counts, so any two
    /// sections tessellated with the same arguments can be lofted.
    pub fn polygon(&self, arc_segments: usize, blend_segments: usize) -> Polygon2 {
        self.profile.tessellate(arc_segments, blend_segments)
    }
}

/// Hermite blend from the end of `from` to the start of `to`, tangent to both.
fn blend(from: &SketchSegment, to: &SketchSegment) -> SketchSegment {
    let start = from.end();
    let end = to.start();
    let scale = BLEND_FACTOR * (end - start).norm();
    SketchSegment::Blend {
        start,
        end,
        start_tangent: from.tangent_at(1.0) * scale,
        end_tangent: to.tangent_at(0.0) * scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rib_params() -> SectionParams {
        SectionParams {
            width: 20.0,
            inner_radius: 41.2,
            outer_radius: 43.6,
            wall_thickness: 2.4,
            center_bias: 0.2,
        }
    }

    #[test]
    fn test_profile_is_closed_and_simple() {
        let section = CrossSection::new(&rib_params()).unwrap();
        assert_eq!(section.profile().len(), 4);
        let poly = section.polygon(12, 6);
        assert_eq!(poly.len(), 2 * 12 + 2 * 6);
        assert!(!poly.self_intersects());
        assert!(poly.signed_area().abs() > 20.0 * 2.4 * 0.9);
        // Mirror-symmetric about the local y axis.
        assert_relative_eq!(poly.centroid().x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_arcs_concentric_with_bottle() {
        let section = CrossSection::new(&rib_params()).unwrap();
        let segs = &section.profile().segments;
        match (&segs[0], &segs[2]) {
            (
                SketchSegment::Arc { center: ci, .. },
                SketchSegment::Arc { center: co, .. },
            ) => {
                // Both centers lie towards +y (the axis side), on x = 0.
                assert_relative_eq!(ci.x, 0.0, epsilon = 1e-9);
                assert_relative_eq!(co.x, 0.0, epsilon = 1e-9);
                assert!(ci.y > 30.0 && co.y > 30.0);
            }
            _ => panic!("expected arcs at positions 0 and 2"),
        }
    }

    #[test]
    fn test_centering_bias_moves_away_from_axis() {
        let params = rib_params();
        let unbiased = CrossSection::new(&SectionParams {
            center_bias: 0.0,
            ..params
        })
        .unwrap();
        let biased = CrossSection::new(&params).unwrap();

        let mid = |s: &CrossSection| {
            let segs = &s.profile().segments;
            (segs[0].midpoint().y + segs[2].midpoint().y) / 2.0
        };
        assert_relative_eq!(mid(&unbiased), 0.0, epsilon = 1e-12);
        assert_relative_eq!(mid(&biased), -0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_blends_are_tangent() {
        let section = CrossSection::new(&rib_params()).unwrap();
        let segs = &section.profile().segments;
        for i in 0..4 {
            let a = segs[i].tangent_at(1.0);
            let b = segs[(i + 1) % 4].tangent_at(0.0);
            assert_relative_eq!(a.dot(&b), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_width_beyond_diameter_fails() {
        let params = SectionParams {
            width: 90.0,
            ..rib_params()
        };
        assert!(matches!(
            CrossSection::new(&params),
            Err(SketchError::RadiusTooSmall { .. })
        ));
    }

    #[test]
    fn test_flat_section_for_huge_radius() {
        let params = SectionParams {
            width: 11.7,
            inner_radius: 41.2 / 1e-4,
            outer_radius: 41.2 / 1e-4 + 2.4,
            ..rib_params()
        };
        let poly = CrossSection::new(&params).unwrap().polygon(12, 6);
        assert!(!poly.self_intersects());
        let (lo, hi) = poly.bounds().unwrap();
        assert!(hi.y - lo.y < 2.4 + 0.1);
    }
}
