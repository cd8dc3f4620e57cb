//! Cradle ribs: lofted V-shaped ribs round the back of the bottle.
//!
//! Each cradle rib starts at the bottom on one side of the core, rises to a
//! peak behind the bottle and comes back down on the other side. The
//! section hugs the bottle where the rib meets the base and flattens into
//! a narrower vertical strip towards the peak, so the sweep is a loft
//! through key sections rather than a single profile.
//!
//! The peak is nearly a corner, too sharp for sections held square to the
//! path. Section planes instead lie flat at both ends and turn steadily to
//! upright at the peak, following the levelled path direction.

use holder_kernel_sweep::{EndOverride, SweepOptions};

use crate::config::GrabberConfig;
use crate::law::{mid_distance, Law};
use crate::path::PathSpec;
use crate::section::SectionParams;

/// One planned cradle rib.
#[derive(Debug, Clone, PartialEq)]
pub struct CradlePlan {
    /// Position among cradle ribs, 0 = outermost.
    pub index: usize,
    /// Start angle (the rib ends at `360 - min_angle`).
    pub min_angle: f64,
    /// Peak height.
    pub max_z: f64,
    /// Path to sample.
    pub path: PathSpec,
    /// Key sections as `(progress, params)`, covering `[0, 1]`.
    pub sections: Vec<(f64, SectionParams)>,
    /// Sweep options: flat ends turning to upright planes at the peak.
    pub options: SweepOptions,
}

/// Section at `pct` along a cradle rib.
///
/// Roundness `|2 pct - 1|^smooth` is 1 at the ends and 0 at the peak; the
/// inner radius is divided by it, so the section follows the bottle at the
/// ends and is nearly flat at the peak. Width blends from `side` at the
/// ends to `side * center_ratio` at the peak.
pub fn cradle_section(config: &GrabberConfig, pct: f64) -> SectionParams {
    let c = &config.cradle;
    let d = mid_distance(pct);
    let roundness = d.powf(c.smooth);
    let size = d * c.side + (1.0 - d) * c.side * c.center_ratio;
    let inner_radius = config.inner_radius() / (roundness + config.binormal_epsilon);
    SectionParams {
        width: size,
        inner_radius,
        outer_radius: inner_radius + config.wall_thickness,
        wall_thickness: config.wall_thickness,
        center_bias: config.clearance,
    }
}

/// Plan every cradle rib. Assumes a validated configuration.
pub fn plan_cradle(config: &GrabberConfig) -> Vec<CradlePlan> {
    let c = &config.cradle;
    let eps = config.binormal_epsilon;

    (0..c.count)
        .zip(&c.section_samples)
        .map(|(index, &n)| {
            let min_angle = c.min_angle + c.angle_loss * index as f64;
            let max_z = config.cradle_max_z() - config.cradle_z_loss() * index as f64;
            let path = PathSpec {
                radial_offset: config.radial_offset(),
                angle: Law::Linear {
                    start: min_angle,
                    end: 360.0 - min_angle,
                },
                height: Law::Tent {
                    edge: 0.0,
                    peak: max_z,
                    exponent: c.smooth,
                },
                // Twin leans backwards then forwards in angle and upwards at
                // the peak, where the path is horizontal.
                twin_angle: Law::Linear {
                    start: -eps,
                    end: eps,
                },
                twin_height: Law::Tent {
                    edge: 0.0,
                    peak: eps,
                    exponent: 1.0,
                },
                samples: c.path_samples,
                max_travel: None,
            };
            let sections = (0..=n)
                .map(|i| {
                    let pct = i as f64 / n as f64;
                    (pct, cradle_section(config, pct))
                })
                .collect();
            let options = SweepOptions {
                tangent_window: (c.path_samples / (2 * n)).max(1),
                end_override: Some(EndOverride::z_up(0.5).leveled()),
            };
            CradlePlan {
                index,
                min_angle,
                max_z,
                path,
                sections,
                options,
            }
        })
        .collect()
}
