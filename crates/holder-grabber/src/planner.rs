//! Rib placement.
//!
//! Spiral ribs are planned top-down per side. Each rib starts at the edge of
//! the core body (`±core_angle / 2`) and winds away from it while descending
//! one sample step at a time, so the chord covered per step (not the angle)
//! matches the configured wrap angle.

use crate::config::{GrabberConfig, Side};
use crate::cradle::{plan_cradle, CradlePlan};
use crate::error::Result;
use crate::law::Law;
use crate::path::PathSpec;
use crate::section::SectionParams;

/// One planned spiral rib.
#[derive(Debug, Clone, PartialEq)]
pub struct RibPlan {
    /// Side the rib winds towards.
    pub side: Side,
    /// Position on its side, 0 = topmost.
    pub index: usize,
    /// Start height above the base fillet.
    pub z_start: f64,
    /// Path to sample.
    pub path: PathSpec,
    /// Cross-section to sweep.
    pub section: SectionParams,
    /// Whether the rib must be trimmed against the reference path.
    pub trim: bool,
}

/// All spiral ribs of one side.
#[derive(Debug, Clone, PartialEq)]
pub struct SidePlan {
    /// The side.
    pub side: Side,
    /// Vertical rise of one rib.
    pub vertical_span: f64,
    /// Vertical pitch between rib starts.
    pub period: f64,
    /// Height above the base fillet usable by this side.
    pub available_height: f64,
    /// Degrees of travel per path sample.
    pub angle_step: f64,
    /// Number of leading ribs flagged for trimming.
    pub trim_count: usize,
    /// Ribs, topmost first.
    pub ribs: Vec<RibPlan>,
}

impl SidePlan {
    /// Number of ribs on this side.
    pub fn count(&self) -> usize {
        self.ribs.len()
    }
}

/// The complete placement for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct GrabberPlan {
    /// Spiral ribs per side, in generation order.
    pub sides: Vec<SidePlan>,
    /// Lofted cradle ribs.
    pub cradle: Vec<CradlePlan>,
}

/// Flat per-rib summary for printing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRow {
    /// `left`, `right` or `cradle`.
    pub group: String,
    /// Index within the group.
    pub index: usize,
    /// Start height (spiral ribs: above the base fillet; cradle: peak height).
    pub z: f64,
    /// Planned path samples.
    pub samples: usize,
    /// Flagged for trimming.
    pub trim: bool,
}

impl GrabberPlan {
    /// Total number of planned ribs.
    pub fn rib_count(&self) -> usize {
        self.sides.iter().map(SidePlan::count).sum::<usize>() + self.cradle.len()
    }

    /// One row per planned rib, in generation order.
    pub fn rows(&self) -> Vec<PlanRow> {
        let spiral = self.sides.iter().flat_map(|s| &s.ribs).map(|r| PlanRow {
            group: r.side.to_string(),
            index: r.index,
            z: r.z_start,
            samples: r.path.samples,
            trim: r.trim,
        });
        let cradle = self.cradle.iter().map(|c| PlanRow {
            group: "cradle".to_string(),
            index: c.index,
            z: c.max_z,
            samples: c.path.samples,
            trim: false,
        });
        spiral.chain(cradle).collect()
    }
}

/// Validate `config` and plan every rib.
pub fn plan(config: &GrabberConfig) -> Result<GrabberPlan> {
    config.validate()?;
    let sides = side_order(config)
        .into_iter()
        .map(|side| plan_side(config, side))
        .collect();
    Ok(GrabberPlan {
        sides,
        cradle: plan_cradle(config),
    })
}

/// Generation order: the full side before the trimmed one, so the reference
/// path exists before any rib needs it.
pub fn side_order(config: &GrabberConfig) -> [Side; 2] {
    match config.half.side {
        Some(half) => [half.opposite(), half],
        None => [Side::Left, Side::Right],
    }
}

/// Degrees travelled per sample so each step covers the wrap chord.
pub fn angle_step(config: &GrabberConfig, side: Side) -> f64 {
    let side_step = config.z_per_step() * config.side(side).wrap_angle.to_radians().tan();
    (side_step / config.radial_offset()).asin().to_degrees()
}

/// Plan one side. Assumes a validated configuration.
pub fn plan_side(config: &GrabberConfig, side: Side) -> SidePlan {
    let cfg = config.side(side);
    let vertical_span = cfg.vertical_span();
    let period = cfg.period();
    let available_height = config.available_height(side);

    let fit = (available_height / period + 1e-9).floor().max(0.0) as usize;
    let count = cfg.max_count.map_or(fit, |max| fit.min(max));
    let trim_count = if config.half.side == Some(side) {
        (count as f64 * config.half.pct + 1e-9).floor() as usize
    } else {
        0
    };

    let step = angle_step(config, side);
    let z_per_step = config.z_per_step();
    let start_angle = side.sign() * config.core_angle() / 2.0;
    let section = SectionParams {
        width: cfg.width,
        inner_radius: config.inner_radius(),
        outer_radius: config.outer_radius(),
        wall_thickness: config.wall_thickness,
        center_bias: config.clearance,
    };

    let ribs = (0..count)
        .map(|index| {
            let z_start = available_height - index as f64 * period;
            let samples = (z_start / z_per_step + 1e-9).floor() as usize + 1;
            RibPlan {
                side,
                index,
                z_start,
                path: PathSpec {
                    radial_offset: config.radial_offset(),
                    angle: Law::Stepped {
                        start: start_angle,
                        step: side.sign() * step,
                    },
                    height: Law::Stepped {
                        start: config.base_fillet + z_start,
                        step: -z_per_step,
                    },
                    twin_angle: Law::Constant(config.binormal_epsilon),
                    twin_height: Law::Constant(0.0),
                    samples,
                    max_travel: Some(config.max_travel()),
                },
                section,
                trim: index < trim_count,
            }
        })
        .collect();

    SidePlan {
        side,
        vertical_span,
        period,
        available_height,
        angle_step: step,
        trim_count,
        ribs,
    }
}
