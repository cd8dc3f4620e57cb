#![warn(missing_docs)]

//! Wrap-around clip ("grabber") ribs for a parametric bottle holder.
//!
//! A holder is a core bracket body sitting against one side of a bottle.
//! The grabber is a set of curved ribs swept around the bottle from the
//! edges of the core, so the bottle snaps in and is held all round:
//!
//! - spiral ribs on the left and right, descending from the top of the
//!   usable height towards the base fillet; the leading ribs of the "half"
//!   side are trimmed where they cross the first full rib
//! - cradle ribs, V-shaped lofts rising from the bottom round the back
//!
//! The pipeline is [`plan`] → sample ([`sample_path`]) → trim
//! ([`trim_path`]) → sweep, driven by [`generate`]. Per-rib failures are
//! recorded in the [`RunReport`]; only an invalid configuration aborts.
//!
//! ```no_run
//! use holder_grabber::{generate, Assembly, GrabberConfig};
//!
//! let config = GrabberConfig::default();
//! let generation = generate(&config)?;
//! let assembly = Assembly::new(None, &generation);
//! println!("{} ribs", assembly.ribs().len());
//! # Ok::<(), holder_grabber::GrabberError>(())
//! ```

mod assembly;
mod config;
mod cradle;
mod error;
mod generate;
mod law;
mod path;
mod planner;
mod report;
mod section;
mod trim;

pub use assembly::Assembly;
pub use config::{
    core_angle_from_profile_pct, CoreConfig, CradleConfig, GrabberConfig, HalfConfig, MeshConfig,
    Side, SideConfig,
};
pub use cradle::{cradle_section, plan_cradle, CradlePlan};
pub use error::{GrabberError, Result, RibError};
pub use generate::{generate, Generation, Rib, RibGroup, RibId};
pub use law::{mid_distance, Law};
pub use path::{sample_path, PathSpec, SampledPath};
pub use planner::{angle_step, plan, plan_side, side_order, GrabberPlan, PlanRow, RibPlan, SidePlan};
pub use report::{BuiltRib, RunReport, SkipReason, SkippedRib, TrimmedRib};
pub use section::{CrossSection, SectionParams, BLEND_FACTOR};
pub use trim::{closest_approach, trim_path, ClosestApproach, ReferencePath};
