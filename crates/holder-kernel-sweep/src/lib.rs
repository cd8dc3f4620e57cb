#![warn(missing_docs)]

//! Sweep and loft operations for the bottle holder kernel.
//!
//! Solids are closed triangle meshes built directly from rings of section
//! vertices placed along a sampled 3D path. Each ring is oriented by a
//! [`SweepFrame`] reconstructed from a *twin* path: a copy of the primary path
//! offset by a tiny amount, whose displacement from the primary sample fixes
//! the section's in-plane direction without any curvature computation.
//!
//! - [`sweep`]: one section carried along the whole path.
//! - [`loft_along`]: several key sections at chosen progress values, blended
//!   vertex-wise between neighbours.

mod frame;
mod loft;
mod mesh;
mod sweep;

pub use frame::{twin_frames, EndOverride, SweepFrame};
pub use loft::{loft_along, LoftSection};
pub use mesh::TriangleMesh;
pub use sweep::{sweep, SweepOptions};

use thiserror::Error;

/// Errors from sweep and loft operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    /// The path has zero length.
    #[error("path has zero length")]
    ZeroLengthPath,

    /// Primary and twin paths differ in length.
    #[error("primary path has {primary} samples but twin has {twin}")]
    MismatchedPaths {
        /// Primary sample count.
        primary: usize,
        /// Twin sample count.
        twin: usize,
    },

    /// Fewer than two path samples.
    #[error("need at least 2 path samples, got {0}")]
    TooFewSamples(usize),

    /// The cross-section is unusable.
    #[error("invalid section: {0}")]
    InvalidProfile(String),

    /// The cross-section crosses itself.
    #[error("section polygon is self-intersecting")]
    SelfIntersectingProfile,

    /// The twin path coincides with the primary path along the tangent.
    #[error("twin path gives no orientation at sample {sample}")]
    DegenerateFrame {
        /// Index of the offending sample.
        sample: usize,
    },

    /// The section is larger than the local path curvature allows.
    #[error("section folds over itself between samples {sample} and {}", sample + 1)]
    Folded {
        /// Index of the first of the two folding samples.
        sample: usize,
    },

    /// Loft key sections are not in a usable order.
    #[error("invalid loft sections: {0}")]
    InvalidSections(String),

    /// Loft key sections have different vertex counts.
    #[error("loft section {index} has {found} vertices, expected {expected}")]
    MismatchedSections {
        /// Index of the offending section.
        index: usize,
        /// Vertex count of the first section.
        expected: usize,
        /// Vertex count of the offending section.
        found: usize,
    },

    /// The resulting mesh encloses no volume.
    #[error("swept solid encloses no volume")]
    EmptySolid,
}
