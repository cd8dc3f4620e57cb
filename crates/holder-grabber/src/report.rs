//! Run report: what was built, trimmed and skipped.

use serde::Serialize;

use crate::error::RibError;
use crate::generate::RibId;
use crate::trim::ClosestApproach;

/// Why a rib is missing from the assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer than two usable path samples.
    GeometryDegenerate,
    /// The section or sweep could not produce a solid.
    SweepFailure,
    /// No crossing with the reference path within the threshold.
    TrimUnresolved,
}

impl From<&RibError> for SkipReason {
    fn from(err: &RibError) -> Self {
        match err {
            RibError::GeometryDegenerate { .. } => SkipReason::GeometryDegenerate,
            RibError::Section(_) | RibError::SweepFailure(_) => SkipReason::SweepFailure,
            RibError::TrimUnresolved { .. } => SkipReason::TrimUnresolved,
        }
    }
}

/// A rib that made it into the assembly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltRib {
    /// Rib identity.
    pub rib: RibId,
    /// Path samples swept.
    pub samples: usize,
    /// Triangles in the rib mesh.
    pub triangles: usize,
    /// Enclosed volume (mm³).
    pub volume: f64,
}

/// A rib shortened at its closest approach to the reference path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimmedRib {
    /// Rib identity.
    pub rib: RibId,
    /// Closest approach, indexed in the untrimmed path.
    pub closest: ClosestApproach,
    /// Samples left after trimming.
    pub kept_samples: usize,
}

/// A rib that was skipped or dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRib {
    /// Rib identity.
    pub rib: RibId,
    /// Failure class.
    pub reason: SkipReason,
    /// Human-readable detail.
    pub detail: String,
}

/// Outcome of every planned rib in one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Ribs in the assembly, in plan order.
    pub built: Vec<BuiltRib>,
    /// Ribs that were trimmed and then built.
    pub trimmed: Vec<TrimmedRib>,
    /// Ribs missing from the assembly.
    pub skipped: Vec<SkippedRib>,
}

impl RunReport {
    pub(crate) fn record_skip(&mut self, rib: RibId, err: &RibError) {
        self.skipped.push(SkippedRib {
            rib,
            reason: SkipReason::from(err),
            detail: err.to_string(),
        });
    }

    /// Whether `rib` was skipped or dropped.
    pub fn is_skipped(&self, rib: RibId) -> bool {
        self.skipped.iter().any(|s| s.rib == rib)
    }

    /// Skip entry for `rib`, if any.
    pub fn skip_of(&self, rib: RibId) -> Option<&SkippedRib> {
        self.skipped.iter().find(|s| s.rib == rib)
    }

    /// Number of skipped ribs with `reason`.
    pub fn count(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
