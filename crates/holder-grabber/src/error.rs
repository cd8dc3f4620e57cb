//! Error types for rib generation.

use holder_kernel_sketch::SketchError;
use holder_kernel_sweep::SweepError;
use thiserror::Error;

/// Errors that abort a whole generation run.
#[derive(Error, Debug)]
pub enum GrabberError {
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A single rib failed where the caller asked for that rib alone.
    #[error(transparent)]
    Rib(#[from] RibError),

    /// Reading a configuration file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid TOML for [`crate::GrabberConfig`].
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failures local to one rib. The run records them and continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RibError {
    /// Fewer than two usable path samples.
    #[error("path has {samples} usable samples, need at least 2")]
    GeometryDegenerate {
        /// Samples left after truncation or trimming.
        samples: usize,
    },

    /// The cross-section could not be built.
    #[error("cross-section failed: {0}")]
    Section(#[from] SketchError),

    /// The sweep could not produce a valid solid.
    #[error("sweep failed: {0}")]
    SweepFailure(#[from] SweepError),

    /// No usable closest approach to the reference path.
    #[error("{}", trim_message(.distance))]
    TrimUnresolved {
        /// Minimum distance found, or `None` without a reference path.
        distance: Option<f64>,
    },
}

fn trim_message(distance: &Option<f64>) -> String {
    match distance {
        Some(d) => format!("closest approach to reference is {d:.3} mm, above threshold"),
        None => "no reference path to trim against".to_string(),
    }
}

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GrabberError>;
